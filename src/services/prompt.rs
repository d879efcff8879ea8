//! Prompt Templates
//!
//! Default prompt template text for the analysis pipelines and the persona
//! chat protocol, plus the movement-pattern label table keyed by code digit.
//! All templates use `{name}` placeholders rendered by
//! `noesis_core::template::render`; callers may pass their own template text
//! with the same placeholders.

/// System prompt for the structured domain analysis.
pub const DOMAIN_ANALYSIS_SYSTEM_PROMPT: &str = "You are a scholar of comparative philosophy producing structured concept analyses of manuscripts. \
Always respond with a single JSON object of the form {\"concepts\": [...]}. \
Each concept has: id, name, definition, explanation, examples, relationships (array of {targetId, description}). \
Ground every concept in the manuscript text; do not invent material.";

/// User template for one domain of the structured analysis.
///
/// Placeholders: {domainName}, {itemName}, {itemCode}, {referenceTerm},
/// {movementPattern}, {domainKey}, {manuscript}.
pub const DOMAIN_ANALYSIS_USER_TEMPLATE: &str = "Analyze the manuscript below through the {domainName} of the tradition \"{itemName}\" (code {itemCode}).\n\
Reference term for this domain: {referenceTerm}\n\
Movement pattern of this tradition: {movementPattern}\n\
Extract the concepts this domain reveals in the text. Use the domain key \"{domainKey}\" as the id prefix.\n\n\
Manuscript:\n{manuscript}";

/// System prompt for the comprehensive keyword analysis rounds.
pub const COMPREHENSIVE_SYSTEM_PROMPT: &str = "You are a scholar of comparative philosophy performing a multi-round keyword analysis of a manuscript. \
When asked for JSON, respond with a single JSON object and nothing else.";

/// Round 0: whole-document summary. Placeholders: {title}, {manuscript}.
pub const SUMMARY_USER_TEMPLATE: &str = "Summarize the structure and content of the document \"{title}\": its sections, line of argument, and central claims. \
Respond in plain prose.\n\nDocument:\n{manuscript}";

/// Round 1: primary concepts for one keyword.
/// Placeholders: {keyword}, {summary}, {manuscript}.
pub const PRIMARY_USER_TEMPLATE: &str = "Document summary:\n{summary}\n\n\
Extract the primary concepts related to the keyword \"{keyword}\" from the document below. \
Respond with {\"concepts\": [...]}.\n\nDocument:\n{manuscript}";

/// Round 2: secondary concepts elaborating one primary concept.
/// Placeholders: {conceptJson}, {keyword}, {summary}, {manuscript}.
pub const SECONDARY_USER_TEMPLATE: &str = "Document summary:\n{summary}\n\n\
Primary concept (keyword \"{keyword}\"):\n{conceptJson}\n\n\
Derive the secondary concepts that elaborate this primary concept in the document below. \
Set each secondary concept's parent to the primary concept's id. \
Respond with {\"concepts\": [...]}.\n\nDocument:\n{manuscript}";

/// Meta-role system prompt shared by both persona sub-calls.
pub const PERSONA_SYSTEM_PROMPT: &str = "You are a trained actor embodying a philosopher. Stay in character: reason from the \
tradition's own vocabulary and commitments, and never mention being an AI or an actor.";

/// Thinking-step template. Placeholder: {message}.
pub const PERSONA_THINKING_TEMPLATE: &str = "Before replying, reason step by step about how your tradition would approach this message:\n\
{message}\n\nLay out the considerations plainly; this reasoning is private and will not be shown.";

/// Reply-step template. Placeholders: {message}, {thinking}.
pub const PERSONA_REPLY_TEMPLATE: &str = "The message you are answering:\n{message}\n\n\
Your private reasoning was:\n{thinking}\n\n\
Now give your reply, in character, without repeating the reasoning verbatim.";

/// Movement-pattern label for a code digit.
///
/// Each segment digit of an item code names how the tradition moves between
/// its poles; the label is interpolated into the domain analysis prompt.
/// Unknown digits fall back to a neutral label.
pub fn movement_pattern(digit: &str) -> &'static str {
    match digit.trim() {
        "1" => "emanation and return",
        "2" => "dialectical mediation",
        "3" => "cyclical alternation",
        "4" => "ascent toward the ideal",
        "5" => "descent into the concrete",
        "6" => "mutual resonance",
        "7" => "rupture and renewal",
        "8" => "gradual cultivation",
        "9" => "sudden reversal",
        _ => "unspecified movement",
    }
}
