//! Prompt Template Rendering
//!
//! Templates use `{name}` placeholders. The grammar is fixed, so plain
//! string replacement is sufficient; unknown placeholders are left in place
//! so a misconfigured template is visible in the rendered prompt.

/// Substitute `{name}` placeholders with their values.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in vars {
        rendered = rendered.replace(&format!("{{{}}}", name), value);
    }
    rendered
}
