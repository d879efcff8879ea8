//! Philosophy Item Registry
//!
//! Immutable index of `PhilosophyItem` reference records. Loaded once from
//! JSON (or seeded with the built-in set) and only ever read afterwards.

use std::collections::BTreeMap;

use noesis_core::{FieldTheory, PhilosophyItem};

use crate::utils::error::{AppError, AppResult};

/// Read-only lookup table of philosophy items keyed by code.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: BTreeMap<String, PhilosophyItem>,
}

impl ItemRegistry {
    /// Load a registry from a JSON array of items.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let items: Vec<PhilosophyItem> = serde_json::from_str(json)?;
        Ok(Self::from_items(items))
    }

    /// Build a registry from already-parsed items. Later duplicates of a
    /// code replace earlier ones.
    pub fn from_items(items: Vec<PhilosophyItem>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.code.clone(), item))
            .collect();
        Self { items }
    }

    /// Built-in seed set used when no external index is supplied.
    pub fn builtin() -> Self {
        Self::from_items(vec![
            PhilosophyItem {
                code: "1-2".to_string(),
                name: "Daoist naturalism".to_string(),
                field_theory: FieldTheory::Plain("dao".to_string()),
                ontology: "ziran (self-so)".to_string(),
                epistemology: String::new(),
                teleology: String::new(),
                representative: "Zhuangzi".to_string(),
            },
            PhilosophyItem {
                code: "2-1-3".to_string(),
                name: "Transcendental idealism".to_string(),
                field_theory: FieldTheory::Structured {
                    base: "phenomena".to_string(),
                    reconciliation: "synthetic a priori".to_string(),
                    other: "noumena".to_string(),
                    practice: "critique".to_string(),
                },
                ontology: "appearance and thing-in-itself".to_string(),
                epistemology: "categories of the understanding".to_string(),
                teleology: String::new(),
                representative: "Kant".to_string(),
            },
            PhilosophyItem {
                code: "3-1-4-2".to_string(),
                name: "Dialectical historicism".to_string(),
                field_theory: FieldTheory::Plain("spirit".to_string()),
                ontology: "becoming".to_string(),
                epistemology: "phenomenology of consciousness".to_string(),
                teleology: "absolute knowing".to_string(),
                representative: "Hegel".to_string(),
            },
        ])
    }

    /// Look up an item by code.
    pub fn get(&self, code: &str) -> AppResult<&PhilosophyItem> {
        self.items
            .get(code)
            .ok_or_else(|| AppError::not_found(format!("philosophy item with code '{}'", code)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in code order.
    pub fn iter(&self) -> impl Iterator<Item = &PhilosophyItem> {
        self.items.values()
    }
}
