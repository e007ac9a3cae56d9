//! Change Detector: structural comparison of an original and a modified résumé.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::resume::{ExperienceEntry, ResumeDocument};

pub const SUMMARY_SECTION: &str = "Summary";
pub const EXPERIENCE_SECTION: &str = "Experience";
pub const SKILLS_SECTION: &str = "Skills";

/// One detected difference between two documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Change {
    TextModified {
        section: String,
        original_text: String,
        modified_text: String,
    },
    EntryModified {
        section: String,
        original_entry: ExperienceEntry,
        modified_entry: ExperienceEntry,
    },
    CountChanged {
        section: String,
        original_count: usize,
        modified_count: usize,
    },
    ItemsAdded {
        section: String,
        items: BTreeSet<String>,
    },
    ItemsRemoved {
        section: String,
        items: BTreeSet<String>,
    },
}

impl Change {
    pub fn section(&self) -> &str {
        match self {
            Change::TextModified { section, .. }
            | Change::EntryModified { section, .. }
            | Change::CountChanged { section, .. }
            | Change::ItemsAdded { section, .. }
            | Change::ItemsRemoved { section, .. } => section,
        }
    }
}

/// Compares `original` against `modified` and returns every change, always
/// in the same section order: summary, experience count, experience entries
/// by index, skills added, skills removed.
///
/// Experience entries are compared by position only. Entries past the end of
/// the shorter list show up solely through the `CountChanged` record.
pub fn detect_changes(original: &ResumeDocument, modified: &ResumeDocument) -> Vec<Change> {
    let mut changes = Vec::new();

    if original.summary != modified.summary {
        changes.push(Change::TextModified {
            section: SUMMARY_SECTION.to_string(),
            original_text: original.summary.clone(),
            modified_text: modified.summary.clone(),
        });
    }

    let (original_exp, modified_exp) = (&original.experience, &modified.experience);
    if original_exp.len() != modified_exp.len() {
        changes.push(Change::CountChanged {
            section: EXPERIENCE_SECTION.to_string(),
            original_count: original_exp.len(),
            modified_count: modified_exp.len(),
        });
    }

    for (i, (orig, modi)) in original_exp.iter().zip(modified_exp).enumerate() {
        if orig != modi {
            changes.push(Change::EntryModified {
                section: format!("{EXPERIENCE_SECTION}[{i}]"),
                original_entry: orig.clone(),
                modified_entry: modi.clone(),
            });
        }
    }

    let added = modified.skills.difference(&original.skills);
    let removed = original.skills.difference(&modified.skills);
    if !added.is_empty() {
        changes.push(Change::ItemsAdded {
            section: SKILLS_SECTION.to_string(),
            items: added,
        });
    }
    if !removed.is_empty() {
        changes.push(Change::ItemsRemoved {
            section: SKILLS_SECTION.to_string(),
            items: removed,
        });
    }

    changes
}
