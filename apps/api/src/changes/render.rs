//! Change Log Renderer: plain-text views of a change list.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::changes::detector::Change;
use crate::models::resume::ExperienceEntry;

pub const NO_CHANGES: &str = "No changes detected.";
const SEPARATOR_WIDTH: usize = 50;

/// Numbered one-line-per-change summary, stamped with `at`.
pub fn render_summary(changes: &[Change], at: NaiveDateTime) -> String {
    if changes.is_empty() {
        return NO_CHANGES.to_string();
    }

    let mut out = format!("Changes made on {}:\n\n", at.format("%Y-%m-%d %H:%M:%S"));
    for (i, change) in changes.iter().enumerate() {
        let n = i + 1;
        let line = match change {
            Change::TextModified { section, .. } | Change::EntryModified { section, .. } => {
                format!("{n}. {section}: Content modified")
            }
            Change::ItemsAdded { section, items } => {
                format!("{n}. {section}: Added items - {}", join(items))
            }
            Change::ItemsRemoved { section, items } => {
                format!("{n}. {section}: Removed items - {}", join(items))
            }
            Change::CountChanged {
                section,
                original_count,
                modified_count,
            } => format!("{n}. {section}: Count changed from {original_count} to {modified_count}"),
        };
        out.push_str(&line);
        out.push_str("\n\n");
    }
    out
}

/// Expanded view: every change with its full before/after content.
pub fn render_detailed(changes: &[Change]) -> String {
    let mut out = String::new();
    for (i, change) in changes.iter().enumerate() {
        out.push_str(&format!("=== CHANGE {}: {} ===\n", i + 1, change.section()));

        match change {
            Change::TextModified {
                original_text,
                modified_text,
                ..
            } => before_after(&mut out, original_text, modified_text),
            Change::EntryModified {
                original_entry,
                modified_entry,
                ..
            } => before_after(
                &mut out,
                &entry_text(original_entry),
                &entry_text(modified_entry),
            ),
            Change::ItemsAdded { items, .. } => bullet_list(&mut out, "ADDED", items),
            Change::ItemsRemoved { items, .. } => bullet_list(&mut out, "REMOVED", items),
            Change::CountChanged {
                original_count,
                modified_count,
                ..
            } => {
                out.push_str(&format!(
                    "\nORIGINAL COUNT: {original_count}\nMODIFIED COUNT: {modified_count}\n\n"
                ));
            }
        }

        out.push_str(&"-".repeat(SEPARATOR_WIDTH));
        out.push_str("\n\n");
    }
    out
}

fn before_after(out: &mut String, original: &str, modified: &str) {
    out.push_str(&format!(
        "\nORIGINAL:\n{original}\n\nMODIFIED:\n{modified}\n\n"
    ));
}

fn bullet_list(out: &mut String, label: &str, items: &BTreeSet<String>) {
    out.push_str(&format!("\n{label} ITEMS:\n"));
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
    out.push('\n');
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn entry_text(entry: &ExperienceEntry) -> String {
    serde_json::to_string_pretty(entry).unwrap_or_else(|_| format!("{entry:?}"))
}
