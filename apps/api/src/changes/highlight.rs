//! Line Highlighter: flags lines of the serialized résumé that belong to a
//! changed section.
//!
//! Matching is plain substring search on each line. A changed experience
//! entry flags every experience-looking line in the document, not only the
//! lines of that entry.

use serde::Serialize;

use crate::models::resume::ResumeDocument;

const SUMMARY_KEY: &str = "\"summary\"";
const SKILLS_KEY: &str = "\"skills\"";
const EXPERIENCE_KEYWORDS: &[&str] = &["company", "position", "description", "responsibilities"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCategory {
    Modified,
    // Declared for the legend; the line matcher only ever produces `Modified`.
    Added,
    Removed,
}

impl HighlightCategory {
    pub const ALL: [HighlightCategory; 3] = [
        HighlightCategory::Modified,
        HighlightCategory::Added,
        HighlightCategory::Removed,
    ];

    /// Background colour used by clients to paint the category.
    pub fn color(self) -> &'static str {
        match self {
            HighlightCategory::Modified => "#ffeb3b",
            HighlightCategory::Added => "#c8e6c9",
            HighlightCategory::Removed => "#ffcdd2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LineHighlight {
    /// Zero-based line index.
    pub line: usize,
    pub category: HighlightCategory,
}

/// Returns one highlight per flagged line, in line order.
pub fn highlight_lines<S: AsRef<str>>(
    lines: &[S],
    original: &ResumeDocument,
    modified: &ResumeDocument,
) -> Vec<LineHighlight> {
    let summary_changed = original.summary != modified.summary;
    let skills_changed = original.skills != modified.skills;
    let experience_changed = original.experience != modified.experience;

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.as_ref();
            if summary_changed && line.contains(SUMMARY_KEY) {
                true
            } else if line.contains(SKILLS_KEY) {
                skills_changed
            } else {
                experience_changed && is_experience_line(line)
            }
        })
        .map(|(line, _)| LineHighlight {
            line,
            category: HighlightCategory::Modified,
        })
        .collect()
}

fn is_experience_line(line: &str) -> bool {
    let line = line.to_lowercase();
    EXPERIENCE_KEYWORDS.iter().any(|k| line.contains(k))
}
