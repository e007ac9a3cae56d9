//! Document Store: one JSON file per résumé inside a single directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;

pub const UNNAMED_RESUME: &str = "Unnamed Resume";
pub const UNREADABLE_RESUME: &str = "Error Reading Resume";

/// A stored résumé as offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRef {
    /// File name inside the store directory. Stable for the life of the file.
    pub id: String,
    /// The document's `name` field, or a fallback label.
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every `*.json` file in the store, sorted by file name.
    /// Creates the directory when it does not exist yet.
    pub async fn list_documents(&self) -> anyhow::Result<Vec<DocumentRef>> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let mut ids = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to read {}", self.root.display()))?;
        while let Some(entry) = dir.next_entry().await? {
            let Ok(id) = entry.file_name().into_string() else {
                continue;
            };
            if id.ends_with(".json") && entry.file_type().await?.is_file() {
                ids.push(id);
            }
        }
        ids.sort();

        let mut refs = Vec::with_capacity(ids.len());
        for id in ids {
            let name = self.display_name(&id).await;
            refs.push(DocumentRef { id, name });
        }
        debug!("Listed {} resumes in {}", refs.len(), self.root.display());
        Ok(refs)
    }

    /// Loads and parses one stored résumé.
    pub async fn load(&self, id: &str) -> Result<ResumeDocument, AppError> {
        let path = self.path_for(id)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("Resume '{id}' not found")));
            }
            Err(e) => {
                return Err(AppError::Internal(
                    anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
                ));
            }
        };

        ResumeDocument::from_json(&text)
            .map_err(|e| AppError::Parse(format!("Failed to load resume '{id}': {e}")))
    }

    async fn display_name(&self, id: &str) -> String {
        let text = match tokio::fs::read_to_string(self.root.join(id)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Unable to read resume {id}: {e}");
                return UNREADABLE_RESUME.to_string();
            }
        };
        match ResumeDocument::from_json(&text) {
            Ok(doc) => doc.name.unwrap_or_else(|| UNNAMED_RESUME.to_string()),
            Err(e) => {
                warn!("Resume {id} is not valid JSON: {e}");
                UNREADABLE_RESUME.to_string()
            }
        }
    }

    /// Resolves an id to a path, refusing anything that is not a plain
    /// `.json` file name inside the store.
    fn path_for(&self, id: &str) -> Result<PathBuf, AppError> {
        let is_plain_name = Path::new(id).file_name().and_then(|n| n.to_str()) == Some(id);
        if id.is_empty() || !is_plain_name || !id.ends_with(".json") {
            return Err(AppError::Input(format!("Invalid resume id '{id}'")));
        }
        Ok(self.root.join(id))
    }
}
