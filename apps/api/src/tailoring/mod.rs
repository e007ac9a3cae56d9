//! Tailoring Gateway: rewrites summary, experience and skills against a job
//! description.
//!
//! `AppState` holds an `Arc<dyn TailoringGateway>`; the default backend is
//! `LlmTailor`.

pub mod gateway;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::{ExperienceEntry, ResumeDocument, SkillSet};

/// The sections sent for rewriting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TailorRequest {
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: SkillSet,
    pub job_description: String,
}

impl TailorRequest {
    pub fn new(document: &ResumeDocument, job_description: &str) -> Self {
        Self {
            summary: document.summary.clone(),
            experience: document.experience.clone(),
            skills: document.skills.clone(),
            job_description: job_description.to_string(),
        }
    }
}

/// Candidate replacements returned by the gateway. A section that is absent
/// (or `null`) leaves the document's section as it was.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TailoredSections {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub skills: Option<SkillSet>,
}

impl TailoredSections {
    /// Merges the returned sections into `document`.
    pub fn apply(self, mut document: ResumeDocument) -> ResumeDocument {
        if let Some(summary) = self.summary {
            document.summary = summary;
        }
        if let Some(experience) = self.experience {
            document.experience = experience;
        }
        if let Some(skills) = self.skills {
            document.skills = skills;
        }
        document
    }
}

#[async_trait]
pub trait TailoringGateway: Send + Sync {
    async fn tailor(&self, request: &TailorRequest) -> Result<TailoredSections, AppError>;
}
