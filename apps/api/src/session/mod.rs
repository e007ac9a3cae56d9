//! Editing session: the selected original, the live editable text and the
//! change log derived from them.
//!
//! The change log is only ever replaced wholesale by the change detector;
//! there is no other way to mutate it.

pub mod handlers;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::changes::detector::{detect_changes, Change};
use crate::changes::highlight::{highlight_lines, LineHighlight};
use crate::changes::render::render_summary;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;

/// The document as captured at selection time.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub resume_id: String,
    pub document: ResumeDocument,
    /// Serialization shown right after loading; reset restores exactly this.
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Session {
    original: Option<Baseline>,
    current: String,
    /// Document the current change log was computed against.
    modified: Option<ResumeDocument>,
    change_log: Vec<Change>,
    compared_at: Option<NaiveDateTime>,
    busy: Option<&'static str>,
}

impl Session {
    pub fn original(&self) -> Option<&Baseline> {
        self.original.as_ref()
    }

    pub fn current_text(&self) -> &str {
        &self.current
    }

    pub fn change_log(&self) -> &[Change] {
        &self.change_log
    }

    /// Starts over with a freshly loaded document.
    pub fn select(&mut self, resume_id: String, document: ResumeDocument) -> Result<(), AppError> {
        self.ensure_idle()?;
        let text = document
            .to_pretty_text()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
        info!("Selected resume {resume_id}");
        self.current = text.clone();
        self.original = Some(Baseline {
            resume_id,
            document,
            text,
        });
        self.clear_changes();
        Ok(())
    }

    /// Restores the text captured at selection and drops the change log.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.ensure_idle()?;
        let baseline = self.original.as_ref().ok_or_else(|| {
            AppError::Input(
                "No original resume data to reset to. Please select a resume first.".to_string(),
            )
        })?;
        info!("Reset resume {} to original", baseline.resume_id);
        self.current = baseline.text.clone();
        self.clear_changes();
        Ok(())
    }

    /// Replaces the editable text. The text is only parsed when it is used.
    /// Highlights are line numbers into the compared text, so they are
    /// dropped until the next comparison; the change log is kept.
    pub fn edit(&mut self, text: String) -> Result<(), AppError> {
        self.ensure_idle()?;
        self.current = text;
        self.modified = None;
        Ok(())
    }

    /// Recomputes the change log between the original and `modified`, and
    /// shows `modified` as the editable text.
    pub fn apply_modified(&mut self, modified: ResumeDocument) -> Result<&[Change], AppError> {
        let baseline = self.original.as_ref().ok_or_else(no_original)?;
        let text = modified
            .to_pretty_text()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
        self.change_log = detect_changes(&baseline.document, &modified);
        self.compared_at = Some(Local::now().naive_local());
        self.current = text;
        self.modified = Some(modified);
        info!("Detected {} changes", self.change_log.len());
        Ok(&self.change_log)
    }

    /// Re-runs the change detector against the parsed editable text without
    /// calling any gateway.
    pub fn compare_current(&mut self) -> Result<&[Change], AppError> {
        self.ensure_idle()?;
        let modified = self.parsed_current()?;
        self.apply_modified(modified)
    }

    /// The change log rendered as a numbered summary, stamped with the time
    /// of the last comparison.
    pub fn changes_summary(&self) -> String {
        let at = self
            .compared_at
            .unwrap_or_else(|| Local::now().naive_local());
        render_summary(&self.change_log, at)
    }

    /// Lines of the editable text that belong to a changed section.
    pub fn highlights(&self) -> Vec<LineHighlight> {
        match (&self.original, &self.modified) {
            (Some(baseline), Some(modified)) => {
                let lines: Vec<&str> = self.current.lines().collect();
                highlight_lines(&lines, &baseline.document, modified)
            }
            _ => Vec::new(),
        }
    }

    fn parsed_current(&self) -> Result<ResumeDocument, AppError> {
        if self.current.trim().is_empty() {
            return Err(AppError::Input(
                "The resume content is empty. Please select a resume first.".to_string(),
            ));
        }
        ResumeDocument::from_json(&self.current)
            .map_err(|e| AppError::Parse(format!("Invalid JSON format in the resume content: {e}")))
    }

    fn clear_changes(&mut self) {
        self.change_log.clear();
        self.compared_at = None;
        self.modified = None;
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        match self.busy {
            Some(operation) => Err(AppError::Busy(format!(
                "{operation} is in progress; try again when it finishes"
            ))),
            None => Ok(()),
        }
    }
}

fn no_original() -> AppError {
    AppError::Input("Please select a resume first to enable change tracking.".to_string())
}

/// Handle to the single session shared by all requests.
#[derive(Clone, Default)]
pub struct SharedSession(Arc<Mutex<Session>>);

impl SharedSession {
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates tailoring input, marks the session busy and returns the
    /// parsed editable text. The busy mark is lifted when the guard drops.
    pub fn begin_tailoring(
        &self,
        job_description: &str,
    ) -> Result<(BusyGuard, ResumeDocument), AppError> {
        let mut session = self.lock();
        session.ensure_idle()?;
        if session.current.trim().is_empty() || job_description.trim().is_empty() {
            return Err(AppError::Input(
                "Please select a resume and provide a job description.".to_string(),
            ));
        }
        if session.original.is_none() {
            return Err(no_original());
        }
        let document = session.parsed_current()?;
        session.busy = Some("Tailoring");
        Ok((self.guard(), document))
    }

    /// Parses the editable text for export and marks the session busy.
    pub fn begin_export(&self) -> Result<(BusyGuard, ResumeDocument), AppError> {
        let mut session = self.lock();
        session.ensure_idle()?;
        let document = session.parsed_current()?;
        session.busy = Some("Export");
        Ok((self.guard(), document))
    }

    fn guard(&self) -> BusyGuard {
        BusyGuard {
            session: self.clone(),
        }
    }
}

/// Clears the session's busy mark on drop, whether the call succeeded or not.
pub struct BusyGuard {
    session: SharedSession,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.session.lock().busy = None;
    }
}
