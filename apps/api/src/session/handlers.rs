//! Axum route handlers for the résumé session API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::changes::detector::Change;
use crate::changes::highlight::{HighlightCategory, LineHighlight};
use crate::changes::render::render_detailed;
use crate::errors::AppError;
use crate::export::{export_file_name, write_export};
use crate::session::Session;
use crate::state::AppState;
use crate::store::DocumentRef;
use crate::tailoring::TailorRequest;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub resume_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TailorBody {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct LegendEntry {
    pub category: HighlightCategory,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub resume_id: Option<String>,
    pub text: String,
    pub highlights: Vec<LineHighlight>,
    pub change_count: usize,
    pub changes_summary: String,
    pub legend: Vec<LegendEntry>,
}

impl SessionView {
    fn of(session: &Session) -> Self {
        Self {
            resume_id: session.original().map(|b| b.resume_id.clone()),
            text: session.current_text().to_string(),
            highlights: session.highlights(),
            change_count: session.change_log().len(),
            changes_summary: session.changes_summary(),
            legend: HighlightCategory::ALL
                .iter()
                .map(|&category| LegendEntry {
                    category,
                    color: category.color(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChangesResponse {
    pub changes: Vec<Change>,
    pub summary: String,
    pub detailed: String,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
    pub bytes: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentRef>>, AppError> {
    Ok(Json(state.store.list_documents().await?))
}

/// POST /api/v1/session/select
///
/// Loads a stored résumé as the new original. A failed load leaves the
/// session as it was.
pub async fn handle_select(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionView>, AppError> {
    let document = state.store.load(&req.resume_id).await?;

    let mut session = state.session.lock();
    session.select(req.resume_id, document)?;
    Ok(Json(SessionView::of(&session)))
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(SessionView::of(&state.session.lock()))
}

/// PUT /api/v1/session/text
pub async fn handle_edit(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock();
    session.edit(req.text)?;
    Ok(Json(SessionView::of(&session)))
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock();
    session.reset()?;
    Ok(Json(SessionView::of(&session)))
}

/// POST /api/v1/session/tailor
///
/// Sends the editable résumé and the job description to the tailoring
/// gateway, merges its answer and recomputes the change log. Any failure
/// leaves the editable text and the change log untouched.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorBody>,
) -> Result<Json<SessionView>, AppError> {
    let (_busy, current) = state.session.begin_tailoring(&req.job_description)?;

    let request = TailorRequest::new(&current, &req.job_description);
    let sections = state.tailor.tailor(&request).await?;
    let modified = sections.apply(current);

    let mut session = state.session.lock();
    session.apply_modified(modified)?;
    Ok(Json(SessionView::of(&session)))
}

/// POST /api/v1/session/compare
///
/// Recomputes the change log for the editable text as it stands.
pub async fn handle_compare(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock();
    session.compare_current()?;
    Ok(Json(SessionView::of(&session)))
}

/// GET /api/v1/session/changes
pub async fn handle_changes(
    State(state): State<AppState>,
) -> Result<Json<ChangesResponse>, AppError> {
    let session = state.session.lock();
    let changes = session.change_log();
    if changes.is_empty() {
        return Err(AppError::Input("No changes to display.".to_string()));
    }
    Ok(Json(ChangesResponse {
        changes: changes.to_vec(),
        summary: session.changes_summary(),
        detailed: render_detailed(changes),
    }))
}

/// POST /api/v1/session/export
///
/// Renders the editable résumé through the export gateway and writes the
/// result to the export directory as `{First}_{Last}_Resume.pdf`.
pub async fn handle_export(State(state): State<AppState>) -> Result<Json<ExportResponse>, AppError> {
    state.exporter.ensure_configured()?;
    let (_busy, document) = state.session.begin_export()?;

    let file_name = export_file_name(document.name.as_deref(), state.exporter.extension())?;
    let bytes = state.exporter.render(&document).await?;
    let path = write_export(&state.config.export_dir, &file_name, &bytes).await?;

    Ok(Json(ExportResponse {
        path: path.display().to_string(),
        bytes: bytes.len(),
    }))
}
