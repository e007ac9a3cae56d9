use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportGateway;
use crate::session::SharedSession;
use crate::store::DocumentStore;
use crate::tailoring::TailoringGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: DocumentStore,
    /// The single editing session. Never held across an `.await`.
    pub session: SharedSession,
    /// Pluggable tailoring backend. Default: `LlmTailor`.
    pub tailor: Arc<dyn TailoringGateway>,
    /// Pluggable export backend. Default: `HttpExporter`.
    pub exporter: Arc<dyn ExportGateway>,
}
