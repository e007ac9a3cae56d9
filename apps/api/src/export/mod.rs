//! Export Gateway: sends a finished résumé to an external renderer and
//! stores the returned file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("renderer returned status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::Timeout(_) => AppError::Timeout(format!("Export {e}")),
            other => AppError::Gateway(format!("Failed to generate PDF: {other}")),
        }
    }
}

#[async_trait]
pub trait ExportGateway: Send + Sync {
    /// Extension of the files `render` produces.
    fn extension(&self) -> &str {
        "pdf"
    }

    /// Fails with a configuration error when the renderer cannot be reached
    /// at all. Checked before anything else about an export.
    fn ensure_configured(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn render(&self, document: &ResumeDocument) -> Result<Bytes, AppError>;
}

/// Posts the document as JSON to the configured PDF generator endpoint.
pub struct HttpExporter {
    client: Client,
    endpoint: Option<String>,
    timeout: Duration,
}

impl HttpExporter {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?,
            endpoint,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.pdf_generator_endpoint.is_none() {
            warn!("PDF_GENERATOR_ENDPOINT is not set; export is disabled until it is configured");
        }
        Self::new(config.pdf_generator_endpoint.clone(), config.gateway_timeout)
    }

    async fn post(&self, endpoint: &str, document: &ResumeDocument) -> Result<Bytes, ExportError> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                ExportError::Timeout(self.timeout)
            } else {
                ExportError::Http(e)
            }
        };

        let response = self
            .client
            .post(endpoint)
            .json(document)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.bytes().await.map_err(classify)
    }
}

impl HttpExporter {
    fn endpoint(&self) -> Result<&str, AppError> {
        self.endpoint.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "PDF generator endpoint is not configured. Set PDF_GENERATOR_ENDPOINT.".to_string(),
            )
        })
    }
}

#[async_trait]
impl ExportGateway for HttpExporter {
    fn ensure_configured(&self) -> Result<(), AppError> {
        self.endpoint().map(|_| ())
    }

    async fn render(&self, document: &ResumeDocument) -> Result<Bytes, AppError> {
        let endpoint = self.endpoint()?;

        info!("Rendering resume via {endpoint}");
        let bytes = self.post(endpoint, document).await?;
        info!("Renderer returned {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Derives `{First}_{Last}_Resume.{extension}` from the document name.
///
/// The name must contain at least two whitespace-separated tokens; the first
/// and last are used.
pub fn export_file_name(name: Option<&str>, extension: &str) -> Result<String, AppError> {
    let name = name.unwrap_or_default();
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return Err(AppError::Input(
            "The resume has no name to build the export file name from.".to_string(),
        ));
    };
    if tokens.len() < 2 {
        return Err(AppError::Input(format!(
            "Resume name '{name}' needs a first and a last name to build the export file name."
        )));
    }
    let unsafe_token = |t: &str| t.starts_with('.') || t.contains(['/', '\\']);
    if unsafe_token(first) || unsafe_token(last) {
        return Err(AppError::Input(format!(
            "Resume name '{name}' cannot be used as a file name."
        )));
    }
    Ok(format!("{first}_{last}_Resume.{extension}"))
}

/// Writes rendered bytes to `dir/file_name`, creating `dir` if needed.
pub async fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved export to {}", path.display());
    Ok(path)
}
