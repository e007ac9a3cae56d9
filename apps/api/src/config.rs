use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const OPENAI_KEY_PLACEHOLDER: &str = "YOUR_OPENAI_API_KEY";
const PDF_ENDPOINT_PLACEHOLDER: &str = "YOUR_PDF_GENERATOR_ENDPOINT";

/// Application configuration loaded from environment variables.
///
/// Gateway credentials are optional at startup. Operations that need a
/// missing one fail with a configuration error when they are attempted.
#[derive(Debug, Clone)]
pub struct Config {
    pub resumes_dir: PathBuf,
    pub export_dir: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub pdf_generator_endpoint: Option<String>,
    pub gateway_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            resumes_dir: PathBuf::from(or_default("RESUMES_DIR", "resumes")),
            export_dir: PathBuf::from(or_default("EXPORT_DIR", ".")),
            openai_api_key: configured(lookup("OPENAI_API_KEY"), OPENAI_KEY_PLACEHOLDER),
            openai_base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: or_default("OPENAI_MODEL", "gpt-4o-mini"),
            pdf_generator_endpoint: configured(
                lookup("PDF_GENERATOR_ENDPOINT"),
                PDF_ENDPOINT_PLACEHOLDER,
            ),
            gateway_timeout: Duration::from_secs(
                or_default("GATEWAY_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("GATEWAY_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

/// Treats blank values and the shipped placeholder as "not configured".
fn configured(value: Option<String>, placeholder: &str) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != placeholder)
}
