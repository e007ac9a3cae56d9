//! `LlmTailor`: the tailoring backend that goes through `llm_client`.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::tailoring::prompts::TAILOR_PROMPT_TEMPLATE;
use crate::tailoring::{TailorRequest, TailoredSections, TailoringGateway};

pub struct LlmTailor {
    /// `None` when no API key is configured.
    llm: Option<LlmClient>,
}

impl LlmTailor {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let llm = match &config.openai_api_key {
            Some(key) => Some(LlmClient::new(
                key.clone(),
                &config.openai_base_url,
                config.openai_model.clone(),
                config.gateway_timeout,
            )?),
            None => {
                warn!("OPENAI_API_KEY is not set; tailoring is disabled until it is configured");
                None
            }
        };
        Ok(Self::new(llm))
    }
}

#[async_trait]
impl TailoringGateway for LlmTailor {
    async fn tailor(&self, request: &TailorRequest) -> Result<TailoredSections, AppError> {
        let llm = self.llm.as_ref().ok_or_else(|| {
            AppError::Configuration(
                "OpenAI API key is missing. Set OPENAI_API_KEY to enable tailoring.".to_string(),
            )
        })?;

        let prompt = build_prompt(request)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build prompt: {e}")))?;

        info!("Requesting tailored sections from {}", llm.model());
        let sections = llm
            .call_json::<TailoredSections>(&prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| match e {
                LlmError::Timeout(_) => AppError::Timeout(format!("Tailoring {e}")),
                other => AppError::Gateway(format!("Tailoring failed: {other}")),
            })?;
        info!(
            "Tailoring returned summary={} experience={:?} skills={:?}",
            sections.summary.is_some(),
            sections.experience.as_ref().map(Vec::len),
            sections.skills.as_ref().map(|s| s.iter().count())
        );
        Ok(sections)
    }
}

fn build_prompt(request: &TailorRequest) -> Result<String, serde_json::Error> {
    let experience = serde_json::to_string_pretty(&request.experience)?;
    let skills = serde_json::to_string_pretty(&request.skills)?;
    Ok(TAILOR_PROMPT_TEMPLATE
        .replace("{experience}", &experience)
        .replace("{skills}", &skills)
        .replace("{summary}", &request.summary)
        .replace("{job_description}", &request.job_description))
}
