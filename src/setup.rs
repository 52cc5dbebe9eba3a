use anyhow::Result;
use log::debug;

use crate::config::Config;
use crate::llm::noop::NoopClient;
use crate::llm::openai::OpenAiClient;
use crate::llm::LlmClient;

/// Build the LLM client based on CLI + config.
pub fn build_llm_client(cfg: &Config) -> Result<Box<dyn LlmClient>> {
    if cfg.no_model {
        debug!("Using NoopClient (no model calls).");
        return Ok(Box::new(NoopClient));
    }

    debug!(
        "Using OpenAiClient at {} with model: {}",
        cfg.api_base_url, cfg.params.model
    );

    if cfg.api_key.is_none() {
        log::warn!("No API key found in CLI flags, environment or config file");
    }

    let client = OpenAiClient::new(cfg.api_key.clone(), &cfg.api_base_url, cfg.timeout)?;
    Ok(Box::new(client))
}
