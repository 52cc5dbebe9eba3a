pub mod noop;
pub mod openai;
pub mod prompt_builder;
mod prompts;

use serde::Serialize;

use crate::error::GenerateError;

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation. Order within a conversation is chronological.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message { role: Role::Assistant, content: content.into() }
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl GenerationParams {
    /// Build params, substituting defaults for empty or zero values.
    pub fn new(model: Option<String>, temperature: Option<f64>, max_tokens: Option<u32>) -> Self {
        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let temperature = temperature
            .filter(|t| *t > 0.0)
            .unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = max_tokens.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_TOKENS);

        GenerationParams { model, temperature, max_tokens }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams::new(None, None, None)
    }
}

/// A single stateless request/response round with a text-generation service.
pub trait LlmClient {
    /// Send the full conversation and return the first candidate's text, untrimmed.
    fn complete(&self, messages: &[Message], params: &GenerationParams) -> Result<String, GenerateError>;
}
