use super::{GenerationParams, LlmClient, Message, Role};
use crate::error::GenerateError;

/// No-op / dummy model client for development with --no-model or model=none.
pub struct NoopClient;

impl LlmClient for NoopClient {
    fn complete(&self, messages: &[Message], params: &GenerationParams) -> Result<String, GenerateError> {
        let turns = messages.iter().filter(|m| m.role == Role::User).count();
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.lines().next().unwrap_or_default())
            .unwrap_or_default();

        Ok(format!(
            "Dummy message for testing (LLM disabled)\n\n\
             Model: {model}\n\
             User turns: {turns}\n\
             Last user turn: {last_user}\n",
            model = params.model,
        ))
    }
}
