use indicatif::ProgressBar;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationParams, LlmClient, Message};
use crate::error::GenerateError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI-compatible implementation of LlmClient. One attempt per call, no retry.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    api_base_url: String,
}

impl OpenAiClient {
    /// `timeout` of `None` means the request may block indefinitely.
    pub fn new(
        api_key: Option<String>,
        api_base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerateError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(OpenAiClient {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, messages: &[Message], params: &GenerationParams) -> Result<String, GenerateError> {
        let api_key = self.api_key.as_deref().ok_or(GenerateError::Auth)?;

        let req = ChatRequest {
            model: &params.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let url = self.chat_url();
        log::info!("Calling OpenAI model {:?} with {} message(s)", params.model, messages.len());

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("Waiting for {}...", params.model));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .map_err(|e| GenerateError::Transport(format!("failed to send request to {url}: {e}")))
            .and_then(|resp| {
                let status = resp.status().as_u16();
                let body = resp
                    .text()
                    .map_err(|e| GenerateError::Transport(format!("failed to read response body: {e}")))?;
                Ok((status, body))
            });

        spinner.finish_and_clear();

        let (status, body) = result?;
        log::trace!("OpenAI raw response (HTTP {status}): {}", truncate(&body, 2000));

        parse_chat_response(status, &body)
    }
}

/// Classify a chat-completions response body into content or a typed failure.
fn parse_chat_response(status: u16, body: &str) -> Result<String, GenerateError> {
    let parsed: ChatResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&status) => {
            return Err(GenerateError::Upstream(format!("HTTP {status} - {}", body.trim())));
        }
        Err(e) => return Err(GenerateError::MalformedResponse(e.to_string())),
    };

    if let Some(err) = parsed.error {
        return Err(GenerateError::Upstream(err.message));
    }

    if !(200..300).contains(&status) {
        return Err(GenerateError::Upstream(format!("HTTP {status} - {}", body.trim())));
    }

    if let Some(usage) = &parsed.usage {
        log::info!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );
    }

    let Some(choices) = parsed.choices else {
        return Err(GenerateError::MalformedResponse("missing `choices` field".to_string()));
    };

    choices
        .into_iter()
        .next()
        .map(|c| c.message.content.unwrap_or_default())
        .ok_or(GenerateError::EmptyResponse)
}

/// Truncate long strings for debug logging.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...\n[truncated {} bytes]", &s[..idx], s.len() - idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_choice_untrimmed() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  first \n"}},
                                  {"message":{"role":"assistant","content":"second"}}]}"#;
        assert_eq!(parse_chat_response(200, body).unwrap(), "  first \n");
    }

    #[test]
    fn service_error_payload_is_upstream_verbatim() {
        let body = r#"{"error":{"message":"You exceeded your current quota"}}"#;
        match parse_chat_response(429, body) {
            Err(GenerateError::Upstream(msg)) => assert_eq!(msg, "You exceeded your current quota"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unparseable_success_body_is_malformed() {
        assert!(matches!(
            parse_chat_response(200, "<html>oops</html>"),
            Err(GenerateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn unparseable_error_body_names_http_status() {
        match parse_chat_response(502, "Bad Gateway") {
            Err(GenerateError::Upstream(msg)) => assert_eq!(msg, "HTTP 502 - Bad Gateway"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn error_status_without_error_payload_keeps_status() {
        match parse_chat_response(401, r#"{"detail":"Unauthorized"}"#) {
            Err(GenerateError::Upstream(msg)) => assert_eq!(msg, r#"HTTP 401 - {"detail":"Unauthorized"}"#),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn success_body_without_choices_is_malformed() {
        assert!(matches!(
            parse_chat_response(200, r#"{"id":"chatcmpl-1"}"#),
            Err(GenerateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn unreachable_endpoint_is_transport() {
        let client = OpenAiClient::new(
            Some("k".into()),
            "http://127.0.0.1:9",
            Some(Duration::from_millis(200)),
        )
        .unwrap();
        let err = client
            .complete(&[Message::user("hi")], &GenerationParams::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Transport(_)));
    }

    #[test]
    fn zero_choices_is_empty_response() {
        assert!(matches!(
            parse_chat_response(200, r#"{"choices":[]}"#),
            Err(GenerateError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_key_fails_before_network() {
        // Unroutable base URL: reaching the network would be a Transport error instead.
        let client = OpenAiClient::new(None, "http://127.0.0.1:9", None).unwrap();
        let err = client
            .complete(&[Message::user("hi")], &GenerationParams::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Auth));
    }

    #[test]
    fn chat_url_does_not_duplicate_version() {
        let a = OpenAiClient::new(Some("k".into()), "https://example.com/v1/", None).unwrap();
        let b = OpenAiClient::new(Some("k".into()), "https://example.com", None).unwrap();
        assert_eq!(a.chat_url(), "https://example.com/v1/chat/completions");
        assert_eq!(b.chat_url(), "https://example.com/v1/chat/completions");
    }

    #[test]
    fn request_body_matches_wire_shape() {
        let messages = [Message::system("sys"), Message::user("log")];
        let req = ChatRequest { model: "gpt-4", messages: &messages, temperature: 0.7, max_tokens: 1000 };
        let value: serde_json::Value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "gpt-4");
        assert_eq!(value["max_tokens"], 1000);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "log");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert!(truncate("ééééé", 2).starts_with("éé..."));
    }
}
