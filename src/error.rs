use thiserror::Error;

/// Failures of a single generation request.
///
/// Nothing here is retried; any of these aborts the whole request.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("no changes staged; stage changes before generating a commit message")]
    EmptyDiff,

    #[error("no commits found between branches; make some commits first")]
    EmptyCommitLog,

    #[error("credential: no API key configured (set OPENAI_API_KEY, --api-key or llm.api_key)")]
    Auth,

    #[error("network: {0}")]
    Transport(String),

    #[error("parse: completion response was not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("upstream: {0}")]
    Upstream(String),

    #[error("upstream: completion response contained no choices")]
    EmptyResponse,
}
