use crate::error::GenerateError;
use crate::interaction::{self, Prompter};
use crate::llm::openai::truncate;
use crate::llm::{prompt_builder, GenerationParams, LlmClient};
use crate::questions;

/// What the user asked gitscribe to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    CommitMessage,
    AmendedCommitMessage,
    PullRequestDescription,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::CommitMessage => "commit",
            Mode::AmendedCommitMessage => "amend",
            Mode::PullRequestDescription => "pr",
        }
    }
}

/// Everything a generation request needs besides its input text.
pub struct Generator<'a> {
    pub client: &'a dyn LlmClient,
    pub params: GenerationParams,
    pub questions_enabled: bool,
    /// Maximum first-line length in characters; 0 disables truncation.
    pub title_limit: usize,
}

impl Generator<'_> {
    /// Produce the final text for `mode`.
    ///
    /// `input` is a diff for the commit modes and a commit log for PR mode.
    pub fn generate(
        &self,
        mode: Mode,
        input: &str,
        template: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<String, GenerateError> {
        log::info!("Generating {} message using model {}", mode.as_str(), self.params.model);

        let message = match mode {
            Mode::CommitMessage | Mode::AmendedCommitMessage => {
                generate_commit_message(self.client, input, template, &self.params)?
            }
            Mode::PullRequestDescription => generate_pr_message(
                self.client,
                prompter,
                input,
                template,
                &self.params,
                self.questions_enabled,
            )?,
        };

        log::debug!("Generated {} chars", message.len());
        Ok(truncate_first_line(&message, self.title_limit))
    }
}

/// One-shot commit message from a diff. The result is trimmed.
pub fn generate_commit_message(
    client: &dyn LlmClient,
    diff: &str,
    template: &str,
    params: &GenerationParams,
) -> Result<String, GenerateError> {
    if diff.trim().is_empty() {
        return Err(GenerateError::EmptyDiff);
    }

    let messages = prompt_builder::commit_message_prompt(diff, template);
    log::trace!("Commit-message prompt:\n{}", truncate(&messages[1].content, 3000));

    let response = client.complete(&messages, params)?;
    Ok(response.trim().to_string())
}

/// PR description from a commit log, with an optional clarifying round.
///
/// Round one may come back with embedded questions. When questions are enabled
/// they are put to the user; if any get answered a second round carrying the
/// whole conversation produces the final text, otherwise the payload is
/// stripped from the round-one draft. Round two's reply is never inspected
/// for questions. The result is trimmed.
pub fn generate_pr_message(
    client: &dyn LlmClient,
    prompter: &mut dyn Prompter,
    commit_log: &str,
    template: &str,
    params: &GenerationParams,
    questions_enabled: bool,
) -> Result<String, GenerateError> {
    if commit_log.trim().is_empty() {
        return Err(GenerateError::EmptyCommitLog);
    }

    let round_one = prompt_builder::pr_message_prompt(commit_log, template, questions_enabled);
    log::trace!("PR description prompt:\n{}", truncate(&round_one[1].content, 3500));

    let draft = client.complete(&round_one, params)?;

    let Some(mut questions) = questions::extract_questions(&draft) else {
        return Ok(draft.trim().to_string());
    };

    if !questions_enabled {
        log::debug!("Ignoring {} question(s); clarifying questions are disabled", questions.len());
        return Ok(draft.trim().to_string());
    }

    prompter.say(&format!(
        "The AI has {} question(s) to help write a better PR description.",
        questions.len()
    ));

    if interaction::ask_questions(prompter, &mut questions) == 0 {
        log::info!("No questions answered; using the initial draft");
        return Ok(questions::strip_questions_payload(&draft).trim().to_string());
    }

    let round_two = prompt_builder::clarified_pr_prompt(&round_one, &questions);
    log::info!("Generating final PR description with the additional context");

    let response = client.complete(&round_two, params)?;
    Ok(response.trim().to_string())
}

/// Shorten only the first line to at most `limit` characters. 0 leaves the text alone.
pub fn truncate_first_line(message: &str, limit: usize) -> String {
    if limit == 0 {
        return message.to_string();
    }

    let (first, rest) = match message.find(['\r', '\n']) {
        Some(idx) => message.split_at(idx),
        None => (message, ""),
    };

    match first.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{rest}", &first[..cut]),
        None => message.to_string(),
    }
}
