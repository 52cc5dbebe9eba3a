use crate::llm::{prompts, Message};
use crate::questions::ClarifyingQuestion;

fn with_template(instructions: &str, template: &str) -> String {
    format!("{instructions}\n\n{header}\n{template}", header = prompts::TEMPLATE_HEADER)
}

/// System + user conversation for a one-shot commit message.
pub fn commit_message_prompt(diff: &str, template: &str) -> Vec<Message> {
    vec![
        Message::system(with_template(prompts::COMMIT_INSTRUCTIONS, template)),
        Message::user(format!("{}\n\n{diff}", prompts::DIFF_INTRO)),
    ]
}

/// Round-one conversation for a PR description.
///
/// The clarifying-questions policy is offered only when `questions_enabled`.
pub fn pr_message_prompt(commit_log: &str, template: &str, questions_enabled: bool) -> Vec<Message> {
    let mut instructions = prompts::PR_INSTRUCTIONS.to_owned();
    if questions_enabled {
        instructions.push_str("\n\n");
        instructions.push_str(prompts::QUESTIONS_POLICY);
    }

    vec![
        Message::system(with_template(&instructions, template)),
        Message::user(format!("{}\n\n{commit_log}", prompts::COMMIT_LOG_INTRO)),
    ]
}

/// Round-two conversation: the full round-one history plus every answered question.
///
/// Unanswered questions are left out entirely.
pub fn clarified_pr_prompt(round_one: &[Message], questions: &[ClarifyingQuestion]) -> Vec<Message> {
    let mut messages = round_one.to_vec();
    messages.push(Message::assistant(prompts::NEEDS_MORE_INFO));

    for qa in questions.iter().filter(|q| q.answered()) {
        messages.push(Message::assistant(qa.question.clone()));
        messages.push(Message::user(qa.answer.clone()));
    }

    messages.push(Message::user(prompts::FINAL_PR_REQUEST));
    messages
}
