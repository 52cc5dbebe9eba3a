use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::questions::ClarifyingQuestion;

/// Asks a human for answers, one blocking read per question.
pub trait Prompter {
    /// Show a line of guidance to the user.
    fn say(&mut self, line: &str);

    /// Ask question `number` (1-based) and return the trimmed reply.
    fn ask(&mut self, number: usize, question: &str) -> io::Result<String>;
}

/// Prompter over any line reader and writer; stdin/stdout in the CLI.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        ConsolePrompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePrompter { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn say(&mut self, line: &str) {
        // Console output is best effort.
        let _ = writeln!(self.output, "{line}");
    }

    fn ask(&mut self, number: usize, question: &str) -> io::Result<String> {
        writeln!(self.output, "\n{} {}", format!("Question {number}:").bold(), question)?;
        write!(self.output, "Your answer: ")?;
        self.output.flush()?;

        let mut buf = String::new();
        self.input.read_line(&mut buf)?;
        Ok(buf.trim().to_string())
    }
}

fn is_skip_all(answer: &str) -> bool {
    let answer = answer.to_lowercase();
    answer == "skip all" || answer == "skipall"
}

/// Put each question to the user in order and record the answers.
///
/// An empty reply skips that question. A read failure counts as an empty
/// reply. "skip all" blanks the current and every remaining question and stops
/// prompting. Returns how many questions ended up answered.
pub fn ask_questions(prompter: &mut dyn Prompter, questions: &mut [ClarifyingQuestion]) -> usize {
    prompter.say("\nThe AI needs some additional information to write a better PR description:");
    prompter.say("(Press Enter with no text to skip a question, or type 'skip all')");

    for i in 0..questions.len() {
        let answer = match prompter.ask(i + 1, &questions[i].question) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("Failed to read answer for question {}: {e}", i + 1);
                String::new()
            }
        };

        if is_skip_all(&answer) {
            prompter.say("Skipping remaining questions...");
            for q in &mut questions[i..] {
                q.answer.clear();
            }
            break;
        }

        questions[i].answer = answer;
    }

    let answered = questions.iter().filter(|q| q.answered()).count();
    if answered == 0 {
        prompter.say("\nNo questions were answered. Proceeding with original context only.");
    } else if answered < questions.len() {
        prompter.say(&format!(
            "\n{answered} out of {} questions answered. Proceeding with partial additional context.",
            questions.len()
        ));
    } else {
        prompter.say("\nAll questions answered. Proceeding with full additional context.");
    }

    answered
}
