use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "gitscribe",
    version,
    about = "LLM-assisted Git commit message and PR description writer"
)]
#[command(group(
    ArgGroup::new("mode_group")
        .args(["pr", "amend"])
        .multiple(false)
))]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
#[command(group(
    ArgGroup::new("ask_group")
        .args(["ask", "no_ask"])
        .multiple(false)
))]
pub struct Cli {
    /// Generate a PR description from the commits not yet on the target branch
    #[arg(long)]
    pub pr: bool,

    /// Target branch for PR mode (default: config target_branch, then master)
    #[arg(long, requires = "pr")]
    pub target: Option<String>,

    /// Write a message for amending the last commit (last commit diff plus staged changes)
    #[arg(long)]
    pub amend: bool,

    /// Let the model ask up to 3 clarifying questions in PR mode
    #[arg(long)]
    pub ask: bool,

    /// Never offer clarifying questions, even if enabled in the config file
    #[arg(long)]
    pub no_ask: bool,

    /// If set, write the generated commit message into .git/COMMIT_EDITMSG (no commit is created)
    #[arg(long, conflicts_with = "pr")]
    pub apply: bool,

    /// Path to a config file (default: search the standard locations)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model name to use (e.g. gpt-4o-mini). If 'none', acts like --no-model.
    #[arg(long)]
    pub model: Option<String>,

    /// Disable model calls; return dummy responses instead
    #[arg(long)]
    pub no_model: bool,

    /// API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Cut the first line of the result to this many characters (0 disables)
    #[arg(long)]
    pub max_title_length: Option<usize>,

    /// Logging level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// `Some(true)` for --ask, `Some(false)` for --no-ask, otherwise defer to config.
    pub fn ask_override(&self) -> Option<bool> {
        match (self.ask, self.no_ask) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pr_and_amend_conflict() {
        assert!(Cli::try_parse_from(["gitscribe", "--pr", "--amend"]).is_err());
    }

    #[test]
    fn target_requires_pr() {
        assert!(Cli::try_parse_from(["gitscribe", "--target", "main"]).is_err());
        let cli = Cli::try_parse_from(["gitscribe", "--pr", "--target", "main"]).unwrap();
        assert_eq!(cli.target.as_deref(), Some("main"));
    }

    #[test]
    fn apply_is_commit_only() {
        assert!(Cli::try_parse_from(["gitscribe", "--pr", "--apply"]).is_err());
        assert!(Cli::try_parse_from(["gitscribe", "--amend", "--apply"]).is_ok());
    }

    #[test]
    fn ask_flags() {
        let cli = Cli::try_parse_from(["gitscribe", "--pr", "--ask"]).unwrap();
        assert_eq!(cli.ask_override(), Some(true));
        let cli = Cli::try_parse_from(["gitscribe", "--no-ask"]).unwrap();
        assert_eq!(cli.ask_override(), Some(false));
        let cli = Cli::try_parse_from(["gitscribe"]).unwrap();
        assert_eq!(cli.ask_override(), None);
    }
}
