mod cli_args;
mod config;
mod error;
mod generate;
mod git;
mod interaction;
mod llm;
mod logging;
mod questions;
mod setup;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli_args::Cli;
use crate::config::{Config, DEFAULT_COMMIT_TEMPLATE, DEFAULT_PR_TEMPLATE};
use crate::generate::{Generator, Mode};
use crate::interaction::ConsolePrompter;

fn mode_for(cli: &Cli) -> Mode {
    if cli.pr {
        Mode::PullRequestDescription
    } else if cli.amend {
        Mode::AmendedCommitMessage
    } else {
        Mode::CommitMessage
    }
}

/// Collect the generation input and template for `mode`.
fn gather_input(mode: Mode, cfg: &Config) -> Result<(String, String)> {
    match mode {
        Mode::CommitMessage => Ok((
            git::staged_diff()?,
            config::load_template(cfg.commit_template.as_deref(), DEFAULT_COMMIT_TEMPLATE)?,
        )),
        Mode::AmendedCommitMessage => Ok((
            git::amend_diff()?,
            config::load_template(cfg.commit_template.as_deref(), DEFAULT_COMMIT_TEMPLATE)?,
        )),
        Mode::PullRequestDescription => Ok((
            git::commit_log(&cfg.target_branch)?,
            config::load_template(cfg.pr_template.as_deref(), DEFAULT_PR_TEMPLATE)?,
        )),
    }
}

fn print_preview(mode: Mode, message: &str) {
    let title = match mode {
        Mode::PullRequestDescription => "PR Message Preview",
        Mode::CommitMessage | Mode::AmendedCommitMessage => "Commit Message Preview",
    };
    let banner = format!("----- {title} -----");

    println!();
    println!("{banner}");
    println!("{message}");
    println!("{}", "-".repeat(banner.len()));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(logging::level_filter(cli.log_level, cli.verbose));

    log::info!("Starting gitscribe");
    let cfg = Config::from_sources(&cli).context("failed to load configuration")?;
    let client = setup::build_llm_client(&cfg)?;

    let mode = mode_for(&cli);
    log::debug!("Mode: {}, target branch: {}", mode.as_str(), cfg.target_branch);

    let (input, template) = gather_input(mode, &cfg)?;

    let generator = Generator {
        client: client.as_ref(),
        params: cfg.params.clone(),
        questions_enabled: cfg.enable_questions,
        title_limit: cfg.max_title_length,
    };

    let mut prompter = ConsolePrompter::stdio();
    let message = generator
        .generate(mode, &input, &template, &mut prompter)
        .with_context(|| format!("failed to generate {} message", mode.as_str()))?;

    print_preview(mode, &message);

    if cli.apply {
        git::write_commit_editmsg(&message)?;
        println!("Wrote message to .git/COMMIT_EDITMSG");
    }

    Ok(())
}
