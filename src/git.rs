use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::process::Command as GitCommand;

/// Hash of git's empty tree; diffing against it shows a root commit in full.
const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String> {
    let output = GitCommand::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {:?}", args))?;

    if !output.status.success() {
        return Err(anyhow!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Get the path to the Git directory (e.g. .git)
pub fn git_dir() -> Result<PathBuf> {
    let dir = git_output(&["rev-parse", "--git-dir"])?.trim().to_string();
    Ok(PathBuf::from(dir))
}

/// Write the commit message into .git/COMMIT_EDITMSG so the next `git commit`
/// will use it as the default message in the editor.
pub fn write_commit_editmsg(message: &str) -> Result<()> {
    let path = git_dir()?.join("COMMIT_EDITMSG");
    fs::write(&path, message)
        .with_context(|| format!("failed to write commit message to {:?}", path))?;
    Ok(())
}

/// Get the current branch name.
pub fn current_branch() -> Result<String> {
    let name = git_output(&["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string();
    Ok(name)
}

/// Get the full staged diff.
pub fn staged_diff() -> Result<String> {
    log::info!("Getting staged diff from git");
    let diff = git_output(&["diff", "--cached"])?;
    log::debug!("Retrieved staged diff ({} bytes)", diff.len());
    Ok(diff)
}

/// Diff of the last commit plus anything staged on top of it.
pub fn amend_diff() -> Result<String> {
    log::info!("Getting last commit diff plus staged changes");
    let diff = match git_output(&["diff", "--cached", "HEAD~1"]) {
        Ok(diff) => diff,
        Err(e) => {
            log::warn!("No parent commit ({e}); diffing against the empty tree");
            git_output(&["diff", "--cached", EMPTY_TREE])?
        }
    };
    log::debug!("Retrieved amend diff ({} bytes)", diff.len());
    Ok(diff)
}

/// Subject lines of commits on the current branch that are not on `target`.
pub fn commit_log(target: &str) -> Result<String> {
    let branch = current_branch()?;
    log::info!("Getting commit messages between {target} and {branch}");

    let range = format!("{target}..{branch}");
    let log_output = git_output(&["log", "--pretty=format:%s", &range])?;

    let count = log_output.lines().filter(|l| !l.trim().is_empty()).count();
    log::info!("Retrieved {count} commit message(s)");
    Ok(log_output)
}
