use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli_args::Cli;
use crate::llm::openai::DEFAULT_API_BASE_URL;
use crate::llm::GenerationParams;

const CONFIG_FILE_NAME: &str = "gitscribe.toml";
const DEFAULT_TARGET_BRANCH: &str = "master";

pub const DEFAULT_COMMIT_TEMPLATE: &str = "<area> <subarea>: <summary>

<what changed and why>";

pub const DEFAULT_PR_TEMPLATE: &str = "## Summary
<what this PR does and why>

## Changes
- <change>

## Testing
<left for the author>";

/// Final resolved configuration for gitscribe.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub params: GenerationParams,
    pub no_model: bool,
    pub enable_questions: bool,
    pub api_base_url: String,
    pub timeout: Option<Duration>,
    pub max_title_length: usize,
    pub commit_template: Option<PathBuf>,
    pub pr_template: Option<PathBuf>,
    pub target_branch: String,
}

/// Values taken from the environment.
#[derive(Debug, Default)]
struct EnvConfig {
    api_key: Option<String>,
    model: Option<String>,
}

impl EnvConfig {
    fn read() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        EnvConfig {
            api_key: non_empty("OPENAI_API_KEY").or_else(|| non_empty("OPENAI_KEY")),
            model: non_empty("GITSCRIBE_MODEL"),
        }
    }
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags
    ///   2. Env vars `OPENAI_API_KEY` / `OPENAI_KEY`, `GITSCRIBE_MODEL`
    ///   3. TOML file (`--config`, `./.gitscribe.toml`, `~/.config/gitscribe.toml`,
    ///      or next to the executable)
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Result<Self> {
        let file_cfg = match &cli.config {
            Some(path) => {
                let path = expand_path(path);
                load_file_config(&path).with_context(|| {
                    format!("failed to load config from specified path {}", path.display())
                })?
            }
            None => match find_config_file() {
                Some(path) => load_file_config(&path)?,
                None => {
                    log::info!("No config file found; using defaults");
                    FileConfig::default()
                }
            },
        };

        Ok(Self::merge(cli, file_cfg, EnvConfig::read()))
    }

    fn merge(cli: &Cli, file_cfg: FileConfig, env_cfg: EnvConfig) -> Self {
        let llm = file_cfg.llm;

        let model = cli.model.clone().or(env_cfg.model).or(llm.model);
        let no_model = cli.no_model
            || model
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case("none"));

        let api_key = cli
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(env_cfg.api_key)
            .or(llm.api_key);

        Config {
            api_key,
            params: GenerationParams::new(model, llm.temperature, llm.max_tokens),
            no_model,
            enable_questions: cli.ask_override().unwrap_or(llm.enable_questions),
            api_base_url: llm
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeout: llm.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            max_title_length: cli.max_title_length.or(llm.max_title_length).unwrap_or(0),
            commit_template: file_cfg.commit_template.map(|p| expand_path(Path::new(&p))),
            pr_template: file_cfg.pr_template.map(|p| expand_path(Path::new(&p))),
            target_branch: cli
                .target
                .clone()
                .or(file_cfg.target_branch)
                .unwrap_or_else(|| DEFAULT_TARGET_BRANCH.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    commit_template: Option<String>,
    pr_template: Option<String>,
    target_branch: Option<String>,
    llm: LlmFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LlmFileConfig {
    api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    enable_questions: bool,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    max_title_length: Option<usize>,
}

/// Candidate config locations in priority order.
fn config_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(format!(".{CONFIG_FILE_NAME}"))];

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join(CONFIG_FILE_NAME));
    }

    match env::current_exe() {
        Ok(exe) => {
            if let Some(dir) = exe.parent() {
                paths.push(dir.join(CONFIG_FILE_NAME));
            }
        }
        Err(e) => log::warn!("Could not get executable path: {e}"),
    }

    paths
}

fn find_config_file() -> Option<PathBuf> {
    config_candidates().into_iter().find(|p| {
        log::debug!("Trying config location: {}", p.display());
        p.is_file()
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    log::info!("Loading config from: {}", path.display());
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str::<FileConfig>(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        (Ok(_), None) => {
            log::warn!("Could not get user home directory; leaving {} as is", path.display());
            path.to_path_buf()
        }
        (Err(_), _) => path.to_path_buf(),
    }
}

/// Read a template file, or use the built-in one when none is configured.
pub fn load_template(path: Option<&Path>, fallback: &str) -> Result<String> {
    let Some(path) = path else {
        log::debug!("No template configured; using the built-in template");
        return Ok(fallback.to_string());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read template {}", path.display()))?;
    if text.trim().is_empty() {
        return Err(anyhow!("template {} is empty", path.display()));
    }
    Ok(text)
}
