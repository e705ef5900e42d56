// src/config.rs
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::errors::{GenError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_RUNNER_CMD: &str = "python3 -m pytest --tb=short --no-header --disable-warnings";

/// Settings for the OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Option<Duration>,
}

/// The external test runner. The generated test file path is appended to `args`.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
    /// Parent for the per-run scratch directories; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion: CompletionConfig,
    pub runner: RunnerConfig,
    pub reports_dir: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    pub max_sessions: usize,
    /// Replacement for the built-in test-generation prompt.
    pub prompt_template: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // The key is not checked here; a missing one shows up as an auth error upstream.
        let api_key = get("GROQ_API_KEY").or_else(|| get("COMPLETION_API_KEY"));

        let completion = CompletionConfig {
            api_base: get("COMPLETION_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key,
            model: get("COMPLETION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: parse_secs("COMPLETION_TIMEOUT_SECS", get("COMPLETION_TIMEOUT_SECS"))?,
        };

        let runner_cmd = get("TEST_RUNNER_CMD").unwrap_or_else(|| DEFAULT_RUNNER_CMD.to_string());
        let mut parts = runner_cmd.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| GenError::Config("TEST_RUNNER_CMD must not be empty".to_string()))?;
        let runner = RunnerConfig {
            program,
            args: parts.collect(),
            timeout: parse_secs("TEST_TIMEOUT_SECS", get("TEST_TIMEOUT_SECS"))?,
            scratch_dir: get("TEST_SCRATCH_DIR").map(PathBuf::from),
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| GenError::Config(format!("PORT must be a port number, got '{}'", raw)))?,
            None => 5000,
        };

        let max_sessions = match get("MAX_SESSIONS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(GenError::Config(format!(
                        "MAX_SESSIONS must be a positive integer, got '{}'",
                        raw
                    )));
                }
            },
            None => 1024,
        };

        let prompt_template = match get("PROMPT_TEMPLATE_PATH") {
            Some(path) => Some(std::fs::read_to_string(&path).map_err(|e| {
                GenError::Config(format!("Could not read prompt template '{}': {}", path, e))
            })?),
            None => None,
        };

        Ok(AppConfig {
            completion,
            runner,
            reports_dir: PathBuf::from(get("REPORTS_DIR").unwrap_or_else(|| "reports".to_string())),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            max_sessions,
            prompt_template,
        })
    }
}

fn parse_secs(key: &str, raw: Option<String>) -> Result<Option<Duration>> {
    match raw {
        None => Ok(None),
        Some(raw) => match raw.parse::<u64>() {
            Ok(0) => Ok(None),
            Ok(secs) => Ok(Some(Duration::from_secs(secs))),
            Err(_) => Err(GenError::Config(format!(
                "{} must be a whole number of seconds, got '{}'",
                key, raw
            ))),
        },
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

/// Substitutes `{{key}}` placeholders. Unknown keys are left in place.
/// Substituted values are not rescanned, so they may contain braces freely.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}
