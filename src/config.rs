//! Pipeline configuration read from the environment.
//!
//! The credential is carried as an explicit [`Credential`] value rather than
//! looked up ambiently, so the pipeline can decide up front whether the
//! text-generation call is possible at all.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::commit::ComposeMode;
use crate::llm::DEFAULT_MODEL;

/// Primary API key variable.
pub const API_KEY_ENV_VAR: &str = "COMMITSMITH_API_KEY";

/// Fallback API key variable shared with other Gemini tooling.
pub const GEMINI_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

pub const MODEL_ENV_VAR: &str = "COMMITSMITH_MODEL";
pub const MODE_ENV_VAR: &str = "COMMITSMITH_MODE";
pub const TIMEOUT_ENV_VAR: &str = "COMMITSMITH_TIMEOUT";

/// Default timeout per external call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// API credential for the text-generation collaborator.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Present(String),
    Absent,
}

impl Credential {
    /// Blank keys count as absent.
    pub fn from_option(value: Option<String>) -> Self {
        match value {
            Some(key) if !key.trim().is_empty() => Credential::Present(key.trim().to_string()),
            _ => Credential::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Credential::Present(_))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Present(_) => f.write_str("Present(<redacted>)"),
            Credential::Absent => f.write_str("Absent"),
        }
    }
}

/// Everything the pipeline needs to know besides its collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    pub credential: Credential,
    pub model: String,
    pub mode: ComposeMode,
    /// Applied to each external call by the caller.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credential: Credential::Absent,
            model: DEFAULT_MODEL.to_string(),
            mode: ComposeMode::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load from `COMMITSMITH_*` variables.
    ///
    /// Invalid mode or timeout values log a warning and keep the default.
    pub fn from_env() -> Self {
        let credential = Credential::from_option(
            non_empty_var(API_KEY_ENV_VAR).or_else(|| non_empty_var(GEMINI_KEY_ENV_VAR)),
        );

        let model = non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mode = match non_empty_var(MODE_ENV_VAR) {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{e} in {MODE_ENV_VAR}, using default {}", ComposeMode::default());
                ComposeMode::default()
            }),
            None => ComposeMode::default(),
        };

        Self {
            credential,
            model,
            mode,
            timeout: get_timeout(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the per-call timeout, falling back to the default on bad input.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
