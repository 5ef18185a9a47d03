//! `goalex.toml` configuration.
//!
//! Every section and field is optional:
//! ```toml
//! [goals]
//! n = 5
//! retries = 25
//! retry_delay_secs = 1.0
//!
//! [textgen]
//! model = "gpt-4o-mini"
//! temperature = 0.0
//!
//! [endpoint]
//! base_url = "https://api.openai.com/v1"
//! api_key_env = "OPENAI_API_KEY"
//!
//! [persona]
//! persona = "A city planner"
//! rationale = "Cares about commute patterns"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::explorer::ExploreOptions;
use crate::goal::Persona;
use crate::textgen::TextGenerationConfig;

/// File name looked up by [`GoalexConfig::load_from_dir`].
pub const CONFIG_FILE: &str = "goalex.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalexConfig {
    #[serde(default)]
    pub goals: GoalsConfig,

    /// Passed verbatim to the backend.
    #[serde(default)]
    pub textgen: TextGenerationConfig,

    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Default persona; the built-in analyst persona when absent.
    #[serde(default)]
    pub persona: Option<Persona>,
}

/// Loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_n")]
    pub n: usize,

    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Pause between malformed replies, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: f64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            n: default_n(),
            retries: default_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

/// Where the OpenAI-compatible backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key. Unset means no auth header.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// Model used when `[textgen].model` is not set.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Whole-request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            default_model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Serde default functions
fn default_n() -> usize {
    5
}

fn default_retries() -> u32 {
    25
}

fn default_retry_delay_secs() -> f64 {
    1.0
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl GoalsConfig {
    /// Pause between attempts as a Duration.
    pub fn retry_delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.retry_delay_secs).map_err(|e| ConfigError::Invalid {
            field: "goals.retry_delay_secs".to_string(),
            reason: e.to_string(),
        })
    }

    /// Build loop options, attaching the given persona.
    pub fn to_options(&self, persona: Option<Persona>) -> Result<ExploreOptions, ConfigError> {
        Ok(ExploreOptions {
            n: self.n,
            persona,
            retries: self.retries,
            retry_delay: self.retry_delay()?,
        })
    }
}

impl GoalexConfig {
    /// Load config from a TOML file.
    ///
    /// Returns the default config if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: GoalexConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.goals.retry_delay()?;
        Ok(config)
    }

    /// Load `goalex.toml` from a directory.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(dir.as_ref().join(CONFIG_FILE))
    }
}
