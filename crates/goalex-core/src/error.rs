// error.rs — Error types for goal extraction, backends and configuration.

use thiserror::Error;

/// Guidance attached to [`ExploreError::GenerationExhausted`].
pub const EXHAUSTED_GUIDANCE: &str = "The model did not return a valid JSON object while \
attempting to generate goals. Consider using a larger model or a model with a higher max \
token length.";

/// Errors returned by [`GoalExplorer::generate`](crate::GoalExplorer::generate).
///
/// Only malformed JSON is retried inside the loop. Every variant here is
/// surfaced to the caller as soon as it happens, except
/// `GenerationExhausted`, which is the terminal result of running out of
/// attempts.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// The backend call itself failed (network, auth, bad response, ...).
    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The backend answered but produced no content items.
    #[error("text generation returned no content")]
    EmptyResponse,

    /// The payload was valid JSON but not a valid goal list.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Every attempt produced text that could not be parsed as JSON.
    #[error("{} ({attempts} attempts)", EXHAUSTED_GUIDANCE)]
    GenerationExhausted { attempts: u32 },
}

/// A parsed payload that does not match the goal record shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// An element of the payload is missing a field, has a mistyped field,
    /// or carries an unexpected key.
    #[error("goal at position {position} is malformed: {source}")]
    InvalidGoal {
        position: usize,
        source: serde_json::Error,
    },

    /// The payload decoded to something other than an object or an array.
    #[error("expected a JSON array or object of goals, got {found}")]
    UnexpectedPayload { found: &'static str },
}

/// Failures reported by a [`TextGenerator`](crate::TextGenerator) backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request never completed (DNS, connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint rejected the credentials.
    #[error("authentication failed ({status}): {body}")]
    Authentication { status: u16, body: String },

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The endpoint answered with a body we could not decode.
    #[error("invalid response from backend: {0}")]
    InvalidResponse(String),

    /// The backend is missing required configuration (model, key, ...).
    #[error("backend not configured: {0}")]
    NotConfigured(String),
}

/// Errors loading `goalex.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}
