//! # goalex-core
//!
//! Turns a dataset summary into a list of analytical goals by prompting a
//! text-generation model and parsing its reply.
//!
//! The heart of the crate is [`GoalExplorer::generate`]: it assembles a
//! deterministic two-message prompt, calls a [`TextGenerator`], extracts the
//! JSON payload from the reply and converts it into [`Goal`] records. Replies
//! that are not valid JSON are retried with a fixed pause; replies that are
//! valid JSON but have the wrong shape fail immediately.
//!
//! ## Key components
//!
//! - [`Goal`] / [`Persona`] — the data model
//! - [`TextGenerator`] — the backend capability (see `goalex-openai`)
//! - [`prompt`] — fixed instructions and message assembly
//! - [`snippet::clean_code_snippet`] — strips markdown code fences
//! - [`GoalExplorer`] — the bounded retry loop
//! - [`GoalexConfig`] — `goalex.toml` loading

pub mod config;
pub mod error;
pub mod explorer;
pub mod goal;
pub mod prompt;
pub mod snippet;
pub mod textgen;

pub use config::{EndpointConfig, GoalexConfig, GoalsConfig};
pub use error::{ConfigError, ExploreError, GenerationError, ShapeError};
pub use explorer::{ExploreOptions, GoalExplorer, Sleeper, ThreadSleeper};
pub use goal::{Goal, Persona};
pub use textgen::{
    ChatMessage, GenerationResponse, Role, TextGenerationConfig, TextGenerator, Usage,
};
