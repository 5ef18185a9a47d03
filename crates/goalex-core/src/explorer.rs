// explorer.rs — The goal extraction loop.
//
// One call runs a bounded retry loop:
//
//   build messages → [generate → clean snippet → parse → convert] × retries
//
// Only the parse step is classified. Malformed JSON is logged, followed by a
// fixed pause, and the next attempt starts. Everything else (backend errors,
// empty responses, well-formed JSON with the wrong shape) leaves the loop
// immediately. Falling out of the loop always yields GenerationExhausted.
//
// The loop keeps no state between calls: the attempt counter and messages
// live on the stack of a single invocation.

use std::time::Duration;

use serde_json::Value;

use crate::error::{ExploreError, ShapeError};
use crate::goal::{Goal, Persona};
use crate::prompt;
use crate::snippet::clean_code_snippet;
use crate::textgen::{TextGenerationConfig, TextGenerator};

/// Pause between failed attempts.
///
/// Injected so tests can record pauses instead of sleeping.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration);
}

/// Blocks the current thread for the requested delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Per-call knobs for [`GoalExplorer::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreOptions {
    /// Number of goals to ask for. Not enforced on the result.
    pub n: usize,

    /// Viewpoint for the goals; the default analyst persona when `None`.
    pub persona: Option<Persona>,

    /// Maximum number of generation attempts.
    pub retries: u32,

    /// Fixed pause after each malformed reply.
    pub retry_delay: Duration,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            n: 5,
            persona: None,
            retries: 25,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Result of parsing one payload.
#[derive(Debug)]
pub enum Payload {
    /// Syntactically valid JSON.
    Parsed(Value),
    /// Not JSON at all; the attempt may be retried.
    Malformed(serde_json::Error),
}

/// Parse a cleaned payload without interpreting its shape.
pub fn parse_payload(raw: &str) -> Payload {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Payload::Parsed(value),
        Err(e) => Payload::Malformed(e),
    }
}

/// Convert parsed JSON into goals, all or nothing.
///
/// A lone object is treated as a one-element list.
pub fn goals_from_value(value: Value) -> Result<Vec<Goal>, ShapeError> {
    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        other => {
            return Err(ShapeError::UnexpectedPayload {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| Goal::from_value(item, position))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Generates goals about a dataset from a text-generation backend.
pub struct GoalExplorer {
    sleeper: Box<dyn Sleeper>,
}

impl GoalExplorer {
    /// An explorer that really sleeps between attempts.
    pub fn new() -> Self {
        Self::with_sleeper(Box::new(ThreadSleeper))
    }

    pub fn with_sleeper(sleeper: Box<dyn Sleeper>) -> Self {
        Self { sleeper }
    }

    /// Ask `text_gen` for goals about `summary`.
    ///
    /// Makes at most `options.retries` backend calls. Returns the goals of
    /// the first reply that parses as JSON, in payload order.
    pub fn generate(
        &self,
        summary: &Value,
        textgen_config: &TextGenerationConfig,
        text_gen: &dyn TextGenerator,
        options: &ExploreOptions,
    ) -> Result<Vec<Goal>, ExploreError> {
        let messages = prompt::build_messages(summary, options.n, options.persona.as_ref());

        let mut attempt: u32 = 0;
        while attempt < options.retries {
            let number = attempt + 1;
            tracing::debug!(
                attempt = number,
                provider = text_gen.provider(),
                "requesting goals"
            );

            let response = text_gen.generate(&messages, textgen_config)?;
            let text = response.first_text().ok_or(ExploreError::EmptyResponse)?;

            match parse_payload(clean_code_snippet(text)) {
                Payload::Parsed(value) => {
                    let goals = goals_from_value(value)?;
                    tracing::info!(attempt = number, goals = goals.len(), "goals generated");
                    return Ok(goals);
                }
                Payload::Malformed(e) => {
                    tracing::error!("Attempt {}: Failed to decode JSON. Error: {}", number, e);
                    println!("Attempt {number}: Failed to decode JSON. Retrying...");
                    self.sleeper.sleep(options.retry_delay);
                }
            }

            attempt += 1;
        }

        tracing::error!(
            attempts = options.retries,
            "all retry attempts failed to generate valid JSON"
        );
        Err(ExploreError::GenerationExhausted {
            attempts: options.retries,
        })
    }
}

impl Default for GoalExplorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_payload_classifies_syntax() {
        assert!(matches!(parse_payload("[1, 2]"), Payload::Parsed(_)));
        assert!(matches!(parse_payload("[1, 2"), Payload::Malformed(_)));
        assert!(matches!(parse_payload(""), Payload::Malformed(_)));
        assert!(matches!(parse_payload("  \n "), Payload::Malformed(_)));
    }

    #[test]
    fn lone_object_becomes_single_goal() {
        let value = json!({"index": 4, "question": "q", "visualization": "v", "rationale": "r"});
        let goals = goals_from_value(value).unwrap();
        assert_eq!(goals, vec![Goal::new(4, "q", "v", "r")]);
    }

    #[test]
    fn array_order_is_preserved_and_index_not_checked() {
        let value = json!([
            {"index": 9, "question": "a", "visualization": "v", "rationale": "r"},
            {"index": 9, "question": "b", "visualization": "v", "rationale": "r"},
            {"index": 1, "question": "c", "visualization": "v", "rationale": "r"}
        ]);
        let questions: Vec<String> = goals_from_value(value)
            .unwrap()
            .into_iter()
            .map(|g| g.question)
            .collect();
        assert_eq!(questions, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_array_yields_no_goals() {
        assert!(goals_from_value(json!([])).unwrap().is_empty());
    }

    #[test]
    fn scalar_payload_is_shape_error() {
        let err = goals_from_value(json!(5)).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::UnexpectedPayload { found: "a number" }
        ));
    }

    #[test]
    fn bad_element_fails_whole_payload() {
        let value = json!([
            {"index": 0, "question": "a", "visualization": "v", "rationale": "r"},
            {"index": 1, "question": "b", "visualization": "v"}
        ]);
        let err = goals_from_value(value).unwrap_err();
        assert!(matches!(err, ShapeError::InvalidGoal { position: 1, .. }));
    }

    #[test]
    fn default_options() {
        let options = ExploreOptions::default();
        assert_eq!(options.n, 5);
        assert_eq!(options.retries, 25);
        assert_eq!(options.retry_delay, Duration::from_secs(1));
        assert!(options.persona.is_none());
    }
}
