// goal.rs — Goal and Persona records.
//
// A Goal is one analytical question about a dataset together with the chart
// that answers it and the reason the chart is worth drawing. Goals come from
// model output, so construction from JSON is strict: every field must be
// present with the right primitive type and no extra keys are accepted.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ShapeError;

/// Label used when the caller does not supply a persona.
pub const DEFAULT_PERSONA: &str =
    "A highly skilled data analyst who can come up with complex, insightful goals about data";

/// One analytical goal produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Goal {
    /// Ordering hint as produced by the model. Not guaranteed to be unique
    /// or contiguous.
    pub index: i64,

    /// Natural-language question about the data.
    pub question: String,

    /// Chart or encoding that answers the question, naming dataset fields.
    pub visualization: String,

    /// Which fields are used and what the chart should reveal.
    pub rationale: String,
}

impl Goal {
    pub fn new(
        index: i64,
        question: impl Into<String>,
        visualization: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            index,
            question: question.into(),
            visualization: visualization.into(),
            rationale: rationale.into(),
        }
    }

    /// Strictly convert one payload element into a Goal.
    ///
    /// `position` is the element's offset within the payload and is only
    /// used for error reporting.
    pub fn from_value(value: Value, position: usize) -> Result<Self, ShapeError> {
        serde_json::from_value(value).map_err(|source| ShapeError::InvalidGoal { position, source })
    }

    /// Render the goal as a small Markdown block.
    pub fn to_markdown(&self) -> String {
        format!(
            "### Goal {}\n**Question:** {}\n\n**Visualization:** `{}`\n\n**Rationale:** {}\n",
            self.index, self.question, self.visualization, self.rationale
        )
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markdown())
    }
}

/// The viewpoint the generated goals should serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Descriptive label, quoted verbatim in the prompt.
    pub persona: String,

    /// Why this persona is relevant. Not sent to the model.
    #[serde(default)]
    pub rationale: String,
}

impl Persona {
    pub fn new(persona: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            rationale: rationale.into(),
        }
    }

    /// The persona used when none is given.
    pub fn default_analyst() -> Self {
        Self::new(DEFAULT_PERSONA, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "index": 0,
            "question": "How is price distributed?",
            "visualization": "histogram of price",
            "rationale": "price shows the spread of listings"
        })
    }

    #[test]
    fn from_value_accepts_complete_record() {
        let goal = Goal::from_value(valid(), 0).unwrap();
        assert_eq!(goal.index, 0);
        assert_eq!(goal.visualization, "histogram of price");
    }

    #[test]
    fn missing_field_is_shape_error() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("rationale");
        let err = Goal::from_value(value, 2).unwrap_err();
        assert!(matches!(err, ShapeError::InvalidGoal { position: 2, .. }));
        assert!(err.to_string().contains("rationale"));
    }

    #[test]
    fn string_index_is_rejected() {
        let mut value = valid();
        value["index"] = json!("0");
        assert!(Goal::from_value(value, 0).is_err());
    }

    #[test]
    fn fractional_index_is_rejected() {
        let mut value = valid();
        value["index"] = json!(1.5);
        assert!(Goal::from_value(value, 0).is_err());
    }

    #[test]
    fn non_string_question_is_rejected() {
        let mut value = valid();
        value["question"] = json!(42);
        assert!(Goal::from_value(value, 0).is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut value = valid();
        value["chart_type"] = json!("bar");
        assert!(Goal::from_value(value, 0).is_err());
    }

    #[test]
    fn markdown_contains_all_fields() {
        let goal = Goal::new(3, "Q?", "bar chart of x", "because");
        let md = goal.to_string();
        assert!(md.starts_with("### Goal 3"));
        assert!(md.contains("Q?"));
        assert!(md.contains("`bar chart of x`"));
        assert!(md.contains("because"));
    }

    #[test]
    fn default_persona_has_empty_rationale() {
        let persona = Persona::default_analyst();
        assert_eq!(persona.persona, DEFAULT_PERSONA);
        assert!(persona.rationale.is_empty());
    }

    #[test]
    fn persona_rationale_defaults_when_absent() {
        let persona: Persona = serde_json::from_str(r#"{"persona":"an epidemiologist"}"#).unwrap();
        assert_eq!(persona.persona, "an epidemiologist");
        assert!(persona.rationale.is_empty());
    }
}
