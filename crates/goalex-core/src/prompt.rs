// prompt.rs — Fixed instructions and message assembly.
//
// The prompt is a pure function of (summary, n, persona): the same inputs
// always produce byte-identical messages.

use serde_json::Value;

use crate::goal::Persona;
use crate::textgen::ChatMessage;

/// System message: the assistant's role and the visualization constraints.
pub const SYSTEM_INSTRUCTIONS: &str = "
You are an experienced data analyst who can generate a given number of insightful GOALS about \
data, when given a summary of the data and a specified persona. The VISUALIZATIONS YOU \
RECOMMEND MUST FOLLOW VISUALIZATION BEST PRACTICES (e.g., must use bar charts instead of pie \
charts for comparing quantities) AND BE MEANINGFUL (e.g., plot longitude and latitude on maps \
where appropriate). They must also be relevant to the specified persona. Each goal must \
include a question, a visualization (THE VISUALIZATION MUST REFERENCE THE EXACT COLUMN FIELDS \
FROM THE SUMMARY), and a rationale (JUSTIFICATION FOR WHICH dataset FIELDS ARE USED and what \
we will learn from the visualization). Each goal MUST mention the exact fields from the \
dataset summary above.
";

/// Output contract: one fenced JSON array of goal objects.
pub const FORMAT_INSTRUCTIONS: &str = r#"
THE OUTPUT MUST BE A CODE SNIPPET OF A VALID LIST OF JSON OBJECTS. IT MUST USE THE FOLLOWING FORMAT:

```[
    { "index": 0,  "question": "What is the distribution of X", "visualization": "histogram of X", "rationale": "This tells about "} ..
    ]
```
THE OUTPUT SHOULD ONLY USE THE JSON FORMAT ABOVE.
"#;

/// The user-facing part of the prompt: goal count, summary, persona focus.
pub fn user_prompt(summary: &Value, n: usize, persona: &Persona) -> String {
    format!(
        "The number of GOALS to generate is {n}. The goals should be based on the data summary \
         below.\n\n{summary:#}\n\n\
         The generated goals SHOULD BE FOCUSED ON THE INTERESTS AND PERSPECTIVE of a '{label}' \
         persona, who is interested in complex, insightful goals about the data.\n",
        label = persona.persona,
    )
}

/// Assemble the two-message exchange sent on every attempt.
///
/// Uses [`Persona::default_analyst`] when `persona` is `None`.
pub fn build_messages(summary: &Value, n: usize, persona: Option<&Persona>) -> Vec<ChatMessage> {
    let default_persona;
    let persona = match persona {
        Some(p) => p,
        None => {
            default_persona = Persona::default_analyst();
            &default_persona
        }
    };

    let prompt = user_prompt(summary, n, persona);
    vec![
        ChatMessage::system(SYSTEM_INSTRUCTIONS),
        ChatMessage::assistant(format!(
            "{prompt}\n\n{FORMAT_INSTRUCTIONS}\n\nThe generated {n} goals are:\n"
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::DEFAULT_PERSONA;
    use crate::textgen::Role;
    use serde_json::json;

    fn summary() -> Value {
        json!({
            "name": "cars.csv",
            "fields": [{"column": "horsepower", "properties": {"dtype": "number"}}]
        })
    }

    #[test]
    fn two_messages_system_then_prompt() {
        let messages = build_messages(&summary(), 5, None);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, SYSTEM_INSTRUCTIONS);
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn prompt_states_count_and_embeds_summary() {
        let messages = build_messages(&summary(), 7, None);
        let body = &messages[1].content;
        assert!(body.contains("The number of GOALS to generate is 7."));
        assert!(body.contains("\"horsepower\""));
        assert!(body.contains(FORMAT_INSTRUCTIONS));
        assert!(body.ends_with("The generated 7 goals are:\n"));
    }

    #[test]
    fn default_persona_used_when_absent() {
        let messages = build_messages(&summary(), 5, None);
        assert!(messages[1].content.contains(&format!("'{DEFAULT_PERSONA}'")));
    }

    #[test]
    fn explicit_persona_replaces_default() {
        let persona = Persona::new("a mechanic tuning engines", "cares about power");
        let messages = build_messages(&summary(), 5, Some(&persona));
        assert!(messages[1].content.contains("'a mechanic tuning engines'"));
        assert!(!messages[1].content.contains(DEFAULT_PERSONA));
    }

    #[test]
    fn assembly_is_deterministic() {
        let a = build_messages(&summary(), 3, None);
        let b = build_messages(&summary(), 3, None);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_goals_is_still_requested() {
        let messages = build_messages(&summary(), 0, None);
        assert!(messages[1].content.contains("The number of GOALS to generate is 0."));
    }
}
