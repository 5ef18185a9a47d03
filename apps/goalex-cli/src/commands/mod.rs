pub mod goals;
pub mod prompt;

use std::path::Path;

use anyhow::Context;
use goalex_core::{GoalexConfig, Persona};
use serde_json::Value;

/// Read a dataset summary (any JSON value) from disk.
pub fn read_summary(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading summary {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("summary {} is not valid JSON", path.display()))
}

/// CLI persona flags win over the `[persona]` config section.
pub fn resolve_persona(
    label: Option<&str>,
    rationale: Option<&str>,
    config: &GoalexConfig,
) -> Option<Persona> {
    match label {
        Some(label) => Some(Persona::new(label, rationale.unwrap_or_default())),
        None => config.persona.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_summary_accepts_any_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        std::fs::write(&path, r#"{"name": "cars", "fields": []}"#).unwrap();
        let summary = read_summary(&path).unwrap();
        assert_eq!(summary["name"], "cars");
    }

    #[test]
    fn read_summary_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        std::fs::write(&path, "name: cars").unwrap();
        let err = read_summary(&path).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn flag_persona_overrides_config() {
        let config = GoalexConfig {
            persona: Some(Persona::new("from config", "")),
            ..GoalexConfig::default()
        };
        let persona = resolve_persona(Some("from flag"), Some("why"), &config).unwrap();
        assert_eq!(persona.persona, "from flag");
        assert_eq!(persona.rationale, "why");

        let persona = resolve_persona(None, None, &config).unwrap();
        assert_eq!(persona.persona, "from config");
    }

    #[test]
    fn no_persona_anywhere_is_none() {
        assert!(resolve_persona(None, None, &GoalexConfig::default()).is_none());
    }
}
