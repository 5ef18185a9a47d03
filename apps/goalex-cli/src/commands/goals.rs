// goals.rs — `goalex goals`: run the extraction loop against the configured endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use goalex_core::{
    ExploreOptions, Goal, GoalExplorer, GoalexConfig, Persona, TextGenerationConfig,
    TextGenerator,
};
use goalex_openai::{OpenAiGenerator, OpenAiSettings};

#[derive(Args, Debug, Default)]
pub struct GoalsArgs {
    /// JSON file holding the dataset summary.
    #[arg(long)]
    pub summary: PathBuf,
    /// Number of goals to ask for.
    #[arg(short, long)]
    pub n: Option<usize>,
    /// Persona label the goals should serve.
    #[arg(long)]
    pub persona: Option<String>,
    /// Why the persona matters (kept in the report, not sent to the model).
    #[arg(long)]
    pub persona_rationale: Option<String>,
    /// Maximum number of generation attempts.
    #[arg(long)]
    pub retries: Option<u32>,
    /// Pause between malformed replies, in seconds.
    #[arg(long)]
    pub retry_delay_secs: Option<f64>,
    /// Model name (overrides `[textgen].model`).
    #[arg(long)]
    pub model: Option<String>,
    /// How to print the goals.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Also write a JSON report to this path.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

/// What `--output` writes.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalReport {
    pub generated_at: DateTime<Utc>,
    pub summary_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    pub goals: Vec<Goal>,
}

pub fn execute(args: &GoalsArgs, config: &GoalexConfig) -> anyhow::Result<()> {
    let summary = super::read_summary(&args.summary)?;
    let (options, textgen) = resolve(args, config)?;

    let generator = OpenAiGenerator::new(OpenAiSettings::from_endpoint(&config.endpoint))?;
    tracing::info!(
        provider = generator.provider(),
        base_url = %generator.settings().base_url,
        n = options.n,
        retries = options.retries,
        "generating goals"
    );

    let explorer = GoalExplorer::new();
    let goals = explorer.generate(&summary, &textgen, &generator, &options)?;

    print!("{}", render(&goals, args.format)?);

    if let Some(path) = &args.output {
        let report = GoalReport {
            generated_at: Utc::now(),
            summary_path: args.summary.clone(),
            persona: options.persona.clone(),
            goals,
        };
        write_report(path, &report)?;
        tracing::info!("report written to {}", path.display());
    }
    Ok(())
}

/// Merge CLI flags over config values.
pub fn resolve(
    args: &GoalsArgs,
    config: &GoalexConfig,
) -> anyhow::Result<(ExploreOptions, TextGenerationConfig)> {
    let persona = super::resolve_persona(
        args.persona.as_deref(),
        args.persona_rationale.as_deref(),
        config,
    );
    let mut options = config.goals.to_options(persona)?;
    if let Some(n) = args.n {
        options.n = n;
    }
    if let Some(retries) = args.retries {
        options.retries = retries;
    }
    if let Some(secs) = args.retry_delay_secs {
        options.retry_delay = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid --retry-delay-secs {}", secs))?;
    }

    let mut textgen = config.textgen.clone();
    if let Some(model) = &args.model {
        textgen.model = Some(model.clone());
    }
    Ok((options, textgen))
}

pub fn render(goals: &[Goal], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(goals)?)),
        OutputFormat::Markdown => Ok(goals
            .iter()
            .map(Goal::to_markdown)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn write_report(path: &Path, report: &GoalReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
