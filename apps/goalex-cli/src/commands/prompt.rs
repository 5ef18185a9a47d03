// prompt.rs — `goalex prompt`: show the messages without calling a model.

use std::path::PathBuf;

use clap::Args;

use goalex_core::{prompt, GoalexConfig};

#[derive(Args, Debug, Default)]
pub struct PromptArgs {
    /// JSON file holding the dataset summary.
    #[arg(long)]
    pub summary: PathBuf,
    /// Number of goals to ask for.
    #[arg(short, long)]
    pub n: Option<usize>,
    /// Persona label the goals should serve.
    #[arg(long)]
    pub persona: Option<String>,
}

pub fn execute(args: &PromptArgs, config: &GoalexConfig) -> anyhow::Result<()> {
    let summary = super::read_summary(&args.summary)?;
    let persona = super::resolve_persona(args.persona.as_deref(), None, config);
    let n = args.n.unwrap_or(config.goals.n);

    let messages = prompt::build_messages(&summary, n, persona.as_ref());
    println!("{}", serde_json::to_string_pretty(&messages)?);
    Ok(())
}
