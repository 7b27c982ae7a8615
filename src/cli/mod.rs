pub mod form;

use crate::intake::ReportDraft;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "healthwatch",
    about = "Anonymous community health check-ins with a local dashboard"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a new check-in (prompts for anything not given as a flag)
    Submit(SubmitArgs),
    /// Print the dashboard summary as Markdown
    Summary,
    /// Print the most recent check-ins
    Recent {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List the accepted values for each category
    Options,
    /// Serve the web dashboard on localhost until Ctrl+C
    Serve,
    /// Show config and storage locations
    Status,
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub age_group: Option<String>,
    #[arg(long)]
    pub symptom: Option<String>,
    #[arg(long)]
    pub environment: Option<String>,
    #[arg(long, default_value_t = false)]
    pub mental_health: bool,
    #[arg(long)]
    pub notes: Option<String>,
    /// Fail instead of prompting when a required field is missing
    #[arg(long, default_value_t = false)]
    pub no_input: bool,
}

impl SubmitArgs {
    pub fn draft(&self) -> ReportDraft {
        ReportDraft {
            region: self.region.clone(),
            age_group: self.age_group.clone(),
            symptom_category: self.symptom.clone(),
            environment_issue: self.environment.clone(),
            mental_health_flag: self.mental_health,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    Set { key: String, value: String },
    Get { key: String },
}
