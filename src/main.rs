mod api;
mod cli;
mod config;
mod intake;
mod model;
mod stats;
mod store;

use crate::cli::{Cli, Commands, ConfigCommands, SubmitArgs, form};
use crate::config::Config;
use crate::model::{AgeGroup, EnvironmentIssue, SymptomCategory};
use crate::stats::render;
use crate::store::{ReportStore, SqliteSlot};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit(args) => handle_submit(args),
        Commands::Summary => handle_summary(),
        Commands::Recent { limit } => handle_recent(limit),
        Commands::Options => {
            print_options();
            Ok(())
        }
        Commands::Serve => handle_serve().await,
        Commands::Status => handle_status(),
        Commands::Config { command } => handle_config_command(command),
    }
}

fn handle_submit(args: SubmitArgs) -> Result<()> {
    let config = load_or_default_config()?;
    let mut draft = args.draft();

    if form::needs_prompt(&draft) && !args.no_input && std::io::stdin().is_terminal() {
        draft = form::run_report_form(draft)?;
    }

    let mut store = open_store(&config)?;
    let report = store.submit(&draft, Utc::now())?;

    println!("Thank you - your anonymous check-in has been recorded.");
    println!("- id: {}", report.id);
    println!("- region: {}", report.region);
    println!("- created_at: {}", report.created_at.to_rfc3339());

    Ok(())
}

fn handle_summary() -> Result<()> {
    let config = load_or_default_config()?;
    let store = open_store(&config)?;
    let summary = stats::compute_stats_now(store.snapshot(), config.day_boundary);

    print!(
        "{}",
        render::render_markdown(
            &summary,
            store.recent(config.recent_limit),
            &Local::now()
        )
    );
    Ok(())
}

fn handle_recent(limit: Option<usize>) -> Result<()> {
    let config = load_or_default_config()?;
    let store = open_store(&config)?;
    let limit = limit.unwrap_or(config.recent_limit).max(1);

    println!(
        "{}",
        render::render_recent_table(store.recent(limit), &Local::now())
    );
    Ok(())
}

fn print_options() {
    println!("Age groups:");
    AgeGroup::ALL
        .iter()
        .for_each(|value| println!("- {value}"));
    println!("Symptom categories:");
    SymptomCategory::ALL
        .iter()
        .for_each(|value| println!("- {value}"));
    println!("Environment issues:");
    EnvironmentIssue::ALL
        .iter()
        .for_each(|value| println!("- {value}"));
}

async fn handle_serve() -> Result<()> {
    let config = load_or_default_config()?;
    let store = open_store(&config)?;

    println!("Dashboard URL: http://127.0.0.1:{}", config.api_port);
    api::run_server(Arc::new(config), store).await
}

fn handle_status() -> Result<()> {
    let config_path = Config::config_path()?;
    let config = load_or_default_config()?;
    let store = open_store(&config)?;

    println!("HealthWatch status");
    println!("- config: {}", config_path.display());
    println!("- storage: {}", store.slot().path().display());
    println!("- reports: {}", store.len());
    println!("- day_boundary: {}", config.day_boundary);
    println!("- dashboard_port: {}", config.api_port);

    Ok(())
}

fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Set { key, value } => {
            let mut config = load_or_default_config()?;
            config.set_value(&key, &value)?;
            config.ensure_bootstrap_files()?;
            config.save()?;

            println!("Config saved: {key} = {value}");
            Ok(())
        }
        ConfigCommands::Get { key } => {
            let config = load_or_default_config()?;
            let value = config
                .get_value(&key)
                .with_context(|| format!("Unsupported config key: {key}"))?;

            println!("{value}");
            Ok(())
        }
    }
}

fn open_store(config: &Config) -> Result<ReportStore> {
    let slot = SqliteSlot::open(&config.db_path).with_context(|| {
        format!(
            "Failed to open report storage: {}",
            config.db_path.display()
        )
    })?;

    Ok(ReportStore::load(slot))
}

fn load_or_default_config() -> Result<Config> {
    let config = Config::load_or_default_at(&Config::config_path()?)?;
    config.ensure_bootstrap_files()?;
    Ok(config)
}
