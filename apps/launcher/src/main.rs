use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launcher_core::LauncherState;
use shared::domain::{Instance, NewsItem};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, SourceKind};

#[derive(Parser, Debug)]
#[command(name = "launcher", about = "Inspect launcher library, news feed and theme state")]
struct Cli {
    #[arg(long, default_value = "launcher.toml")]
    config: PathBuf,
    #[arg(long, value_enum)]
    source: Option<SourceKind>,
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and list installed instances
    Instances,
    /// Fetch and list news items
    News,
    /// Toggle the theme and print the resulting flag
    Theme {
        #[arg(long, default_value_t = 1)]
        toggle: u32,
    },
    /// Fetch everything and print the full state as JSON
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(source) = cli.source {
        settings.data_source = source;
    }
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = Some(api_url);
    }
    info!(
        "launcher: data_source={:?} timeout={}s",
        settings.data_source, settings.fetch_timeout_secs
    );

    let state = LauncherState::with_options(settings.build_source()?, settings.state_options());

    match cli.command {
        Command::Instances => {
            state
                .fetch_instances()
                .await
                .context("failed to fetch instances")?;
            for instance in state.instances().await {
                println!("{}", format_instance(&instance));
            }
        }
        Command::News => {
            state.fetch_news().await.context("failed to fetch news")?;
            for item in state.news().await {
                println!("{}", format_news(&item));
            }
        }
        Command::Theme { toggle } => {
            for _ in 0..toggle {
                state.toggle_theme();
            }
            let theme = if state.dark_theme() { "dark" } else { "light" };
            println!("theme={theme}");
        }
        Command::Snapshot => {
            futures::try_join!(state.fetch_instances(), state.fetch_news())
                .context("failed to refresh launcher state")?;
            println!("{}", serde_json::to_string_pretty(&state.snapshot().await)?);
        }
    }

    Ok(())
}

fn format_instance(instance: &Instance) -> String {
    format!(
        "{:>3}  {}  [{}]  {} downloads",
        instance.id,
        instance.name,
        instance.version.trim(),
        instance.downloads
    )
}

fn format_news(item: &NewsItem) -> String {
    format!("{:>3}  {} | {} ({})", item.id, item.headline, item.blurb, item.source)
}
