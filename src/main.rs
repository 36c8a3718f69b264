//! Glean CLI entry point.

use anyhow::Result;
use clap::Parser;
use glean::cli::{commands, Cli, Commands};
use glean::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("glean={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Serve { host, port, llm } => {
            let mut settings = settings;
            settings.llm.apply_overrides(llm.provider, llm.model);
            commands::run_serve(host.as_deref(), port, settings).await?;
        }

        Commands::Insights {
            url,
            pdf,
            output,
            llm,
        } => {
            let mut settings = settings;
            settings.llm.apply_overrides(llm.provider, llm.model);
            commands::run_insights(&url, pdf, output, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_ref())?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, &settings, cli.config.as_ref())?;
        }
    }

    Ok(())
}
