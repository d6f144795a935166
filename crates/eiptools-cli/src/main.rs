//! eiptools command-line entry point.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use eiptools_cli::EipToolsConfig;
use eiptools_cli::cli::{Cli, Command, GraphAction, WebhookAction};
use eiptools_cli::commands::{bookmarks, graph, index, serve, show, webhook};
use eiptools_cli::config_handlers::handle_config_command;
use eiptools_core::ConfigManager;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "debug"
    } else {
        "info,eiptools=debug"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(cli.command, cli.config.as_deref()).await
}

async fn run(command: Command, config_path: Option<&str>) -> Result<()> {
    // `config` subcommands work on the file itself and must not require it to load.
    let load = || -> Result<EipToolsConfig> {
        let config = EipToolsConfig::load(config_path)?;
        tracing::debug!(data_dir = %config.data_dir().display(), "Configuration loaded");
        Ok(config)
    };

    match command {
        Command::Config { action } => handle_config_command(config_path, action)?,
        Command::Serve { host, port, local } => serve::run(load()?, host, port, local).await?,
        Command::Index {
            checkouts,
            prs,
            github_token,
        } => index::run(&load()?, checkouts.as_deref(), prs, github_token).await?,
        Command::Graph { action } => {
            let config = load()?;
            match action {
                GraphAction::Build {
                    from_catalog,
                    fail_fast,
                } => graph::build(&config, from_catalog, fail_fast).await?,
                GraphAction::Stats { top } => graph::stats(&config, top)?,
                GraphAction::Deps { id, transitive } => graph::deps(&config, &id, transitive)?,
            }
        }
        Command::Show {
            reference,
            raw,
            html,
            local,
        } => {
            let format = if raw {
                show::ShowFormat::Markdown
            } else if html {
                show::ShowFormat::Html
            } else {
                show::ShowFormat::Summary
            };
            show::run(&load()?, &reference, format, local).await?
        }
        Command::Bookmarks { action } => bookmarks::run(&load()?, action)?,
        Command::Webhook { action } => {
            let config = load()?;
            match action {
                WebhookAction::Test { url, text } => webhook::test(&config, url, &text).await?,
                WebhookAction::Register { url } => webhook::register(&config, url).await?,
            }
        }
    }

    Ok(())
}
