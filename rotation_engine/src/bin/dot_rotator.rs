use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use display_feeds::providers::{
    binance::BinanceProvider, calendar_api::CalendarApiProvider, open_meteo::OpenMeteoProvider,
};
use rotation_engine::{
    config::{Credentials, RotatorConfig},
    content::{BuilderSettings, ContentBuilder, ContentSource},
    health,
    icons::IconTable,
    scheduler::{RotationScheduler, RotationState},
    sender::DotTextSender,
};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Rotates content onto a Dot display")]
struct Cli {
    /// TOML config file; built-in defaults when omitted.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the rotation loop and the health server (default).
    Serve,
    /// Build one card and print it without pushing.
    Preview {
        #[arg(long)]
        kind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = RotatorConfig::load(cli.config.as_deref()).context("loading config")?;

    match cli.cmd.unwrap_or(Cmd::Serve) {
        Cmd::Serve => serve(config).await,
        Cmd::Preview { kind } => preview(config, &kind).await,
    }
}

/// `RUST_LOG` wins, then `LOG_LEVEL`, then `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            std::env::var("LOG_LEVEL")
                .ok()
                .and_then(|level| EnvFilter::try_new(level.to_lowercase()).ok())
        })
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn content_builder(config: &RotatorConfig) -> Result<ContentBuilder> {
    let timeout = config.request_timeout();
    let prices = BinanceProvider::new(&config.endpoints.binance, timeout)?;
    let weather = OpenMeteoProvider::new(&config.endpoints.open_meteo, timeout)?;

    let icons = IconTable::load_with_builtin(config.icons_path.as_deref());

    let settings = BuilderSettings {
        timezone: config.tz()?,
        calendar_signature: config.calendar_signature.clone(),
    };

    let mut builder = ContentBuilder::new(Arc::new(prices), Arc::new(weather), icons, settings);
    if let Some(base) = &config.endpoints.calendar {
        builder = builder.with_calendar(Arc::new(CalendarApiProvider::new(base, timeout)?));
    }
    Ok(builder)
}

async fn serve(config: RotatorConfig) -> Result<()> {
    let credentials = Credentials::from_env()?;
    let sender = DotTextSender::new(
        &config.endpoints.dot,
        &credentials.device_id,
        credentials.api_key,
        config.request_timeout(),
    )
    .context("building device client")?;

    let state = RotationState::new(config.sequence_kinds()?)?;
    let mut scheduler =
        RotationScheduler::new(content_builder(&config)?, sender, state, config.interval());
    let snapshot = scheduler.snapshot_handle();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let bind = config.health.bind;
    let health_rx = shutdown_rx.clone();
    let server = tokio::spawn(async move {
        if let Err(e) = health::serve(bind, snapshot, health_rx).await {
            tracing::error!(error = %e, %bind, "health server failed");
        }
    });
    let rotation = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    rotation.await.context("rotation task panicked")?;
    server.await.context("health task panicked")?;

    info!("shutdown complete");
    Ok(())
}

async fn preview(config: RotatorConfig, name: &str) -> Result<()> {
    let kind = config
        .kind(name)
        .with_context(|| format!("no kind named {name:?}"))?;
    let payload = content_builder(&config)?.build(&kind).await?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
