//! refdata-agent: keeps the sanctions/PEP reference cache fresh and screens names.
//!
//! Usage:
//!   cargo run -p refdata-agent                            # load, then refresh on schedule
//!   cargo run -p refdata-agent -- --once                  # one reload, print stats JSON
//!   cargo run -p refdata-agent -- --screen Jose Marti     # one reload, print screening JSON
//!
//! Send SIGHUP to a running agent to force a reload.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use screening_engine::{RefreshSchedule, RefreshScheduler, ScreeningEngine};
use tokio::signal::unix::{signal, SignalKind};
use watchlist_feeds::WatchlistLoader;

mod config;

use config::AgentConfig;

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Serve,
    Once,
    Screen(String),
}

impl Mode {
    fn from_args(args: &[String]) -> Result<Self> {
        if let Some(pos) = args.iter().position(|a| a == "--screen") {
            let name = args[pos + 1..].join(" ");
            if name.trim().is_empty() {
                bail!("--screen needs a name, e.g. --screen \"Jose Marti\"");
            }
            return Ok(Mode::Screen(name));
        }
        if args.iter().any(|a| a == "--once") {
            return Ok(Mode::Once);
        }
        if let Some(unknown) = args.iter().skip(1).find(|a| a.starts_with("--")) {
            bail!("unknown option {unknown}; expected --once or --screen <name>");
        }
        Ok(Mode::Serve)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    let args: Vec<String> = std::env::args().collect();
    let mode = Mode::from_args(&args)?;

    // 2. Configuration
    let config = AgentConfig::from_env()?;
    tracing::info!("Configuration loaded and validated");
    tracing::info!("  OFAC SDN: {}", feed_label(&config.feeds.ofac_sdn_url));
    tracing::info!(
        "  OFAC Consolidated: {}",
        feed_label(&config.feeds.ofac_consolidated_url)
    );
    tracing::info!("  PEP: {}", feed_label(&config.feeds.pep_csv_url));
    tracing::info!(
        "  Thresholds: sanctions {:.2}, PEP {:.2} (token weight {:.2}, max {} matches)",
        config.screening.sanction_threshold,
        config.screening.pep_threshold,
        config.screening.token_weight,
        config.screening.max_matches
    );

    // 3. Engine
    let loader = WatchlistLoader::new(config.feeds.clone()).context("failed to build feed loader")?;
    let engine = Arc::new(
        ScreeningEngine::new(Arc::new(loader), config.screening.clone())
            .context("failed to build screening engine")?,
    );

    match mode {
        Mode::Once => {
            let stats = engine.reload().await.context("watchlist reload failed")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Mode::Screen(name) => {
            engine
                .reload()
                .await
                .context("watchlist reload failed, refusing to screen against an empty cache")?;
            let result = engine.screen(&name);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Mode::Serve => serve(engine, config.schedule).await?,
    }

    Ok(())
}

async fn serve(engine: Arc<ScreeningEngine>, schedule: RefreshSchedule) -> Result<()> {
    tracing::info!("Starting reference-data agent");

    if let Err(e) = engine.reload().await {
        tracing::error!("Initial watchlist load failed, serving an empty cache until the next reload: {}", e);
    }

    let (handle, scheduler) = RefreshScheduler::new(Arc::clone(&engine), schedule).spawn();

    let mut sigterm = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let mut sighup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down");
                break;
            }
            _ = sighup.recv() => {
                tracing::info!("Received SIGHUP, reloading watchlists");
                handle.trigger();
            }
        }
    }

    handle.shutdown();
    scheduler.await.context("refresh scheduler task failed")?;

    let stats = engine.stats();
    tracing::info!(
        "Agent stopped: {} sanctions, {} PEPs cached (loaded at {})",
        stats.sanctions_count,
        stats.peps_count,
        stats.last_loaded_epoch_millis
    );
    Ok(())
}

fn feed_label(url: &str) -> &str {
    if url.trim().is_empty() {
        "disabled"
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("refdata-agent")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_default_mode_is_serve() {
        assert_eq!(Mode::from_args(&args(&[])).unwrap(), Mode::Serve);
    }

    #[test]
    fn test_once() {
        assert_eq!(Mode::from_args(&args(&["--once"])).unwrap(), Mode::Once);
    }

    #[test]
    fn test_screen_joins_remaining_words() {
        assert_eq!(
            Mode::from_args(&args(&["--screen", "José", "Martí"])).unwrap(),
            Mode::Screen("José Martí".to_string())
        );
    }

    #[test]
    fn test_screen_without_name_fails() {
        assert!(Mode::from_args(&args(&["--screen"])).is_err());
        assert!(Mode::from_args(&args(&["--screen", "  "])).is_err());
    }

    #[test]
    fn test_unknown_flag_fails() {
        assert!(Mode::from_args(&args(&["--daemon"])).is_err());
    }

    #[test]
    fn test_feed_label() {
        assert_eq!(feed_label(" "), "disabled");
        assert_eq!(feed_label("https://x/y.csv"), "https://x/y.csv");
    }
}
