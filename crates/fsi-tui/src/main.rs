// fsi entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load rankings
// 4. Create mpsc channels and the app state
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use fsi_core::config;
use fsi_core::rankings::{env_urls, HttpFetcher, RankingsCache, RankingsLoader};
use fsi_llm::LlmClient;
use fsi_tui::{app, tui};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("fsi starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, sport={}, {} teams, {} {}",
        config.league.name,
        config.league.sport,
        config.league.num_teams,
        config.league.scoring,
        config.league.qb_format
    );

    let rankings_cfg = &config.strategy.rankings;
    let fetcher = HttpFetcher::new(rankings_cfg.fetch_timeout())
        .context("failed to build rankings HTTP client")?;
    let loader = RankingsLoader::new(
        rankings_cfg.urls.clone(),
        config.data_dir.clone(),
        Arc::new(fetcher),
        RankingsCache::new(rankings_cfg.cache_ttl()),
    )
    .with_env_urls(env_urls());

    let loaded = loader
        .load(&app::rankings_request(&config))
        .await
        .context("failed to load rankings")?;
    info!("Loaded {} players from {}", loaded.players.len(), loaded.origin);

    let (llm_tx, llm_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let llm_client = LlmClient::from_config(&config);
    match &llm_client {
        LlmClient::Active(_) => info!("LLM client initialized (API key configured)"),
        LlmClient::Disabled => info!("LLM client disabled (no API key)"),
    }

    let app_state = app::AppState::new(config, loaded, loader, llm_client, llm_tx)
        .context("failed to initialize application state")?;

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(llm_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    info!("Application ready");

    // Blocks until the user quits.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("fsi shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fsi.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fsi=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
