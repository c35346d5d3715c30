use anyhow::Context;
use std::sync::Arc;

use lar::config::{self, AppState, Config};
use lar::db::{seed, Database};
use lar::{logger, server};

fn main() -> anyhow::Result<()> {
    // First argument overrides the config file path (without extension)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)
        .with_context(|| format!("failed to load configuration from '{config_path}'"))?;

    logger::init(&cfg).context("failed to open log files")?;

    // Create the Tokio runtime; worker count follows `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> anyhow::Result<()> {
    let addr = cfg
        .get_socket_addr()
        .map_err(anyhow::Error::msg)
        .context("invalid server address")?;

    // A missing SPA entry document stops startup before the database is touched
    let roots = AppState::static_roots(&cfg).context("static resources are misconfigured")?;

    let db = Database::open(&cfg.database.path)
        .with_context(|| format!("failed to open database '{}'", cfg.database.path))?;
    if cfg.database.seed {
        db.run(seed::run)
            .await
            .context("failed to seed database")?;
    }

    let state = Arc::new(AppState::with_roots(&cfg, roots, db));

    let listener = server::create_reusable_listener(addr)
        .with_context(|| format!("failed to bind {addr}"))?;
    logger::log_server_start(&addr, &cfg);

    server::start_signal_handler(Arc::clone(&state.shutdown));
    server::start_server_loop(listener, state).await?;
    Ok(())
}
