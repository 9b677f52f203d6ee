mod chat;
mod cli;
mod handlers;
mod pipeline;
mod router;
mod state;
mod topology_loader;
mod worker;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::RwLock;

use freifahren_catalog::CatalogClient;
use freifahren_core::Config;
use freifahren_extract::HeuristicNerTagger;
use freifahren_notify::{resolve_token, BotNotifier};
use freifahren_risk::RiskEngine;
use freifahren_topology::RawRingLines;

use crate::cli::CliArgs;
use crate::state::AppState;
use crate::worker::WorkerPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).with_level(true).init();

    freifahren_core::config::load_dotenv();
    let config = Config::from_env();
    config.log_summary();
    let args = CliArgs::parse();

    let catalog = CatalogClient::new(config.backend.backend_url.clone());
    let ring_lines = RawRingLines(config.risk.ring_lines.clone());
    let topology = topology_loader::load_topology_with_fallback(
        &PathBuf::from(&args.topology_dir),
        &ring_lines,
        &catalog,
    )
    .await?;
    tracing::info!(
        stations = topology.stations().count(),
        lines = topology.lines().count(),
        segments = topology.segments().len(),
        "topology loaded"
    );

    let bot_token = resolve_token(&config.chat.bot_token)?;
    let notifier = BotNotifier::from_config(config.chat.bot_token.clone(), config.chat.channel_id.clone())?;

    let state = Arc::new(AppState {
        risk_engine: RiskEngine::new(config.risk.decay.clone()),
        config,
        topology,
        ner: Arc::new(HeuristicNerTagger::new()),
        catalog,
        notifier: Arc::new(notifier),
        bot_token,
        rate_limiter: freifahren_notify::RateLimiter::new(),
        reports: RwLock::new(Vec::new()),
    });

    let pool = Arc::new(WorkerPool::spawn(state.clone(), args.workers, args.queue_capacity));

    if args.disable_chat_ingress {
        tracing::info!("chat ingress loop disabled via CLI flag");
    } else {
        let bot_token = state.bot_token.clone();
        let mini_app_public_url = state.config.chat.mini_app_public_url.clone().unwrap_or_default();
        let ingress_pool = pool.clone();
        tokio::spawn(async move {
            chat::run_ingress_loop(bot_token, mini_app_public_url, ingress_pool).await;
        });
    }

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "server listening");

    let app = router::build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
