use std::sync::Arc;

use tokio::sync::RwLock;

use freifahren_catalog::CatalogClient;
use freifahren_core::{Config, Report};
use freifahren_extract::NerTagger;
use freifahren_notify::{ChatNotifier, RateLimiter};
use freifahren_risk::RiskEngine;
use freifahren_topology::Topology;

/// Shared process state: topology, synonyms and the NER model are
/// immutable after startup; the reports log and the rate-limiter are the
/// only mutable data, each behind its own lock.
pub struct AppState {
    pub config: Config,
    pub topology: Topology,
    pub ner: Arc<dyn NerTagger + Send + Sync>,
    pub catalog: CatalogClient,
    pub notifier: Arc<dyn ChatNotifier + Send + Sync>,
    /// Resolved bot token, kept alongside `notifier` for the admin paths
    /// (`/send-mini-app`, `/start` reply) that address an arbitrary chat
    /// id rather than the one `notifier` is bound to.
    pub bot_token: String,
    pub rate_limiter: RateLimiter,
    pub risk_engine: RiskEngine,
    /// In-process report log feeding the risk engine. Not persisted —
    /// restarting the process clears history.
    pub reports: RwLock<Vec<Report>>,
}

impl AppState {
    pub async fn record_report(&self, report: Report) {
        self.reports.write().await.push(report);
    }

    pub async fn reports_snapshot(&self) -> Vec<Report> {
        self.reports.read().await.clone()
    }
}
