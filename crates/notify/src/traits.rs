//! Notifier trait definition and shared error types.

/// Errors that can occur during chat-notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

/// Trait for the chat egress channel. A single in-process implementation
/// (`BotNotifier`) exists today, but the boundary mirrors `NerTagger` in
/// `freifahren-extract`: swappable without touching callers.
#[async_trait::async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Deliver a pre-formatted message to the configured channel.
    async fn send(&self, message: &str) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g. "telegram").
    fn channel_name(&self) -> &str;
}
