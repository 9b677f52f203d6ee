use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};

use crate::pipeline::{run_pipeline, ChatMessage};
use crate::state::AppState;

/// Bounded worker pool draining the chat-ingress queue: a fixed number of
/// spawned tasks share one channel, so parallelism is capped without an
/// external broker.
pub struct WorkerPool {
    sender: mpsc::Sender<ChatMessage>,
}

impl WorkerPool {
    pub fn spawn(state: Arc<AppState>, worker_count: usize, queue_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        for worker_id in 0..worker_count {
            let receiver = receiver.clone();
            let state = state.clone();
            tokio::spawn(async move {
                loop {
                    let message = receiver.lock().await.recv().await;
                    match message {
                        Some(message) => process_message(&state, message).await,
                        None => {
                            tracing::info!(worker_id, "worker pool channel closed, worker exiting");
                            break;
                        }
                    }
                }
            });
        }

        Self { sender }
    }

    /// Enqueues a message for processing. Drops and logs if no workers
    /// remain — chat platforms do not re-deliver, so a dropped message is
    /// permanently lost.
    pub async fn submit(&self, message: ChatMessage) {
        if self.sender.send(message).await.is_err() {
            tracing::error!("worker pool channel closed, dropping chat message");
        }
    }
}

/// Runs the full chain for one message: Guard/Extractor/Verifier via
/// [`run_pipeline`], then the catalog resolver's emit half — submit to
/// the backend sink and feed the in-process risk-engine report log. The
/// report carries the chat platform's message timestamp, not the
/// processing time.
async fn process_message(state: &AppState, message: ChatMessage) {
    let timestamp = DateTime::<Utc>::from_timestamp(message.date_unix, 0).unwrap_or_else(Utc::now);
    let Some(report) = run_pipeline(&message.text, timestamp, state) else {
        return;
    };

    let author: i64 = message.chat_id.parse().unwrap_or(0);
    if let Err(err) = state
        .catalog
        .submit_inspector_report(&report, author, &state.config.backend.report_password)
        .await
    {
        tracing::warn!(error = %err, chat_id = %message.chat_id, "failed to submit inspector report to backend");
    }

    state.record_report(report).await;
}
