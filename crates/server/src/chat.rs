use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use freifahren_notify::send_webapp_button;

use crate::pipeline::ChatMessage;
use crate::worker::WorkerPool;

const GET_UPDATES_TIMEOUT_SECS: u64 = 60;
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    date: i64,
    text: Option<String>,
    caption: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Long-polls the bot platform's `getUpdates` endpoint, handing every
/// plain message (text or media caption) to the worker pool and answering
/// `/start` directly with a Mini App deep link.
pub async fn run_ingress_loop(bot_token: String, mini_app_public_url: String, pool: Arc<WorkerPool>) {
    let client = reqwest::Client::new();
    let mut offset: i64 = 0;

    loop {
        let url = format!("https://api.telegram.org/bot{bot_token}/getUpdates");
        let response = client
            .get(&url)
            .query(&[
                ("timeout", GET_UPDATES_TIMEOUT_SECS.to_string()),
                ("offset", offset.to_string()),
            ])
            .timeout(Duration::from_secs(GET_UPDATES_TIMEOUT_SECS + 10))
            .send()
            .await;

        let updates = match response {
            Ok(response) => match response.json::<UpdatesResponse>().await {
                Ok(body) => body.result,
                Err(err) => {
                    tracing::warn!(error = %err, "chat ingress response decode failed");
                    tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                    continue;
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "chat ingress poll failed");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let chat_id = message.chat.id.to_string();
            let Some(text) = message.text.or(message.caption) else {
                continue;
            };

            if text.trim() == "/start" {
                handle_start(&bot_token, &chat_id, &mini_app_public_url).await;
                continue;
            }

            pool.submit(ChatMessage {
                chat_id,
                date_unix: message.date,
                text,
            })
            .await;
        }
    }
}

async fn handle_start(bot_token: &str, chat_id: &str, mini_app_public_url: &str) {
    let webapp_url = format!("{mini_app_public_url}/mini-app");
    let welcome_text = "Welcome to FreiFahren! Use the button below to report inspectors:";
    if let Err(err) = send_webapp_button(bot_token, chat_id, welcome_text, "Report Inspectors", &webapp_url).await {
        tracing::warn!(error = %err, chat_id, "failed to send /start reply");
    }
}
