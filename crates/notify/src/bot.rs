use crate::traits::{ChatNotifier, NotifyError};

/// Sends notifications via the Telegram Bot API `sendMessage` endpoint,
/// HTML parse mode.
#[derive(Debug)]
pub struct BotNotifier {
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

/// If `bot_token` starts with `${`, the value between `${` and `}` is
/// resolved as an environment variable name. Returns
/// [`NotifyError::Config`] if the token is empty or the env var is
/// missing. Shared by [`BotNotifier::from_config`] and any caller that
/// needs the raw token for an endpoint the `ChatNotifier` trait doesn't
/// cover (e.g. sending to an arbitrary chat id).
pub fn resolve_token(bot_token: &str) -> Result<String, NotifyError> {
    let resolved_token = if let Some(var_name) = bot_token
        .strip_prefix("${")
        .and_then(|s| s.strip_suffix('}'))
    {
        std::env::var(var_name)
            .map_err(|_| NotifyError::Config(format!("environment variable '{var_name}' is not set")))?
    } else {
        bot_token.to_string()
    };

    if resolved_token.is_empty() {
        return Err(NotifyError::Config("bot token must not be empty".to_string()));
    }
    Ok(resolved_token)
}

impl BotNotifier {
    pub fn from_config(bot_token: String, chat_id: String) -> Result<Self, NotifyError> {
        let resolved_token = resolve_token(&bot_token)?;

        Ok(Self {
            bot_token: resolved_token,
            chat_id,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl ChatNotifier for BotNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": message,
            "parse_mode": "HTML",
        });

        tracing::debug!(chat_id = %self.chat_id, "sending chat notification");
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let resp_body: serde_json::Value = response.json().await?;

        if resp_body.get("ok") == Some(&serde_json::Value::Bool(true)) {
            tracing::info!(chat_id = %self.chat_id, "chat notification sent");
            return Ok(());
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp_body
                .get("parameters")
                .and_then(|p| p.get("retry_after"))
                .and_then(|v| v.as_u64())
                .unwrap_or(30);
            return Err(NotifyError::RateLimited { retry_after_secs: retry_after });
        }

        let description = resp_body
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown chat API error");
        Err(NotifyError::Config(format!("chat API error: {description}")))
    }

    fn channel_name(&self) -> &str {
        "chat"
    }
}

/// Sends a message with an inline Mini App button to an arbitrary chat
/// id. Bypasses `ChatNotifier` since that trait only targets the one
/// configured channel; used by the `/send-mini-app` and `/start`-reply
/// admin paths.
pub async fn send_webapp_button(
    bot_token: &str,
    chat_id: &str,
    text: &str,
    button_text: &str,
    webapp_url: &str,
) -> Result<(), NotifyError> {
    let url = format!("https://api.telegram.org/bot{bot_token}/sendMessage");
    let body = serde_json::json!({
        "chat_id": chat_id,
        "text": text,
        "reply_markup": {
            "inline_keyboard": [[{ "text": button_text, "web_app": { "url": webapp_url } }]]
        }
    });
    let client = reqwest::Client::new();
    let response = client.post(&url).json(&body).send().await?;
    let resp_body: serde_json::Value = response.json().await?;
    if resp_body.get("ok") == Some(&serde_json::Value::Bool(true)) {
        return Ok(());
    }
    let description = resp_body
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown chat API error");
    Err(NotifyError::Config(format!("chat API error: {description}")))
}
