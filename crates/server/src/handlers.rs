use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use freifahren_catalog::LookupResult;
use freifahren_core::{LineId, Report, StationId};
use freifahren_notify::{format_report_message, send_webapp_button};

use crate::state::AppState;

const PASSWORD_HEADER: &str = "X-Password";

#[derive(Debug, Deserialize)]
pub struct InspectorReportRequest {
    pub line: Option<String>,
    pub station: Option<String>,
    pub direction: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "stationId")]
    pub station_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl StatusResponse {
    fn success() -> Self {
        Self { status: "success", message: None }
    }

    fn rate_limited() -> Self {
        Self { status: "success", message: Some("Rate limited") }
    }

    fn unauthorized() -> Self {
        Self { status: "error", message: Some("Invalid password") }
    }
}

fn password_matches(headers: &HeaderMap, expected: &str) -> bool {
    !expected.is_empty() && headers.get(PASSWORD_HEADER).and_then(|v| v.to_str().ok()) == Some(expected)
}

/// `POST /report-inspector`: password-gated, rate-limited to one
/// notification per `rate_limit_minutes` window.
pub async fn report_inspector(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<InspectorReportRequest>,
) -> (StatusCode, Json<StatusResponse>) {
    if !password_matches(&headers, &state.config.backend.report_password) {
        return (StatusCode::UNAUTHORIZED, Json(StatusResponse::unauthorized()));
    }

    let now = Utc::now();
    let window = chrono::Duration::minutes(state.config.risk.rate_limit_minutes as i64);
    if !state.rate_limiter.allow("report-inspector", now, window) {
        return (StatusCode::OK, Json(StatusResponse::rate_limited()));
    }

    dispatch_report(&state, body, now).await;
    (StatusCode::OK, Json(StatusResponse::success()))
}

/// `POST /mini-app/report`: same shape and formatting, no rate limit.
pub async fn mini_app_report(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InspectorReportRequest>,
) -> (StatusCode, Json<StatusResponse>) {
    dispatch_report(&state, body, Utc::now()).await;
    (StatusCode::OK, Json(StatusResponse::success()))
}

async fn dispatch_report(state: &AppState, body: InspectorReportRequest, now: DateTime<Utc>) {
    let station_id = match body.station_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => Some(StationId::new(id)),
        None => resolve_station_name(state, body.station.as_deref()).await,
    };
    let direction_id = resolve_station_name(state, body.direction.as_deref()).await;
    let line_id = body.line.as_deref().filter(|l| !l.is_empty()).map(LineId::new);

    let mini_app_url = state.config.chat.mini_app_public_url.as_deref().unwrap_or_default();
    let message_text = format_report_message(
        body.station.as_deref(),
        line_id.as_ref().map(LineId::as_str),
        body.direction.as_deref(),
        body.message.as_deref(),
        station_id.as_ref().map(StationId::as_str),
        mini_app_url,
    );

    if let Err(err) = state.notifier.send(&message_text).await {
        tracing::warn!(error = %err, "failed to notify chat channel of inspector report");
    }

    if line_id.is_some() || station_id.is_some() || direction_id.is_some() {
        state
            .record_report(Report {
                station_id,
                timestamp: Report::truncate_to_minute(now),
                direction_id,
                lines: line_id.into_iter().collect(),
            })
            .await;
    }
}

async fn resolve_station_name(state: &AppState, name: Option<&str>) -> Option<StationId> {
    let name = name.filter(|n| !n.is_empty())?;
    match state.catalog.search_station(name).await {
        Ok(LookupResult::Resolved(id)) => Some(id),
        Ok(LookupResult::NotFound) => None,
        Err(err) => {
            tracing::warn!(error = %err, name, "catalog name lookup failed");
            None
        }
    }
}

/// `GET /mini-app`: serves the static report form.
pub async fn mini_app() -> Html<&'static str> {
    Html(include_str!("../static/mini_app.html"))
}

#[derive(Debug, Deserialize)]
pub struct SendMiniAppRequest {
    pub chat_id: String,
    pub webapp_url: Option<String>,
    pub button_text: Option<String>,
    pub message_text: Option<String>,
}

/// `POST /send-mini-app`: pushes a Mini App deep-link button to an
/// arbitrary chat id.
pub async fn send_mini_app(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendMiniAppRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    if body.chat_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": "chat_id is required"})),
        );
    }

    let default_url = format!(
        "{}/mini-app",
        state.config.chat.mini_app_public_url.as_deref().unwrap_or_default()
    );
    let webapp_url = body.webapp_url.unwrap_or(default_url);
    let button_text = body.button_text.unwrap_or_else(|| "Open Mini App".to_string());
    let message_text = body
        .message_text
        .unwrap_or_else(|| "Click the button below to report inspectors:".to_string());

    match send_webapp_button(&state.bot_token, &body.chat_id, &message_text, &button_text, &webapp_url).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "success"}))),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": err.to_string()})),
        ),
    }
}

/// `POST /restart`: password-gated process exit, so a process supervisor
/// restarts the service. Thin administrative pass-through; no core logic
/// depends on it.
pub async fn restart(State(state): State<Arc<AppState>>, headers: HeaderMap) -> (StatusCode, Json<StatusResponse>) {
    if !password_matches(&headers, &state.config.backend.restart_password) {
        return (StatusCode::UNAUTHORIZED, Json(StatusResponse::unauthorized()));
    }

    tracing::warn!("restart requested over HTTP, exiting for supervisor restart");
    tokio::spawn(async {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        std::process::exit(0);
    });
    (StatusCode::OK, Json(StatusResponse::success()))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// `GET /healthz` liveness probe.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Serialize)]
pub struct SegmentColorsResponse {
    pub last_modified: DateTime<Utc>,
    pub segment_colors: std::collections::BTreeMap<String, String>,
}

/// `GET /segment-colors`: runs the risk engine synchronously over the
/// current in-process report log.
pub async fn segment_colors(State(state): State<Arc<AppState>>) -> Json<SegmentColorsResponse> {
    let now = Utc::now();
    let reports = state.reports_snapshot().await;
    let segment_colors = state.risk_engine.predict(&state.topology, &reports, now);
    Json(SegmentColorsResponse { last_modified: now, segment_colors })
}
