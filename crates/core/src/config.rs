use std::collections::BTreeSet;
use std::env;

use serde::{Deserialize, Serialize};

use crate::ids::LineId;

/// Loads a `.env` file if present (silently ignored if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u16(key: &str, default: u16) -> u16 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub risk: RiskConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Builds config from environment variables. Call [`load_dotenv`] first.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            backend: BackendConfig::from_env(),
            chat: ChatConfig::from_env(),
            risk: RiskConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("config loaded:");
        tracing::info!("  server:    host={} port={}", self.server.host, self.server.port);
        tracing::info!("  backend:   url={}", self.backend.backend_url);
        tracing::info!(
            "  chat:      channel_id={} mini_app_url={}",
            self.chat.channel_id,
            self.chat.mini_app_public_url.as_deref().unwrap_or("(none)")
        );
        tracing::info!(
            "  risk:      ring_lines={:?} fuzzy_threshold={} rate_limit_minutes={}",
            self.risk.ring_lines,
            self.risk.fuzzy_threshold,
            self.risk.rate_limit_minutes
        );
        tracing::info!(
            "  telemetry: {}",
            if self.telemetry.dsn.is_some() { "configured" } else { "disabled" }
        );
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 8080),
        }
    }
}

/// Credentials and addressing for the backend catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub backend_url: String,
    pub report_password: String,
    pub restart_password: String,
}

impl BackendConfig {
    fn from_env() -> Self {
        Self {
            backend_url: env_or("BACKEND_URL", "http://localhost:6000"),
            report_password: env_or("REPORT_PASSWORD", ""),
            restart_password: env_or("RESTART_PASSWORD", ""),
        }
    }
}

/// Chat-platform wiring (bot token, target channel, mini-app link).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub mini_app_public_url: Option<String>,
}

impl ChatConfig {
    fn from_env() -> Self {
        Self {
            bot_token: env_or("NLP_BOT_TOKEN", ""),
            channel_id: env_or("CHAT_CHANNEL_ID", ""),
            mini_app_public_url: env_opt("MINI_APP_PUBLIC_URL"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub dsn: Option<String>,
}

impl TelemetryConfig {
    fn from_env() -> Self {
        Self {
            dsn: env_opt("TELEMETRY_DSN"),
        }
    }
}

/// Tunables for the extraction pipeline and the risk engine. Defaults are
/// the calibrated production constants; every value can be overridden via
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub ring_lines: BTreeSet<LineId>,
    pub fuzzy_threshold: u32,
    pub rate_limit_minutes: u32,
    pub decay: DecayConstants,
}

impl RiskConfig {
    fn from_env() -> Self {
        let ring_lines = env_opt("RING_LINES")
            .map(|v| v.split(',').map(|s| LineId::new(s.trim())).collect())
            .unwrap_or_else(|| {
                BTreeSet::from([LineId::new("S41"), LineId::new("S42")])
            });
        Self {
            ring_lines,
            fuzzy_threshold: env_u32("FUZZY_THRESHOLD", 75),
            rate_limit_minutes: env_u32("RATE_LIMIT_MINUTES", 5),
            decay: DecayConstants::from_env(),
        }
    }
}

/// Logistic time-to-live curve for one risk channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TemporalDecayParams {
    pub ttl: f64,
    pub strength: f64,
    pub shift: f64,
}

/// Beta-binomial falloff shape for one risk channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpatialDecayParams {
    pub alpha: f64,
    pub beta: f64,
    pub n: u64,
    pub peak: u64,
    pub shift: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelConstants {
    pub temporal: TemporalDecayParams,
    pub spatial: SpatialDecayParams,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecayConstants {
    pub direct: ChannelConstants,
    pub bidirect: ChannelConstants,
    pub line: ChannelConstants,
}

impl Default for DecayConstants {
    /// The calibrated production constants, independent of environment.
    fn default() -> Self {
        Self {
            direct: ChannelConstants {
                temporal: TemporalDecayParams { ttl: 1000.0, strength: 0.2, shift: 0.4 },
                spatial: SpatialDecayParams { alpha: 1.456, beta: 2.547, n: 6, peak: 1, shift: 0 },
            },
            bidirect: ChannelConstants {
                temporal: TemporalDecayParams { ttl: 2000.0, strength: 0.3, shift: 0.4 },
                spatial: SpatialDecayParams { alpha: 1.336, beta: 1.968, n: 5, peak: 1, shift: 1 },
            },
            line: ChannelConstants {
                temporal: TemporalDecayParams { ttl: 4000.0, strength: 0.3, shift: 0.2 },
                spatial: SpatialDecayParams { alpha: 0.9891, beta: 1.175, n: 30, peak: 0, shift: 0 },
            },
        }
    }
}

impl DecayConstants {
    fn from_env() -> Self {
        Self {
            direct: ChannelConstants {
                temporal: TemporalDecayParams {
                    ttl: env_f64("DIRECT_TTL", 1000.0),
                    strength: env_f64("DIRECT_STRENGTH", 0.2),
                    shift: env_f64("DIRECT_TEMPORAL_SHIFT", 0.4),
                },
                spatial: SpatialDecayParams {
                    alpha: env_f64("DIRECT_ALPHA", 1.456),
                    beta: env_f64("DIRECT_BETA", 2.547),
                    n: env_u32("DIRECT_N", 6) as u64,
                    peak: env_u32("DIRECT_PEAK", 1) as u64,
                    shift: env_u32("DIRECT_SPATIAL_SHIFT", 0) as u64,
                },
            },
            bidirect: ChannelConstants {
                temporal: TemporalDecayParams {
                    ttl: env_f64("BIDIRECT_TTL", 2000.0),
                    strength: env_f64("BIDIRECT_STRENGTH", 0.3),
                    shift: env_f64("BIDIRECT_TEMPORAL_SHIFT", 0.4),
                },
                spatial: SpatialDecayParams {
                    alpha: env_f64("BIDIRECT_ALPHA", 1.336),
                    beta: env_f64("BIDIRECT_BETA", 1.968),
                    n: env_u32("BIDIRECT_N", 5) as u64,
                    peak: env_u32("BIDIRECT_PEAK", 1) as u64,
                    shift: env_u32("BIDIRECT_SPATIAL_SHIFT", 1) as u64,
                },
            },
            line: ChannelConstants {
                temporal: TemporalDecayParams {
                    ttl: env_f64("LINE_TTL", 4000.0),
                    strength: env_f64("LINE_STRENGTH", 0.3),
                    shift: env_f64("LINE_TEMPORAL_SHIFT", 0.2),
                },
                spatial: SpatialDecayParams {
                    alpha: env_f64("LINE_ALPHA", 0.9891),
                    beta: env_f64("LINE_BETA", 1.175),
                    n: env_u32("LINE_N", 30) as u64,
                    peak: env_u32("LINE_PEAK", 0) as u64,
                    shift: env_u32("LINE_SPATIAL_SHIFT", 0) as u64,
                },
            },
        }
    }
}
