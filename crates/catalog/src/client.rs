use std::time::Duration;

use reqwest::StatusCode;

use freifahren_core::{Report, StationId};

use crate::error::CatalogError;
use crate::model::{
    normalize_name, InspectorReportBody, LookupResult, RawLinesResponse, RawStationsResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Talks to the backend's station/line catalog and report sink over HTTP.
/// Every call carries its own deadline — no retry happens inside this
/// client; a lost report is the caller's policy to handle.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    /// `GET /v0/lines`.
    pub async fn lines(&self) -> Result<RawLinesResponse, CatalogError> {
        let url = format!("{}/v0/lines", self.base_url);
        self.get_json(&url).await
    }

    /// `GET /stations`.
    pub async fn stations(&self) -> Result<RawStationsResponse, CatalogError> {
        let url = format!("{}/stations", self.base_url);
        self.get_json(&url).await
    }

    /// `GET /v0/stations/search?name=<name>`, returning the best match's
    /// id. A `404` is a normal "not found" outcome, not an error.
    pub async fn search_station(
        &self,
        name: &str,
    ) -> Result<LookupResult<StationId>, CatalogError> {
        let url = format!("{}/v0/stations/search", self.base_url);
        let normalized = normalize_name(name);
        let response = self
            .http
            .get(&url)
            .query(&[("name", normalized.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LookupResult::NotFound);
        }
        if !response.status().is_success() {
            return Err(CatalogError::UnexpectedStatus(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;
        let body: RawStationsResponse = serde_json::from_slice(&bytes)?;
        Ok(body
            .into_keys()
            .next()
            .map(StationId::new)
            .map(LookupResult::Resolved)
            .unwrap_or(LookupResult::NotFound))
    }

    /// `POST /basics/inspectors`.
    pub async fn submit_inspector_report(
        &self,
        report: &Report,
        author: i64,
        password: &str,
    ) -> Result<(), CatalogError> {
        let url = format!("{}/basics/inspectors", self.base_url);
        let body = InspectorReportBody {
            timestamp: report.timestamp,
            line: report.lines.first().map(|l| l.to_string()),
            station_id: report.station_id.as_ref().map(|s| s.to_string()),
            direction_id: report.direction_id.as_ref().map(|s| s.to_string()),
            author,
            message: None,
        };
        let response = self
            .http
            .post(&url)
            .header("X-Password", password)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;

        if response.status().is_success() {
            tracing::info!(%url, "inspector report accepted by backend");
            Ok(())
        } else {
            let status = response.status().as_u16();
            tracing::warn!(%url, status, "inspector report rejected by backend");
            Err(CatalogError::UnexpectedStatus(status))
        }
    }

    // Body bytes are read before decoding so a truncated transfer and a
    // malformed payload surface as distinct errors.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.timeout))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(%url, status, "catalog request returned non-success status");
            return Err(CatalogError::UnexpectedStatus(status));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn map_send_error(err: reqwest::Error, timeout: Duration) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout(timeout)
    } else {
        CatalogError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_custom_timeout() {
        let client = CatalogClient::with_timeout("http://localhost:6000", Duration::from_millis(50));
        assert_eq!(client.timeout, Duration::from_millis(50));
    }
}
