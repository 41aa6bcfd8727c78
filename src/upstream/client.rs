//! Outbound HTTP client for the brokerage API.
//!
//! # Responsibilities
//! - Hold the process-wide credential pair and resolved base URLs
//! - Build upstream URLs with encoded path segments and query pairs
//! - Inject the three authentication headers on every call
//! - Apply an explicit timeout to every outbound request
//!
//! # Design Decisions
//! - Header map is prebuilt once; malformed credentials fail at startup
//! - Path segments go through the `url` crate so inbound parameters are
//!   percent-encoded, never string-interpolated into the URL
//! - One call per request: no retries, no response caching

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use thiserror::Error;
use url::Url;

use crate::config::RelayConfig;
use crate::upstream::TradingMode;

/// Fixed API version path segment.
pub const API_VERSION: &str = "v2";

/// Credential id header.
pub const HEADER_KEY_ID: HeaderName = HeaderName::from_static("apca-api-key-id");
/// Credential secret header.
pub const HEADER_SECRET_KEY: HeaderName = HeaderName::from_static("apca-api-secret-key");

/// Errors producing or issuing an upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),

    #[error("credential not representable as a header value")]
    Credential(#[from] reqwest::header::InvalidHeaderValue),

    #[error("upstream base url cannot carry path segments")]
    CannotBeABase,
}

/// Client for the two fixed upstream hosts.
#[derive(Clone)]
pub struct AlpacaClient {
    http: reqwest::Client,
    trading_base: Url,
    data_base: Url,
    headers: HeaderMap,
}

impl AlpacaClient {
    /// Build a client from validated configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, UpstreamError> {
        if config.upstream.mode == TradingMode::Live {
            tracing::warn!("live trading mode selected; live routing is unverified");
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.upstream_secs))
            .build()?;

        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(HEADER_KEY_ID, HeaderValue::from_str(&config.credentials.key_id)?);
        let mut secret = HeaderValue::from_str(&config.credentials.secret_key)?;
        secret.set_sensitive(true);
        headers.insert(HEADER_SECRET_KEY, secret);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            http,
            trading_base: Url::parse(config.upstream.trading_base())?,
            data_base: Url::parse(config.upstream.data_base())?,
            headers,
        })
    }

    /// URL under the trading-operations host, e.g. `{base}/v2/orders`.
    pub fn trading_url(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, UpstreamError> {
        build_url(&self.trading_base, segments, query)
    }

    /// URL under the market-data host, e.g. `{base}/v2/stocks/{symbol}/bars`.
    pub fn data_url(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, UpstreamError> {
        build_url(&self.data_base, segments, query)
    }

    /// Issue a GET with the credential headers attached.
    pub async fn get(&self, url: Url) -> Result<reqwest::Response, UpstreamError> {
        Ok(self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?)
    }

    /// Issue a POST, forwarding the given JSON body verbatim.
    pub async fn post_json(
        &self,
        url: Url,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, UpstreamError> {
        Ok(self
            .http
            .post(url)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?)
    }

    /// Issue a DELETE with the credential headers attached.
    pub async fn delete(&self, url: Url) -> Result<reqwest::Response, UpstreamError> {
        Ok(self
            .http
            .delete(url)
            .headers(self.headers.clone())
            .send()
            .await?)
    }
}

fn build_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, UpstreamError> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| UpstreamError::CannotBeABase)?;
        path.pop_if_empty();
        path.push(API_VERSION);
        path.extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AlpacaClient {
        let mut config = RelayConfig::default();
        config.credentials.key_id = "key".into();
        config.credentials.secret_key = "secret".into();
        AlpacaClient::from_config(&config).unwrap()
    }

    #[test]
    fn trading_url_carries_version_segment() {
        let url = client().trading_url(&["account"], &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://paper-api.alpaca.markets/v2/account"
        );
    }

    #[test]
    fn query_pairs_are_encoded() {
        let url = client()
            .trading_url(&["orders"], &[("status", "open&closed")])
            .unwrap();
        assert_eq!(url.query(), Some("status=open%26closed"));
    }

    #[test]
    fn path_segments_are_encoded_not_interpolated() {
        let url = client()
            .data_url(&["stocks", "A/../B", "bars"], &[])
            .unwrap();
        assert_eq!(url.path(), "/v2/stocks/A%2F..%2FB/bars");
    }

    #[test]
    fn malformed_credential_fails_construction() {
        let mut config = RelayConfig::default();
        config.credentials.key_id = "key\nwith-newline".into();
        config.credentials.secret_key = "secret".into();
        assert!(matches!(
            AlpacaClient::from_config(&config),
            Err(UpstreamError::Credential(_))
        ));
    }
}
