//! Forwarding handlers, one per relay operation.
//!
//! Each handler is a pass-through: validate the inbound parameters, build
//! the upstream URL, issue exactly one call with the credential headers,
//! and map the result per the response contract in `response.rs`.

use std::collections::HashMap;
use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use url::Url;

use crate::http::response::{generic_error, passthrough};
use crate::http::server::AppState;
use crate::market_data::{LookbackWindow, DEFAULT_LIMIT};
use crate::observability::metrics;
use crate::upstream::UpstreamError;

/// Health probe. Local only; no upstream call.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "alpaca-relay",
        "mode": state.config.upstream.mode,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api/account → GET {trading}/v2/account
pub async fn get_account(State(state): State<AppState>) -> Response {
    let url = state.client.trading_url(&["account"], &[]);
    forward_get(&state, "account", url).await
}

/// GET /api/positions → GET {trading}/v2/positions
pub async fn list_positions(State(state): State<AppState>) -> Response {
    let url = state.client.trading_url(&["positions"], &[]);
    forward_get(&state, "positions", url).await
}

/// GET /api/clock → GET {trading}/v2/clock
pub async fn market_clock(State(state): State<AppState>) -> Response {
    let url = state.client.trading_url(&["clock"], &[]);
    forward_get(&state, "clock", url).await
}

/// GET /api/orders?status= → GET {trading}/v2/orders?status={status|all}
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let status = params.get("status").map(String::as_str).unwrap_or("all");
    let url = state.client.trading_url(&["orders"], &[("status", status)]);
    forward_get(&state, "orders", url).await
}

/// GET /api/bars/{symbol} → GET {data}/v2/stocks/{symbol}/bars
///
/// Derives the lookback window from `timeframe` and `limit` so the
/// upstream returns roughly `limit` bars ending now.
pub async fn get_bars(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !valid_symbol(&symbol) {
        tracing::warn!(symbol = %symbol, "Rejected bars request with invalid symbol");
        return generic_error(StatusCode::BAD_REQUEST);
    }

    let timeframe = params
        .get("timeframe")
        .cloned()
        .unwrap_or_else(|| "1Day".to_string());
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_LIMIT);

    let window = match LookbackWindow::compute(&timeframe, limit) {
        Ok(window) => window,
        Err(e) => {
            tracing::warn!(timeframe = %timeframe, error = %e, "Rejected bars request");
            return generic_error(StatusCode::BAD_REQUEST);
        }
    };

    let start = window.start_rfc3339();
    let end = window.end_rfc3339();
    let limit = limit.to_string();
    let url = state.client.data_url(
        &["stocks", symbol.as_str(), "bars"],
        &[
            ("timeframe", timeframe.as_str()),
            ("start", start.as_str()),
            ("end", end.as_str()),
            ("limit", limit.as_str()),
            ("feed", "iex"),
        ],
    );
    forward_get(&state, "bars", url).await
}

/// GET /api/quote/{symbol} → GET {data}/v2/stocks/{symbol}/quotes/latest
pub async fn get_latest_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Response {
    if !valid_symbol(&symbol) {
        tracing::warn!(symbol = %symbol, "Rejected quote request with invalid symbol");
        return generic_error(StatusCode::BAD_REQUEST);
    }

    let url = state.client.data_url(
        &["stocks", symbol.as_str(), "quotes", "latest"],
        &[("feed", "iex")],
    );
    forward_get(&state, "quote", url).await
}

/// POST /api/orders → POST {trading}/v2/orders, JSON body forwarded verbatim.
///
/// Unlike the other operations, upstream rejections are forwarded with
/// their original body: order validation errors carry field-level detail
/// the frontend surfaces to the user.
pub async fn submit_order(State(state): State<AppState>, Json(order): Json<Value>) -> Response {
    let start = Instant::now();
    let url = match state.client.trading_url(&["orders"], &[]) {
        Ok(url) => url,
        Err(e) => return transport_failure("POST", "orders", &e, start),
    };

    match state.client.post_json(url, &order).await {
        Ok(upstream) => {
            let status = upstream.status();
            match upstream.json::<Value>().await {
                Ok(body) if status.is_success() => {
                    metrics::record_request("POST", "orders", 200, start);
                    passthrough(StatusCode::OK, body)
                }
                Ok(body) => {
                    tracing::warn!(status = %status, "Upstream rejected order submission");
                    metrics::record_request("POST", "orders", status.as_u16(), start);
                    passthrough(status, body)
                }
                Err(e) => transport_failure("POST", "orders", &e, start),
            }
        }
        Err(e) => transport_failure("POST", "orders", &e, start),
    }
}

/// DELETE /api/orders/{order_id} → DELETE {trading}/v2/orders/{order_id}
///
/// Success is always 204 with no body, regardless of what the upstream
/// returned alongside the cancellation.
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Response {
    let start = Instant::now();
    if !valid_order_id(&order_id) {
        tracing::warn!(order_id = %order_id, "Rejected cancel request with invalid order id");
        return generic_error(StatusCode::BAD_REQUEST);
    }

    let url = match state.client.trading_url(&["orders", order_id.as_str()], &[]) {
        Ok(url) => url,
        Err(e) => return transport_failure("DELETE", "cancel", &e, start),
    };

    match state.client.delete(url).await {
        Ok(upstream) => {
            let status = upstream.status();
            if status.is_success() {
                metrics::record_request("DELETE", "cancel", 204, start);
                StatusCode::NO_CONTENT.into_response()
            } else {
                tracing::warn!(status = %status, "Upstream rejected cancellation");
                metrics::record_request("DELETE", "cancel", status.as_u16(), start);
                generic_error(status)
            }
        }
        Err(e) => transport_failure("DELETE", "cancel", &e, start),
    }
}

/// Shared GET pass-through: 2xx bodies flow back verbatim, rejections
/// keep the upstream status with the generic body.
async fn forward_get(
    state: &AppState,
    route: &'static str,
    url: Result<Url, UpstreamError>,
) -> Response {
    let start = Instant::now();
    let url = match url {
        Ok(url) => url,
        Err(e) => return transport_failure("GET", route, &e, start),
    };

    match state.client.get(url).await {
        Ok(upstream) => {
            let status = upstream.status();
            if status.is_success() {
                match upstream.json::<Value>().await {
                    Ok(body) => {
                        metrics::record_request("GET", route, 200, start);
                        passthrough(StatusCode::OK, body)
                    }
                    Err(e) => transport_failure("GET", route, &e, start),
                }
            } else {
                tracing::warn!(route, status = %status, "Upstream rejected request");
                metrics::record_request("GET", route, status.as_u16(), start);
                generic_error(status)
            }
        }
        Err(e) => transport_failure("GET", route, &e, start),
    }
}

fn transport_failure(
    method: &'static str,
    route: &'static str,
    error: &dyn std::fmt::Display,
    start: Instant,
) -> Response {
    tracing::error!(route, method, error = %error, "Upstream call failed");
    metrics::record_request(method, route, 500, start);
    generic_error(StatusCode::INTERNAL_SERVER_ERROR)
}

// Conservative charsets for values that become upstream path segments.

fn valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= 16
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

fn valid_order_id(order_id: &str) -> bool {
    !order_id.is_empty()
        && order_id.len() <= 64
        && order_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_allow_exchange_suffixes() {
        assert!(valid_symbol("AAPL"));
        assert!(valid_symbol("BRK.B"));
        assert!(valid_symbol("BF-B"));
    }

    #[test]
    fn symbols_reject_path_and_query_metacharacters() {
        assert!(!valid_symbol(""));
        assert!(!valid_symbol("AAPL/../account"));
        assert!(!valid_symbol("AAPL?feed=sip"));
        assert!(!valid_symbol("A".repeat(17).as_str()));
    }

    #[test]
    fn order_ids_accept_uuids_only_shape() {
        assert!(valid_order_id("61e69015-8549-4bfd-b9c3-01e75843f47d"));
        assert!(!valid_order_id("../../positions"));
        assert!(!valid_order_id(""));
    }
}
