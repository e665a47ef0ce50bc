//! Test server standing in for the real network and for an upstream
//! interception layer.
//!
//! `/echo` reflects the request back as JSON. `/text`, `/bare`,
//! `/broken-json` and `/large` return fixed bodies under different content
//! types. `/intercepted` answers the way a mocking layer would: mocked
//! unless the request carries the bypass marker.

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use bypass_fetch::is_bypassed;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

/// Size of the `/large` body, past ureq's default read limit.
pub const LARGE_BODY_LEN: usize = 11 * 1024 * 1024;

/// What `/echo` saw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/text", get(text))
        .route("/bare", get(bare))
        .route("/broken-json", get(broken_json))
        .route("/large", get(large))
        .route("/intercepted", get(intercepted))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Echo> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.clone());
    }
    debug!(%method, body_len = body.len(), "echo");
    Json(Echo {
        method: method.to_string(),
        headers: collected,
        body,
    })
}

async fn text() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "hello")
}

async fn bare() -> Response {
    Response::new(Body::from("plain body"))
}

async fn broken_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "not json")
}

async fn large() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], "a".repeat(LARGE_BODY_LEN))
}

async fn intercepted(headers: HeaderMap) -> Json<Value> {
    if is_bypassed(&headers) {
        debug!("bypass marker present, forwarding");
        Json(json!({ "source": "network" }))
    } else {
        Json(json!({ "source": "mock" }))
    }
}
