//! Materializes a response body as JSON or text, based on its content type.
//!
//! # Design
//! The check is a case-insensitive substring match on `json`, so any media
//! type mentioning it (`application/json`, `application/problem+json`,
//! `application/json-seq`) takes the JSON path. Everything else, including a
//! missing content type, is read as text.
//!
//! The caller picks the result type. Nothing beyond what serde needs to build
//! that type is checked: use `serde_json::Value` to accept any body. On the
//! text path the body is offered to `T` as a JSON string, so `String` and
//! `Value` both work there.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

use crate::error::BypassError;
use crate::http::HttpResponse;

pub fn is_json_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}

/// Decode a completed response into `T`.
///
/// A JSON content type with an unparsable body is a `Decode` error; there
/// is no fallback to text.
pub fn resolve_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, BypassError> {
    let is_json = response
        .content_type()
        .is_some_and(|content_type| is_json_content_type(&content_type));
    let status = response.status.as_u16();
    if is_json {
        trace!(status, "resolving body as json");
        return response.json();
    }

    trace!(status, "resolving body as text");
    serde_json::from_value(Value::String(response.text())).map_err(BypassError::Decode)
}

/// Await a pending response and decode it into `T`.
pub async fn resolve_pending<T, F>(pending: F) -> Result<T, BypassError>
where
    T: DeserializeOwned,
    F: Future<Output = Result<HttpResponse, BypassError>>,
{
    let response = pending.await?;
    resolve_response(response)
}

#[cfg(test)]
mod tests {
    use http::header::CONTENT_TYPE;
    use http::{HeaderMap, HeaderValue, StatusCode};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn response(content_type: Option<&str>, body: &str) -> HttpResponse {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        }
        HttpResponse {
            status: StatusCode::OK,
            headers,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn json_content_type_is_parsed() {
        let value: Value =
            resolve_response(response(Some("application/json; charset=utf-8"), r#"{"ok":true}"#))
                .unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[test]
    fn json_match_ignores_case_and_suffixes() {
        assert!(is_json_content_type("Application/JSON"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(is_json_content_type("application/json-seq"));
        assert!(!is_json_content_type("text/plain"));
    }

    #[test]
    fn text_content_type_is_read_as_text() {
        let value: String = resolve_response(response(Some("text/plain"), "hello")).unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn missing_content_type_is_read_as_text() {
        let value: Value = resolve_response(response(None, r#"{"ok":true}"#)).unwrap();
        assert_eq!(value, Value::String(r#"{"ok":true}"#.to_string()));
    }

    #[test]
    fn non_ascii_json_content_type_takes_json_path() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_bytes(b"application/json; title=caf\xe9").unwrap(),
        );
        let response = HttpResponse {
            status: StatusCode::OK,
            headers,
            body: br#"{"ok":true}"#.to_vec(),
        };
        let value: Value = resolve_response(response).unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }

    #[test]
    fn invalid_json_does_not_fall_back_to_text() {
        let err = resolve_response::<Value>(response(Some("application/json"), "hello"))
            .unwrap_err();
        assert!(matches!(err, BypassError::Decode(_)));
    }

    #[test]
    fn typed_json_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Status {
            ok: bool,
        }
        let status: Status =
            resolve_response(response(Some("application/json"), r#"{"ok":false}"#)).unwrap();
        assert_eq!(status, Status { ok: false });
    }

    #[test]
    fn declared_type_mismatch_is_a_decode_error() {
        let err = resolve_response::<u32>(response(Some("text/plain"), "hello")).unwrap_err();
        assert!(matches!(err, BypassError::Decode(_)));
    }

    #[tokio::test]
    async fn pending_transport_error_propagates() {
        let pending = async {
            Err::<HttpResponse, _>(BypassError::Transport("connection refused".to_string()))
        };
        let err = resolve_pending::<Value, _>(pending).await.unwrap_err();
        assert!(matches!(err, BypassError::Transport(_)));
    }

    #[tokio::test]
    async fn pending_response_is_resolved() {
        let pending = async { Ok(response(Some("text/plain"), "hello")) };
        let value: String = resolve_pending(pending).await.unwrap();
        assert_eq!(value, "hello");
    }
}
