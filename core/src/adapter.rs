//! Converts a captured request into transport options.

use http::Method;
use serde_json::Value;

use crate::error::BypassError;
use crate::http::{Body, RequestBody, RequestDescriptor, RequestOptions};

/// Build `RequestOptions` from a captured request.
///
/// `GET` and `HEAD` requests never carry a body, whatever the descriptor
/// holds. For other methods a structured body is encoded as JSON text and a
/// text or binary body is passed through unchanged. The descriptor is left
/// untouched.
pub fn to_request_options(descriptor: &RequestDescriptor) -> Result<RequestOptions, BypassError> {
    let mut options = RequestOptions {
        method: descriptor.method.clone(),
        headers: descriptor.headers.clone(),
        body: None,
        settings: descriptor.settings.clone(),
    };

    if is_bodyless(&descriptor.method) {
        return Ok(options);
    }

    options.body = descriptor.body.as_ref().map(encode_body).transpose()?;
    Ok(options)
}

/// `GET` and `HEAD` never carry a request body.
pub fn is_bodyless(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn encode_body(body: &RequestBody) -> Result<Body, BypassError> {
    match body {
        RequestBody::Text(text) => Ok(Body::Text(text.clone())),
        RequestBody::Binary(bytes) => Ok(Body::Binary(bytes.clone())),
        // A string is not a structured value; it goes out as-is, unquoted.
        RequestBody::Json(Value::String(text)) => Ok(Body::Text(text.clone())),
        RequestBody::Json(value) => serde_json::to_string(value)
            .map(Body::Text)
            .map_err(BypassError::Serialization),
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderName, HeaderValue};
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::http::FetchSettings;

    fn descriptor(method: &str, body: Option<RequestBody>) -> RequestDescriptor {
        let url = Url::parse("https://api.test/data").unwrap();
        let method = Method::from_bytes(method.as_bytes()).unwrap();
        let mut descriptor = RequestDescriptor::new(method, url);
        descriptor.body = body;
        descriptor
    }

    #[test]
    fn get_drops_body() {
        let input = descriptor("GET", Some(RequestBody::Text("ignored".to_string())));
        let options = to_request_options(&input).unwrap();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
    }

    #[test]
    fn only_get_and_head_are_bodyless() {
        assert!(is_bodyless(&Method::GET));
        assert!(is_bodyless(&Method::HEAD));
        assert!(!is_bodyless(&Method::POST));
        assert!(!is_bodyless(&Method::DELETE));
        assert!(!is_bodyless(&Method::from_bytes(b"PROPFIND").unwrap()));
    }

    #[test]
    fn head_drops_structured_body() {
        let input = descriptor("HEAD", Some(RequestBody::Json(json!({ "a": 1 }))));
        let options = to_request_options(&input).unwrap();
        assert!(options.body.is_none());
    }

    #[test]
    fn post_encodes_structured_body() {
        let input = descriptor("POST", Some(RequestBody::Json(json!({ "a": 1 }))));
        let options = to_request_options(&input).unwrap();
        assert_eq!(options.body, Some(Body::Text(r#"{"a":1}"#.to_string())));
    }

    #[test]
    fn structured_null_and_scalars_are_encoded() {
        for (value, expected) in [(json!(null), "null"), (json!(42), "42"), (json!(true), "true")] {
            let input = descriptor("PUT", Some(RequestBody::Json(value)));
            let options = to_request_options(&input).unwrap();
            assert_eq!(options.body, Some(Body::Text(expected.to_string())));
        }
    }

    #[test]
    fn structured_string_is_sent_unquoted() {
        let input = descriptor("POST", Some(RequestBody::Json(json!("raw"))));
        let options = to_request_options(&input).unwrap();
        assert_eq!(options.body, Some(Body::Text("raw".to_string())));
    }

    #[test]
    fn text_and_binary_pass_through() {
        let text = descriptor("PATCH", Some(RequestBody::Text("a=1&b=2".to_string())));
        assert_eq!(
            to_request_options(&text).unwrap().body,
            Some(Body::Text("a=1&b=2".to_string()))
        );

        let binary = descriptor("POST", Some(RequestBody::Binary(vec![0, 159, 146, 150])));
        assert_eq!(
            to_request_options(&binary).unwrap().body,
            Some(Body::Binary(vec![0, 159, 146, 150]))
        );
    }

    #[test]
    fn missing_body_stays_missing() {
        let input = descriptor("DELETE", None);
        assert!(to_request_options(&input).unwrap().body.is_none());
    }

    #[test]
    fn headers_and_settings_are_copied() {
        let mut input = descriptor("POST", None).header(
            HeaderName::from_bytes(b"X-Trace").unwrap(),
            HeaderValue::from_static("abc"),
        );
        input.settings = FetchSettings {
            redirect: Some("manual".to_string()),
            credentials: Some("include".to_string()),
            keepalive: Some(true),
            ..FetchSettings::default()
        };
        let options = to_request_options(&input).unwrap();
        assert_eq!(options.headers["x-trace"], "abc");
        assert_eq!(options.settings, input.settings);
    }

    #[test]
    fn descriptor_is_not_modified() {
        let input = descriptor("GET", Some(RequestBody::Text("kept".to_string())));
        let before = input.clone();
        let _ = to_request_options(&input).unwrap();
        assert_eq!(input, before);
    }
}
