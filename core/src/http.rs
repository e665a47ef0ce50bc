//! HTTP transport types described as plain data.
//!
//! # Design
//! These types carry a request from the caller to a `Transport` and a
//! response back, without any I/O of their own. Methods, header collections
//! and status codes are the `http` crate's, so they cross the `ureq` boundary
//! unchanged. `HeaderMap` gives the precedence rules the bypass marker relies
//! on: names are case-insensitive, `insert` replaces every value under a
//! name, `append` keeps multiple values.

use std::borrow::Cow;

use http::header::{AsHeaderName, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::BypassError;

/// Body of a captured request, before adaptation.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Binary(Vec<u8>),
    /// A structured value. Encoded as JSON text when the request is sent,
    /// except for a bare JSON string, which is sent as-is.
    Json(serde_json::Value),
}

/// Body handed to a transport: always text or bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Text(text) => text.into_bytes(),
            Body::Binary(bytes) => bytes,
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Binary(bytes)
    }
}

/// Fetch settings that travel with a request but are not interpreted here.
///
/// Copied from a captured request into `RequestOptions` unchanged. Browser
/// concepts such as `mode` and `credentials` only matter to a host fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSettings {
    pub redirect: Option<String>,
    pub referrer: Option<String>,
    pub mode: Option<String>,
    pub credentials: Option<String>,
    pub cache: Option<String>,
    pub integrity: Option<String>,
    pub keepalive: Option<bool>,
}

/// Normalized options passed to a transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Body>,
    pub settings: FetchSettings,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set `name` to `value`, replacing any value already under that name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A previously intercepted request, replayed as a real network call.
///
/// Never modified by this crate: adaptation produces a fresh
/// `RequestOptions`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub settings: FetchSettings,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            url,
            method,
            headers: HeaderMap::new(),
            body: None,
            settings: FetchSettings::default(),
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// The two call shapes accepted by the bypass fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchInput {
    /// A URL string, used with caller-supplied options.
    Url(String),
    /// A captured request. Caller-supplied options are ignored.
    Descriptor(RequestDescriptor),
}

impl From<&str> for FetchInput {
    fn from(url: &str) -> Self {
        FetchInput::Url(url.to_string())
    }
}

impl From<String> for FetchInput {
    fn from(url: String) -> Self {
        FetchInput::Url(url)
    }
}

impl From<&Url> for FetchInput {
    fn from(url: &Url) -> Self {
        FetchInput::Url(url.as_str().to_string())
    }
}

impl From<RequestDescriptor> for FetchInput {
    fn from(descriptor: RequestDescriptor) -> Self {
        FetchInput::Descriptor(descriptor)
    }
}

impl From<&RequestDescriptor> for FetchInput {
    fn from(descriptor: &RequestDescriptor) -> Self {
        FetchInput::Descriptor(descriptor.clone())
    }
}

/// A completed HTTP response described as plain data.
///
/// `text` and `json` consume the response, so the body is materialized at
/// most once.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value under `name`. Bytes outside visible ASCII are decoded
    /// lossily rather than hidden.
    pub fn header(&self, name: impl AsHeaderName) -> Option<Cow<'_, str>> {
        self.headers
            .get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
    }

    pub fn content_type(&self) -> Option<Cow<'_, str>> {
        self.header(CONTENT_TYPE)
    }

    /// Body as text. Invalid UTF-8 sequences become U+FFFD.
    pub fn text(self) -> String {
        match String::from_utf8(self.body) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    /// Body parsed as JSON into `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, BypassError> {
        serde_json::from_slice(&self.body).map_err(BypassError::Decode)
    }
}
