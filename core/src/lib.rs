//! Real network requests from inside a request-interception setup.
//!
//! # Overview
//! Code running under a mocking layer sometimes needs a genuine response
//! (to fetch a fixture, or to wrap the real one). `fetch_bypassing` sends
//! such a request tagged with the `x-msw-bypass: true` header, which an
//! interception layer treats as "forward, do not mock".
//!
//! # Design
//! - Two call shapes: a URL string with options, or a captured
//!   `RequestDescriptor` that is adapted into options first.
//! - Header collections are `http::HeaderMap`; the marker is `insert`ed, so
//!   it always wins over a caller-supplied value.
//! - The response body is decoded as JSON when the content type mentions
//!   `json`, as text otherwise.
//! - I/O sits behind the `Transport` trait. The process-wide client picks
//!   its transport once; `BypassClient` accepts any other.

pub mod adapter;
pub mod augment;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resolve;
pub mod transport;

pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

pub use adapter::{is_bodyless, to_request_options};
pub use augment::{augment_request_options, is_bypassed, BYPASS_HEADER, BYPASS_HEADER_VALUE};
pub use client::{fetch_bypassing, BypassClient};
pub use config::TransportConfig;
pub use error::BypassError;
pub use crate::http::{
    Body, FetchInput, FetchSettings, HttpResponse, RequestBody, RequestDescriptor, RequestOptions,
};
pub use resolve::{is_json_content_type, resolve_pending, resolve_response};
pub use transport::{
    install_host_fetch, HostTransport, Platform, SelectedTransport, Transport, UreqTransport,
};
