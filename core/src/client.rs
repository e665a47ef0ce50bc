//! Entry point for requests that must reach the real network.
//!
//! # Design
//! `BypassClient` owns its transport and carries no other state, so
//! concurrent calls are fully independent. Each call runs the same linear
//! pipeline: adapt a captured request (descriptor input only), add the bypass
//! marker, send once, resolve the body.
//!
//! `fetch_bypassing` uses a process-wide client whose transport is chosen the
//! first time it is needed and kept for the life of the process.

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::adapter::to_request_options;
use crate::augment::augment_request_options;
use crate::config::TransportConfig;
use crate::error::BypassError;
use crate::http::{FetchInput, RequestOptions};
use crate::resolve::resolve_pending;
use crate::transport::{Platform, SelectedTransport, Transport};

/// Issues unmocked requests through an injected transport.
#[derive(Debug, Clone)]
pub struct BypassClient<T> {
    transport: T,
}

impl<T: Transport> BypassClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform a request that an interception layer must let through.
    ///
    /// With a URL string, `options` (empty when `None`) are sent as given
    /// plus the bypass marker. With a captured request, `options` are
    /// ignored and the request itself is adapted.
    ///
    /// The body is decoded into `R` according to the response content type;
    /// see `resolve_response`.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        input: impl Into<FetchInput>,
        options: Option<RequestOptions>,
    ) -> Result<R, BypassError> {
        let (url, outgoing) = prepare(input.into(), options)?;
        debug!(method = %outgoing.method, %url, "sending bypass request");
        resolve_pending(self.transport.send(&url, outgoing)).await
    }
}

impl BypassClient<SelectedTransport> {
    /// The process-wide client. Its transport is selected on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<BypassClient<SelectedTransport>> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let platform = Platform::detect();
            debug!(?platform, "selected bypass transport");
            BypassClient::new(SelectedTransport::for_platform(
                platform,
                &TransportConfig::default(),
            ))
        })
    }
}

/// Turn either call shape into the URL and options handed to the transport.
pub fn prepare(
    input: FetchInput,
    options: Option<RequestOptions>,
) -> Result<(String, RequestOptions), BypassError> {
    match input {
        FetchInput::Url(url) => {
            let options = options.unwrap_or_default();
            Ok((url, augment_request_options(&options)))
        }
        FetchInput::Descriptor(descriptor) => {
            let adapted = to_request_options(&descriptor)?;
            Ok((descriptor.url.to_string(), augment_request_options(&adapted)))
        }
    }
}

/// Perform a request through the process-wide client.
///
/// See `BypassClient::fetch`.
pub async fn fetch_bypassing<R: DeserializeOwned>(
    input: impl Into<FetchInput>,
    options: Option<RequestOptions>,
) -> Result<R, BypassError> {
    BypassClient::<SelectedTransport>::global().fetch(input, options).await
}
