//! Transports that perform the real network call.
//!
//! # Design
//! `Transport` is the seam between request preparation and I/O. Two
//! implementations exist:
//! - `UreqTransport` runs each request on a `ureq` agent in its own worker
//!   thread and hands the result back over a oneshot channel, so the future
//!   works under any executor. It serves ordinary server processes.
//! - `HostTransport` hands requests to a fetch function provided by the
//!   embedding host, the way code in a browser uses its global `fetch`.
//!
//! `SelectedTransport` picks one of them from the detected `Platform`. The
//! process-wide client in `client` does that exactly once; anything else
//! injects its own transport.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::thread;

use http::{HeaderMap, Method, Uri};
use tokio::sync::oneshot;

use crate::config::TransportConfig;
use crate::error::BypassError;
use crate::http::{HttpResponse, RequestOptions};

/// Performs one network request per call.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<HttpResponse, BypassError>> + Send;
}

// ---------------------------------------------------------------------------
// ureq
// ---------------------------------------------------------------------------

/// Server-side transport backed by a `ureq` agent.
///
/// HTTP error statuses are returned as responses, not errors. Browser-only
/// fetch settings (`mode`, `credentials`, `cache`, ...) have no meaning here
/// and are ignored.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .max_redirects(config.max_redirects)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: config.body_limit,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<HttpResponse, BypassError>> + Send {
        let agent = self.agent.clone();
        let body_limit = self.body_limit;
        let url = url.to_string();
        async move {
            let (tx, rx) = oneshot::channel();
            thread::Builder::new()
                .name("bypass-fetch".to_string())
                .spawn(move || {
                    // The caller may have given up; nobody is left to tell.
                    let _ = tx.send(execute(&agent, &url, options, body_limit));
                })
                .map_err(BypassError::transport)?;
            rx.await.map_err(|_| {
                BypassError::Transport("request worker exited without a response".to_string())
            })?
        }
    }
}

/// Run a request on `agent` and read the whole response.
fn execute(
    agent: &ureq::Agent,
    url: &str,
    options: RequestOptions,
    body_limit: u64,
) -> Result<HttpResponse, BypassError> {
    let uri: Uri = url.parse().map_err(BypassError::transport)?;
    let RequestOptions {
        method,
        headers,
        body,
        ..
    } = options;

    let result = match body {
        None => agent.run(build_request(method, uri, headers, ())),
        Some(body) => agent.run(build_request(method, uri, headers, body.into_bytes())),
    };
    let mut response = result.map_err(BypassError::transport)?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .body_mut()
        .with_config()
        .limit(body_limit)
        .read_to_vec()
        .map_err(BypassError::transport)?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn build_request<B>(method: Method, uri: Uri, headers: HeaderMap, body: B) -> http::Request<B> {
    let mut request = http::Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.headers_mut() = headers;
    request
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

type HostFetch = dyn Fn(&str, RequestOptions) -> Result<HttpResponse, String> + Send + Sync;

/// Transport that delegates to a fetch function supplied by the host.
///
/// The host receives the full `RequestOptions`, fetch settings included, and
/// reports failures as plain messages.
#[derive(Clone)]
pub struct HostTransport {
    fetch: Arc<HostFetch>,
}

impl HostTransport {
    pub fn new<F>(fetch: F) -> Self
    where
        F: Fn(&str, RequestOptions) -> Result<HttpResponse, String> + Send + Sync + 'static,
    {
        Self {
            fetch: Arc::new(fetch),
        }
    }
}

impl fmt::Debug for HostTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostTransport").finish_non_exhaustive()
    }
}

impl Transport for HostTransport {
    fn send(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<HttpResponse, BypassError>> + Send {
        let fetch = Arc::clone(&self.fetch);
        let url = url.to_string();
        async move { fetch(&url, options).map_err(BypassError::Transport) }
    }
}

static HOST_FETCH: OnceLock<HostTransport> = OnceLock::new();

/// Register the host's global fetch function.
///
/// Only the first registration takes effect; later calls return `false`.
pub fn install_host_fetch<F>(fetch: F) -> bool
where
    F: Fn(&str, RequestOptions) -> Result<HttpResponse, String> + Send + Sync + 'static,
{
    HOST_FETCH.set(HostTransport::new(fetch)).is_ok()
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The kind of process the crate runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// A regular OS process with direct network access.
    Server,
    /// An embedded runtime (e.g. a browser) that provides its own fetch.
    Host,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(target_family = "wasm") {
            Platform::Host
        } else {
            Platform::Server
        }
    }
}

/// Transport chosen for a `Platform`.
#[derive(Debug, Clone)]
pub enum SelectedTransport {
    Server(UreqTransport),
    /// Uses whatever `install_host_fetch` registered at call time.
    Host,
}

impl SelectedTransport {
    pub fn for_platform(platform: Platform, config: &TransportConfig) -> Self {
        match platform {
            Platform::Server => SelectedTransport::Server(UreqTransport::new(config)),
            Platform::Host => SelectedTransport::Host,
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            SelectedTransport::Server(_) => Platform::Server,
            SelectedTransport::Host => Platform::Host,
        }
    }
}

impl Transport for SelectedTransport {
    fn send(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> impl Future<Output = Result<HttpResponse, BypassError>> + Send {
        async move {
            match self {
                SelectedTransport::Server(transport) => transport.send(url, options).await,
                SelectedTransport::Host => {
                    let host = HOST_FETCH.get().ok_or_else(|| {
                        BypassError::Transport("no host fetch installed".to_string())
                    })?;
                    host.send(url, options).await
                }
            }
        }
    }
}
