//! Tags outgoing requests so an interception layer forwards them untouched.

use http::{HeaderMap, HeaderValue};

use crate::http::RequestOptions;

/// Header that marks a request as pass-through for an interception layer.
pub const BYPASS_HEADER: &str = "x-msw-bypass";

/// Value carried by `BYPASS_HEADER`.
pub const BYPASS_HEADER_VALUE: &str = "true";

/// Return a copy of `options` carrying the bypass marker.
///
/// Every caller-supplied value under the same name, in any casing, is
/// replaced.
pub fn augment_request_options(options: &RequestOptions) -> RequestOptions {
    let mut augmented = options.clone();
    augmented
        .headers
        .insert(BYPASS_HEADER, HeaderValue::from_static(BYPASS_HEADER_VALUE));
    augmented
}

/// Whether `headers` carry the bypass marker.
pub fn is_bypassed(headers: &HeaderMap) -> bool {
    headers
        .get(BYPASS_HEADER)
        .is_some_and(|value| value == BYPASS_HEADER_VALUE)
}
