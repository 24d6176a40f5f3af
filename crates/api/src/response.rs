//! Response helpers for read endpoints backed by the resilient data layer.

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use dapparchive_db::Fetched;
use serde::Serialize;

/// Response header set when a read was served from fallback data.
///
/// Payloads are shaped identically either way; this header is the only
/// externally visible marker of a degraded read.
pub const DEGRADED_HEADER: &str = "x-data-degraded";

/// JSON response for a [`Fetched`] value, tagging degraded reads.
pub struct FetchedJson<T: Serialize>(pub Fetched<T>);

impl<T: Serialize> IntoResponse for FetchedJson<T> {
    fn into_response(self) -> Response {
        let degraded = self.0.degraded;
        let mut response = axum::Json(self.0.value).into_response();
        if degraded {
            response
                .headers_mut()
                .insert(DEGRADED_HEADER, HeaderValue::from_static("true"));
        }
        response
    }
}
