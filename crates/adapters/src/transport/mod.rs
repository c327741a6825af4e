// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport adapters: one blocking HTTP round trip per call

mod http;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use http::HttpTransport;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;

use jb_core::{CiError, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Issues prepared requests against the CI server.
///
/// Implementations must be safe to share between concurrent runs. Network
/// failures, including timeouts, surface as `ServerConnectionFailed`; any
/// HTTP status, 4xx and 5xx included, is a successful round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CiError> {
        (**self).execute(request)
    }
}
