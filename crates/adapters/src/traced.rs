// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced transport wrapper for consistent observability

use crate::transport::Transport;
use jb_core::{CiError, HttpRequest, HttpResponse};

/// Wrapper that adds tracing to any Transport
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for TracedTransport<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CiError> {
        let span = tracing::info_span!("http", method = %request.method, url = %request.url);
        let _guard = span.enter();

        tracing::debug!(
            body_len = request.body.as_ref().map(|b| b.bytes.len()),
            "sending"
        );

        let start = std::time::Instant::now();
        let result = self.inner.execute(request);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) if response.is_success() => {
                tracing::debug!(status = response.status, elapsed_ms, "response")
            }
            Ok(response) => tracing::info!(status = response.status, elapsed_ms, "error status"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "request failed"),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
