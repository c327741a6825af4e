// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::Transport;
use jb_core::{CiError, HttpRequest, HttpResponse};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    script: VecDeque<Result<HttpResponse, CiError>>,
    requests: Vec<HttpRequest>,
}

/// Transport answering from a script, in order, and recording every request.
///
/// Running out of script is reported as a connection failure so a test
/// sees exactly which request was not expected.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn respond(&self, response: HttpResponse) -> &Self {
        self.lock().script.push_back(Ok(response));
        self
    }

    /// Queue a 200 with a JSON body
    pub fn respond_json(&self, body: &str) -> &Self {
        self.respond(HttpResponse::new(200, body))
    }

    /// Queue a failure
    pub fn fail(&self, error: CiError) -> &Self {
        self.lock().script.push_back(Err(error));
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Scripted responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for FakeTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CiError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        state.script.pop_front().unwrap_or_else(|| {
            Err(CiError::ServerConnectionFailed(format!(
                "fake transport has no response for {} {}",
                request.method, request.url
            )))
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
