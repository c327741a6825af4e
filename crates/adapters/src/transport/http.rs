// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production transport over a shared ureq agent

use super::Transport;
use base64::Engine as _;
use jb_core::{CiError, HttpMethod, HttpRequest, HttpResponse, ServerConfig};
use std::time::Duration;
use ureq::Agent;

/// Blocking HTTP transport.
///
/// Cloning is cheap and clones share the agent's connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    agent: Agent,
    authorization: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ServerConfig) -> Self {
        let mut transport = Self::with_timeout(config.timeout);
        if let Some(user) = &config.username {
            transport.authorization = Some(basic_auth(user, config.token.as_deref().unwrap_or("")));
        }
        transport
    }

    /// Anonymous transport with a global per-request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
            authorization: None,
        }
    }

    fn call(&self, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let headers = request
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(self.authorization.as_deref().map(|v| ("Authorization", v)));

        match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(request.url.as_str());
                for (name, value) in headers {
                    builder = builder.header(name, value);
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(request.url.as_str());
                for (name, value) in headers {
                    builder = builder.header(name, value);
                }
                match &request.body {
                    Some(body) => builder
                        .header("Content-Type", body.content_type.as_str())
                        .send(&body.bytes[..]),
                    None => builder.send_empty(),
                }
            }
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, CiError> {
        let mut response = self
            .call(request)
            .map_err(|e| CiError::ServerConnectionFailed(format!("{} {}: {}", request.method, request.url, e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| CiError::ServerConnectionFailed(format!("reading {}: {}", request.url, e)))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// `Authorization` header value for HTTP basic auth
pub(crate) fn basic_auth(user: &str, token: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, token));
    format!("Basic {}", encoded)
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
