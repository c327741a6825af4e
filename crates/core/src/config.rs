// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CI server configuration
//!
//! Loaded from a TOML file, then overridden by environment variables:
//!
//! ```toml
//! url = "https://ci.example.com/"
//! username = "bot"
//! token = "..."
//! timeout = "30s"
//! poll_interval = "2s"
//! max_polls = 300
//! ```

use crate::error::CiError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const ENV_URL: &str = "JB_URL";
pub const ENV_USER: &str = "JB_USER";
pub const ENV_TOKEN: &str = "JB_TOKEN";

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_max_polls() -> u32 {
    300
}

/// How a staged run waits for the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two polls of the same step
    pub interval: Duration,
    /// Attempts per step before giving up
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            max_polls: default_max_polls(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout, applied by the transport
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            token: None,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            max_polls: default_max_polls(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml(content: &str) -> Result<Self, CiError> {
        toml::from_str(content).map_err(|e| CiError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CiError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Apply `JB_URL`, `JB_USER` and `JB_TOKEN` from the given lookup
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_URL) {
            self.url = url;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.username = Some(user);
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        self
    }

    pub fn validate(self) -> Result<Self, CiError> {
        if self.url.trim().is_empty() {
            return Err(CiError::InvalidConfig(format!(
                "no server url (set `url` or {})",
                ENV_URL
            )));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(CiError::InvalidConfig(format!(
                "server url `{}` must start with http:// or https://",
                self.url
            )));
        }
        if self.max_polls == 0 {
            return Err(CiError::InvalidConfig("max_polls must be at least 1".into()));
        }
        if self.token.is_some() && self.username.is_none() {
            return Err(CiError::InvalidConfig(
                "a token needs a username".into(),
            ));
        }
        Ok(self)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_polls: self.max_polls,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
