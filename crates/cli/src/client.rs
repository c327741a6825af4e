// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection settings and the shared transport

use anyhow::Result;
use jb_adapters::{HttpTransport, TracedTransport};
use jb_core::{PollPolicy, RequestFactory, ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file read from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "jb.toml";

/// Connection flags given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub url: Option<String>,
    pub user: Option<String>,
}

/// Resolve the server config: file, then environment, then flags
pub fn load_config(
    overrides: &Overrides,
    cwd: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ServerConfig> {
    let config = match &overrides.config {
        Some(path) => ServerConfig::load(path)?,
        None => {
            let default = cwd.join(DEFAULT_CONFIG_FILE);
            if default.exists() {
                ServerConfig::load(&default)?
            } else {
                ServerConfig::default()
            }
        }
    };
    let mut config = config.with_env(env);
    if let Some(url) = &overrides.url {
        config.url = url.clone();
    }
    if let Some(user) = &overrides.user {
        config.username = Some(user.clone());
    }
    Ok(config.validate()?)
}

/// Everything a command needs to talk to one server.
///
/// Cloning shares the transport and its connection pool.
#[derive(Clone)]
pub struct Client {
    pub transport: Arc<TracedTransport<HttpTransport>>,
    pub factory: RequestFactory,
    pub policy: PollPolicy,
}

impl Client {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(TracedTransport::new(HttpTransport::new(config))),
            factory: RequestFactory::new(&config.url)?,
            policy: config.poll_policy(),
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
