// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod discover;
pub mod execute;
pub mod jobs;
pub mod submit;
pub mod test_list;

use anyhow::Result;

/// Run blocking CI calls off the async runtime
pub async fn blocking<R, F>(f: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce() -> Result<R> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
