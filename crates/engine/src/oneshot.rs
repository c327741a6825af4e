// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-request operations that need no staged run

use jb_adapters::Transport;
use jb_core::jenkins::{parse_crumb, parse_job_listing, parse_test_names};
use jb_core::{CiError, Crumb, ProjectRef, RequestFactory};

/// CSRF crumb of the server, `None` when CSRF protection is off.
///
/// A 404 is the server saying it issues no crumbs. Any other failure
/// status means the server cannot be used.
pub fn fetch_crumb(
    transport: &impl Transport,
    factory: &RequestFactory,
) -> Result<Option<Crumb>, CiError> {
    let request = factory.crumb();
    let response = transport.execute(&request)?;
    match response.status {
        404 => {
            tracing::debug!("no crumb issuer, CSRF protection disabled");
            Ok(None)
        }
        _ if response.is_success() => parse_crumb(&response.body).map(Some),
        status => Err(CiError::ServerConnectionFailed(format!(
            "crumb request to {} answered HTTP {}",
            request.url, status
        ))),
    }
}

/// Jobs that can be built, in server order
pub fn list_projects(
    transport: &impl Transport,
    factory: &RequestFactory,
) -> Result<Vec<ProjectRef>, CiError> {
    let request = factory.job_listing();
    let response = transport.execute(&request)?.ensure_success(&request.url)?;
    parse_job_listing(&response.body)
}

/// Test list already produced by a finished listing build.
///
/// Reads the same artifact as the last step of a discovery run, for callers
/// that already know the build number.
pub fn fetch_test_list(
    transport: &impl Transport,
    factory: &RequestFactory,
    project: &ProjectRef,
    build: u64,
) -> Result<Vec<String>, CiError> {
    let request = factory.test_list(project, build);
    let response = transport.execute(&request)?.ensure_success(&request.url)?;
    parse_test_names(&response.body)
}

#[cfg(test)]
#[path = "oneshot_tests.rs"]
mod tests;
