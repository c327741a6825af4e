// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget execution trigger
//!
//! One crumb lookup, one POST. The triggered build is not watched; a caller
//! that wants outcomes runs a [`BuildProcessor`](crate::BuildProcessor).

use crate::oneshot::fetch_crumb;
use jb_adapters::Transport;
use jb_core::jenkins::parse_queue_location;
use jb_core::{CiError, ExternalJobId, ProjectRef, RequestFactory, RunDescriptor};
use serde::Serialize;

/// Acknowledgement of an accepted trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub project: ProjectRef,
    pub external_job_id: ExternalJobId,
    /// Queue item created by the server, when it said so
    pub queue_item_id: Option<u64>,
}

pub struct Submission<T> {
    transport: T,
    factory: RequestFactory,
    crumb_lookup: bool,
}

impl<T: Transport> Submission<T> {
    pub fn new(transport: T, factory: RequestFactory) -> Self {
        Self {
            transport,
            factory,
            crumb_lookup: true,
        }
    }

    /// Skip the crumb request, for servers known to run without CSRF protection
    pub fn without_crumb(mut self) -> Self {
        self.crumb_lookup = false;
        self
    }

    /// Trigger the execution of `descriptor`
    pub fn submit(&self, descriptor: &RunDescriptor) -> Result<SubmissionReceipt, CiError> {
        let external_job_id = ExternalJobId::generate();
        let span = tracing::info_span!(
            "submit",
            project = %descriptor.project(),
            external_id = %external_job_id,
            tests = descriptor.tests().len(),
        );
        let _guard = span.enter();

        let crumb = if self.crumb_lookup {
            fetch_crumb(&self.transport, &self.factory)?
        } else {
            None
        };
        let request = self
            .factory
            .trigger_execution(descriptor, &external_job_id)?
            .with_crumb(crumb.as_ref());
        let response = self.transport.execute(&request)?;

        if response.status >= 500 {
            tracing::error!(status = response.status, body = %response.body, "server failed to accept the build");
        }
        let response = response.ensure_success(&request.url)?;

        let queue_item_id = response
            .header("location")
            .and_then(|location| match parse_queue_location(location) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(location, error = %e, "unrecognised queue location");
                    None
                }
            });
        tracing::info!(queue_item = ?queue_item_id, "build submitted");

        Ok(SubmissionReceipt {
            project: descriptor.project().clone(),
            external_job_id,
            queue_item_id,
        })
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
