// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jb submit <job>` - Trigger a test run without waiting for it

use super::blocking;
use super::execute::SuiteArgs;
use crate::client::Client;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use jb_engine::{Submission, SubmissionReceipt};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Do not ask the server for a CSRF crumb first
    #[arg(long)]
    pub no_crumb: bool,
}

#[derive(Serialize)]
#[serde(transparent)]
struct Submitted(SubmissionReceipt);

impl fmt::Display for Submitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submitted {} (external id {})", self.0.project, self.0.external_job_id)?;
        match self.0.queue_item_id {
            Some(id) => writeln!(f, ", queue item {}", id),
            None => writeln!(f),
        }
    }
}

pub async fn handle(client: Client, args: SubmitArgs, format: OutputFormat) -> Result<()> {
    let descriptor = args.suite.descriptor()?;
    let receipt = blocking(move || {
        let mut submission = Submission::new(client.transport.clone(), client.factory.clone());
        if args.no_crumb {
            submission = submission.without_crumb();
        }
        submission
            .submit(&descriptor)
            .with_context(|| format!("submitting tests to {}", descriptor.project()))
    })
    .await?;
    output::print(&Submitted(receipt), format)
}
