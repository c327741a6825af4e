// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jb tests <job> <build>` - Read the test list of a finished listing build

use super::blocking;
use crate::client::Client;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use jb_core::ProjectRef;
use jb_engine::fetch_test_list;

#[derive(Args)]
pub struct TestListArgs {
    /// Job name
    pub job: String,
    /// Number of a build that already produced its test list
    pub build: u64,
}

pub async fn handle(client: Client, args: TestListArgs, format: OutputFormat) -> Result<()> {
    let project = ProjectRef::from(args.job);
    let tests = blocking(move || {
        fetch_test_list(&client.transport, &client.factory, &project, args.build)
            .with_context(|| format!("reading tests of {} #{}", project, args.build))
    })
    .await?;
    output::print_list(&tests, format)
}
