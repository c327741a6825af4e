// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jb jobs` - List the jobs tests can be discovered on

use super::blocking;
use crate::client::Client;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use jb_engine::list_projects;

pub async fn handle(client: Client, format: OutputFormat) -> Result<()> {
    let projects = blocking(move || Ok(list_projects(&client.transport, &client.factory)?)).await?;
    if projects.is_empty() && matches!(format, OutputFormat::Text) {
        println!("No buildable jobs");
        return Ok(());
    }
    output::print_list(&projects, format)
}
