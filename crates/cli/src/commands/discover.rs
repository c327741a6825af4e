// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jb discover <job>...` - Run listing builds and print the tests found
//!
//! Each job gets its own build processor on a blocking thread; they share
//! the client's connection pool and one crumb. Every job runs to its end:
//! results of the jobs that succeeded are printed before the failures are
//! reported together.

use super::blocking;
use crate::client::Client;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use jb_core::{Crumb, ProjectRef};
use jb_engine::{fetch_crumb, BuildProcessor, DiscoveryResult};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct DiscoverArgs {
    /// Job names
    #[arg(required = true)]
    pub jobs: Vec<String>,
}

#[derive(Serialize)]
#[serde(transparent)]
struct Discovered(DiscoveryResult);

impl fmt::Display for Discovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} tests)", self.0.project, self.0.tests.len())?;
        for test in &self.0.tests {
            writeln!(f, "  {}", test)?;
        }
        Ok(())
    }
}

pub async fn handle(client: Client, args: DiscoverArgs, format: OutputFormat) -> Result<()> {
    let crumb = {
        let client = client.clone();
        blocking(move || Ok(fetch_crumb(&client.transport, &client.factory)?)).await?
    };

    let runs: Vec<_> = args
        .jobs
        .into_iter()
        .map(|job| {
            let client = client.clone();
            let crumb = crumb.clone();
            let project = ProjectRef::from(job);
            let run = {
                let project = project.clone();
                tokio::task::spawn_blocking(move || discover(&client, project, crumb))
            };
            (project, run)
        })
        .collect();

    let mut results = Vec::with_capacity(runs.len());
    let mut failures = Vec::new();
    for (project, run) in runs {
        match run.await? {
            Ok(result) => results.push(Discovered(result)),
            Err(e) => failures.push((project, e)),
        }
    }

    match format {
        OutputFormat::Text => {
            for result in &results {
                output::print(result, format)?;
            }
        }
        OutputFormat::Json => output::print_list(&results, format)?,
    }

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0).1),
        n => {
            let names: Vec<_> = failures.iter().map(|(p, _)| p.to_string()).collect();
            let details: Vec<_> = failures.iter().map(|(_, e)| format!("{:#}", e)).collect();
            anyhow::bail!(
                "discovery failed for {} jobs ({}):\n  {}",
                n,
                names.join(", "),
                details.join("\n  ")
            )
        }
    }
}

fn discover(client: &Client, project: ProjectRef, crumb: Option<Crumb>) -> Result<DiscoveryResult> {
    let mut processor =
        BuildProcessor::discovery(client.transport.clone(), client.factory.clone(), project.clone())
            .with_crumb(crumb)
            .with_poll_policy(client.policy);
    processor
        .run()
        .with_context(|| format!("discovering tests of {}", project))?;
    Ok(processor.result()?)
}
