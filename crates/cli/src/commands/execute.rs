// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jb execute <job>` - Run tests in one build and wait for their outcomes

use super::blocking;
use crate::client::Client;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use jb_core::{ProjectRef, RunDescriptor, TestExecution, TestStatus};
use jb_engine::{fetch_crumb, BuildProcessor, ExecutionResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Which tests to run, and where
#[derive(Args, Debug, Default)]
pub struct SuiteArgs {
    /// Job name
    pub job: String,

    /// Build node to run on
    #[arg(long)]
    pub node: Option<String>,

    /// Suite file (`{"test":[{"script":..,"param":{..}}]}`) to run
    #[arg(long)]
    pub suite: Option<PathBuf>,

    /// Test reference to run; repeatable
    #[arg(short = 't', long = "test")]
    pub tests: Vec<String>,

    /// Parameter (key=value) for every `--test`
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,
}

impl SuiteArgs {
    pub fn descriptor(&self) -> Result<RunDescriptor> {
        let mut tests = match &self.suite {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading suite file {}", path.display()))?;
                RunDescriptor::parse_suite_json(&bytes)
                    .with_context(|| format!("parsing suite file {}", path.display()))?
            }
            None => Vec::new(),
        };
        let params: BTreeMap<String, String> = self.params.iter().cloned().collect();
        tests.extend(
            self.tests
                .iter()
                .map(|reference| TestExecution::new(reference.clone(), params.clone())),
        );
        Ok(RunDescriptor::new(
            ProjectRef::from(self.job.as_str()),
            self.node.clone(),
            tests,
        ))
    }
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[derive(Serialize)]
#[serde(transparent)]
struct Executed(ExecutionResult);

impl Executed {
    fn failures(&self) -> usize {
        self.0
            .outcomes
            .iter()
            .filter(|o| o.status == TestStatus::Failed)
            .count()
    }
}

impl fmt::Display for Executed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} #{}", self.0.project, self.0.build_id)?;
        for outcome in &self.0.outcomes {
            let status = match outcome.status {
                TestStatus::Passed => "PASSED",
                TestStatus::Failed => "FAILED",
                TestStatus::Skipped => "SKIPPED",
            };
            writeln!(f, "  {:<8} {}", status, outcome.name)?;
        }
        Ok(())
    }
}

pub async fn handle(client: Client, args: SuiteArgs, format: OutputFormat) -> Result<()> {
    let descriptor = args.descriptor()?;
    let result = blocking(move || {
        let crumb = fetch_crumb(&client.transport, &client.factory)?;
        let project = descriptor.project().clone();
        let mut processor =
            BuildProcessor::execution(client.transport.clone(), client.factory.clone(), descriptor)
                .with_crumb(crumb)
                .with_poll_policy(client.policy);
        processor
            .run()
            .with_context(|| format!("executing tests on {}", project))?;
        Ok(processor.result()?)
    })
    .await?;

    let executed = Executed(result);
    output::print(&executed, format)?;
    match executed.failures() {
        0 => Ok(()),
        n => anyhow::bail!("{} of {} tests failed", n, executed.0.outcomes.len()),
    }
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
