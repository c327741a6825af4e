// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote value types and their JSON translation
//!
//! Only the fields needed to drive a run are mirrored. Unknown fields are
//! ignored; missing required fields are an `UnreadableResponse`.

use crate::descriptor::ProjectRef;
use crate::error::CiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A job as listed by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteJob {
    pub name: String,
    /// Ball color; `disabled*` marks jobs that cannot be built. Folders and
    /// other non-buildable items carry none.
    #[serde(default)]
    pub color: Option<String>,
}

impl RemoteJob {
    pub fn is_buildable(&self) -> bool {
        self.color
            .as_deref()
            .is_some_and(|c| !c.starts_with("disabled"))
    }
}

#[derive(Debug, Deserialize)]
struct JobListing {
    jobs: Vec<RemoteJob>,
}

/// Build assigned to a queue item once it leaves the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Executable {
    pub number: u64,
}

/// A pending build request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteQueueItem {
    pub id: u64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub executable: Option<Executable>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    name: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawAction {
    #[serde(default)]
    parameters: Vec<RawParameter>,
}

#[derive(Debug, Deserialize)]
struct RawBuild {
    number: u64,
    building: bool,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    actions: Vec<Option<RawAction>>,
}

/// One build of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBuild {
    pub number: u64,
    pub building: bool,
    pub result: Option<String>,
    /// Build parameters, flattened from the parameter actions
    pub parameters: BTreeMap<String, String>,
}

impl RemoteBuild {
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

impl From<RawBuild> for RemoteBuild {
    fn from(raw: RawBuild) -> Self {
        let parameters = raw
            .actions
            .into_iter()
            .flatten()
            .flat_map(|action| action.parameters)
            .map(|p| {
                let value = match p.value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (p.name, value)
            })
            .collect();
        RemoteBuild {
            number: raw.number,
            building: raw.building,
            result: raw.result,
            parameters,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildListing {
    builds: Vec<RawBuild>,
}

/// Node of the test tree artifact produced by a listing build
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTestListing {
    pub name: String,
    /// `None` for a test, `Some` for a suite
    #[serde(default)]
    pub contents: Option<Vec<RemoteTestListing>>,
}

impl RemoteTestListing {
    /// Dotted identifiers of every test below this (root) node
    pub fn test_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for child in self.contents.iter().flatten() {
            child.collect_names("", &mut names);
        }
        names
    }

    fn collect_names(&self, prefix: &str, out: &mut Vec<String>) {
        let path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", prefix, self.name)
        };
        match &self.contents {
            None => out.push(path),
            Some(children) => {
                for child in children {
                    child.collect_names(&path, out);
                }
            }
        }
    }
}

/// Outcome of one executed test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    fn from_remote(status: &str) -> Option<Self> {
        match status {
            "PASSED" | "FIXED" => Some(TestStatus::Passed),
            "FAILED" | "REGRESSION" => Some(TestStatus::Failed),
            "SKIPPED" => Some(TestStatus::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub name: String,
    pub status: TestStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCase {
    #[serde(default)]
    class_name: String,
    name: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct RawSuite {
    #[serde(default)]
    cases: Vec<RawCase>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    suites: Vec<RawSuite>,
}

/// CSRF token to attach to mutating requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Crumb {
    #[serde(rename = "crumbRequestField")]
    pub field: String,
    #[serde(rename = "crumb")]
    pub value: String,
}

fn parse<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, CiError> {
    serde_json::from_str(body).map_err(|e| CiError::unreadable(what, e))
}

/// Buildable projects of a job listing; disabled jobs and colorless items
/// are dropped here
pub fn parse_job_listing(body: &str) -> Result<Vec<ProjectRef>, CiError> {
    let listing: JobListing = parse("job listing", body)?;
    Ok(listing
        .jobs
        .into_iter()
        .filter(RemoteJob::is_buildable)
        .map(|job| ProjectRef(job.name))
        .collect())
}

pub fn parse_queue_item(body: &str) -> Result<RemoteQueueItem, CiError> {
    parse("queue item", body)
}

pub fn parse_build(body: &str) -> Result<RemoteBuild, CiError> {
    parse::<RawBuild>("build", body).map(RemoteBuild::from)
}

pub fn parse_build_listing(body: &str) -> Result<Vec<RemoteBuild>, CiError> {
    let listing: BuildListing = parse("build listing", body)?;
    Ok(listing.builds.into_iter().map(RemoteBuild::from).collect())
}

pub fn parse_test_listing(body: &str) -> Result<RemoteTestListing, CiError> {
    parse("test list", body)
}

/// Dotted test identifiers of a test tree artifact
pub fn parse_test_names(body: &str) -> Result<Vec<String>, CiError> {
    parse_test_listing(body).map(|listing| listing.test_names())
}

pub fn parse_test_report(body: &str) -> Result<Vec<TestOutcome>, CiError> {
    let report: RawReport = parse("test report", body)?;
    report
        .suites
        .into_iter()
        .flat_map(|suite| suite.cases)
        .map(|case| {
            let status = TestStatus::from_remote(&case.status).ok_or_else(|| {
                CiError::unreadable("test report", format!("unknown status `{}`", case.status))
            })?;
            let name = if case.class_name.is_empty() {
                case.name
            } else {
                format!("{}.{}", case.class_name, case.name)
            };
            Ok(TestOutcome { name, status })
        })
        .collect()
}

pub fn parse_crumb(body: &str) -> Result<Crumb, CiError> {
    parse("crumb", body)
}

/// Queue item id from a trigger's `Location` header (`.../queue/item/7/`)
pub fn parse_queue_location(location: &str) -> Result<u64, CiError> {
    let mut segments = location.trim_end_matches('/').rsplit('/');
    match (segments.next(), segments.next()) {
        (Some(id), Some("item")) => id
            .parse()
            .map_err(|_| CiError::unreadable("queue location", location)),
        _ => Err(CiError::unreadable("queue location", location)),
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
