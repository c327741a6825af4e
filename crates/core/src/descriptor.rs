// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run descriptors supplied by the host application

use crate::error::CiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of a job on the CI server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectRef(pub String);

impl ProjectRef {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectRef {
    fn from(s: &str) -> Self {
        ProjectRef(s.to_string())
    }
}

impl From<String> for ProjectRef {
    fn from(s: String) -> Self {
        ProjectRef(s)
    }
}

/// One test to execute, with its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestExecution {
    #[serde(rename = "script")]
    reference: String,
    #[serde(rename = "param", default)]
    params: BTreeMap<String, String>,
}

impl TestExecution {
    pub fn new(reference: impl Into<String>, params: BTreeMap<String, String>) -> Self {
        Self {
            reference: reference.into(),
            params,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

/// Wire shape of the test suite file attached to an execution trigger
#[derive(Debug, Serialize, Deserialize)]
struct SuiteFile {
    test: Vec<TestExecution>,
}

/// Everything needed to trigger the execution of a batch of tests.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescriptor {
    project: ProjectRef,
    node: Option<String>,
    tests: Vec<TestExecution>,
}

impl RunDescriptor {
    pub fn new(project: ProjectRef, node: Option<String>, tests: Vec<TestExecution>) -> Self {
        Self {
            project,
            node: node.filter(|n| !n.trim().is_empty()),
            tests,
        }
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    pub fn tests(&self) -> &[TestExecution] {
        &self.tests
    }

    /// Encode the tests as the suite file the CI job reads
    pub fn to_suite_json(&self) -> Result<Vec<u8>, CiError> {
        serde_json::to_vec(&SuiteFile {
            test: self.tests.clone(),
        })
        .map_err(|e| CiError::PayloadEncoding(e.to_string()))
    }

    /// Decode a suite file back into test executions
    pub fn parse_suite_json(bytes: &[u8]) -> Result<Vec<TestExecution>, CiError> {
        let suite: SuiteFile =
            serde_json::from_slice(bytes).map_err(|e| CiError::unreadable("test suite", e))?;
        Ok(suite.test)
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
