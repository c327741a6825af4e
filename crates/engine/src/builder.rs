// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turning what a run harvested into its typed result

use crate::step::Harvest;
use jb_core::{CiError, ExecutionContext, ProjectRef, TestOutcome};
use serde::Serialize;

/// Builds the result of a run once its terminal step has harvested data.
///
/// Called exactly once per completed run.
pub trait ResultBuilder {
    type Output: Clone;

    fn build_result(
        &self,
        project: &ProjectRef,
        ctx: &ExecutionContext,
        harvest: Harvest,
    ) -> Result<Self::Output, CiError>;
}

/// Tests a job exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryResult {
    pub project: ProjectRef,
    pub tests: Vec<String>,
}

/// Outcomes of one execution build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub project: ProjectRef,
    pub build_id: u64,
    pub outcomes: Vec<TestOutcome>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryBuilder;

impl ResultBuilder for DiscoveryBuilder {
    type Output = DiscoveryResult;

    fn build_result(
        &self,
        project: &ProjectRef,
        _ctx: &ExecutionContext,
        harvest: Harvest,
    ) -> Result<DiscoveryResult, CiError> {
        match harvest {
            Harvest::Tests(tests) => Ok(DiscoveryResult {
                project: project.clone(),
                tests,
            }),
            Harvest::Outcomes(_) => Err(CiError::unreadable(
                "discovery build",
                "got test outcomes instead of a test list",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionBuilder;

impl ResultBuilder for ExecutionBuilder {
    type Output = ExecutionResult;

    fn build_result(
        &self,
        project: &ProjectRef,
        ctx: &ExecutionContext,
        harvest: Harvest,
    ) -> Result<ExecutionResult, CiError> {
        match harvest {
            Harvest::Outcomes(outcomes) => Ok(ExecutionResult {
                project: project.clone(),
                build_id: ctx.require_build_id()?,
                outcomes,
            }),
            Harvest::Tests(_) => Err(CiError::unreadable(
                "execution build",
                "got a test list instead of test outcomes",
            )),
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
