// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One round trip of a staged run

use crate::sequence::StepKind;
use jb_adapters::Transport;
use jb_core::jenkins::{
    parse_build, parse_build_listing, parse_queue_item, parse_queue_location, parse_test_names,
    parse_test_report, EXTERNAL_JOB_ID_PARAM,
};
use jb_core::{CiError, ExecutionContext, HttpRequest, HttpResponse, Stage, TestOutcome};

/// Data collected by a terminal step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Harvest {
    Tests(Vec<String>),
    Outcomes(Vec<TestOutcome>),
}

/// How a step left the remote side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Done; the run may move to the next stage
    Advanced,
    /// The server is not ready yet; run the same step again later
    Pending,
    /// Terminal step finished with its data
    Harvested(Harvest),
}

/// Context after a step, with what the step observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub ctx: ExecutionContext,
    pub progress: Progress,
}

impl StepReport {
    fn advanced(ctx: ExecutionContext) -> Self {
        Self {
            ctx,
            progress: Progress::Advanced,
        }
    }

    fn pending(ctx: ExecutionContext) -> Self {
        Self {
            ctx,
            progress: Progress::Pending,
        }
    }
}

/// A prepared request plus the knowledge of how to read its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    stage: Stage,
    kind: StepKind,
    request: HttpRequest,
}

impl Step {
    pub fn new(stage: Stage, kind: StepKind, request: HttpRequest) -> Self {
        Self {
            stage,
            kind,
            request,
        }
    }

    /// Stage the run was at when this step was built
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn kind(&self) -> StepKind {
        self.kind
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Perform exactly one round trip and fold its response into `ctx`
    pub fn run(
        &self,
        transport: &impl Transport,
        ctx: ExecutionContext,
    ) -> Result<StepReport, CiError> {
        let response = transport
            .execute(&self.request)?
            .ensure_success(&self.request.url)?;
        self.interpret(response, ctx)
    }

    fn interpret(
        &self,
        response: HttpResponse,
        ctx: ExecutionContext,
    ) -> Result<StepReport, CiError> {
        match self.kind {
            StepKind::Trigger => {
                let location = response.header("location").ok_or_else(|| {
                    CiError::unreadable("build trigger", "no Location header in response")
                })?;
                let id = parse_queue_location(location)?;
                tracing::debug!(queue_item = id, "build queued");
                Ok(StepReport::advanced(ctx.with_queue_item_id(id)))
            }
            StepKind::CheckQueue => {
                let item = parse_queue_item(&response.body)?;
                if item.cancelled {
                    return Err(CiError::QueueItemCancelled(item.id));
                }
                match item.executable {
                    Some(executable) => {
                        tracing::debug!(build = executable.number, "left the queue");
                        Ok(StepReport::advanced(ctx.with_assigned_build(executable.number)))
                    }
                    None => Ok(StepReport::pending(ctx)),
                }
            }
            StepKind::ResolveBuildId => {
                let builds = parse_build_listing(&response.body)?;
                let external_id = ctx.external_job_id().0.as_str();
                let found = builds
                    .iter()
                    .filter(|b| b.parameter(EXTERNAL_JOB_ID_PARAM) == Some(external_id))
                    .map(|b| b.number)
                    .max();
                match (found, ctx.assigned_build()) {
                    (Some(number), Some(assigned)) if number != assigned => {
                        Err(CiError::unreadable(
                            "build listing",
                            format!(
                                "build #{} carries external id {} but the queue assigned #{}",
                                number, external_id, assigned
                            ),
                        ))
                    }
                    (Some(number), _) => {
                        tracing::debug!(build = number, "build resolved");
                        Ok(StepReport::advanced(ctx.with_build_id(number)))
                    }
                    (None, _) => Ok(StepReport::pending(ctx)),
                }
            }
            StepKind::CheckBuildRunning => {
                let build = parse_build(&response.body)?;
                if build.building {
                    Ok(StepReport::pending(ctx))
                } else {
                    tracing::debug!(build = build.number, result = ?build.result, "build finished");
                    Ok(StepReport::advanced(ctx))
                }
            }
            StepKind::FetchTestList => Ok(StepReport {
                ctx,
                progress: Progress::Harvested(Harvest::Tests(parse_test_names(&response.body)?)),
            }),
            StepKind::FetchTestOutcomes => Ok(StepReport {
                ctx,
                progress: Progress::Harvested(Harvest::Outcomes(parse_test_report(
                    &response.body,
                )?)),
            }),
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
