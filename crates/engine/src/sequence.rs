// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step sequence: which step comes next, and the stage it leads to
//!
//! The protocol order lives in [`transition`], a pure table shared by every
//! purpose. Only the terminal step differs between a discovery run and an
//! execution run. [`StepSequence`] is the one mutable cursor over that table.

use crate::step::Step;
use jb_core::jenkins::Crumb;
use jb_core::{
    CiError, ExecutionContext, HttpRequest, ProjectRef, RequestFactory, RunDescriptor, Stage,
};

/// Last step of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    /// Read the test tree produced by a listing build
    TestList,
    /// Read pass/fail outcomes of an execution build
    TestOutcomes,
}

/// The unit of work each step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Trigger,
    CheckQueue,
    ResolveBuildId,
    CheckBuildRunning,
    FetchTestList,
    FetchTestOutcomes,
}

impl StepKind {
    pub fn name(self) -> &'static str {
        match self {
            StepKind::Trigger => "trigger",
            StepKind::CheckQueue => "check-queue",
            StepKind::ResolveBuildId => "resolve-build-id",
            StepKind::CheckBuildRunning => "check-build-running",
            StepKind::FetchTestList => "fetch-test-list",
            StepKind::FetchTestOutcomes => "fetch-test-outcomes",
        }
    }
}

/// Result of leaving a stage: the step to run and the stage reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub step: StepKind,
    pub next: Stage,
}

/// Pure transition table; `None` once the terminal stage is reached
pub fn transition(stage: Stage, terminal: TerminalKind) -> Option<Transition> {
    let step = match stage {
        Stage::Idle => StepKind::Trigger,
        Stage::BuildStarted => StepKind::CheckQueue,
        Stage::QueueChecked => StepKind::ResolveBuildId,
        Stage::BuildIdObtained => StepKind::CheckBuildRunning,
        Stage::BuildRunningChecked => match terminal {
            TerminalKind::TestList => StepKind::FetchTestList,
            TerminalKind::TestOutcomes => StepKind::FetchTestOutcomes,
        },
        Stage::ResultGathered => return None,
    };
    stage.next().map(|next| Transition { step, next })
}

/// What a staged run is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purpose {
    /// List the automated tests a job exposes
    Discovery(ProjectRef),
    /// Execute a batch of tests and collect their outcomes
    Execution(RunDescriptor),
}

impl Purpose {
    pub fn project(&self) -> &ProjectRef {
        match self {
            Purpose::Discovery(project) => project,
            Purpose::Execution(descriptor) => descriptor.project(),
        }
    }

    pub fn terminal(&self) -> TerminalKind {
        match self {
            Purpose::Discovery(_) => TerminalKind::TestList,
            Purpose::Execution(_) => TerminalKind::TestOutcomes,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Purpose::Discovery(_) => "discovery",
            Purpose::Execution(_) => "execution",
        }
    }
}

/// Stateful generator of the steps of one run
#[derive(Debug, Clone)]
pub struct StepSequence {
    purpose: Purpose,
    factory: RequestFactory,
    crumb: Option<Crumb>,
    stage: Stage,
}

impl StepSequence {
    pub fn new(purpose: Purpose, factory: RequestFactory) -> Self {
        Self {
            purpose,
            factory,
            crumb: None,
            stage: Stage::Idle,
        }
    }

    /// CSRF crumb sent with the trigger request
    pub fn with_crumb(mut self, crumb: Option<Crumb>) -> Self {
        self.crumb = crumb;
        self
    }

    pub fn purpose(&self) -> &Purpose {
        &self.purpose
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn has_more(&self) -> bool {
        !self.stage.is_terminal()
    }

    /// Build the step for the current stage and advance past it.
    ///
    /// The stage only moves when the step could be built.
    pub fn next(&mut self, ctx: &ExecutionContext) -> Result<Step, CiError> {
        let Transition { step, next } = transition(self.stage, self.purpose.terminal())
            .ok_or(CiError::SequenceExhausted(self.stage))?;
        let request = self.request_for(step, ctx)?;
        let built = Step::new(self.stage, step, request);
        self.stage = next;
        Ok(built)
    }

    fn request_for(&self, step: StepKind, ctx: &ExecutionContext) -> Result<HttpRequest, CiError> {
        let project = self.purpose.project();
        let request = match step {
            StepKind::Trigger => {
                let trigger = match &self.purpose {
                    Purpose::Discovery(project) => {
                        self.factory.trigger_listing(project, ctx.external_job_id())
                    }
                    Purpose::Execution(descriptor) => self
                        .factory
                        .trigger_execution(descriptor, ctx.external_job_id())?,
                };
                trigger.with_crumb(self.crumb.as_ref())
            }
            StepKind::CheckQueue => self.factory.queue_item(ctx.require_queue_item_id()?),
            StepKind::ResolveBuildId => self.factory.builds(project),
            StepKind::CheckBuildRunning => self.factory.build(project, ctx.require_build_id()?),
            StepKind::FetchTestList => self.factory.test_list(project, ctx.require_build_id()?),
            StepKind::FetchTestOutcomes => {
                self.factory.test_report(project, ctx.require_build_id()?)
            }
        };
        Ok(request)
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
