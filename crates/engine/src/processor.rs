// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build processor: drives one staged run to its result
//!
//! The processor owns the run's context and sequence. It asks the sequence
//! for the next step, runs it, and re-polls a pending step after the poll
//! interval without moving the stage.

use crate::builder::{DiscoveryBuilder, ExecutionBuilder, ResultBuilder};
use crate::sequence::{Purpose, StepSequence};
use crate::step::{Progress, Step, StepReport};
use jb_adapters::Transport;
use jb_core::{
    CiError, Crumb, ExecutionContext, ExternalJobId, PollPolicy, ProjectRef, RequestFactory,
    RunDescriptor, Stage,
};
use std::time::Instant;

/// Lifecycle of a processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorStatus {
    NotStarted,
    Running,
    Completed,
    Failed,
}

#[derive(Debug)]
enum ProcessorState<O> {
    NotStarted,
    Running,
    Completed(O),
    Failed(CiError),
}

/// Runs a step sequence against a transport and builds the result
pub struct BuildProcessor<T, B: ResultBuilder> {
    transport: T,
    builder: B,
    sequence: StepSequence,
    ctx: ExecutionContext,
    policy: PollPolicy,
    stages: Vec<Stage>,
    state: ProcessorState<B::Output>,
}

impl<T: Transport> BuildProcessor<T, DiscoveryBuilder> {
    /// Processor listing the tests of `project`
    pub fn discovery(transport: T, factory: RequestFactory, project: ProjectRef) -> Self {
        Self::new(
            transport,
            DiscoveryBuilder,
            StepSequence::new(Purpose::Discovery(project), factory),
        )
    }
}

impl<T: Transport> BuildProcessor<T, ExecutionBuilder> {
    /// Processor executing `descriptor` and collecting its outcomes
    pub fn execution(transport: T, factory: RequestFactory, descriptor: RunDescriptor) -> Self {
        Self::new(
            transport,
            ExecutionBuilder,
            StepSequence::new(Purpose::Execution(descriptor), factory),
        )
    }
}

impl<T: Transport, B: ResultBuilder> BuildProcessor<T, B> {
    pub fn new(transport: T, builder: B, sequence: StepSequence) -> Self {
        Self {
            transport,
            builder,
            sequence,
            ctx: ExecutionContext::new(ExternalJobId::generate()),
            policy: PollPolicy::default(),
            stages: Vec::new(),
            state: ProcessorState::NotStarted,
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_crumb(mut self, crumb: Option<Crumb>) -> Self {
        self.sequence = self.sequence.with_crumb(crumb);
        self
    }

    /// Replace the generated external id
    pub fn with_external_job_id(mut self, id: ExternalJobId) -> Self {
        self.ctx = ExecutionContext::new(id);
        self
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.ctx
    }

    /// Stages reached so far, in order, starting with `Idle`
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Last stage whose step completed
    pub fn stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }

    pub fn status(&self) -> ProcessorStatus {
        match self.state {
            ProcessorState::NotStarted => ProcessorStatus::NotStarted,
            ProcessorState::Running => ProcessorStatus::Running,
            ProcessorState::Completed(_) => ProcessorStatus::Completed,
            ProcessorState::Failed(_) => ProcessorStatus::Failed,
        }
    }

    /// Error that ended the run, if it failed
    pub fn failure(&self) -> Option<&CiError> {
        match &self.state {
            ProcessorState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Drive the run until the terminal stage.
    ///
    /// A processor runs once; a second call fails with `AlreadyCompleted`
    /// whether the first run succeeded or not.
    pub fn run(&mut self) -> Result<(), CiError> {
        if !matches!(self.state, ProcessorState::NotStarted) {
            return Err(CiError::AlreadyCompleted);
        }
        self.state = ProcessorState::Running;

        let purpose = self.sequence.purpose();
        let span = tracing::info_span!(
            "run",
            purpose = purpose.name(),
            project = %purpose.project(),
            external_id = %self.ctx.external_job_id(),
        );
        let _guard = span.enter();

        let start = Instant::now();
        match self.drive() {
            Ok(output) => {
                tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "run completed");
                self.state = ProcessorState::Completed(output);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    stage = %self.stage(),
                    error = %e,
                    "run failed"
                );
                self.state = ProcessorState::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// The result of a completed run; the same value on every call
    pub fn result(&self) -> Result<B::Output, CiError> {
        match &self.state {
            ProcessorState::Completed(output) => Ok(output.clone()),
            _ => Err(CiError::PrematureResultAccess),
        }
    }

    fn drive(&mut self) -> Result<B::Output, CiError> {
        self.stages.push(self.sequence.stage());
        while self.sequence.has_more() {
            let step = self.sequence.next(&self.ctx)?;
            let StepReport { ctx, progress } = self.poll(&step)?;
            self.ctx = ctx;
            self.stages.push(self.sequence.stage());

            if let Progress::Harvested(harvest) = progress {
                let project = self.sequence.purpose().project();
                return self.builder.build_result(project, &self.ctx, harvest);
            }
        }
        Err(CiError::SequenceExhausted(self.sequence.stage()))
    }

    /// Run `step` until it is no longer pending or the budget is spent
    fn poll(&self, step: &Step) -> Result<StepReport, CiError> {
        let span = tracing::info_span!("step", step = step.kind().name(), stage = %step.stage());
        let _guard = span.enter();

        let mut attempts = 0;
        loop {
            attempts += 1;
            let report = step.run(&self.transport, self.ctx.clone())?;
            if report.progress != Progress::Pending {
                return Ok(report);
            }
            if attempts >= self.policy.max_polls {
                tracing::warn!(attempts, "poll budget exhausted");
                return Err(CiError::PollBudgetExhausted {
                    stage: step.stage(),
                    attempts,
                });
            }
            tracing::debug!(attempts, "server not ready, polling again");
            std::thread::sleep(self.policy.interval);
        }
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
