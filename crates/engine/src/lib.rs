// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jb-engine: staged runs against a CI server
//!
//! A run walks a fixed sequence of stages, one HTTP round trip per step,
//! from triggering a build to collecting what it produced.

mod builder;
mod oneshot;
mod processor;
mod sequence;
mod step;
mod submission;

pub use builder::{
    DiscoveryBuilder, DiscoveryResult, ExecutionBuilder, ExecutionResult, ResultBuilder,
};
pub use oneshot::{fetch_crumb, fetch_test_list, list_projects};
pub use processor::{BuildProcessor, ProcessorStatus};
pub use sequence::{transition, Purpose, StepKind, StepSequence, TerminalKind, Transition};
pub use step::{Harvest, Progress, Step, StepReport};
pub use submission::{Submission, SubmissionReceipt};
