// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol stages of a staged CI run

use serde::{Deserialize, Serialize};
use std::fmt;

/// One discrete state of the orchestration state machine.
///
/// Stages only move forward, one at a time, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Nothing sent yet
    Idle,
    /// Trigger accepted, a queue item exists
    BuildStarted,
    /// Queue item left the queue
    QueueChecked,
    /// Build number known
    BuildIdObtained,
    /// Build finished running
    BuildRunningChecked,
    /// Result collected
    ResultGathered,
}

impl Stage {
    /// Every stage, in protocol order
    pub const ALL: [Stage; 6] = [
        Stage::Idle,
        Stage::BuildStarted,
        Stage::QueueChecked,
        Stage::BuildIdObtained,
        Stage::BuildRunningChecked,
        Stage::ResultGathered,
    ];

    /// The stage that follows this one, `None` at the terminal stage
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Idle => Some(Stage::BuildStarted),
            Stage::BuildStarted => Some(Stage::QueueChecked),
            Stage::QueueChecked => Some(Stage::BuildIdObtained),
            Stage::BuildIdObtained => Some(Stage::BuildRunningChecked),
            Stage::BuildRunningChecked => Some(Stage::ResultGathered),
            Stage::ResultGathered => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::ResultGathered
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::BuildStarted => "build-started",
            Stage::QueueChecked => "queue-checked",
            Stage::BuildIdObtained => "build-id-obtained",
            Stage::BuildRunningChecked => "build-running-checked",
            Stage::ResultGathered => "result-gathered",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
