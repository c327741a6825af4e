// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote identifiers carried through one staged run

use crate::error::CiError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier attached to a triggered build so it can be found again
/// among concurrent builds of the same job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalJobId(pub String);

impl ExternalJobId {
    /// Fresh random id
    pub fn generate() -> Self {
        ExternalJobId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ExternalJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExternalJobId {
    fn from(s: &str) -> Self {
        ExternalJobId(s.to_string())
    }
}

/// Mutable state of one run.
///
/// Created fresh per run and moved through the driver loop; never shared
/// between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    external_job_id: ExternalJobId,
    queue_item_id: Option<u64>,
    assigned_build: Option<u64>,
    build_id: Option<u64>,
}

impl ExecutionContext {
    pub fn new(external_job_id: ExternalJobId) -> Self {
        Self {
            external_job_id,
            queue_item_id: None,
            assigned_build: None,
            build_id: None,
        }
    }

    pub fn external_job_id(&self) -> &ExternalJobId {
        &self.external_job_id
    }

    pub fn queue_item_id(&self) -> Option<u64> {
        self.queue_item_id
    }

    pub fn build_id(&self) -> Option<u64> {
        self.build_id
    }

    /// Build number the queue reported when the item left it
    pub fn assigned_build(&self) -> Option<u64> {
        self.assigned_build
    }

    /// Queue item id, valid from `BuildStarted` on
    pub fn require_queue_item_id(&self) -> Result<u64, CiError> {
        self.queue_item_id
            .ok_or(CiError::MissingContext("queue item id"))
    }

    /// Build id, valid from `BuildIdObtained` on
    pub fn require_build_id(&self) -> Result<u64, CiError> {
        self.build_id.ok_or(CiError::MissingContext("build id"))
    }

    pub fn with_queue_item_id(self, id: u64) -> Self {
        Self {
            queue_item_id: Some(id),
            ..self
        }
    }

    pub fn with_assigned_build(self, number: u64) -> Self {
        Self {
            assigned_build: Some(number),
            ..self
        }
    }

    pub fn with_build_id(self, id: u64) -> Self {
        Self {
            build_id: Some(id),
            ..self
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
