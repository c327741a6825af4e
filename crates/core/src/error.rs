// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every layer
//!
//! Two families live here:
//! - environmental errors, raised by the CI server or the network, which the
//!   caller may surface to a user as a configuration or connectivity problem
//! - driver-discipline errors, raised when a caller misuses a step sequence or
//!   build processor; these indicate a defect and never reach an end user

use crate::stage::Stage;
use thiserror::Error;

/// Longest server message kept in an error
const MAX_SERVER_MESSAGE: usize = 300;

/// Errors raised while talking to the CI server or driving a run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CiError {
    #[error("could not reach CI server: {0}")]
    ServerConnectionFailed(String),

    #[error("unreadable response from {what}: {message}")]
    UnreadableResponse { what: String, message: String },

    #[error("access denied by CI server (HTTP {status})")]
    AccessDenied { status: u16 },

    #[error("not found on CI server: {0}")]
    NotFound(String),

    #[error("CI server rejected the request (HTTP {status}): {message}")]
    SubmissionFailed { status: u16, message: String },

    #[error("queue item {0} was cancelled on the CI server")]
    QueueItemCancelled(u64),

    #[error("still waiting at stage {stage} after {attempts} polls")]
    PollBudgetExhausted { stage: Stage, attempts: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not encode request payload: {0}")]
    PayloadEncoding(String),

    #[error("no step left after stage {0}")]
    SequenceExhausted(Stage),

    #[error("result requested before the build processor completed, probably due to a buggy caller")]
    PrematureResultAccess,

    #[error("build processor already ran")]
    AlreadyCompleted,

    #[error("{0} is not assigned yet")]
    MissingContext(&'static str),
}

impl CiError {
    /// Map a non-2xx HTTP status to the matching error.
    ///
    /// `target` names what was requested and is only used for 404s.
    pub fn from_status(status: u16, body: &str, target: &str) -> Self {
        match status {
            401 | 403 | 407 => CiError::AccessDenied { status },
            404 => CiError::NotFound(target.to_string()),
            _ => CiError::SubmissionFailed {
                status,
                message: server_message(body),
            },
        }
    }

    pub fn unreadable(what: impl Into<String>, message: impl ToString) -> Self {
        CiError::UnreadableResponse {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// True for failures caused by the server, the network or configuration
    pub fn is_environmental(&self) -> bool {
        !self.is_driver_bug()
    }

    /// True when the error can only come from misusing the driver API
    pub fn is_driver_bug(&self) -> bool {
        matches!(
            self,
            CiError::SequenceExhausted(_)
                | CiError::PrematureResultAccess
                | CiError::AlreadyCompleted
                | CiError::MissingContext(_)
        )
    }
}

/// Condense a response body into a one-line message
fn server_message(body: &str) -> String {
    let line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.is_empty() {
        return "no message".to_string();
    }
    match line.char_indices().nth(MAX_SERVER_MESSAGE) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line,
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
