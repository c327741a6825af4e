// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use jb_core::CiError;
use std::fmt;

/// Error with context and recovery suggestions for display on stderr.
#[derive(Debug)]
pub struct JbError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl JbError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Describe any error reaching `main`
    pub fn describe(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<CiError>() {
            Some(ci) => {
                let mut described = Self::from_ci(ci);
                let outer = err.to_string();
                if outer != ci.to_string() {
                    described = described.with_context(outer);
                }
                described
            }
            None => Self::new(format!("{:#}", err)),
        }
    }

    /// Turn a CI error into an actionable message
    pub fn from_ci(err: &CiError) -> Self {
        let base = JbError::new(err.to_string());
        match err {
            CiError::ServerConnectionFailed(_) => base
                .with_context("The server did not answer or the connection timed out")
                .with_suggestion("Check the server url (`url` in jb.toml, JB_URL or --url)")
                .with_suggestion("Raise `timeout` in jb.toml for slow servers"),
            CiError::AccessDenied { .. } => base
                .with_context("The server refused the credentials or their permissions")
                .with_suggestion("Check JB_USER and JB_TOKEN")
                .with_suggestion("Make sure the user may build the job"),
            CiError::NotFound(_) => base
                .with_suggestion("List the jobs the server exposes: jb jobs"),
            CiError::SubmissionFailed { .. } | CiError::UnreadableResponse { .. } => base
                .with_context("The server rejected or garbled the exchange")
                .with_suggestion("Check that the job is configured for automated test runs"),
            CiError::QueueItemCancelled(_) => base
                .with_context("Someone or something removed the build from the queue"),
            CiError::PollBudgetExhausted { .. } => base
                .with_suggestion("Raise `max_polls` or `poll_interval` in jb.toml"),
            CiError::InvalidConfig(_) => base
                .with_suggestion("See `jb --help` for the configuration sources"),
            CiError::PayloadEncoding(_)
            | CiError::SequenceExhausted(_)
            | CiError::PrematureResultAccess
            | CiError::AlreadyCompleted
            | CiError::MissingContext(_) => base
                .with_context("This is a defect in jb, not a problem with the server"),
        }
    }
}

impl fmt::Display for JbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for JbError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
