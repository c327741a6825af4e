// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jb-core: data model for driving a remote CI server
//!
//! This crate provides:
//! - The stage enumeration and per-run execution context
//! - Run descriptors supplied by the host application
//! - Request building and JSON translation for the Jenkins API
//! - The error taxonomy and server configuration

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod jenkins;
pub mod stage;

pub use config::{PollPolicy, ServerConfig};
pub use context::{ExecutionContext, ExternalJobId};
pub use descriptor::{ProjectRef, RunDescriptor, TestExecution};
pub use error::CiError;
pub use jenkins::{Crumb, HttpMethod, HttpRequest, HttpResponse, RequestFactory, TestOutcome, TestStatus};
pub use stage::Stage;
