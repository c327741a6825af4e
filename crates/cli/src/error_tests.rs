// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use anyhow::Context;

#[test]
fn display_lists_context_and_suggestions() {
    let err = JbError::new("Something went wrong")
        .with_context("First context")
        .with_suggestion("Try this")
        .with_suggestion("Or this");

    let output = err.to_string();
    assert!(output.contains("error: Something went wrong"));
    assert!(output.contains("-> First context"));
    assert!(output.contains("1. Try this"));
    assert!(output.contains("2. Or this"));
}

#[test]
fn access_denied_points_at_credentials() {
    let output = JbError::from_ci(&CiError::AccessDenied { status: 403 }).to_string();
    assert!(output.contains("HTTP 403"));
    assert!(output.contains("JB_TOKEN"));
}

#[test]
fn driver_bugs_are_flagged_as_defects() {
    let output = JbError::from_ci(&CiError::PrematureResultAccess).to_string();
    assert!(output.contains("defect in jb"));
}

#[test]
fn describe_finds_wrapped_ci_error() {
    let result: anyhow::Result<()> =
        Err(CiError::NotFound("http://ci/job/x".to_string())).context("discovering x");

    let output = JbError::describe(&result.unwrap_err()).to_string();

    assert!(output.contains("not found on CI server: http://ci/job/x"));
    assert!(output.contains("-> discovering x"));
    assert!(output.contains("jb jobs"));
}

#[test]
fn describe_plain_errors() {
    let err = anyhow::anyhow!("bad --param `x`");
    assert_eq!(JbError::describe(&err).to_string(), "error: bad --param `x`\n");
}
