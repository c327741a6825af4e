// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

#[test]
fn job_listing_drops_disabled_jobs() {
    let body = r#"{
        "_class": "hudson.model.Hudson",
        "jobs": [
            {"_class": "hudson.model.FreeStyleProject", "name": "alpha", "color": "blue"},
            {"_class": "hudson.model.FreeStyleProject", "name": "beta", "color": "disabled"}
        ]
    }"#;

    assert_eq!(parse_job_listing(body).unwrap(), vec![ProjectRef::from("alpha")]);
}

#[parameterized(
    blue = { Some("blue"), true },
    running = { Some("red_anime"), true },
    never_built = { Some("notbuilt"), true },
    disabled = { Some("disabled"), false },
    disabled_anime = { Some("disabled_anime"), false },
    no_color = { None, false },
)]
fn job_color_decides_buildable(color: Option<&str>, buildable: bool) {
    let job = RemoteJob {
        name: "j".into(),
        color: color.map(Into::into),
    };
    assert_eq!(job.is_buildable(), buildable);
}

#[test]
fn job_listing_drops_items_without_color() {
    let body = r#"{"jobs":[
        {"_class":"com.cloudbees.hudson.plugins.folder.Folder","name":"folder"},
        {"name":"alpha","color":"notbuilt"}
    ]}"#;
    assert_eq!(parse_job_listing(body).unwrap(), vec![ProjectRef::from("alpha")]);
}

#[test]
fn job_listing_without_jobs_is_unreadable() {
    let err = parse_job_listing(r#"{"views": []}"#).unwrap_err();
    assert!(matches!(err, CiError::UnreadableResponse { ref what, .. } if what == "job listing"));
}

#[test]
fn job_listing_rejects_html() {
    let err = parse_job_listing("<html>login</html>").unwrap_err();
    assert!(matches!(err, CiError::UnreadableResponse { .. }));
}

#[test]
fn queue_item_waiting_and_scheduled() {
    let waiting = parse_queue_item(r#"{"id": 7, "why": "Waiting for next available executor"}"#)
        .unwrap();
    assert_eq!(waiting.executable, None);

    let scheduled =
        parse_queue_item(r#"{"id": 7, "cancelled": false, "executable": {"number": 42, "url": "x"}}"#)
            .unwrap();
    assert!(!scheduled.cancelled);
    assert_eq!(scheduled.executable, Some(Executable { number: 42 }));
}

#[test]
fn queue_item_requires_id() {
    assert!(parse_queue_item(r#"{"executable": {"number": 42}}"#).is_err());
}

#[test]
fn build_flattens_parameter_actions() {
    let body = r#"{
        "number": 42,
        "building": true,
        "result": null,
        "actions": [
            {},
            {"_class": "hudson.model.ParametersAction", "parameters": [
                {"name": "externalJobId", "value": "ext-1"},
                {"name": "debug", "value": true}
            ]},
            {"_class": "hudson.model.CauseAction"}
        ]
    }"#;

    let build = parse_build(body).unwrap();
    assert_eq!(build.number, 42);
    assert!(build.building);
    assert_eq!(build.result, None);
    assert_eq!(build.parameter("externalJobId"), Some("ext-1"));
    assert_eq!(build.parameter("debug"), Some("true"));
}

#[test]
fn build_listing_may_be_empty() {
    assert!(parse_build_listing(r#"{"builds": []}"#).unwrap().is_empty());
}

#[test]
fn build_listing_requires_builds() {
    let err = parse_build_listing(r#"{"_class":"hudson.model.FreeStyleProject"}"#).unwrap_err();
    assert!(matches!(err, CiError::UnreadableResponse { .. }));
}

#[test]
fn build_requires_number() {
    assert!(parse_build(r#"{"building": false}"#).is_err());
}

#[test]
fn build_requires_running_flag() {
    let err = parse_build(r#"{"number": 42}"#).unwrap_err();
    assert!(matches!(err, CiError::UnreadableResponse { .. }));
}

#[test]
fn listed_build_requires_running_flag() {
    assert!(parse_build_listing(r#"{"builds": [{"number": 3, "actions": []}]}"#).is_err());
}

#[test]
fn test_listing_flattens_below_root() {
    let body = r#"{
        "timestamp": "2026-01-01T00:00:00Z",
        "name": "tests",
        "contents": [
            {"name": "suiteA", "contents": [
                {"name": "test1", "contents": null},
                {"name": "test2"}
            ]},
            {"name": "empty", "contents": []},
            {"name": "standalone"}
        ]
    }"#;

    let listing = parse_test_listing(body).unwrap();
    assert_eq!(
        listing.test_names(),
        vec!["suiteA.test1", "suiteA.test2", "standalone"]
    );
}

#[test]
fn test_report_maps_statuses() {
    let body = r#"{"suites": [
        {"name": "s", "cases": [
            {"className": "suiteA", "name": "test1", "status": "PASSED"},
            {"className": "suiteA", "name": "test2", "status": "REGRESSION"},
            {"className": "", "name": "loose", "status": "SKIPPED"},
            {"className": "suiteB", "name": "test3", "status": "FIXED"}
        ]}
    ]}"#;

    let outcomes = parse_test_report(body).unwrap();
    let got: Vec<_> = outcomes.iter().map(|o| (o.name.as_str(), o.status)).collect();
    assert_eq!(
        got,
        vec![
            ("suiteA.test1", TestStatus::Passed),
            ("suiteA.test2", TestStatus::Failed),
            ("loose", TestStatus::Skipped),
            ("suiteB.test3", TestStatus::Passed),
        ]
    );
}

#[test]
fn test_report_rejects_unknown_status() {
    let body = r#"{"suites": [{"cases": [{"name": "t", "status": "EXPLODED"}]}]}"#;
    assert!(parse_test_report(body).is_err());
}

#[test]
fn crumb_uses_request_field_name() {
    let crumb = parse_crumb(
        r#"{"_class": "hudson.security.csrf.DefaultCrumbIssuer", "crumb": "abc", "crumbRequestField": "Jenkins-Crumb"}"#,
    )
    .unwrap();
    assert_eq!(crumb.field, "Jenkins-Crumb");
    assert_eq!(crumb.value, "abc");
}

#[parameterized(
    trailing_slash = { "http://ci:8080/queue/item/7/", 7 },
    no_trailing_slash = { "http://ci:8080/queue/item/123", 123 },
    prefixed = { "https://ci.example.com/jenkins/queue/item/9/", 9 },
)]
fn queue_location_yields_item_id(location: &str, expected: u64) {
    assert_eq!(parse_queue_location(location).unwrap(), expected);
}

#[parameterized(
    job_url = { "http://ci/job/alpha/" },
    not_a_number = { "http://ci/queue/item/abc/" },
    empty = { "" },
)]
fn queue_location_rejects_other_urls(location: &str) {
    assert!(parse_queue_location(location).is_err());
}

proptest! {
    #[test]
    fn disabled_jobs_never_surface(
        jobs in proptest::collection::vec(("[a-z]{1,10}", any::<bool>()), 0..20)
    ) {
        let entries: Vec<_> = jobs
            .iter()
            .map(|(name, disabled)| {
                serde_json::json!({
                    "name": name,
                    "color": if *disabled { "disabled" } else { "blue" },
                })
            })
            .collect();
        let body = serde_json::json!({ "jobs": entries }).to_string();

        let projects = parse_job_listing(&body).unwrap();
        let expected: Vec<_> = jobs
            .iter()
            .filter(|(_, disabled)| !disabled)
            .map(|(name, _)| ProjectRef(name.clone()))
            .collect();

        prop_assert_eq!(projects, expected);
    }
}
