// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jb_core::{ExternalJobId, HttpMethod, TestExecution};
use proptest::prelude::*;
use std::collections::BTreeMap;
use yare::parameterized;

fn factory() -> RequestFactory {
    RequestFactory::new("http://ci.example/").unwrap()
}

fn ctx() -> ExecutionContext {
    ExecutionContext::new(ExternalJobId::from("ext-1"))
        .with_queue_item_id(7)
        .with_build_id(42)
}

fn descriptor() -> RunDescriptor {
    RunDescriptor::new(
        ProjectRef::from("alpha"),
        Some("node-1".to_string()),
        vec![TestExecution::new("tests/a.ta", BTreeMap::new())],
    )
}

#[parameterized(
    idle = { Stage::Idle, StepKind::Trigger, Stage::BuildStarted },
    started = { Stage::BuildStarted, StepKind::CheckQueue, Stage::QueueChecked },
    queued = { Stage::QueueChecked, StepKind::ResolveBuildId, Stage::BuildIdObtained },
    resolved = { Stage::BuildIdObtained, StepKind::CheckBuildRunning, Stage::BuildRunningChecked },
    finished = { Stage::BuildRunningChecked, StepKind::FetchTestList, Stage::ResultGathered },
)]
fn discovery_transitions(stage: Stage, step: StepKind, next: Stage) {
    assert_eq!(
        transition(stage, TerminalKind::TestList),
        Some(Transition { step, next })
    );
}

#[test]
fn execution_ends_with_outcomes() {
    let last = transition(Stage::BuildRunningChecked, TerminalKind::TestOutcomes).unwrap();
    assert_eq!(last.step, StepKind::FetchTestOutcomes);
    assert_eq!(last.next, Stage::ResultGathered);
}

#[test]
fn terminal_stage_has_no_transition() {
    assert_eq!(transition(Stage::ResultGathered, TerminalKind::TestList), None);
    assert_eq!(transition(Stage::ResultGathered, TerminalKind::TestOutcomes), None);
}

#[test]
fn discovery_sequence_walks_every_stage_once() {
    let mut sequence = StepSequence::new(Purpose::Discovery(ProjectRef::from("alpha")), factory());
    let ctx = ctx();
    let mut stages = vec![sequence.stage()];
    let mut kinds = Vec::new();

    while sequence.has_more() {
        let step = sequence.next(&ctx).unwrap();
        kinds.push(step.kind());
        stages.push(sequence.stage());
    }

    assert_eq!(stages, Stage::ALL.to_vec());
    assert_eq!(
        kinds,
        vec![
            StepKind::Trigger,
            StepKind::CheckQueue,
            StepKind::ResolveBuildId,
            StepKind::CheckBuildRunning,
            StepKind::FetchTestList,
        ]
    );
}

#[test]
fn next_after_terminal_is_exhausted() {
    let mut sequence = StepSequence::new(Purpose::Discovery(ProjectRef::from("alpha")), factory());
    let ctx = ctx();
    while sequence.has_more() {
        sequence.next(&ctx).unwrap();
    }

    assert_eq!(
        sequence.next(&ctx),
        Err(CiError::SequenceExhausted(Stage::ResultGathered))
    );
    assert_eq!(sequence.stage(), Stage::ResultGathered);
}

#[test]
fn missing_queue_id_does_not_advance() {
    let mut sequence = StepSequence::new(Purpose::Discovery(ProjectRef::from("alpha")), factory());
    let fresh = ExecutionContext::new(ExternalJobId::from("ext-1"));
    sequence.next(&fresh).unwrap();

    assert_eq!(
        sequence.next(&fresh),
        Err(CiError::MissingContext("queue item id"))
    );
    assert_eq!(sequence.stage(), Stage::BuildStarted);
}

#[test]
fn discovery_trigger_is_a_listing_build() {
    let mut sequence = StepSequence::new(Purpose::Discovery(ProjectRef::from("alpha")), factory());
    let step = sequence.next(&ctx()).unwrap();

    assert_eq!(step.request().method, HttpMethod::Post);
    assert_eq!(step.request().url, "http://ci.example/job/alpha/buildWithParameters");
    assert_eq!(step.stage(), Stage::Idle);
}

#[test]
fn execution_trigger_carries_crumb() {
    let crumb = Crumb {
        field: "Jenkins-Crumb".to_string(),
        value: "abc".to_string(),
    };
    let mut sequence =
        StepSequence::new(Purpose::Execution(descriptor()), factory()).with_crumb(Some(crumb));
    let step = sequence.next(&ctx()).unwrap();

    assert_eq!(step.request().url, "http://ci.example/job/alpha/build");
    assert_eq!(step.request().header("Jenkins-Crumb"), Some("abc"));
}

#[test]
fn later_steps_carry_no_crumb() {
    let crumb = Crumb {
        field: "Jenkins-Crumb".to_string(),
        value: "abc".to_string(),
    };
    let mut sequence =
        StepSequence::new(Purpose::Execution(descriptor()), factory()).with_crumb(Some(crumb));
    let ctx = ctx();
    sequence.next(&ctx).unwrap();
    let poll = sequence.next(&ctx).unwrap();

    assert_eq!(poll.request().url, "http://ci.example/queue/item/7/api/json");
    assert_eq!(poll.request().header("Jenkins-Crumb"), None);
}

#[test]
fn purpose_names_its_project() {
    assert_eq!(Purpose::Execution(descriptor()).project().name(), "alpha");
    assert_eq!(Purpose::Discovery(ProjectRef::from("beta")).name(), "discovery");
}

fn terminal_kind() -> impl Strategy<Value = TerminalKind> {
    prop_oneof![Just(TerminalKind::TestList), Just(TerminalKind::TestOutcomes)]
}

proptest! {
    #[test]
    fn transitions_always_move_one_stage_forward(
        index in 0usize..Stage::ALL.len(),
        terminal in terminal_kind(),
    ) {
        let stage = Stage::ALL[index];
        match transition(stage, terminal) {
            Some(t) => prop_assert_eq!(Some(t.next), Stage::ALL.get(index + 1).copied()),
            None => prop_assert!(stage.is_terminal()),
        }
    }
}
