// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn next_walks_the_declared_order() {
    let mut walked = vec![Stage::Idle];
    let mut stage = Stage::Idle;
    while let Some(next) = stage.next() {
        walked.push(next);
        stage = next;
    }
    assert_eq!(walked, Stage::ALL.to_vec());
}

#[test]
fn next_always_moves_forward() {
    for stage in Stage::ALL {
        if let Some(next) = stage.next() {
            assert!(next > stage, "{stage} -> {next} went backwards");
        }
    }
}

#[test]
fn only_result_gathered_is_terminal() {
    let terminal: Vec<_> = Stage::ALL.into_iter().filter(|s| s.is_terminal()).collect();
    assert_eq!(terminal, vec![Stage::ResultGathered]);
    assert_eq!(Stage::ResultGathered.next(), None);
}

#[test]
fn display_uses_kebab_names() {
    assert_eq!(Stage::BuildIdObtained.to_string(), "build-id-obtained");
}
