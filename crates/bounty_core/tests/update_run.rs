use std::sync::Once;

use bounty_core::{
    update, ChangeKind, DiffOptions, Effect, Msg, PersistedState, PlatformOutcome, Program,
    RunState, RunSummary,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

fn fetched(platform: &str, value: serde_json::Value) -> Msg {
    Msg::PlatformFetched {
        platform: platform.to_string(),
        programs: value
            .as_array()
            .expect("array of programs")
            .iter()
            .map(Program::from_value)
            .collect(),
    }
}

fn previous_state() -> PersistedState {
    serde_json::from_value(json!({
        "hackerone": {"Acme": ["a.com", "b.com"]},
        "bugcrowd": {"Widgets": ["w.com"]},
    }))
    .unwrap()
}

#[test]
fn changes_accumulate_until_run_finished() {
    init_logging();
    let state = RunState::new(previous_state(), DiffOptions::default());

    let (state, effects) = update(
        state,
        fetched("hackerone", json!([{"name": "Acme", "targets": ["b.com", "c.com"]}])),
    );
    assert!(effects.is_empty());
    let (state, effects) = update(
        state,
        fetched("intigriti", json!([{"name": "Fresh", "targets": ["f.com"]}])),
    );
    assert!(effects.is_empty());
    assert_eq!(state.changes().len(), 2);

    let (state, effects) = update(state, Msg::RunFinished);
    assert!(state.is_finished());
    assert_eq!(effects.len(), 2);

    let Effect::DeliverNotifications { changes } = &effects[0] else {
        panic!("expected notifications first, got {:?}", effects[0]);
    };
    assert_eq!(changes[0].platform, "hackerone");
    assert_eq!(changes[0].kind, ChangeKind::Updated);
    assert_eq!(changes[1].platform, "intigriti");
    assert_eq!(changes[1].kind, ChangeKind::NewProgram);

    let Effect::PersistState { state: persisted } = &effects[1] else {
        panic!("expected persist second, got {:?}", effects[1]);
    };
    let expected: PersistedState = serde_json::from_value(json!({
        "hackerone": {"Acme": ["b.com", "c.com"]},
        "bugcrowd": {"Widgets": ["w.com"]},
        "intigriti": {"Fresh": ["f.com"]},
    }))
    .unwrap();
    assert_eq!(persisted, &expected);
    assert_eq!(state.previous(), &previous_state());
}

#[test]
fn identical_data_produces_no_notifications_and_same_state() {
    init_logging();
    let state = RunState::new(previous_state(), DiffOptions::default());

    let (state, _) = update(
        state,
        fetched("hackerone", json!([{"name": "Acme", "targets": ["a.com", "b.com"]}])),
    );
    let (state, _) = update(
        state,
        fetched("bugcrowd", json!([{"name": "Widgets", "targets": {"web": ["w.com"]}}])),
    );
    let (_state, effects) = update(state, Msg::RunFinished);

    assert_eq!(
        effects,
        vec![Effect::PersistState {
            state: previous_state()
        }]
    );
}

#[test]
fn failed_platform_keeps_previous_snapshot() {
    init_logging();
    let state = RunState::new(previous_state(), DiffOptions::default());

    let (state, _) = update(
        state,
        Msg::PlatformFailed {
            platform: "hackerone".to_string(),
            reason: "timeout".to_string(),
        },
    );
    let (state, _) = update(state, fetched("bugcrowd", json!([])));

    assert_eq!(state.next_state(), &previous_state());
    assert!(state.changes().is_empty());
    assert_eq!(
        state.outcomes(),
        &[
            PlatformOutcome::Failed {
                platform: "hackerone".to_string(),
                reason: "timeout".to_string(),
            },
            PlatformOutcome::Failed {
                platform: "bugcrowd".to_string(),
                reason: "no programs returned".to_string(),
            },
        ]
    );
}

#[test]
fn messages_after_finish_are_ignored() {
    init_logging();
    let state = RunState::new(PersistedState::new(), DiffOptions::default());
    let (state, _) = update(state, Msg::RunFinished);

    let (state, effects) = update(
        state,
        fetched("hackerone", json!([{"name": "Late", "targets": ["late.com"]}])),
    );
    assert!(effects.is_empty());
    assert!(state.changes().is_empty());

    let (_state, effects) = update(state, Msg::RunFinished);
    assert!(effects.is_empty());
}

#[test]
fn summary_counts_platforms_programs_and_delistings() {
    init_logging();
    let state = RunState::new(
        previous_state(),
        DiffOptions {
            report_delisted: true,
        },
    );

    let (state, _) = update(
        state,
        fetched("hackerone", json!([{"name": "Other", "targets": ["o.com"]}])),
    );
    let (state, _) = update(
        state,
        Msg::PlatformFailed {
            platform: "bugcrowd".to_string(),
            reason: "http status 500".to_string(),
        },
    );

    assert_eq!(
        state.summary(),
        RunSummary {
            platforms_checked: 1,
            platforms_failed: 1,
            programs_seen: 1,
            changes: 2,
            delisted: 1,
        }
    );
    assert_eq!(state.changes()[1].kind, ChangeKind::Delisted);
    assert_eq!(state.outcomes()[1].platform(), "bugcrowd");
}
