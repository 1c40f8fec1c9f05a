use crate::{diff_platform, Effect, Msg, PlatformOutcome, RunState};

/// Pure update function: applies a message to the run state and returns any effects.
pub fn update(mut state: RunState, msg: Msg) -> (RunState, Vec<Effect>) {
    let effects = match msg {
        Msg::PlatformFetched { .. } | Msg::PlatformFailed { .. } if state.is_finished() => {
            Vec::new()
        }
        Msg::PlatformFetched { platform, programs } => {
            if programs.is_empty() {
                // Empty listing: keep the last known snapshot.
                state.record_outcome(PlatformOutcome::Failed {
                    platform,
                    reason: "no programs returned".to_string(),
                });
                return (state, Vec::new());
            }

            let diff = diff_platform(
                &platform,
                &programs,
                state.previous().platform(&platform),
                state.options(),
            );
            state.record_outcome(PlatformOutcome::Checked {
                platform: platform.clone(),
                programs: diff.snapshot.len(),
                changes: diff.changes.len(),
                delisted: diff.delisted,
            });
            state.record_changes(diff.changes);
            state.next_state_mut().replace_platform(platform, diff.snapshot);
            Vec::new()
        }
        Msg::PlatformFailed { platform, reason } => {
            state.record_outcome(PlatformOutcome::Failed { platform, reason });
            Vec::new()
        }
        Msg::RunFinished => {
            if state.is_finished() {
                return (state, Vec::new());
            }
            state.finish();
            let mut effects = Vec::with_capacity(2);
            if !state.changes().is_empty() {
                effects.push(Effect::DeliverNotifications {
                    changes: state.changes().to_vec(),
                });
            }
            effects.push(Effect::PersistState {
                state: state.next_state().clone(),
            });
            effects
        }
    };

    (state, effects)
}
