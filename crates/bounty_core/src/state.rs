use crate::summary::RunSummary;
use crate::{ChangeRecord, DiffOptions, PersistedState};

/// What happened to one platform during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformOutcome {
    Checked {
        platform: String,
        programs: usize,
        changes: usize,
        delisted: Vec<String>,
    },
    Failed {
        platform: String,
        reason: String,
    },
}

impl PlatformOutcome {
    pub fn platform(&self) -> &str {
        match self {
            Self::Checked { platform, .. } | Self::Failed { platform, .. } => platform,
        }
    }
}

/// State of one monitoring run.
///
/// `previous` is the state loaded at start-up and is never modified. `next`
/// starts as a copy of it and each successfully fetched platform replaces its
/// own entry, so platforms that failed keep their last known snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunState {
    previous: PersistedState,
    next: PersistedState,
    options: DiffOptions,
    changes: Vec<ChangeRecord>,
    outcomes: Vec<PlatformOutcome>,
    finished: bool,
}

impl RunState {
    pub fn new(previous: PersistedState, options: DiffOptions) -> Self {
        Self {
            next: previous.clone(),
            previous,
            options,
            ..Self::default()
        }
    }

    pub fn previous(&self) -> &PersistedState {
        &self.previous
    }

    pub fn next_state(&self) -> &PersistedState {
        &self.next
    }

    pub fn options(&self) -> DiffOptions {
        self.options
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn outcomes(&self) -> &[PlatformOutcome] {
        &self.outcomes
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes, self.changes.len())
    }

    pub(crate) fn next_state_mut(&mut self) -> &mut PersistedState {
        &mut self.next
    }

    pub(crate) fn record_changes(&mut self, changes: Vec<ChangeRecord>) {
        self.changes.extend(changes);
    }

    pub(crate) fn record_outcome(&mut self, outcome: PlatformOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn finish(&mut self) {
        self.finished = true;
    }
}
