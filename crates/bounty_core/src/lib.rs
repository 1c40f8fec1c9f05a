//! Bounty core: program parsing, change detection and the pure run state machine.
mod change;
mod diff;
mod effect;
mod extract;
mod msg;
mod program;
mod snapshot;
mod state;
mod summary;
mod update;

pub use change::{ChangeKind, ChangeRecord};
pub use diff::{diff_platform, DiffOptions, PlatformDiff};
pub use effect::Effect;
pub use extract::{extract_targets, TARGET_ID_FIELDS};
pub use msg::Msg;
pub use program::{default_program_url, first_identifier, Program, PROGRAM_NAME_FIELDS};
pub use snapshot::{PersistedState, PlatformSnapshot, TargetSet};
pub use state::{PlatformOutcome, RunState};
pub use summary::RunSummary;
pub use update::update;
