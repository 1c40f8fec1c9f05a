use crate::TargetSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Program absent from the previous snapshot.
    NewProgram,
    /// Program present before and now, with a different target set.
    Updated,
    /// Program present before and missing from a successful fetch.
    Delisted,
}

/// One program's delta between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub platform: String,
    pub program: String,
    pub url: String,
    pub kind: ChangeKind,
    pub added: TargetSet,
    pub removed: TargetSet,
}

impl ChangeRecord {
    pub fn is_new_program(&self) -> bool {
        self.kind == ChangeKind::NewProgram
    }
}
