#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send every record, in order, through each configured notifier.
    DeliverNotifications { changes: Vec<crate::ChangeRecord> },
    /// Write the next state to storage.
    PersistState { state: crate::PersistedState },
}
