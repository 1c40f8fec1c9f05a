#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A platform's listing was fetched and parsed.
    PlatformFetched {
        platform: String,
        programs: Vec<crate::Program>,
    },
    /// A platform's listing could not be fetched; its previous state is kept.
    PlatformFailed { platform: String, reason: String },
    /// Every platform has been visited.
    RunFinished,
}
