//! Bounty engine: fetching, persistence, notification delivery and run orchestration.
mod fetch;
pub mod notify;
mod persist;
mod runner;
mod state_store;
mod types;

pub use fetch::{parse_listing, FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_DATA_URL};
pub use notify::{
    deliver_all, DeliveryReport, DiscordNotifier, Notifier, NotifyError, TelegramNotifier,
};
pub use persist::{ensure_parent_dir, write_atomic, PersistError};
pub use runner::{Monitor, MonitorSettings, RunError, RunReport, DEFAULT_PLATFORMS};
pub use state_store::{StateError, StateStore, DEFAULT_STATE_FILENAME};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
