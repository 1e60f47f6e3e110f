pub mod dialog;
pub mod fetch;
pub mod login_item;
pub mod menubar;
pub mod scheduler;
pub mod settings;

pub use fetch::{decode_body, FetchOutcome, FetchResult, Fetcher};
pub use scheduler::RefreshTimer;
pub use settings::{parse_interval_input, Settings, SettingsStore, DEFAULT_REFRESH_INTERVAL};
