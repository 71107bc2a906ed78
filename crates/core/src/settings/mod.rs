//! Per-branch vendor credentials and their lifecycle.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::SettingsError;
pub use service::SettingsService;
pub use store::SettingsStore;
pub use types::{Environment, EtimsSettings, SettingsDraft, is_valid_kra_pin};
