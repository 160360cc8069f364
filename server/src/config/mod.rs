//! Configuration: environment-backed settings, the permission-key catalog
//! and the remote settings fetch.

pub mod access_keys;
pub mod app_config;
pub mod remote;

pub use app_config::AppConfig;

/// Key kinds accepted by credential resolution, in display order.
pub const USER_GET_TYPES: [&str; 3] = ["id", "discord", "steam64"];
