//! Persistent storage: the TOML config file and the auth token.

pub mod config;
pub mod credentials;

pub use config::{load_config, ClientConfig, ConfigError};
pub use credentials::{FileCredentialStore, MemoryCredentialStore};
