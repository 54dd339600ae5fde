//! Configuration loading and management.
//!
//! - [`types`]: Config struct definitions and TOML loading
//! - [`validation`]: Startup checks over a loaded Config

mod types;
mod validation;

pub use types::{Config, ConfigError, ServerConfig, WebServConfig};
pub use validation::{MIN_KEY_LEN, ValidationError, is_weak_key, validate};
