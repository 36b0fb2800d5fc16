//! Configuration management for mensa
//!
//! All config operations go through this module so that validation stays
//! consistent.
//!
//! - `schema` - Configuration data structures
//! - `io` - Reading, writing, and updating config files
//! - `paths` - Directory path management

pub mod io;
pub mod paths;
pub mod schema;

// Re-export commonly used items
pub use io::{load_config, save_config, update_config};
pub use paths::{get_config_path, get_mensa_dir, get_session_path, get_state_dir};
pub use schema::MensaConfig;

/// Environment variable overriding the configured API base URL
pub const API_URL_ENV: &str = "MENSA_API_URL";
