pub mod api;
pub mod commands;
pub mod config;
pub mod dates;
pub mod logging;
pub mod session;

pub use api::ApiClient;
pub use session::Session;
