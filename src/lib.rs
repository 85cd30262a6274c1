pub mod cli;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod sources;

pub use cli::Cli;
pub use models::Config;
