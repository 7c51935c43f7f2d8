pub mod config;
pub mod migrations;
pub mod store;

pub use config::PostgresConfig;
pub use migrations::{revert_migrations, run_migrations};
pub use store::{PostgresBoxStore, connect};
