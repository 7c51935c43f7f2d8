mod app;
mod server;
mod store;
mod telemetry;


pub use app::*;
pub use server::*;
pub use store::*;
pub use telemetry::*;

use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the Boxes server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct BoxesConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Application behaviour flags.
    #[serde(default)]
    pub app: AppConfig,
    /// Box store backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BoxesConfig {
    /// Load configuration from `path`, or use defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if the file cannot be read and
    /// [`ServerError::Config`] if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] on invalid TOML.
    pub fn parse(contents: &str) -> Result<Self, ServerError> {
        toml::from_str(contents).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply environment overrides: `BOXES_DEBUG` for `app.debug` and
    /// `DATABASE_URL` for `store.url`.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("BOXES_DEBUG") {
            self.app.debug = matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true");
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.store.url = Some(url);
        }
    }
}
