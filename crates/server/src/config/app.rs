use serde::Deserialize;

/// Application behaviour flags.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// When `true`, 500 responses carry the raw diagnostic instead of a
    /// generic string. Never enable in production.
    #[serde(default)]
    pub debug: bool,
}
