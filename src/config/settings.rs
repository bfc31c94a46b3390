//! Application settings loaded from config.toml
//!
//! Every section is optional; missing values fall back to the defaults used by the
//! mobile client (20 medicines per page, 500 ms stock debounce, profile pictures under
//! `profile_images/`). The `[[aisles]]` entries seed the aisle collection on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inventory listing behaviour
    pub inventory: InventorySettings,
    /// Blob storage location
    pub storage: StorageSettings,
    /// Auth provider limits
    pub auth: AuthSettings,
    /// Aisles to create when missing
    pub aisles: Vec<AisleConfig>,
}

/// `[inventory]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    /// Number of medicines returned per page
    pub page_size: u64,
    /// How long a stock value must stay unchanged before it is persisted
    pub stock_debounce_ms: u64,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            stock_debounce_ms: 500,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory blobs are written to
    pub root: PathBuf,
    /// Prefix of the URLs handed back for stored blobs
    pub base_url: String,
    /// Folder profile pictures are uploaded into
    pub profile_folder: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/blobs"),
            base_url: "file://data/blobs".to_string(),
            profile_folder: "profile_images".to_string(),
        }
    }
}

/// `[auth]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Consecutive failed sign-ins for one email before further attempts are refused
    pub max_failed_sign_ins: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            max_failed_sign_ins: 5,
        }
    }
}

/// Configuration for a single seeded aisle
#[derive(Debug, Deserialize, Clone)]
pub struct AisleConfig {
    /// Name of the aisle
    pub name: String,
    /// Symbol name
    #[serde(default = "default_aisle_icon")]
    pub icon: String,
    /// Icon colour as hex digits
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_aisle_icon() -> String {
    "pills.fill".to_string()
}

fn default_color() -> String {
    "6495ED".to_string()
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration named by `MEDISTOCK_CONFIG`, or ./config.toml.
///
/// A missing default file yields the built-in defaults; an explicitly named file must exist.
pub fn load_default_config() -> Result<AppConfig> {
    match std::env::var("MEDISTOCK_CONFIG") {
        Ok(path) => load_config(path),
        Err(_) if Path::new("config.toml").exists() => load_config("config.toml"),
        Err(_) => {
            tracing::info!("No config.toml found, using default settings.");
            Ok(AppConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [inventory]
            page_size = 50
            stock_debounce_ms = 250

            [storage]
            root = "/var/lib/medistock"
            base_url = "https://blobs.example.app"
            profile_folder = "avatars"

            [auth]
            max_failed_sign_ins = 3

            [[aisles]]
            name = "Pills"
            icon = "pills.fill"
            color = "06ffb7"

            [[aisles]]
            name = "Syrups"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.inventory.page_size, 50);
        assert_eq!(config.inventory.stock_debounce_ms, 250);
        assert_eq!(config.storage.root, PathBuf::from("/var/lib/medistock"));
        assert_eq!(config.storage.profile_folder, "avatars");
        assert_eq!(config.auth.max_failed_sign_ins, 3);
        assert_eq!(config.aisles.len(), 2);
        assert_eq!(config.aisles[0].color, "06ffb7");
        assert_eq!(config.aisles[1].icon, "pills.fill");
        assert_eq!(config.aisles[1].color, "6495ED");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.inventory.page_size, 20);
        assert_eq!(config.inventory.stock_debounce_ms, 500);
        assert_eq!(config.storage.profile_folder, "profile_images");
        assert_eq!(config.auth.max_failed_sign_ins, 5);
        assert!(config.aisles.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("[inventory\npage_size = ");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("/nonexistent/medistock/config.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }
}
