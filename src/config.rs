//! Bundle configuration.
//!
//! Handles loading, validating, and merging a `photo-page.toml` file. The
//! stock defaults reproduce the classic bundle layout; a user file only needs
//! the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! archive_name = "Photos.zip"   # Zip of every source file
//! original_dir = "Original"     # Verbatim copies
//! resized_dir = "Resized"       # Bounded JPEG copies
//! page_name = "Default.htm"     # Gallery page
//!
//! [resize]
//! max_width = 1280
//! max_height = 1280
//! quality = 75                  # JPEG quality (0-100)
//!
//! [page]
//! title = "●"
//! message = "●"
//! download_label = "●"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Bundle configuration.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Names of the artifacts written into the output directory.
    pub output: OutputConfig,
    /// Bounds and quality of the resized copies.
    pub resize: ResizeConfig,
    /// Fixed text on the gallery page.
    pub page: PageConfig,
}

impl BundleConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.quality > 100 {
            return Err(ConfigError::Validation(
                "resize.quality must be 0-100".into(),
            ));
        }
        if self.resize.max_width == 0 || self.resize.max_height == 0 {
            return Err(ConfigError::Validation(
                "resize.max_width and resize.max_height must be non-zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for (key, name) in self.output.named() {
            if !is_single_component(name) {
                return Err(ConfigError::Validation(format!(
                    "output.{key} must be a plain file or directory name, got {name:?}"
                )));
            }
            if !seen.insert(name.to_uppercase()) {
                return Err(ConfigError::Validation(format!(
                    "output.{key} collides with another output name: {name:?}"
                )));
            }
        }
        Ok(())
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Artifact names inside the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub archive_name: String,
    pub original_dir: String,
    pub resized_dir: String,
    pub page_name: String,
}

impl OutputConfig {
    fn named(&self) -> [(&'static str, &str); 4] {
        [
            ("archive_name", self.archive_name.as_str()),
            ("original_dir", self.original_dir.as_str()),
            ("resized_dir", self.resized_dir.as_str()),
            ("page_name", self.page_name.as_str()),
        ]
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            archive_name: "Photos.zip".to_string(),
            original_dir: "Original".to_string(),
            resized_dir: "Resized".to_string(),
            page_name: "Default.htm".to_string(),
        }
    }
}

/// Resized-copy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 0-100. The encoder treats 0 as 1.
    pub quality: u32,
}

impl ResizeConfig {
    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_width: 1280,
            max_height: 1280,
            quality: Quality::default().value(),
        }
    }
}

/// Gallery page text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub title: String,
    pub message: String,
    pub download_label: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "●".to_string(),
            message: "●".to_string(),
            download_label: "●".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BundleConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BundleConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BundleConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config.
///
/// With no path, the stock defaults are used. A given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<BundleConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock config file with all keys.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-page configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass the file with `photo-page --config <file> build <dirs>...`.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output layout
# ---------------------------------------------------------------------------
[output]
# Zip archive holding every source file under its original name.
archive_name = "Photos.zip"

# Directory of byte-identical copies.
original_dir = "Original"

# Directory of re-encoded JPEG copies.
resized_dir = "Resized"

# Gallery page linking everything above.
page_name = "Default.htm"

# ---------------------------------------------------------------------------
# Resized copies
# ---------------------------------------------------------------------------
[resize]
# Bounding box in pixels. Smaller images are never upscaled.
max_width = 1280
max_height = 1280

# JPEG encoding quality (0 = worst, 100 = best).
quality = 75

# ---------------------------------------------------------------------------
# Gallery page text
# ---------------------------------------------------------------------------
[page]
title = "●"
message = "●"
download_label = "●"
"##
}
