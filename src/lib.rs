//! Trollify
//!
//! Compose a mock social media post styled after X (Twitter), Facebook or
//! Instagram, preview it as a visual tree and export the preview as a PNG.
//!
//! # Overview
//!
//! - [`catalog`]: per-platform templates, themes and fonts (static data)
//! - [`model`]: the post and comment being edited
//! - [`rendering`]: preview renderer plus the layout/paint/raster pipeline
//! - [`editor`]: one editing session owning all mutable state
//! - [`export`]: snapshot a preview into a downloadable PNG
//! - [`async_api`]: worker-backed async facade with background decode/export
//!
//! # Example
//!
//! ```no_run
//! use trollify::{Editor, Exporter, SessionConfig};
//! use trollify::model::Field;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig { policies_accepted: true, ..Default::default() };
//! let mut editor = Editor::new(config.clone(), "twitter")?;
//! editor.set_field(Field::DisplayName, "Ada Lovelace");
//! editor.set_field(Field::Likes, "1200");
//!
//! let exporter = Exporter::new(&config);
//! let file = editor.export(&exporter)?;
//! file.save_to(".")?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod error;
pub use error::{Error, Result};

pub mod catalog;
pub mod consent;
pub mod model;
pub mod rendering;

pub mod editor;
pub mod export;

// Async-friendly session facade (worker thread + blocking pool)
pub mod async_api;

pub use async_api::Studio;
pub use catalog::{Font, Platform, TemplateEntry, TemplateKind, Theme};
pub use editor::{Editor, ImageSlot, ImageTicket};
pub use export::{ExportedImage, Exporter};

/// Configuration for an editing session
///
/// The consent flag is injected here once at session start rather than read
/// from ambient state; see [`consent::ConsentStore`].
///
/// # Examples
///
/// ```
/// let cfg = trollify::SessionConfig::default();
/// assert_eq!(cfg.export_scale, 2);
/// assert!(!cfg.policies_accepted);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Prefix of exported file names
    pub product_name: String,
    /// Device pixels per CSS pixel in exported PNGs
    pub export_scale: u32,
    /// Theme-colored margin around the card in exports, in CSS pixels
    pub export_padding: u32,
    /// Theme active when a session starts
    pub default_theme: Theme,
    /// Font active when a session starts
    pub default_font: Font,
    /// Whether the user has accepted the usage policies
    pub policies_accepted: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            product_name: "trollify".to_string(),
            export_scale: 2,
            export_padding: 16,
            default_theme: Theme::Dark,
            default_font: Font::Arial,
            policies_accepted: false,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.export_scale == 0 {
            return Err(Error::ConfigError("export_scale must be at least 1".into()));
        }
        if self.export_scale > 8 {
            return Err(Error::ConfigError(format!("export_scale {} is above the maximum of 8", self.export_scale)));
        }
        if self.product_name.trim().is_empty() {
            return Err(Error::ConfigError("product_name must not be empty".into()));
        }
        Ok(())
    }

    /// Parse a JSON config; missing keys fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: SessionConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read the consent flag from `store` into this config
    pub fn with_consent(mut self, store: &dyn consent::ConsentStore) -> Result<Self> {
        self.policies_accepted = store.load()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.export_scale, 2);
        assert_eq!(config.default_theme, Theme::Dark);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let cfg = SessionConfig::from_json(r#"{"export_scale": 3, "default_font": "Open Sans"}"#).unwrap();
        assert_eq!(cfg.export_scale, 3);
        assert_eq!(cfg.default_font, Font::OpenSans);
        assert_eq!(cfg.product_name, "trollify");
    }

    #[test]
    fn test_invalid_scale_rejected() {
        assert!(matches!(
            SessionConfig::from_json(r#"{"export_scale": 0}"#),
            Err(Error::ConfigError(_))
        ));
    }
}
