//! # Viewer Configuration
//!
//! Top-level settings for the scene viewer: logging, the main window, and the gamepad
//! normalization profile. Loaded from TOML or RON through the [`Config`] trait.
//!
//! ```toml
//! log_level = "info"
//!
//! [window]
//! title = "Scene Viewer"
//! width = 1024
//! height = 576
//! sample_count = 4
//! windowed = true
//!
//! [gamepad]
//! flip_axes = [3]
//! trigger_split = { axis = 2, negative_axis = 7 }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::input::gamepad::GamepadProfile;

/// Main window creation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title shown in the window's title bar
    pub title: String,
    /// Preferred width of the usable area
    pub width: u32,
    /// Preferred height of the usable area
    pub height: u32,
    /// MSAA samples requested for the default framebuffer
    pub sample_count: u32,
    /// Open on the desktop rather than fullscreen
    pub windowed: bool,
}

impl WindowConfig {
    /// Set the window title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the usable area size
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Validate the window parameters
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a zero-sized window or a sample count above 16.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.sample_count > 16 {
            return Err(ConfigError::Invalid(format!(
                "sample count {} exceeds 16",
                self.sample_count
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".to_string(),
            width: 1024,
            height: 576,
            sample_count: 4,
            windowed: true,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Main window parameters
    pub window: WindowConfig,
    /// Gamepad axis normalization
    pub gamepad: GamepadProfile,
}

impl ViewerConfig {
    /// Validate the entire configuration
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] describing the first unusable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }
        self.window.validate()
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            gamepad: GamepadProfile::default(),
        }
    }
}

impl Config for ViewerConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gamepad::TriggerSplit;

    #[test]
    fn test_defaults_validate() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 576);
        assert_eq!(config.window.sample_count, 4);
        assert!(config.window.windowed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ViewerConfig = toml::from_str(
            r#"
            log_level = "debug"

            [window]
            width = 800
            height = 600

            [gamepad]
            flip_axes = []
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.title, "Scene Viewer");
        assert!(config.gamepad.flip_axes.is_empty());
        assert_eq!(
            config.gamepad.trigger_split,
            Some(TriggerSplit { axis: 2, negative_axis: 7 })
        );
    }

    #[test]
    fn test_rejects_zero_size() {
        let mut config = ViewerConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_load_ron() {
        let path = std::env::temp_dir().join(format!("viewer_config_{}.ron", std::process::id()));
        let config = ViewerConfig {
            window: WindowConfig::default().with_title("Atrium").with_size(640, 480),
            ..ViewerConfig::default()
        };

        config.save_to_file(&path).expect("save");
        let loaded = ViewerConfig::load_from_file(&path).expect("load");
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = ViewerConfig::load_from_file("viewer.yaml");
        // Missing file is reported before the extension check
        assert!(result.is_err());
        assert!(matches!(
            ViewerConfig::default().save_to_file("viewer.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
