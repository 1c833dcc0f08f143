use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Viewer settings, loadable from a JSON5 file. Every field has a default so a
/// config file only needs to name what it changes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub clear_color: [f32; 4],
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Multisample count requested for the default framebuffer, 0 disables it.
    pub samples: u8,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "OpenGL Test".into(),
            samples: 4,
            resizable: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/vertex.shader")),
            fragment: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/shaders/fragment.shader"
            )),
        }
    }
}

impl ViewerConfig {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path)?;

        Self::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let config: Self = json5::from_str(config_str)?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }

        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(
                "clear color components must be within 0..=1".into(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Input(#[from] std::io::Error),
    #[error("could not parse config file: {0}")]
    Format(#[from] json5::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = ViewerConfig::parse("{}").unwrap();

        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.window.title, "OpenGL Test");
        assert_eq!(config.window.samples, 4);
        assert!(!config.window.resizable);
        assert_eq!(config.clear_color, [0.0; 4]);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = ViewerConfig::parse(
            r#"{
                // dark blue background
                clear_color: [0.0, 0.0, 0.4, 0.0],
                window: { title: "cube", },
            }"#,
        )
        .unwrap();

        assert_eq!(config.clear_color, [0.0, 0.0, 0.4, 0.0]);
        assert_eq!(config.window.title, "cube");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.shaders, ShaderConfig::default());
    }

    #[test]
    fn shader_paths() {
        let config =
            ViewerConfig::parse(r#"{ shaders: { vertex: "a.vert", fragment: "b.frag" } }"#)
                .unwrap();

        assert_eq!(config.shaders.vertex, PathBuf::from("a.vert"));
        assert_eq!(config.shaders.fragment, PathBuf::from("b.frag"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ViewerConfig::parse("{ windw: {} }").unwrap_err();

        assert!(matches!(err, ConfigError::Format(_)));
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = ViewerConfig::parse("{ window: { width: 0 } }").unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn clear_color_out_of_range() {
        let err = ViewerConfig::parse("{ clear_color: [2.0, 0.0, 0.0, 1.0] }").unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bundled_config_parses() {
        let config = ViewerConfig::parse(include_str!("../cube.json5")).unwrap();

        assert_eq!(config.clear_color, [0.0, 0.0, 0.4, 0.0]);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn missing_file() {
        let err = ViewerConfig::load_from_path("does/not/exist.json5").unwrap_err();

        assert!(matches!(err, ConfigError::Input(_)));
    }
}
