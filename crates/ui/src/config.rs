use core_types::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("class_prefix {0:?} is not a CSS identifier")]
    ClassPrefix(String),
}

/// Viewer settings.
///
/// ```toml
/// class_prefix = "k"
/// rows = 40
/// cols = 120
///
/// [colours]
/// black = "#1d1f21"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub class_prefix: String,
    pub rows: u32,
    pub cols: u32,
    pub colours: BTreeMap<String, String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            class_prefix: css::DEFAULT_PREFIX.to_string(),
            rows: 24,
            cols: 80,
            colours: BTreeMap::new(),
        }
    }
}

fn is_css_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '-')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(target: "ui.config", "{path:?} not found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_css_ident(&self.class_prefix) {
            return Err(ConfigError::ClassPrefix(self.class_prefix.clone()));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.rows, self.cols)
    }
}
