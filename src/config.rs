//! Sampler configuration, persisted as TOML.
//!
//! ```toml
//! outline = "conf/lcco-outline.txt"   # omit for the built-in QH outline
//! volumes = "data/eng-QH-callno"      # omit to start without volume ids
//! fallback = "enclosing"              # or "strict"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::FallbackPolicy;
use crate::error::{ConfigError, ConfigResult};
use crate::outline::OutlineSource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Outline file, one category per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<PathBuf>,
    /// Volume call-number listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<PathBuf>,
    /// Lookup behaviour below a matched span.
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

impl SamplerConfig {
    pub fn outline_source(&self) -> OutlineSource {
        OutlineSource::from_path(self.outline.as_deref())
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: SamplerConfig = toml::from_str("").unwrap();
        assert_eq!(config, SamplerConfig::default());
        assert_eq!(config.outline_source(), OutlineSource::Builtin);
        assert_eq!(config.fallback, FallbackPolicy::Enclosing);
    }

    #[test]
    fn parses_all_fields() {
        let config: SamplerConfig = toml::from_str(
            r#"
            outline = "conf/outline.txt"
            volumes = "data/eng-QH-callno"
            fallback = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.outline.as_deref(), Some(Path::new("conf/outline.txt")));
        assert_eq!(config.volumes.as_deref(), Some(Path::new("data/eng-QH-callno")));
        assert_eq!(config.fallback, FallbackPolicy::Strict);
    }

    #[test]
    fn unknown_fallback_is_a_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sampler.toml");
        std::fs::write(&path, "fallback = \"nearest\"\n").unwrap();
        assert!(matches!(
            SamplerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/sampler.toml");
        let config = SamplerConfig {
            outline: None,
            volumes: Some(PathBuf::from("/data/callno")),
            fallback: FallbackPolicy::Strict,
        };
        config.save(&path).unwrap();
        assert_eq!(SamplerConfig::load(&path).unwrap(), config);
    }
}
