//! Optional user configuration for the REPL.
//!
//! Read from `~/.recall/config.toml` when present; every field falls back
//! to the built-in defaults, so the file is never required.

use std::path::PathBuf;

use anyhow::{Context, Result};
use recall_core::Classifier;
use serde::Deserialize;

/// Root of the `config.toml` document.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ConfigRoot {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// History file settings.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct HistoryConfig {
    /// Overrides the default history file path (~/.recall/history).
    pub path: Option<PathBuf>,
}

/// Classifier threshold overrides.
///
/// Unset fields keep the named defaults from `recall_core::classifier`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ClassifierConfig {
    pub max_line_breaks: Option<usize>,
    pub template_min_len: Option<usize>,
    pub template_markers: Option<Vec<String>>,
    pub min_numbered_markers: Option<usize>,
}

impl ConfigRoot {
    /// Loads `~/.recall/config.toml`, falling back to defaults when the
    /// file or the home directory is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let Some(home_dir) = dirs::home_dir() else {
            return Ok(Self::default());
        };

        let path = home_dir.join(".recall").join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let config = toml::from_str(&text)
            .context(format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Builds a classifier with the configured overrides applied.
    pub fn classifier(&self) -> Classifier {
        let mut classifier = Classifier::new();

        if let Some(max_line_breaks) = self.classifier.max_line_breaks {
            classifier = classifier.with_max_line_breaks(max_line_breaks);
        }
        if let Some(template_min_len) = self.classifier.template_min_len {
            classifier = classifier.with_template_min_len(template_min_len);
        }
        if let Some(template_markers) = self.classifier.template_markers.clone() {
            classifier = classifier.with_template_markers(template_markers);
        }
        if let Some(min_numbered_markers) = self.classifier.min_numbered_markers {
            classifier = classifier.with_min_numbered_markers(min_numbered_markers);
        }

        classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ConfigRoot = toml::from_str("").unwrap();

        assert!(config.history.path.is_none());
        assert!(config.classifier.max_line_breaks.is_none());

        // Defaults classify a typed command as user-authored.
        assert!(!config.classifier().is_system_generated("/help"));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config: ConfigRoot = toml::from_str(
            r#"
            [history]
            path = "/tmp/custom-history"

            [classifier]
            max_line_breaks = 2
            "#,
        )
        .unwrap();

        assert_eq!(
            config.history.path.as_deref(),
            Some(std::path::Path::new("/tmp/custom-history"))
        );

        let classifier = config.classifier();
        assert!(classifier.is_system_generated("a\nb\nc\nd"));
    }

    #[test]
    fn test_custom_marker_set_replaces_defaults() {
        let config: ConfigRoot = toml::from_str(
            r#"
            [classifier]
            template_markers = ["Summarize the incident"]
            template_min_len = 10
            "#,
        )
        .unwrap();

        let classifier = config.classifier();
        assert!(classifier.is_system_generated("Summarize the incident for the on-call channel"));
        assert!(!classifier.is_system_generated("Generate a comprehensive report on everything"));
    }
}
