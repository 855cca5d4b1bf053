//! Configuration loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exclude patterns (glob).
    #[serde(rename = "exclude")]
    pub exclude_patterns: Vec<String>,
    /// Word lists used by suspect-word and keyword detection.
    pub vocabulary: VocabularyConfig,
    /// Method similarity thresholds.
    pub similarity: SimilarityConfig,
    /// Text duplication configuration.
    pub text: TextConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            vocabulary: VocabularyConfig::default(),
            similarity: SimilarityConfig::default(),
            text: TextConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Missing keys fall back to
    /// defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::core::Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Load configuration from a directory, looking for docgauge.toml or
    /// .docgauge/docgauge.toml. Missing files are silently skipped
    /// (defaults are used).
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        for candidate in [dir.join("docgauge.toml"), dir.join(".docgauge/docgauge.toml")] {
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }
        Ok(Self::default())
    }

    /// Create default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }
}

/// Common-word and domain-vocabulary configuration.
///
/// Both lists are fixed for the lifetime of a run. An empty common-word
/// list degrades gracefully: every qualifying token becomes suspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Words never reported as suspect spelling.
    pub common_words: Vec<String>,
    /// Business-domain terms matched as substrings of file text.
    pub domain_terms: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            common_words: crate::vocab::DEFAULT_COMMON_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
            domain_terms: crate::vocab::DEFAULT_DOMAIN_TERMS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Method similarity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Minimum Jaccard score for a pair to be reported.
    pub threshold: f64,
    /// Score above which a pair is labeled highly similar.
    pub high_threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            high_threshold: 0.8,
        }
    }
}

/// Text duplication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Lines per duplicate-block window.
    pub block_lines: usize,
    /// Maximum suspect-word entries reported.
    pub max_suspect_words: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            block_lines: 3,
            max_suspect_words: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.exclude_patterns.is_empty());
        assert!((config.similarity.threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.text.block_lines, 3);
        assert_eq!(config.text.max_suspect_words, 200);
        assert!(config.vocabulary.common_words.contains(&"the".to_string()));
        assert!(config
            .vocabulary
            .domain_terms
            .contains(&"inventory".to_string()));
    }

    #[test]
    fn test_default_toml_parses() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.text.block_lines, 3);
        assert!(!config.vocabulary.common_words.is_empty());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/docgauge.toml").unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[similarity]\nthreshold = 0.5\n").unwrap();
        assert!((config.similarity.threshold - 0.5).abs() < f64::EPSILON);
        assert!((config.similarity.high_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.text.max_suspect_words, 200);
    }

    #[test]
    fn test_load_default_from_dir() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("docgauge.toml"),
            "exclude = [\"**/generated/**\"]\n",
        )
        .unwrap();

        let config = Config::load_default(temp.path()).unwrap();
        assert_eq!(config.exclude_patterns, vec!["**/generated/**"]);

        let empty = tempfile::tempdir().unwrap();
        let config = Config::load_default(empty.path()).unwrap();
        assert!(config.exclude_patterns.is_empty());
    }
}
