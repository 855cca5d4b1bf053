//! Fixed word lists used as oracles by the extractor and analyzers.
//!
//! Both lists are plain immutable values passed in explicitly, never
//! process-wide state, so every analysis function stays pure and
//! independently testable.

use std::collections::HashSet;

use crate::config::Config;

/// Default common-word dictionary for suspect-word detection.
pub const DEFAULT_COMMON_WORDS: &[&str] = &[
    "the", "and", "for", "with", "not", "this", "that", "from", "into", "using", "use", "create",
    "generate", "service", "controller", "repository", "response", "request", "return", "error",
    "status", "code", "product", "inventory", "warehouse", "stock", "user", "auth", "token",
    "lock", "redis", "id", "name", "list", "get", "set", "add", "update", "delete", "find",
];

/// Default domain vocabulary for keyword detection.
pub const DEFAULT_DOMAIN_TERMS: &[&str] = &[
    "inventory",
    "stock",
    "warehouse",
    "product",
    "order",
    "user",
    "auth",
    "token",
    "lock",
    "redis",
];

/// Membership oracle over a fixed set of common words.
#[derive(Debug, Clone)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Build a word list; entries are lowercased.
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.vocabulary.common_words.iter().cloned())
    }

    /// Check whether a lowercase word is in the list.
    pub fn is_common(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::new(DEFAULT_COMMON_WORDS.iter().map(|w| w.to_string()))
    }
}

/// Ordered domain-term vocabulary matched as substrings of file text.
#[derive(Debug, Clone)]
pub struct DomainVocabulary {
    terms: Vec<String>,
}

impl DomainVocabulary {
    /// Build a vocabulary; terms are lowercased, order preserved.
    pub fn new(terms: impl IntoIterator<Item = String>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Build from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.vocabulary.domain_terms.iter().cloned())
    }

    /// All terms contained in the given lowercase text, in vocabulary order.
    pub fn matches_in(&self, text_lower: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|t| text_lower.contains(t.as_str()))
            .cloned()
            .collect()
    }

    /// The configured terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN_TERMS.iter().map(|t| t.to_string()))
    }
}
