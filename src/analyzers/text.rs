//! Text duplication and spelling analysis.
//!
//! Finds exact duplicate lines, duplicate n-line blocks, and suspect
//! vocabulary in a documentation string.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::vocab::WordList;

/// Text analyzer.
pub struct Analyzer {
    words: WordList,
    block_lines: usize,
    max_suspects: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(WordList::default())
    }
}

impl Analyzer {
    /// Create a text analyzer with the given common-word dictionary.
    pub fn new(words: WordList) -> Self {
        Self {
            words,
            block_lines: 3,
            max_suspects: 200,
        }
    }

    /// Create a text analyzer from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            words: WordList::from_config(config),
            block_lines: config.text.block_lines.max(1),
            max_suspects: config.text.max_suspect_words,
        }
    }

    /// Analyze a text for duplicate lines, duplicate blocks, and suspect
    /// words.
    pub fn analyze(&self, text: &str) -> Analysis {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        Analysis {
            duplicate_lines: duplicates(count_in_order(lines.iter().cloned())),
            duplicate_blocks: duplicates(count_in_order(
                lines.windows(self.block_lines).map(|w| w.join(" ")),
            )),
            suspect_words: self.suspect_words(&lines),
        }
    }

    fn suspect_words(&self, lines: &[String]) -> Vec<CountedEntry> {
        let tokens = lines.iter().flat_map(|line| {
            line.split_whitespace().filter_map(|word| {
                let clean: String = word
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic() || *c == '\'')
                    .collect::<String>()
                    .to_ascii_lowercase();
                if clean.len() > 2 && !self.words.is_common(&clean) {
                    Some(clean)
                } else {
                    None
                }
            })
        });

        duplicates(count_in_order(tokens))
            .into_iter()
            .take(self.max_suspects)
            .collect()
    }
}

/// One reported value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedEntry {
    pub value: String,
    pub count: usize,
}

/// Full text analysis result. Entries keep first-seen order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Trimmed lines occurring more than once.
    pub duplicate_lines: Vec<CountedEntry>,
    /// Overlapping n-line windows occurring more than once. Windows are
    /// not merged: a long duplicated region reports several blocks.
    pub duplicate_blocks: Vec<CountedEntry>,
    /// Uncommon words occurring more than once, capped.
    pub suspect_words: Vec<CountedEntry>,
}

impl Analysis {
    /// Whether the analysis found nothing to report.
    pub fn is_clean(&self) -> bool {
        self.duplicate_lines.is_empty()
            && self.duplicate_blocks.is_empty()
            && self.suspect_words.is_empty()
    }
}

/// Count items preserving first-seen order.
fn count_in_order(items: impl Iterator<Item = String>) -> Vec<CountedEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<CountedEntry> = Vec::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(item.clone(), entries.len());
                entries.push(CountedEntry {
                    value: item,
                    count: 1,
                });
            }
        }
    }
    entries
}

fn duplicates(entries: Vec<CountedEntry>) -> Vec<CountedEntry> {
    entries.into_iter().filter(|e| e.count > 1).collect()
}
