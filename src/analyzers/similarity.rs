//! Pairwise method similarity across a whole project.
//!
//! Scores every unordered pair of methods by the Jaccard index of their
//! token sets to suggest reuse opportunities. The scan is quadratic in the
//! total method count; that bound is accepted for single-repository scale.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::metadata::{MethodMeta, ProjectMetadata};

/// Suggestion for pairs scoring above the high threshold.
const HIGHLY_SIMILAR: &str = "Highly similar — consider refactor/reuse";
/// Suggestion for the remaining reported pairs.
const POSSIBLE_REUSE: &str = "Possible reuse";

/// Method similarity analyzer.
pub struct Analyzer {
    threshold: f64,
    high_threshold: f64,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            high_threshold: 0.8,
        }
    }
}

impl Analyzer {
    /// Create a similarity analyzer from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.similarity.threshold,
            high_threshold: config.similarity.high_threshold,
        }
    }

    /// Score every unordered method pair and report those at or above the
    /// threshold, sorted by score descending. The sort is stable, so ties
    /// keep pair-generation order.
    pub fn analyze(&self, metadata: &ProjectMetadata) -> Vec<SimilarPair> {
        let methods: Vec<MethodContext<'_>> = metadata
            .classes
            .iter()
            .flat_map(|class| {
                class.methods.iter().map(move |method| MethodContext {
                    class: &class.name,
                    method: &method.name,
                    tokens: token_set(method),
                })
            })
            .collect();

        let mut pairs = Vec::new();
        for i in 0..methods.len() {
            for j in (i + 1)..methods.len() {
                let a = &methods[i];
                let b = &methods[j];
                let score = jaccard(&a.tokens, &b.tokens);
                if score >= self.threshold {
                    pairs.push(SimilarPair {
                        class_a: a.class.to_string(),
                        method_a: a.method.to_string(),
                        class_b: b.class.to_string(),
                        method_b: b.method.to_string(),
                        score: (score * 100.0).round() / 100.0,
                        suggestion: if score > self.high_threshold {
                            HIGHLY_SIMILAR.to_string()
                        } else {
                            POSSIBLE_REUSE.to_string()
                        },
                    });
                }
            }
        }

        pairs.sort_by(|x, y| y.score.partial_cmp(&x.score).unwrap_or(Ordering::Equal));
        pairs
    }
}

struct MethodContext<'a> {
    class: &'a str,
    method: &'a str,
    tokens: HashSet<String>,
}

/// One reported method pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPair {
    pub class_a: String,
    pub method_a: String,
    pub class_b: String,
    pub method_b: String,
    /// Jaccard score, rounded to two decimals.
    pub score: f64,
    pub suggestion: String,
}

/// Jaccard index of two token sets; 0 when either set is empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// The token set used for similarity scoring: camel-case fragments of the
/// method name, fragments of each parameter descriptor, repository-call
/// names, and domain keywords, all lowercased.
pub fn token_set(method: &MethodMeta) -> HashSet<String> {
    let mut tokens = HashSet::new();

    for fragment in split_camel(&method.name) {
        tokens.insert(fragment.to_lowercase());
    }
    for param in &method.params {
        for fragment in param.split(|c: char| !c.is_ascii_alphabetic()) {
            if !fragment.is_empty() {
                tokens.insert(fragment.to_lowercase());
            }
        }
    }
    for call in &method.repository_calls {
        tokens.insert(call.to_lowercase());
    }
    for keyword in &method.domain_keywords {
        tokens.insert(keyword.to_lowercase());
    }

    tokens
}

/// Split an identifier before each uppercase letter and on `_`/`-`.
fn split_camel(name: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                fragments.push(std::mem::take(&mut current));
            }
        } else if c.is_ascii_uppercase() {
            if !current.is_empty() {
                fragments.push(std::mem::take(&mut current));
            }
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}
