//! Duplicate method-body detection.
//!
//! Groups methods whose bodies are identical after a light normalization.
//! Exact-match only, complementing the fuzzy scoring in
//! [`similarity`](crate::analyzers::similarity).

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::metadata::ProjectMetadata;

/// Duplicate-body analyzer.
pub struct Analyzer {
    whitespace: Regex,
    single_char: Regex,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create a duplicate-body analyzer.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("valid whitespace pattern"),
            single_char: Regex::new(r"\b\w\b").expect("valid single-char pattern"),
        }
    }

    /// Group methods by identical normalized body; groups of size one are
    /// never reported. Groups keep first-seen order.
    pub fn analyze(&self, metadata: &ProjectMetadata) -> Vec<DuplicateBodyGroup> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<MethodRef>> = Vec::new();

        for class in &metadata.classes {
            for method in &class.methods {
                let Some(body) = method.body.as_deref() else {
                    continue;
                };
                if body.trim().is_empty() {
                    continue;
                }
                let norm = self.normalize(body);
                let member = MethodRef {
                    class: class.name.clone(),
                    method: method.name.clone(),
                };
                match index.get(&norm) {
                    Some(&i) => groups[i].push(member),
                    None => {
                        index.insert(norm, groups.len());
                        groups.push(vec![member]);
                    }
                }
            }
        }

        groups
            .into_iter()
            .filter(|members| members.len() > 1)
            .map(|members| DuplicateBodyGroup {
                occurrences: members.len(),
                methods: members,
            })
            .collect()
    }

    /// Normalize a body: collapse whitespace runs to one space, delete
    /// isolated single-character word tokens, trim. A heuristic noise
    /// filter, not a parser-level normalization; the deletion step can
    /// leave interior double spaces, which stay part of the key.
    pub fn normalize(&self, body: &str) -> String {
        let collapsed = self.whitespace.replace_all(body, " ");
        let stripped = self.single_char.replace_all(&collapsed, "");
        stripped.trim().to_string()
    }
}

/// A group of methods sharing one normalized body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateBodyGroup {
    /// The methods in the group.
    pub methods: Vec<MethodRef>,
    /// Group size.
    pub occurrences: usize,
}

/// Reference to one method in a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: String,
    pub method: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassKind, ClassMetadata, MethodMeta, NO_COMMENT};
    use std::path::PathBuf;

    fn method(name: &str, body: Option<&str>) -> MethodMeta {
        MethodMeta {
            name: name.to_string(),
            params: Vec::new(),
            return_type: "void".to_string(),
            body: body.map(|b| b.to_string()),
            repository_calls: Vec::new(),
            domain_keywords: Vec::new(),
            comment: NO_COMMENT.to_string(),
        }
    }

    fn project(methods: Vec<MethodMeta>) -> ProjectMetadata {
        ProjectMetadata {
            project_name: "demo".to_string(),
            classes: vec![ClassMetadata {
                name: "Demo".to_string(),
                package: String::new(),
                kind: ClassKind::Model,
                fields: Vec::new(),
                methods,
                comment: NO_COMMENT.to_string(),
                file: PathBuf::from("Demo.java"),
            }],
        }
    }

    #[test]
    fn test_normalize_whitespace_and_single_chars() {
        let analyzer = Analyzer::new();
        assert_eq!(
            analyzer.normalize("  return   x;  "),
            analyzer.normalize("return x;")
        );
        assert_eq!(analyzer.normalize("return   value;"), "return value;");
    }

    #[test]
    fn test_duplicate_bodies_grouped() {
        let analyzer = Analyzer::new();
        let groups = analyzer.analyze(&project(vec![
            method("first", Some("{ return total; }")),
            method("second", Some("{  return   total;  }")),
            method("third", Some("{ return other; }")),
        ]));

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].occurrences, 2);
        assert_eq!(
            groups[0].methods,
            vec![
                MethodRef {
                    class: "Demo".to_string(),
                    method: "first".to_string()
                },
                MethodRef {
                    class: "Demo".to_string(),
                    method: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_and_blank_bodies_skipped() {
        let analyzer = Analyzer::new();
        let groups = analyzer.analyze(&project(vec![
            method("a", None),
            method("b", Some("   ")),
            method("c", None),
        ]));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_singleton_groups_absent() {
        let analyzer = Analyzer::new();
        let groups = analyzer.analyze(&project(vec![
            method("a", Some("{ alpha(); }")),
            method("b", Some("{ beta(); }")),
        ]));
        assert!(groups.is_empty());
    }

    #[test]
    fn test_single_char_tokens_ignored_in_comparison() {
        let analyzer = Analyzer::new();
        // Loop variables i and j differ only in the stripped token.
        let groups = analyzer.analyze(&project(vec![
            method("a", Some("{ int i = 0; use(i); }")),
            method("b", Some("{ int j = 0; use(j); }")),
        ]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].occurrences, 2);
    }
}
