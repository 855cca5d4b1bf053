//! Metadata extraction over parsed source units.
//!
//! Walks a file set, parses each unit, and builds one [`ClassMetadata`]
//! record per class-like declaration. A unit that fails to parse is logged
//! and skipped; the run only fails when the source tree itself cannot be
//! read.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::Config;
use crate::core::{Error, FileSet, Result};
use crate::metadata::{ClassKind, ClassMetadata, MethodMeta, ProjectMetadata, NO_COMMENT};
use crate::parser::{CallSite, Parser, SourceUnit};
use crate::vocab::DomainVocabulary;

/// Metadata extractor.
pub struct Extractor {
    vocabulary: DomainVocabulary,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DomainVocabulary::default())
    }
}

impl Extractor {
    /// Create an extractor with the given domain vocabulary.
    pub fn new(vocabulary: DomainVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(DomainVocabulary::from_config(config))
    }

    /// Extract metadata for every source file under `root`.
    ///
    /// Files parse in parallel; results are reassembled in traversal order
    /// so the output is identical to a sequential run.
    pub fn extract_path(&self, root: impl AsRef<Path>, config: &Config) -> Result<ProjectMetadata> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::invalid_input(format!(
                "source tree root is not a directory: {}",
                root.display()
            )));
        }

        let start = Instant::now();
        let files = FileSet::from_path(root, config)?;
        let project_name = project_name_from_root(files.root());

        let parser = Parser::new();
        let units: Vec<SourceUnit> = files
            .files()
            .par_iter()
            .filter_map(|path| match parser.parse_file(path) {
                Ok(unit) => Some(unit),
                Err(e) => {
                    tracing::warn!("parse file {} failed: {}", path.display(), e);
                    None
                }
            })
            .collect();

        let metadata = self.extract_units(&project_name, &units);
        tracing::info!(
            "extracted {} classes from {} files in {:?}",
            metadata.classes.len(),
            files.len(),
            start.elapsed()
        );
        Ok(metadata)
    }

    /// Build the metadata tree from already-parsed source units.
    pub fn extract_units(&self, project_name: &str, units: &[SourceUnit]) -> ProjectMetadata {
        let mut classes = Vec::new();
        for unit in units {
            self.extract_unit(unit, &mut classes);
        }
        ProjectMetadata {
            project_name: project_name.to_string(),
            classes,
        }
    }

    fn extract_unit(&self, unit: &SourceUnit, classes: &mut Vec<ClassMetadata>) {
        // Keywords come from the whole file text, so every method declared
        // in this unit carries the identical list.
        let keywords = self.vocabulary.matches_in(&unit.text.to_lowercase());

        for class in &unit.classes {
            let methods = class
                .methods
                .iter()
                .map(|m| MethodMeta {
                    name: m.name.clone(),
                    params: m.params.clone(),
                    return_type: m.return_type.clone(),
                    body: m.body.clone(),
                    repository_calls: repository_calls(&m.calls),
                    domain_keywords: keywords.clone(),
                    comment: comment_or_default(m.comment.as_deref()),
                })
                .collect();

            classes.push(ClassMetadata {
                name: class.name.clone(),
                package: class.package.clone(),
                kind: ClassKind::classify(&class.name),
                fields: class.fields.clone(),
                methods,
                comment: comment_or_default(class.comment.as_deref()),
                file: unit.path.clone(),
            });
        }
    }
}

/// Call names whose receiver looks like a persistence-layer component.
/// One entry per call site; repeated calls are not deduplicated.
fn repository_calls(calls: &[CallSite]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|call| {
            let receiver = call.receiver.as_deref()?.to_lowercase();
            if receiver.ends_with("repository") || receiver.contains("repo") {
                Some(call.name.clone())
            } else {
                None
            }
        })
        .collect()
}

fn comment_or_default(comment: Option<&str>) -> String {
    match comment {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => NO_COMMENT.to_string(),
    }
}

fn project_name_from_root(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ClassDecl, MethodDecl};
    use std::path::PathBuf;

    fn unit_with(text: &str, classes: Vec<ClassDecl>) -> SourceUnit {
        SourceUnit {
            path: PathBuf::from("Demo.java"),
            language: crate::core::Language::Java,
            text: text.to_string(),
            classes,
        }
    }

    fn method_with_calls(name: &str, calls: Vec<CallSite>) -> MethodDecl {
        MethodDecl {
            name: name.to_string(),
            params: Vec::new(),
            return_type: "void".to_string(),
            body: Some("{ }".to_string()),
            calls,
            comment: None,
        }
    }

    #[test]
    fn test_repository_call_detection() {
        let calls = vec![
            CallSite {
                receiver: Some("orderRepository".to_string()),
                name: "save".to_string(),
            },
            CallSite {
                receiver: Some("orderRepository".to_string()),
                name: "save".to_string(),
            },
            CallSite {
                receiver: Some("repoClient".to_string()),
                name: "fetch".to_string(),
            },
            CallSite {
                receiver: Some("logger".to_string()),
                name: "info".to_string(),
            },
            CallSite {
                receiver: None,
                name: "helper".to_string(),
            },
        ];

        // Each qualifying call site is recorded; repeats are kept.
        assert_eq!(repository_calls(&calls), vec!["save", "save", "fetch"]);
    }

    #[test]
    fn test_keywords_identical_per_file() {
        let extractor = Extractor::default();
        let unit = unit_with(
            "class Demo { void a() {} void b() {} } // inventory and stock",
            vec![ClassDecl {
                name: "Demo".to_string(),
                package: String::new(),
                comment: None,
                fields: Vec::new(),
                methods: vec![
                    method_with_calls("a", Vec::new()),
                    method_with_calls("b", Vec::new()),
                ],
            }],
        );

        let metadata = extractor.extract_units("demo", &[unit]);
        let methods = &metadata.classes[0].methods;
        assert_eq!(methods[0].domain_keywords, vec!["inventory", "stock"]);
        assert_eq!(methods[0].domain_keywords, methods[1].domain_keywords);
    }

    #[test]
    fn test_missing_comments_become_placeholder() {
        let extractor = Extractor::default();
        let unit = unit_with(
            "class Demo {}",
            vec![ClassDecl {
                name: "Demo".to_string(),
                package: String::new(),
                comment: None,
                fields: Vec::new(),
                methods: vec![method_with_calls("run", Vec::new())],
            }],
        );

        let metadata = extractor.extract_units("demo", &[unit]);
        assert_eq!(metadata.classes[0].comment, NO_COMMENT);
        assert_eq!(metadata.classes[0].methods[0].comment, NO_COMMENT);
    }

    #[test]
    fn test_class_kind_assigned() {
        let extractor = Extractor::default();
        let unit = unit_with(
            "class OrderController {}",
            vec![ClassDecl {
                name: "OrderController".to_string(),
                package: "com.shop".to_string(),
                comment: None,
                fields: Vec::new(),
                methods: Vec::new(),
            }],
        );

        let metadata = extractor.extract_units("demo", &[unit]);
        assert_eq!(metadata.classes[0].kind, ClassKind::Controller);
        assert_eq!(metadata.classes[0].package, "com.shop");
    }

    #[test]
    fn test_extract_path_rejects_missing_root() {
        let extractor = Extractor::default();
        let err = extractor
            .extract_path("/nonexistent/source/tree", &Config::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
