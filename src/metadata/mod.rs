//! The typed metadata tree produced by the extractor.
//!
//! Built once per run and treated as immutable input by the analyzers;
//! analyzer reports are separate structures and are never written back
//! into this tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder comment value for declarations without one.
pub const NO_COMMENT: &str = "No comment";

/// Metadata for a whole project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name, taken from the source tree root.
    pub project_name: String,
    /// Classes in filesystem-traversal order (not sorted by name).
    pub classes: Vec<ClassMetadata>,
}

impl ProjectMetadata {
    /// Total method count across all classes.
    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }
}

/// Metadata for one class-like declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Class name.
    pub name: String,
    /// Containing package or namespace ("" when none).
    pub package: String,
    /// Heuristic classification of the class role.
    pub kind: ClassKind,
    /// Raw field declarations, in declaration order.
    pub fields: Vec<String>,
    /// Methods in declaration order.
    pub methods: Vec<MethodMeta>,
    /// Declaration comment, or "No comment".
    pub comment: String,
    /// Originating source file.
    pub file: PathBuf,
}

/// Metadata for one method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodMeta {
    /// Method name.
    pub name: String,
    /// Raw "type name" parameter descriptors, in declaration order.
    pub params: Vec<String>,
    /// Return type text.
    pub return_type: String,
    /// Raw body text, when captured.
    pub body: Option<String>,
    /// Names of detected repository-style calls, one entry per call site.
    pub repository_calls: Vec<String>,
    /// Domain keywords detected in the containing file. Identical for
    /// every method declared in the same file.
    pub domain_keywords: Vec<String>,
    /// Declaration comment, or "No comment".
    pub comment: String,
}

/// Heuristic class role, from an ordered first-match-wins rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Controller,
    Service,
    Repository,
    Entity,
    Model,
}

/// Ordered classification rules. Order is load-bearing: a name containing
/// both "service" and "repository" classifies as Service.
const KIND_RULES: &[(&[&str], ClassKind)] = &[
    (&["controller"], ClassKind::Controller),
    (&["service"], ClassKind::Service),
    (&["repository", "repo"], ClassKind::Repository),
    (&["entity", "model"], ClassKind::Entity),
];

impl ClassKind {
    /// Classify a class name by substring, first matching rule wins.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        for (needles, kind) in KIND_RULES {
            if needles.iter().any(|n| lower.contains(n)) {
                return *kind;
            }
        }
        ClassKind::Model
    }

    /// Display label for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Controller => "Controller",
            Self::Service => "Service",
            Self::Repository => "Repository",
            Self::Entity => "Entity",
            Self::Model => "Model",
        }
    }
}

impl std::fmt::Display for ClassKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
