//! Docgauge - repository metadata extraction and documentation-quality
//! analysis.
//!
//! Docgauge walks a source tree, builds a typed metadata tree (classes,
//! fields, methods, call relationships, keyword hints), and runs heuristic
//! analyses over that tree and over generated documentation text:
//! duplicate lines/blocks, suspect vocabulary, pairwise method similarity,
//! and duplicate method bodies.
//!
//! # Supported Languages
//!
//! Java, C#, TypeScript
//!
//! # Example
//!
//! ```no_run
//! use docgauge::analyzers::similarity;
//! use docgauge::config::Config;
//! use docgauge::Extractor;
//!
//! let config = Config::default();
//! let extractor = Extractor::from_config(&config);
//! let metadata = extractor.extract_path(".", &config).unwrap();
//! let pairs = similarity::Analyzer::from_config(&config).analyze(&metadata);
//! println!("{} classes, {} similar pairs", metadata.classes.len(), pairs.len());
//! ```

pub mod analyzers;
pub mod config;
pub mod core;
pub mod extractor;
pub mod metadata;
pub mod parser;
pub mod vocab;

pub use crate::core::{Error, Result};
pub use extractor::Extractor;
pub use metadata::{ClassKind, ClassMetadata, MethodMeta, ProjectMetadata};
