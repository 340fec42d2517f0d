//! sfclint - anti-pattern detection for single-file components.
//!
//! sfclint analyzes declarative UI component files and reports structural
//! anti-patterns: conditional rendering mixed with iteration, god
//! components, leaked listeners, overloaded navigation guards, untyped
//! interfaces and more. Detection is purely static - no component is ever
//! executed.
//!
//! # Architecture
//!
//! - `parser`: Splits a component file into a markup tree and a raw logic
//!   block
//! - `component`: The parsed data model detectors consume
//! - `tree`: Traversal and binding accessors over the markup tree
//! - `heuristics`: Best-effort text extractors over raw logic source
//! - `thresholds`: Numeric limits with partial-override merging
//! - `detect`: The pattern catalog, detector registry and orchestrator
//! - `config`: YAML configuration schema
//!
//! # Adding a New Detector
//!
//! Write a pure `fn(&ParsedComponent, &str, &Thresholds) -> Vec<Issue>` in
//! the matching category module, add its id to `PatternId`, and register it
//! in `detect/registry.rs`.

pub mod component;
pub mod config;
pub mod detect;
pub mod heuristics;
pub mod parser;
pub mod thresholds;
pub mod tree;

pub use component::{Binding, Location, LogicBlock, NodeKind, ParsedComponent, TreeNode};
pub use config::Config;
pub use detect::{
    analyze, analyze_many, registry, Category, FileResult, Issue, PatternId, Severity, SourceFile,
};
pub use parser::{parse, ParseError};
pub use thresholds::{ThresholdOverrides, Thresholds};
