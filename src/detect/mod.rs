//! Anti-pattern detection: the pattern catalog, detector registry and the
//! per-file orchestrator.

pub mod architecture;
pub mod performance;
pub mod reactivity;
pub mod registry;
pub mod routing;
pub mod runner;
pub mod state;
pub mod template;
pub mod testing;
pub mod type_safety;
pub mod types;

pub use registry::{registry, Detector, DetectorEntry};
pub use runner::{analyze, analyze_many};
pub use types::{Category, FileResult, Issue, PatternId, Severity, SourceFile};
