//! Core types for detection results.

use serde::{Deserialize, Serialize};

use crate::component::Location;

/// Severity tiers for issues, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Fixed sort weight: CRITICAL=4 down to LOW=1.
    pub fn weight(&self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MEDIUM" => Ok(Severity::Medium),
            "LOW" => Ok(Severity::Low),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Detector categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Template,
    Architecture,
    Reactivity,
    State,
    Routing,
    Performance,
    TypeSafety,
    Testing,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Template => "template",
            Category::Architecture => "architecture",
            Category::Reactivity => "reactivity",
            Category::State => "state",
            Category::Routing => "routing",
            Category::Performance => "performance",
            Category::TypeSafety => "type-safety",
            Category::Testing => "testing",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed catalog of anti-pattern ids, plus the reserved `PARSE_ERROR`
/// sentinel. Every issue carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternId {
    // Template
    VifWithVfor,
    VforWithoutKey,
    IndexAsKey,
    ComplexTemplateExpression,
    UnsanitizedVhtml,
    DeepNesting,
    InlineStyles,
    // Architecture
    GodComponent,
    TooManyProps,
    UnusedProps,
    PropDrilling,
    MixinOveruse,
    ParentCoupling,
    // Reactivity
    PropMutation,
    UnreleasedListener,
    UnreleasedTimer,
    WatcherSideEffects,
    DeepWatcher,
    ReactiveDestructure,
    DirectDomManipulation,
    // State
    AsyncMutation,
    CircularStoreRefs,
    DirectStateMutation,
    GodStore,
    // Routing
    OverloadedGuard,
    RouteCoupling,
    GuardMissingResolution,
    // Performance
    LargeListUnvirtualized,
    MissingShallowReactivity,
    ExpensiveComputed,
    EagerComponentImports,
    // Type safety
    AnyType,
    UntypedProps,
    UntypedEmits,
    NonNullAssertion,
    // Testing
    MissingTestHandle,
    NondeterministicRender,
    /// Reserved sentinel for files that could not be parsed.
    ParseError,
}

impl PatternId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::VifWithVfor => "VIF_WITH_VFOR",
            PatternId::VforWithoutKey => "VFOR_WITHOUT_KEY",
            PatternId::IndexAsKey => "INDEX_AS_KEY",
            PatternId::ComplexTemplateExpression => "COMPLEX_TEMPLATE_EXPRESSION",
            PatternId::UnsanitizedVhtml => "UNSANITIZED_VHTML",
            PatternId::DeepNesting => "DEEP_NESTING",
            PatternId::InlineStyles => "INLINE_STYLES",
            PatternId::GodComponent => "GOD_COMPONENT",
            PatternId::TooManyProps => "TOO_MANY_PROPS",
            PatternId::UnusedProps => "UNUSED_PROPS",
            PatternId::PropDrilling => "PROP_DRILLING",
            PatternId::MixinOveruse => "MIXIN_OVERUSE",
            PatternId::ParentCoupling => "PARENT_COUPLING",
            PatternId::PropMutation => "PROP_MUTATION",
            PatternId::UnreleasedListener => "UNRELEASED_LISTENER",
            PatternId::UnreleasedTimer => "UNRELEASED_TIMER",
            PatternId::WatcherSideEffects => "WATCHER_SIDE_EFFECTS",
            PatternId::DeepWatcher => "DEEP_WATCHER",
            PatternId::ReactiveDestructure => "REACTIVE_DESTRUCTURE",
            PatternId::DirectDomManipulation => "DIRECT_DOM_MANIPULATION",
            PatternId::AsyncMutation => "ASYNC_MUTATION",
            PatternId::CircularStoreRefs => "CIRCULAR_STORE_REFS",
            PatternId::DirectStateMutation => "DIRECT_STATE_MUTATION",
            PatternId::GodStore => "GOD_STORE",
            PatternId::OverloadedGuard => "OVERLOADED_GUARD",
            PatternId::RouteCoupling => "ROUTE_COUPLING",
            PatternId::GuardMissingResolution => "GUARD_MISSING_RESOLUTION",
            PatternId::LargeListUnvirtualized => "LARGE_LIST_UNVIRTUALIZED",
            PatternId::MissingShallowReactivity => "MISSING_SHALLOW_REACTIVITY",
            PatternId::ExpensiveComputed => "EXPENSIVE_COMPUTED",
            PatternId::EagerComponentImports => "EAGER_COMPONENT_IMPORTS",
            PatternId::AnyType => "ANY_TYPE",
            PatternId::UntypedProps => "UNTYPED_PROPS",
            PatternId::UntypedEmits => "UNTYPED_EMITS",
            PatternId::NonNullAssertion => "NON_NULL_ASSERTION",
            PatternId::MissingTestHandle => "MISSING_TEST_HANDLE",
            PatternId::NondeterministicRender => "NONDETERMINISTIC_RENDER",
            PatternId::ParseError => "PARSE_ERROR",
        }
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single detected issue. This struct is the stable wire contract with
/// any presentation layer; reporters must not assume fields beyond it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub pattern: PatternId,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    /// Suggested refactoring, when the detector has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refactoring: Option<String>,
}

impl Issue {
    pub fn new(pattern: PatternId, severity: Severity, message: String, location: Location) -> Self {
        Self {
            pattern,
            severity,
            message,
            location,
            refactoring: None,
        }
    }

    pub fn with_refactoring(mut self, refactoring: &str) -> Self {
        self.refactoring = Some(refactoring.to_string());
        self
    }
}

/// Result of analyzing one file: every issue found, sorted descending by
/// severity weight with detector registration order breaking ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub issues: Vec<Issue>,
}

impl FileResult {
    /// Whether any issue is at the given severity or above.
    pub fn has_severity(&self, min: Severity) -> bool {
        self.issues.iter().any(|i| i.severity.weight() >= min.weight())
    }
}

/// One input to the batch entry point.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights_are_ordered() {
        assert_eq!(Severity::Critical.weight(), 4);
        assert_eq!(Severity::High.weight(), 3);
        assert_eq!(Severity::Medium.weight(), 2);
        assert_eq!(Severity::Low.weight(), 1);
    }

    #[test]
    fn test_severity_round_trip() {
        for s in [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ] {
            assert_eq!(s.as_str().parse::<Severity>().unwrap(), s);
        }
    }

    #[test]
    fn test_issue_wire_schema() {
        let issue = Issue::new(
            PatternId::VifWithVfor,
            Severity::Critical,
            "v-if and v-for on the same element".to_string(),
            Location::new(3, 5),
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["pattern"], "VIF_WITH_VFOR");
        assert_eq!(json["severity"], "CRITICAL");
        assert_eq!(json["location"]["line"], 3);
        assert_eq!(json["location"]["column"], 5);
        assert!(json.get("refactoring").is_none());
    }

    #[test]
    fn test_file_result_wire_schema() {
        let result = FileResult {
            file_path: "src/App.vue".to_string(),
            issues: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("filePath").is_some());
    }

    #[test]
    fn test_has_severity_compares_by_weight() {
        let result = FileResult {
            file_path: "a.vue".to_string(),
            issues: vec![Issue::new(
                PatternId::InlineStyles,
                Severity::Medium,
                "inline style".to_string(),
                Location::default(),
            )],
        };
        assert!(result.has_severity(Severity::Low));
        assert!(result.has_severity(Severity::Medium));
        assert!(!result.has_severity(Severity::High));

        let empty = FileResult {
            file_path: "a.vue".to_string(),
            issues: vec![],
        };
        assert!(!empty.has_severity(Severity::Low));
    }

    #[test]
    fn test_parse_error_sentinel_name() {
        assert_eq!(PatternId::ParseError.as_str(), "PARSE_ERROR");
    }
}
