//! The detector registry.
//!
//! A fixed table of pure detector functions. Registration order is the
//! deterministic tie-break for equally-severe issues, so entries are
//! grouped by category and never reordered casually.

use crate::component::ParsedComponent;
use crate::thresholds::Thresholds;

use super::{architecture, performance, reactivity, routing, state, template, testing, type_safety};
use super::{Category, Issue, PatternId};

/// Signature every detector implements. Pure: no detector mutates the
/// component, touches global state, or depends on another detector.
pub type Detector = fn(&ParsedComponent, &str, &Thresholds) -> Vec<Issue>;

/// One registered detector.
pub struct DetectorEntry {
    pub id: PatternId,
    pub category: Category,
    pub run: Detector,
}

macro_rules! entry {
    ($id:ident, $category:ident, $run:path) => {
        DetectorEntry {
            id: PatternId::$id,
            category: Category::$category,
            run: $run,
        }
    };
}

static REGISTRY: &[DetectorEntry] = &[
    // Template
    entry!(VifWithVfor, Template, template::detect_vif_with_vfor),
    entry!(VforWithoutKey, Template, template::detect_vfor_without_key),
    entry!(IndexAsKey, Template, template::detect_index_as_key),
    entry!(
        ComplexTemplateExpression,
        Template,
        template::detect_complex_expression
    ),
    entry!(UnsanitizedVhtml, Template, template::detect_unsanitized_vhtml),
    entry!(DeepNesting, Template, template::detect_deep_nesting),
    entry!(InlineStyles, Template, template::detect_inline_styles),
    // Architecture
    entry!(GodComponent, Architecture, architecture::detect_god_component),
    entry!(TooManyProps, Architecture, architecture::detect_too_many_props),
    entry!(UnusedProps, Architecture, architecture::detect_unused_props),
    entry!(PropDrilling, Architecture, architecture::detect_prop_drilling),
    entry!(MixinOveruse, Architecture, architecture::detect_mixin_overuse),
    entry!(ParentCoupling, Architecture, architecture::detect_parent_coupling),
    // Reactivity
    entry!(PropMutation, Reactivity, reactivity::detect_prop_mutation),
    entry!(
        UnreleasedListener,
        Reactivity,
        reactivity::detect_unreleased_listener
    ),
    entry!(UnreleasedTimer, Reactivity, reactivity::detect_unreleased_timer),
    entry!(
        WatcherSideEffects,
        Reactivity,
        reactivity::detect_watcher_side_effects
    ),
    entry!(DeepWatcher, Reactivity, reactivity::detect_deep_watcher),
    entry!(
        ReactiveDestructure,
        Reactivity,
        reactivity::detect_reactive_destructure
    ),
    entry!(
        DirectDomManipulation,
        Reactivity,
        reactivity::detect_direct_dom_manipulation
    ),
    // State
    entry!(AsyncMutation, State, state::detect_async_mutation),
    entry!(CircularStoreRefs, State, state::detect_circular_store_refs),
    entry!(DirectStateMutation, State, state::detect_direct_state_mutation),
    entry!(GodStore, State, state::detect_god_store),
    // Routing
    entry!(OverloadedGuard, Routing, routing::detect_overloaded_guard),
    entry!(RouteCoupling, Routing, routing::detect_route_coupling),
    entry!(
        GuardMissingResolution,
        Routing,
        routing::detect_guard_missing_resolution
    ),
    // Performance
    entry!(
        LargeListUnvirtualized,
        Performance,
        performance::detect_large_list_unvirtualized
    ),
    entry!(
        MissingShallowReactivity,
        Performance,
        performance::detect_missing_shallow_reactivity
    ),
    entry!(ExpensiveComputed, Performance, performance::detect_expensive_computed),
    entry!(
        EagerComponentImports,
        Performance,
        performance::detect_eager_component_imports
    ),
    // Type safety
    entry!(AnyType, TypeSafety, type_safety::detect_any_type),
    entry!(UntypedProps, TypeSafety, type_safety::detect_untyped_props),
    entry!(UntypedEmits, TypeSafety, type_safety::detect_untyped_emits),
    entry!(NonNullAssertion, TypeSafety, type_safety::detect_non_null_assertion),
    // Testing
    entry!(MissingTestHandle, Testing, testing::detect_missing_test_handle),
    entry!(
        NondeterministicRender,
        Testing,
        testing::detect_nondeterministic_render
    ),
];

/// Every registered detector, in registration order.
pub fn registry() -> &'static [DetectorEntry] {
    REGISTRY
}
