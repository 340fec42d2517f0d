//! Numeric limits consumed by the detectors.
//!
//! A single default set ships with the engine; callers supply partial
//! overrides that merge on top without mutating the defaults. The merged
//! value is threaded into every detector invocation — no detector reads a
//! process-wide default, so concurrent analyses with different
//! configurations cannot interfere.

use serde::{Deserialize, Serialize};

/// Named numeric limits, one per metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    /// Interpolation expression length before complexity tiers kick in.
    pub template_expression_length: usize,
    /// Markup nesting depth before the nesting detector fires.
    pub template_depth: usize,
    /// Logic-block line count metric of the god-component check.
    pub script_lines: usize,
    /// Method count metric of the god-component check.
    pub method_count: usize,
    /// Prop count metric of the god-component check.
    pub prop_count: usize,
    /// Computed-property count metric of the god-component check.
    pub computed_count: usize,
    /// Prop count before the interface is flagged on its own.
    pub max_props: usize,
    /// Mixin count before mixin overuse is flagged.
    pub mixin_count: usize,
    /// Static list size before an unvirtualized `v-for` is flagged.
    pub virtualization_threshold: usize,
    /// Object-literal key count before deep reactivity is flagged.
    pub shallow_reactivity_keys: usize,
    /// Responsibility categories a navigation guard may carry.
    pub guard_responsibilities: usize,
    /// Line count a navigation guard body may have.
    pub guard_lines: usize,
    /// State keys a single store may declare.
    pub store_state_keys: usize,
    /// Actions a single store may declare.
    pub store_action_count: usize,
    /// Side-effect categories a watcher body may touch.
    pub watcher_effect_categories: usize,
    /// Non-null assertions tolerated in a TypeScript block.
    pub non_null_assertions: usize,
    /// Pass-through props before prop drilling is flagged.
    pub prop_drilling_min: usize,
    /// Static component imports before eager loading is flagged.
    pub component_import_count: usize,
    /// Route-object accesses before route coupling is flagged.
    pub route_access_count: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            template_expression_length: 40,
            template_depth: 6,
            script_lines: 500,
            method_count: 20,
            prop_count: 15,
            computed_count: 10,
            max_props: 10,
            mixin_count: 3,
            virtualization_threshold: 100,
            shallow_reactivity_keys: 50,
            guard_responsibilities: 3,
            guard_lines: 50,
            store_state_keys: 20,
            store_action_count: 15,
            watcher_effect_categories: 2,
            non_null_assertions: 3,
            prop_drilling_min: 2,
            component_import_count: 15,
            route_access_count: 3,
        }
    }
}

impl Thresholds {
    /// Merge partial overrides over these values; override wins, the
    /// receiver is left untouched.
    pub fn with_overrides(&self, overrides: &ThresholdOverrides) -> Thresholds {
        Thresholds {
            template_expression_length: overrides
                .template_expression_length
                .unwrap_or(self.template_expression_length),
            template_depth: overrides.template_depth.unwrap_or(self.template_depth),
            script_lines: overrides.script_lines.unwrap_or(self.script_lines),
            method_count: overrides.method_count.unwrap_or(self.method_count),
            prop_count: overrides.prop_count.unwrap_or(self.prop_count),
            computed_count: overrides.computed_count.unwrap_or(self.computed_count),
            max_props: overrides.max_props.unwrap_or(self.max_props),
            mixin_count: overrides.mixin_count.unwrap_or(self.mixin_count),
            virtualization_threshold: overrides
                .virtualization_threshold
                .unwrap_or(self.virtualization_threshold),
            shallow_reactivity_keys: overrides
                .shallow_reactivity_keys
                .unwrap_or(self.shallow_reactivity_keys),
            guard_responsibilities: overrides
                .guard_responsibilities
                .unwrap_or(self.guard_responsibilities),
            guard_lines: overrides.guard_lines.unwrap_or(self.guard_lines),
            store_state_keys: overrides.store_state_keys.unwrap_or(self.store_state_keys),
            store_action_count: overrides
                .store_action_count
                .unwrap_or(self.store_action_count),
            watcher_effect_categories: overrides
                .watcher_effect_categories
                .unwrap_or(self.watcher_effect_categories),
            non_null_assertions: overrides
                .non_null_assertions
                .unwrap_or(self.non_null_assertions),
            prop_drilling_min: overrides.prop_drilling_min.unwrap_or(self.prop_drilling_min),
            component_import_count: overrides
                .component_import_count
                .unwrap_or(self.component_import_count),
            route_access_count: overrides
                .route_access_count
                .unwrap_or(self.route_access_count),
        }
    }
}

/// Partial threshold set for configuration overrides. Every field is
/// optional; absent fields keep the default value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdOverrides {
    pub template_expression_length: Option<usize>,
    pub template_depth: Option<usize>,
    pub script_lines: Option<usize>,
    pub method_count: Option<usize>,
    pub prop_count: Option<usize>,
    pub computed_count: Option<usize>,
    pub max_props: Option<usize>,
    pub mixin_count: Option<usize>,
    pub virtualization_threshold: Option<usize>,
    pub shallow_reactivity_keys: Option<usize>,
    pub guard_responsibilities: Option<usize>,
    pub guard_lines: Option<usize>,
    pub store_state_keys: Option<usize>,
    pub store_action_count: Option<usize>,
    pub watcher_effect_categories: Option<usize>,
    pub non_null_assertions: Option<usize>,
    pub prop_drilling_min: Option<usize>,
    pub component_import_count: Option<usize>,
    pub route_access_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_and_defaults_survive() {
        let defaults = Thresholds::default();
        let overrides = ThresholdOverrides {
            template_depth: Some(3),
            ..Default::default()
        };
        let merged = defaults.with_overrides(&overrides);
        assert_eq!(merged.template_depth, 3);
        assert_eq!(merged.script_lines, defaults.script_lines);
        // The default set itself is untouched.
        assert_eq!(defaults.template_depth, 6);
    }

    #[test]
    fn test_overrides_parse_camel_case() {
        let overrides: ThresholdOverrides =
            serde_yaml::from_str("virtualizationThreshold: 250\nmethodCount: 10\n").unwrap();
        assert_eq!(overrides.virtualization_threshold, Some(250));
        assert_eq!(overrides.method_count, Some(10));
        assert_eq!(overrides.prop_count, None);
    }
}
