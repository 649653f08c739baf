//! Per-type height heuristic parameters.
//!
//! Every block kind gets a [`TypeRule`] describing its base dimensions and
//! bounds. Rule tables are injected into the estimator at construction so
//! that product surfaces with different typography can supply their own
//! constants; the built-in table is a reasonable default for a 600 px column.
//! Rules are only mutated through the calibration path.

use indexmap::IndexMap;

/// Heuristic parameters for one block kind.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeRule {
    /// Height of the block before any content scaling
    pub base_height: f64,
    /// Height of one line / item / row
    pub line_height: f64,
    /// Vertical padding (or fixed chrome) around the content
    pub padding: f64,
    /// Lower bound on any estimate for this kind
    pub min_height: f64,
    /// Upper bound on any estimate for this kind
    pub max_height: f64,
}

impl TypeRule {
    /// Create a rule with the given base and line height; padding defaults
    /// to 8 px and the bounds to [24, 2000].
    pub fn new(base_height: f64, line_height: f64) -> Self {
        Self {
            base_height,
            line_height,
            padding: 8.0,
            min_height: 24.0,
            max_height: 2000.0,
        }
    }

    /// Set the padding.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the min/max bounds.
    pub fn with_bounds(mut self, min_height: f64, max_height: f64) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    /// Clamp a raw estimate into this rule's bounds. Non-finite input
    /// resolves to `min_height` so the estimator stays total.
    pub fn clamp(&self, height: f64) -> f64 {
        if !height.is_finite() {
            return self.min_height;
        }
        height.max(self.min_height).min(self.max_height)
    }
}

/// Injectable table of per-kind rules with a fallback for unknown kinds.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: IndexMap<String, TypeRule>,
    default_rule: TypeRule,
}

impl RuleTable {
    /// Create an empty table with the given fallback rule.
    pub fn empty(default_rule: TypeRule) -> Self {
        Self {
            rules: IndexMap::new(),
            default_rule,
        }
    }

    /// The built-in rule set covering the standard block kinds.
    pub fn builtin() -> Self {
        let mut table = Self::empty(TypeRule::new(40.0, 20.0));
        table.set("paragraph", TypeRule::new(48.0, 24.0).with_bounds(24.0, 4000.0));
        table.set("heading", TypeRule::new(40.0, 32.0).with_bounds(32.0, 200.0));
        table.set(
            "list",
            TypeRule::new(28.0, 28.0)
                .with_padding(12.0)
                .with_bounds(28.0, 2400.0),
        );
        table.set(
            "image",
            TypeRule::new(300.0, 0.0)
                .with_padding(0.0)
                .with_bounds(60.0, 1200.0),
        );
        table.set(
            "code",
            TypeRule::new(48.0, 18.0)
                .with_padding(24.0)
                .with_bounds(48.0, 2000.0),
        );
        table.set("table", TypeRule::new(36.0, 32.0).with_bounds(68.0, 3000.0));
        table.set(
            "embed",
            TypeRule::new(200.0, 0.0)
                .with_padding(0.0)
                .with_bounds(80.0, 800.0),
        );
        table
    }

    /// Get the rule for a kind, falling back to the default rule.
    pub fn get(&self, kind: &str) -> &TypeRule {
        self.rules.get(kind).unwrap_or(&self.default_rule)
    }

    /// Get a mutable rule for a kind, materializing the default rule for
    /// kinds not yet in the table (calibration can learn unknown kinds).
    pub fn get_mut(&mut self, kind: &str) -> &mut TypeRule {
        let default_rule = self.default_rule;
        self.rules.entry(kind.to_string()).or_insert(default_rule)
    }

    /// Set or replace the rule for a kind.
    pub fn set(&mut self, kind: &str, rule: TypeRule) {
        self.rules.insert(kind.to_string(), rule);
    }

    /// Iterate over the registered kinds.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|k| k.as_str())
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no per-kind rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        let rule = TypeRule::new(40.0, 20.0).with_bounds(30.0, 100.0);
        assert!((rule.clamp(10.0) - 30.0).abs() < 0.001);
        assert!((rule.clamp(50.0) - 50.0).abs() < 0.001);
        assert!((rule.clamp(500.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_clamp_non_finite() {
        let rule = TypeRule::new(40.0, 20.0).with_bounds(30.0, 100.0);
        assert!((rule.clamp(f64::NAN) - 30.0).abs() < 0.001);
        assert!((rule.clamp(f64::INFINITY) - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_builtin_covers_standard_kinds() {
        let table = RuleTable::builtin();
        for kind in ["paragraph", "heading", "list", "image", "code", "table", "embed"] {
            assert!(table.get(kind).min_height > 0.0, "missing rule for {kind}");
        }
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let table = RuleTable::builtin();
        let rule = table.get("callout");
        assert!((rule.base_height - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_get_mut_materializes_unknown_kind() {
        let mut table = RuleTable::builtin();
        table.get_mut("callout").base_height = 64.0;
        assert!((table.get("callout").base_height - 64.0).abs() < 0.001);
        // Default rule itself is untouched
        assert!((table.get("another").base_height - 40.0).abs() < 0.001);
    }
}
