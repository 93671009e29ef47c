//! Precedence tiers
//!
//! Tiers are layered low to high (Explicit > Env > Files > Defaults) and each
//! higher tier replaces a key's value wholesale. Deep merging only happens
//! between files, never across tiers.

use crate::Mapping;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Defaults,
    Files,
    Environment,
    Overrides,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Defaults => "defaults",
            Tier::Files => "files",
            Tier::Environment => "environment",
            Tier::Overrides => "overrides",
        };
        f.write_str(name)
    }
}

/// Layer tiers in the order given, overwrite-by-key.
pub fn compose(layers: &[(Tier, &Mapping)]) -> Mapping {
    let mut result = Mapping::new();
    for (tier, values) in layers {
        if !values.is_empty() {
            tracing::debug!("Applying {} tier ({} keys)", tier, values.len());
        }
        for (key, value) in values.iter() {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use serde_json::json;

    fn map(value: Value) -> Mapping {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_higher_tier_wins() {
        let defaults = map(json!({"log_level": "DEBUG", "workers": 1}));
        let files = map(json!({"log_level": "INFO"}));
        let env = map(json!({"log_level": "WARNING"}));
        let overrides = map(json!({"workers": 8}));

        let result = compose(&[
            (Tier::Defaults, &defaults),
            (Tier::Files, &files),
            (Tier::Environment, &env),
            (Tier::Overrides, &overrides),
        ]);

        assert_eq!(Value::Object(result), json!({"log_level": "WARNING", "workers": 8}));
    }

    #[test]
    fn test_tiers_never_deep_merge() {
        let files = map(json!({"db": {"host": "a", "port": 1}, "tags": ["x"]}));
        let env = map(json!({"db": {"port": 2}, "tags": ["y"]}));

        let result = compose(&[(Tier::Files, &files), (Tier::Environment, &env)]);

        assert_eq!(result["db"], json!({"port": 2}));
        assert_eq!(result["tags"], json!(["y"]));
    }

    #[test]
    fn test_tier_order() {
        assert!(Tier::Defaults < Tier::Files);
        assert!(Tier::Environment < Tier::Overrides);
    }
}
