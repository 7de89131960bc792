//! Variable scope handling.
//!
//! Each step of a scenario carries its own variable mapping and
//! inherits another from the enclosing test case. [`merge_variables`]
//! folds the two into the effective mapping the step runs with.

use indexmap::IndexMap;
use serde_json::Value;

/// Ordered mapping from variable name to value.
///
/// Values are plain JSON; reference strings (`$name` / `${name}`)
/// are resolved later by the templating layer, not here.
pub type VariableMapping = IndexMap<String, Value>;

/// Merge a step-local mapping over an inherited one; local wins.
///
/// A local pair whose value is the literal reference to its own key
/// (`{"base_url": "$base_url"}` or `{"base_url": "${base_url}"}`) is
/// a pass-through placeholder and is dropped, leaving the inherited
/// value in place. The check is exact string equality, deliberately
/// not a reference parser: `" $base_url"` or `"$BASE_URL"` are kept
/// as ordinary literals.
///
/// Neither input is mutated; the result is a fresh mapping.
/// Inherited key order is kept for untouched keys, while overridden
/// and new keys take the local mapping's order.
pub fn merge_variables(
    local: &VariableMapping,
    inherited: &VariableMapping,
) -> VariableMapping {
    let mut merged = inherited.clone();

    for (key, value) in local {
        if is_self_reference(key, value) {
            continue;
        }
        // Re-insert so the overriding key picks up local ordering.
        merged.shift_remove(key);
        merged.insert(key.clone(), value.clone());
    }

    merged
}

/// Whether `value` is the literal `$key` or `${key}` form of `key`.
fn is_self_reference(key: &str, value: &Value) -> bool {
    match value {
        Value::String(s) => {
            s == &format!("${key}") || s == &format!("${{{key}}}")
        }
        _ => false,
    }
}
