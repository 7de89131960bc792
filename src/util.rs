//! Small helpers shared by the harness around the pipeline.

use crate::vars::VariableMapping;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::info;

/// Default truncation length for logged bodies.
pub const DEFAULT_OMIT_LEN: usize = 512;

/// Lower-case every key of an ordered mapping.
///
/// Used to canonicalize header-like mappings before comparison. On
/// a case collision the later key wins.
pub fn lower_map_keys<V: Clone>(
    origin: &IndexMap<String, V>,
) -> IndexMap<String, V> {
    origin
        .iter()
        .map(|(key, value)| (key.to_lowercase(), value.clone()))
        .collect()
}

/// Truncate an over-long body for logging, appending a marker with
/// the number of characters dropped.
pub fn omit_long_data(body: &str, omit_len: usize) -> String {
    let total = body.chars().count();
    if total <= omit_len {
        return body.to_string();
    }

    let omitted: String = body.chars().take(omit_len).collect();
    format!(
        "{omitted} ... OMITTED {} CHARACTERS ...",
        total - omit_len
    )
}

/// Reorder a mapping by an explicit key order.
///
/// Keys named in `custom_order` come first, in that order; keys not
/// named keep their original relative order at the end.
pub fn sort_map_by_custom_order<V: Clone>(
    raw: &IndexMap<String, V>,
    custom_order: &[&str],
) -> IndexMap<String, V> {
    let mut sorted = IndexMap::with_capacity(raw.len());
    for key in custom_order {
        if let Some(value) = raw.get(*key) {
            sorted.insert(key.to_string(), value.clone());
        }
    }
    for (key, value) in raw {
        if !sorted.contains_key(key) {
            sorted.insert(key.clone(), value.clone());
        }
    }
    sorted
}

/// Log a variable mapping as an aligned two-column table.
pub fn print_variables(variables: &VariableMapping) {
    if variables.is_empty() {
        return;
    }

    let mut content = String::from(
        "\n==================== Output ====================\n",
    );
    content.push_str(&format!("{:<16} : {}\n", "Variable", "Value"));
    content.push_str(&format!(
        "{:<16} : {}\n",
        "-".repeat(16),
        "-".repeat(29)
    ));

    for (key, value) in variables {
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        content.push_str(&format!("{key:<16} : {rendered}\n"));
    }

    content.push_str(&"-".repeat(48));
    info!("{content}");
}
