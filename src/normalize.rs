//! Recursive normalization of response and expectation data.
//!
//! Before comparison, both declared expectations and extracted
//! response data are folded into a canonical form: string leaves are
//! trimmed and lower-cased, and any leaf matching a sentinel value
//! ("no value present", `@null@` by default) is dropped from its
//! container. The walk covers every [`DataValue`] shape; the closed
//! enum keeps the dispatch exhaustive, so an unsupported shape cannot
//! reach the normalizer at all.

use crate::value::DataValue;
use indexmap::IndexMap;
use thiserror::Error;

/// Default sentinel marking "no value present".
pub const DEFAULT_SENTINEL: &str = "@null@";

/// Error raised for data the normalizer refuses to canonicalize.
///
/// Both variants flag authoring mistakes in test data; they are
/// never transient and must not be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A set contained a nested container. Set elements must stay
    /// scalar so they remain hashable/comparable.
    #[error(
        "unsupported {kind} element in set: {value} \
         (set elements must be scalar)"
    )]
    UnsupportedType { kind: &'static str, value: String },

    /// A type-specialized entry point received the wrong container
    /// kind.
    #[error("expected {expected} to normalize, got {actual}")]
    ShapeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Normalize any value.
///
/// Scalars pass through (strings trimmed and lower-cased); containers
/// are rebuilt recursively with sentinel-matching string leaves
/// omitted. The input is never mutated.
///
/// A bare string whose canonical form equals the sentinel has no
/// containing collection to be omitted from; it is returned in
/// canonical form. Container-level elision never reaches this case.
pub fn normalize(
    value: &DataValue,
    sentinel: &str,
) -> Result<DataValue, NormalizeError> {
    Ok(match normalize_node(value, sentinel)? {
        Some(normalized) => normalized,
        None => DataValue::String(sentinel.to_string()),
    })
}

/// Normalize a mapping; any other shape is a [`ShapeMismatch`].
///
/// [`ShapeMismatch`]: NormalizeError::ShapeMismatch
pub fn normalize_mapping(
    value: &DataValue,
    sentinel: &str,
) -> Result<DataValue, NormalizeError> {
    match value {
        DataValue::Mapping(entries) => Ok(DataValue::Mapping(
            normalize_entries(entries, sentinel)?,
        )),
        other => Err(NormalizeError::ShapeMismatch {
            expected: "mapping",
            actual: other.kind(),
        }),
    }
}

/// Normalize a sequence; any other shape is a [`ShapeMismatch`].
///
/// [`ShapeMismatch`]: NormalizeError::ShapeMismatch
pub fn normalize_sequence(
    value: &DataValue,
    sentinel: &str,
) -> Result<DataValue, NormalizeError> {
    match value {
        DataValue::Sequence(items) => Ok(DataValue::Sequence(
            normalize_sequence_items(items, sentinel)?,
        )),
        other => Err(NormalizeError::ShapeMismatch {
            expected: "sequence",
            actual: other.kind(),
        }),
    }
}

/// Normalize a set; any other shape is a [`ShapeMismatch`].
///
/// [`ShapeMismatch`]: NormalizeError::ShapeMismatch
pub fn normalize_set(
    value: &DataValue,
    sentinel: &str,
) -> Result<DataValue, NormalizeError> {
    match value {
        DataValue::Set(elements) => {
            normalize_set_elements(elements, sentinel)
        }
        other => Err(NormalizeError::ShapeMismatch {
            expected: "set",
            actual: other.kind(),
        }),
    }
}

/// Normalize a tuple; any other shape is a [`ShapeMismatch`].
///
/// [`ShapeMismatch`]: NormalizeError::ShapeMismatch
pub fn normalize_tuple(
    value: &DataValue,
    sentinel: &str,
) -> Result<DataValue, NormalizeError> {
    match value {
        DataValue::Tuple(items) => Ok(DataValue::Tuple(
            normalize_tuple_items(items, sentinel)?,
        )),
        other => Err(NormalizeError::ShapeMismatch {
            expected: "tuple",
            actual: other.kind(),
        }),
    }
}

/// Normalize one node. `Ok(None)` means the node canonicalized to
/// the sentinel and must be omitted by its container; containers
/// themselves always come back `Some`.
fn normalize_node(
    value: &DataValue,
    sentinel: &str,
) -> Result<Option<DataValue>, NormalizeError> {
    match value {
        DataValue::Null | DataValue::Bool(_) | DataValue::Number(_) => {
            Ok(Some(value.clone()))
        }
        DataValue::String(s) => {
            let canonical = s.trim().to_lowercase();
            if canonical == sentinel {
                Ok(None)
            } else {
                Ok(Some(DataValue::String(canonical)))
            }
        }
        DataValue::Mapping(entries) => Ok(Some(DataValue::Mapping(
            normalize_entries(entries, sentinel)?,
        ))),
        DataValue::Sequence(items) => Ok(Some(DataValue::Sequence(
            normalize_sequence_items(items, sentinel)?,
        ))),
        DataValue::Set(elements) => {
            Ok(Some(normalize_set_elements(elements, sentinel)?))
        }
        DataValue::Tuple(items) => Ok(Some(DataValue::Tuple(
            normalize_tuple_items(items, sentinel)?,
        ))),
    }
}

fn normalize_entries(
    entries: &IndexMap<String, DataValue>,
    sentinel: &str,
) -> Result<IndexMap<String, DataValue>, NormalizeError> {
    let mut result = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        if let Some(normalized) = normalize_node(value, sentinel)? {
            result.insert(key.clone(), normalized);
        }
    }
    Ok(result)
}

/// Normalize sequence elements.
///
/// A nested sequence is spliced flat into its parent rather than
/// kept nested; mappings, sets, and tuples stay nested. The
/// asymmetry is load-bearing: downstream comparisons rely on
/// sequence-of-sequence data arriving flattened.
fn normalize_sequence_items(
    items: &[DataValue],
    sentinel: &str,
) -> Result<Vec<DataValue>, NormalizeError> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        match item {
            DataValue::Sequence(nested) => {
                result.extend(normalize_sequence_items(
                    nested, sentinel,
                )?);
            }
            other => {
                if let Some(normalized) =
                    normalize_node(other, sentinel)?
                {
                    result.push(normalized);
                }
            }
        }
    }
    Ok(result)
}

fn normalize_tuple_items(
    items: &[DataValue],
    sentinel: &str,
) -> Result<Vec<DataValue>, NormalizeError> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if let Some(normalized) = normalize_node(item, sentinel)? {
            result.push(normalized);
        }
    }
    Ok(result)
}

fn normalize_set_elements(
    elements: &[DataValue],
    sentinel: &str,
) -> Result<DataValue, NormalizeError> {
    let mut result: Vec<DataValue> =
        Vec::with_capacity(elements.len());
    for element in elements {
        if !element.is_scalar() {
            return Err(NormalizeError::UnsupportedType {
                kind: element.kind(),
                value: element.to_json().to_string(),
            });
        }
        if let Some(normalized) = normalize_node(element, sentinel)? {
            // Canonicalization can collapse distinct inputs.
            if !result.contains(&normalized) {
                result.push(normalized);
            }
        }
    }
    Ok(DataValue::Set(result))
}
