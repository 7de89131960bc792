//! Tagged value type covering every shape the preparation pipeline
//! accepts.
//!
//! JSON alone cannot represent sets or fixed-arity tuples, which the
//! normalizer must treat differently from plain sequences, so the
//! pipeline operates on its own closed sum instead of
//! [`serde_json::Value`]. Keeping the sum closed lets the normalizer
//! dispatch with an exhaustive `match` instead of runtime type
//! inspection.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

/// A JSON-like value extended with set and tuple shapes.
#[derive(Debug, Clone)]
pub enum DataValue {
    /// Absent value; passed through normalization unchanged.
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered mapping; key order is insertion order.
    Mapping(IndexMap<String, DataValue>),
    /// Ordered sequence of arbitrary values.
    Sequence(Vec<DataValue>),
    /// Unordered collection; elements are kept in insertion order but
    /// compare as a set. Use [`DataValue::set`] to build one with
    /// duplicates removed.
    Set(Vec<DataValue>),
    /// Fixed-arity grouping; unlike `Sequence`, nested structure is
    /// always preserved by the normalizer.
    Tuple(Vec<DataValue>),
}

impl DataValue {
    /// Static name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "bool",
            DataValue::Number(_) => "number",
            DataValue::String(_) => "string",
            DataValue::Mapping(_) => "mapping",
            DataValue::Sequence(_) => "sequence",
            DataValue::Set(_) => "set",
            DataValue::Tuple(_) => "tuple",
        }
    }

    /// Whether the value is a leaf (not a container).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            DataValue::Null
                | DataValue::Bool(_)
                | DataValue::Number(_)
                | DataValue::String(_)
        )
    }

    /// Build a set, dropping duplicate elements while keeping the
    /// first occurrence's position.
    pub fn set<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = DataValue>,
    {
        let mut unique: Vec<DataValue> = Vec::new();
        for element in elements {
            if !unique.contains(&element) {
                unique.push(element);
            }
        }
        DataValue::Set(unique)
    }

    /// Project into a [`serde_json::Value`].
    ///
    /// Sets and tuples have no JSON counterpart and come out as
    /// arrays; the set's insertion order is used.
    pub fn to_json(&self) -> Value {
        match self {
            DataValue::Null => Value::Null,
            DataValue::Bool(b) => Value::Bool(*b),
            DataValue::Number(n) => Value::Number(n.clone()),
            DataValue::String(s) => Value::String(s.clone()),
            DataValue::Mapping(entries) => {
                let mut obj = Map::new();
                for (key, value) in entries {
                    obj.insert(key.clone(), value.to_json());
                }
                Value::Object(obj)
            }
            DataValue::Sequence(items)
            | DataValue::Set(items)
            | DataValue::Tuple(items) => Value::Array(
                items.iter().map(DataValue::to_json).collect(),
            ),
        }
    }
}

/// Structural equality; the `Set` arm compares as an unordered
/// collection (assuming deduplicated contents, which
/// [`DataValue::set`] and the normalizer both guarantee).
impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataValue::Null, DataValue::Null) => true,
            (DataValue::Bool(a), DataValue::Bool(b)) => a == b,
            (DataValue::Number(a), DataValue::Number(b)) => a == b,
            (DataValue::String(a), DataValue::String(b)) => a == b,
            (DataValue::Mapping(a), DataValue::Mapping(b)) => a == b,
            (DataValue::Sequence(a), DataValue::Sequence(b)) => a == b,
            (DataValue::Tuple(a), DataValue::Tuple(b)) => a == b,
            (DataValue::Set(a), DataValue::Set(b)) => {
                a.len() == b.len()
                    && a.iter().all(|element| b.contains(element))
            }
            _ => false,
        }
    }
}

impl From<Value> for DataValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DataValue::Null,
            Value::Bool(b) => DataValue::Bool(b),
            Value::Number(n) => DataValue::Number(n),
            Value::String(s) => DataValue::String(s),
            Value::Array(items) => DataValue::Sequence(
                items.into_iter().map(DataValue::from).collect(),
            ),
            Value::Object(obj) => DataValue::Mapping(
                obj.into_iter()
                    .map(|(k, v)| (k, DataValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::Number(Number::from(n))
    }
}

impl From<u64> for DataValue {
    fn from(n: u64) -> Self {
        DataValue::Number(Number::from(n))
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        // NaN / infinity have no Number representation; same
        // projection serde_json uses.
        Number::from_f64(n)
            .map_or(DataValue::Null, DataValue::Number)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::String(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::String(s)
    }
}

impl Serialize for DataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataValue::Null => serializer.serialize_unit(),
            DataValue::Bool(b) => serializer.serialize_bool(*b),
            DataValue::Number(n) => n.serialize(serializer),
            DataValue::String(s) => serializer.serialize_str(s),
            DataValue::Mapping(entries) => {
                let mut map =
                    serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            DataValue::Sequence(items)
            | DataValue::Set(items)
            | DataValue::Tuple(items) => {
                let mut seq =
                    serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}
