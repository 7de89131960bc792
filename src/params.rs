//! Data-driven parameter expansion.
//!
//! A parametrized test case declares one or more independent
//! dimensions (user agents, account fixtures, app versions, ...),
//! each a list of partial variable mappings. The runner executes the
//! full cartesian product, one run per combination, with all
//! fragments of a combination merged into a single flat mapping.

use crate::vars::VariableMapping;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One axis of a data-driven test: a list of variable-mapping
/// fragments.
pub type ParameterDimension = Vec<VariableMapping>;

/// Error raised while interpreting a declarative `parameters:` block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// A fragment's shape does not match its dimension key.
    #[error(
        "parameter dimension '{key}' declares variables {names:?} \
         but fragment {fragment} does not match"
    )]
    MalformedDimension {
        key: String,
        names: Vec<String>,
        fragment: String,
    },
}

/// Expand parameter dimensions into the full cartesian product.
///
/// Returns one merged mapping per combination, in nested-loop order
/// (the first dimension varies slowest). Key conflicts across
/// dimensions resolve by plain update semantics: the later dimension
/// wins.
///
/// Edge cases follow product semantics: no dimensions → no runs;
/// a single dimension is returned as-is; any empty dimension empties
/// the whole product.
pub fn expand_parameters(
    dimensions: &[ParameterDimension],
) -> Vec<VariableMapping> {
    if dimensions.is_empty() {
        return Vec::new();
    }
    if dimensions.len() == 1 {
        return dimensions[0].clone();
    }

    let mut product: Vec<VariableMapping> =
        vec![VariableMapping::new()];

    for dimension in dimensions {
        let mut next =
            Vec::with_capacity(product.len() * dimension.len());
        for combined in &product {
            for fragment in dimension {
                let mut merged = combined.clone();
                for (key, value) in fragment {
                    merged.insert(key.clone(), value.clone());
                }
                next.push(merged);
            }
        }
        product = next;
    }

    product
}

/// Declarative `parameters:` block of a test case.
///
/// Each entry names one dimension. The key lists the variables the
/// dimension binds, joined by `-` for compound dimensions; the value
/// lists the fragments:
///
/// ```yaml
/// user_agent: ["iOS/10.1", "iOS/10.2"]
/// username-password:
///   - ["user1", "111111"]
///   - ["user2", "222222"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(pub IndexMap<String, Vec<Value>>);

impl Parameters {
    /// Deserialize a parameters block from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize the parameters block to a YAML string.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Interpret each entry as a [`ParameterDimension`], in
    /// declaration order.
    pub fn dimensions(
        &self,
    ) -> Result<Vec<ParameterDimension>, ParameterError> {
        let mut dimensions = Vec::with_capacity(self.0.len());
        for (key, fragments) in &self.0 {
            let names: Vec<&str> = key.split('-').collect();
            let mut dimension = Vec::with_capacity(fragments.len());
            for fragment in fragments {
                dimension
                    .push(fragment_to_mapping(key, &names, fragment)?);
            }
            dimensions.push(dimension);
        }
        Ok(dimensions)
    }

    /// Expand the block into one mapping per generated run.
    pub fn expand(
        &self,
    ) -> Result<Vec<VariableMapping>, ParameterError> {
        Ok(expand_parameters(&self.dimensions()?))
    }
}

/// Bind one fragment to the variables its dimension key names.
///
/// Accepted shapes: a scalar for a single-variable key, a list with
/// one element per variable, or a mapping covering every named
/// variable (extra keys pass through).
fn fragment_to_mapping(
    key: &str,
    names: &[&str],
    fragment: &Value,
) -> Result<VariableMapping, ParameterError> {
    let malformed = || ParameterError::MalformedDimension {
        key: key.to_string(),
        names: names.iter().map(|n| n.to_string()).collect(),
        fragment: fragment.to_string(),
    };

    match fragment {
        Value::Array(items) => {
            if items.len() != names.len() {
                return Err(malformed());
            }
            Ok(names
                .iter()
                .zip(items)
                .map(|(name, value)| {
                    (name.to_string(), value.clone())
                })
                .collect())
        }
        Value::Object(entries) => {
            if !names
                .iter()
                .all(|name| entries.contains_key(*name))
            {
                return Err(malformed());
            }
            Ok(entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        }
        scalar => {
            if names.len() != 1 {
                return Err(malformed());
            }
            Ok(VariableMapping::from([(
                names[0].to_string(),
                scalar.clone(),
            )]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(pairs: &[(&str, Value)]) -> VariableMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // ── expand_parameters ───────────────────────────────

    #[test]
    fn test_cartesian_sizing_and_order() {
        let dim_a = vec![
            mapping(&[("a", json!(1))]),
            mapping(&[("a", json!(2))]),
        ];
        let dim_b = vec![
            mapping(&[("x", json!(111)), ("y", json!(112))]),
            mapping(&[("x", json!(121)), ("y", json!(122))]),
        ];

        let expanded = expand_parameters(&[dim_a, dim_b]);
        assert_eq!(
            expanded,
            vec![
                mapping(&[
                    ("a", json!(1)),
                    ("x", json!(111)),
                    ("y", json!(112)),
                ]),
                mapping(&[
                    ("a", json!(1)),
                    ("x", json!(121)),
                    ("y", json!(122)),
                ]),
                mapping(&[
                    ("a", json!(2)),
                    ("x", json!(111)),
                    ("y", json!(112)),
                ]),
                mapping(&[
                    ("a", json!(2)),
                    ("x", json!(121)),
                    ("y", json!(122)),
                ]),
            ]
        );
    }

    #[test]
    fn test_no_dimensions_yields_no_runs() {
        assert!(expand_parameters(&[]).is_empty());
    }

    #[test]
    fn test_single_dimension_is_identity() {
        let dim = vec![
            mapping(&[("a", json!(1))]),
            mapping(&[("a", json!(2))]),
        ];
        assert_eq!(expand_parameters(&[dim.clone()]), dim);
    }

    #[test]
    fn test_empty_dimension_empties_product() {
        let dim_b = vec![mapping(&[("b", json!(1))])];
        assert!(expand_parameters(&[Vec::new(), dim_b]).is_empty());
    }

    #[test]
    fn test_later_dimension_wins_on_conflict() {
        let dim_a = vec![mapping(&[("k", json!("first"))])];
        let dim_b = vec![mapping(&[("k", json!("second"))])];

        let expanded = expand_parameters(&[dim_a, dim_b]);
        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0]["k"], json!("second"));
    }

    #[test]
    fn test_three_dimensions() {
        let dims: Vec<ParameterDimension> = vec![
            vec![
                mapping(&[("a", json!(1))]),
                mapping(&[("a", json!(2))]),
            ],
            vec![
                mapping(&[("b", json!(1))]),
                mapping(&[("b", json!(2))]),
                mapping(&[("b", json!(3))]),
            ],
            vec![mapping(&[("c", json!(1))])],
        ];

        let expanded = expand_parameters(&dims);
        assert_eq!(expanded.len(), 6);
        // First dimension varies slowest.
        assert_eq!(expanded[0]["a"], json!(1));
        assert_eq!(expanded[2]["a"], json!(1));
        assert_eq!(expanded[3]["a"], json!(2));
    }

    // ── Parameters ──────────────────────────────────────

    #[test]
    fn test_scalar_dimension() {
        let params = Parameters::from_yaml(
            "user_agent: [\"iOS/10.1\", \"iOS/10.2\"]\n",
        )
        .unwrap();

        let dims = params.dimensions().unwrap();
        assert_eq!(
            dims,
            vec![vec![
                mapping(&[("user_agent", json!("iOS/10.1"))]),
                mapping(&[("user_agent", json!("iOS/10.2"))]),
            ]]
        );
    }

    #[test]
    fn test_compound_key_with_lists() {
        let params = Parameters::from_yaml(
            "username-password:\n\
             \x20 - [\"user1\", \"111111\"]\n\
             \x20 - [\"user2\", \"222222\"]\n",
        )
        .unwrap();

        let dims = params.dimensions().unwrap();
        assert_eq!(
            dims[0][0],
            mapping(&[
                ("username", json!("user1")),
                ("password", json!("111111")),
            ])
        );
        assert_eq!(
            dims[0][1],
            mapping(&[
                ("username", json!("user2")),
                ("password", json!("222222")),
            ])
        );
    }

    #[test]
    fn test_compound_key_with_mappings() {
        let params = Parameters::from_yaml(
            "username-password:\n\
             \x20 - {username: u1, password: p1, note: extra}\n",
        )
        .unwrap();

        let dims = params.dimensions().unwrap();
        // Extra keys pass through alongside the named ones.
        assert_eq!(dims[0][0]["note"], json!("extra"));
        assert_eq!(dims[0][0]["username"], json!("u1"));
    }

    #[test]
    fn test_arity_mismatch_is_rejected() {
        let params = Parameters::from_yaml(
            "username-password:\n  - [\"only_one\"]\n",
        )
        .unwrap();

        let err = params.dimensions().unwrap_err();
        assert!(matches!(
            err,
            ParameterError::MalformedDimension { ref key, .. }
                if key == "username-password"
        ));
    }

    #[test]
    fn test_scalar_fragment_on_compound_key_rejected() {
        let params =
            Parameters::from_yaml("a-b: [\"scalar\"]\n").unwrap();
        assert!(params.dimensions().is_err());
    }

    #[test]
    fn test_expand_combines_declared_dimensions() {
        let params = Parameters::from_yaml(
            "user_agent: [\"iOS/10.1\", \"iOS/10.2\"]\n\
             username-password:\n\
             \x20 - [\"user1\", \"111111\"]\n\
             \x20 - [\"user2\", \"222222\"]\n",
        )
        .unwrap();

        let runs = params.expand().unwrap();
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0]["user_agent"], json!("iOS/10.1"));
        assert_eq!(runs[0]["username"], json!("user1"));
        assert_eq!(runs[3]["user_agent"], json!("iOS/10.2"));
        assert_eq!(runs[3]["password"], json!("222222"));
    }

    #[test]
    fn test_yaml_round_trip_keeps_dimension_order() {
        let params = Parameters::from_yaml(
            "b_dim: [1]\na_dim: [2]\n",
        )
        .unwrap();
        let yaml = params.to_yaml().unwrap();
        let reparsed = Parameters::from_yaml(&yaml).unwrap();

        let keys: Vec<&str> =
            reparsed.0.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b_dim", "a_dim"]);
    }
}
