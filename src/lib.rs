//! Data-preparation core for a declarative API scenario runner.
//!
//! Three pure components, consumed in order by the surrounding
//! harness:
//!
//! - [`vars::merge_variables`] folds a step-local variable mapping
//!   over the inherited scope (local wins, self-references pass
//!   through).
//! - [`params::expand_parameters`] turns independent parameter
//!   dimensions into the cartesian product of run-time variable
//!   sets.
//! - [`normalize::normalize`] canonicalizes response/expectation
//!   data before comparison.
//!
//! [`environ`] carries the one side-effecting concern (scoped OS
//! environment application); everything else allocates fresh output
//! and never mutates its inputs, so calls are safe from any number
//! of worker threads.

pub mod environ;
pub mod normalize;
pub mod params;
pub mod util;
pub mod value;
pub mod vars;

pub use environ::*;
pub use normalize::*;
pub use params::*;
pub use value::*;
pub use vars::*;

/// Crate version, as reported in run metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
