//! Process-environment plumbing for the harness.
//!
//! Scenario configs may declare variables that must be visible to
//! the process environment for the duration of a run. This module is
//! the one deliberately side-effecting part of the crate; the
//! data-shaping pipeline itself never touches the environment.
//! Prefer [`ScopedEnv`] over the bare setters so cleanup happens on
//! every exit path, including panics.

use indexmap::IndexMap;
use std::env;
use thiserror::Error;

/// Environment lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("environment variable not found: {0}")]
    NotFound(String),
}

/// Set every entry of `variables` in the process environment.
pub fn set_os_environ(variables: &IndexMap<String, String>) {
    for (name, value) in variables {
        env::set_var(name, value);
        tracing::debug!("Set OS environment variable: {name}");
    }
}

/// Remove every key of `variables` from the process environment.
pub fn unset_os_environ(variables: &IndexMap<String, String>) {
    for name in variables.keys() {
        env::remove_var(name);
        tracing::debug!("Unset OS environment variable: {name}");
    }
}

/// Read an environment variable.
pub fn get_os_environ(name: &str) -> Result<String, EnvError> {
    env::var(name).map_err(|_| EnvError::NotFound(name.to_string()))
}

/// RAII guard that applies a variable mapping to the process
/// environment and restores the previous state on drop.
///
/// Variables that existed before get their old value back; variables
/// introduced by the guard are removed.
#[derive(Debug)]
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    /// Apply `variables`, remembering each variable's prior state.
    pub fn apply(variables: &IndexMap<String, String>) -> Self {
        let mut saved = Vec::with_capacity(variables.len());
        for (name, value) in variables {
            saved.push((name.clone(), env::var(name).ok()));
            env::set_var(name, value);
            tracing::debug!("Set OS environment variable: {name}");
        }
        ScopedEnv { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        // Reverse order, in case the same name was saved twice.
        for (name, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(value) => env::set_var(&name, value),
                None => env::remove_var(&name),
            }
            tracing::debug!(
                "Restored OS environment variable: {name}"
            );
        }
    }
}
