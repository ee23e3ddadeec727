//! Environment variable overrides for client keys.
//!
//! Each client key is looked up under its canonical variable name
//! (`irods_host` -> `IRODS_HOST`). The TLS keys additionally honor their
//! untransformed legacy names; those are consulted first, so the canonical
//! variable wins when both are set.

use super::keywords::{CLIENT_KEYS, KeySpec, to_env};
use std::collections::HashMap;

/// Read-only view of environment variables.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: std::hash::BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Variable names consulted for `spec`, in application order.
pub fn lookup_order(spec: &KeySpec) -> Vec<String> {
    spec.legacy_env
        .iter()
        .map(|name| (*name).to_string())
        .chain(std::iter::once(to_env(spec.key)))
        .collect()
}

/// One variable that is set in the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    pub spec: &'static KeySpec,
    pub var_name: String,
    pub value: String,
}

/// Every set override, in the order it must be applied.
pub fn collect_overrides(env: &dyn EnvSource) -> Vec<EnvOverride> {
    let mut overrides = Vec::new();
    for spec in CLIENT_KEYS {
        for var_name in lookup_order(spec) {
            if let Some(value) = env.var(&var_name) {
                overrides.push(EnvOverride {
                    spec,
                    var_name,
                    value,
                });
            }
        }
    }
    overrides
}
