//! Client-role resolution: defaults, then the property store, then the
//! environment.

use super::Resolver;
use crate::config::bounded::{BoundedString, LONG_NAME_LEN};
use crate::config::capture::{capture_integer, capture_string};
use crate::config::defaults::create_env_defaults;
use crate::config::env_vars::{EnvOverride, EnvSource, collect_overrides};
use crate::config::keywords::{
    CLIENT_KEYS, KW_CFG_IRODS_SESSION_ENVIRONMENT_FILE, ValueKind,
};
use crate::config::store::PropertyStore;
use crate::config::types::*;
use crate::error::ResolveError;
use crate::logging::{LogLevelFilter, clamp_log_level, parse_log_level};
use tracing::{debug, warn};

/// Resolves the client environment from a captured store and environment
/// variables.
pub struct ClientResolver<'a> {
    store: &'a PropertyStore,
    env: &'a dyn EnvSource,
    log_filter: &'a LogLevelFilter,
}

impl<'a> ClientResolver<'a> {
    pub fn new(
        store: &'a PropertyStore,
        env: &'a dyn EnvSource,
        log_filter: &'a LogLevelFilter,
    ) -> Self {
        Self {
            store,
            env,
            log_filter,
        }
    }

    /// Run the full client pass. Never fails.
    pub fn resolve_environment(&self) -> Resolution {
        let mut env = RodsEnvironment::default();

        apply_embedded_defaults(&mut env);
        let session_file = self.apply_store(&mut env);
        self.apply_env_overrides(&mut env);

        env.force_negotiation();
        env.normalize_keepalive();

        let applied_log_level = self.apply_log_level(&mut env);

        create_env_defaults(&mut env);

        let auth_file = env.auth_file.non_empty().map(str::to_string);

        Resolution {
            role: Role::Client,
            environment: env,
            auth_file,
            session_file,
            applied_log_level,
        }
    }

    /// Capture every client key from the store. Returns the session file path
    /// recorded by the capture step.
    fn apply_store(&self, env: &mut RodsEnvironment) -> Option<String> {
        for spec in CLIENT_KEYS {
            let Some(slot) = env.slot_mut(spec.key) else {
                continue;
            };
            // Failures are logged by the capture functions and leave the
            // field at its previous value.
            let _ = match slot {
                Slot::Text(field) => capture_string(self.store, spec.key, field),
                Slot::Integer(value) => capture_integer(self.store, spec.key, value),
            };
        }

        let mut session_file = BoundedString::<LONG_NAME_LEN>::new();
        capture_string(
            self.store,
            KW_CFG_IRODS_SESSION_ENVIRONMENT_FILE,
            &mut session_file,
        )
        .ok()
        .map(|_| session_file.to_string())
    }

    fn apply_env_overrides(&self, env: &mut RodsEnvironment) {
        for over in collect_overrides(self.env) {
            apply_override(env, &over);
        }
    }

    fn apply_log_level(&self, env: &mut RodsEnvironment) -> Option<i32> {
        if env.log_level <= 0 {
            return None;
        }
        env.log_level = clamp_log_level(env.log_level);
        self.log_filter.set(env.log_level);
        debug!(level = env.log_level, "applied log level");
        Some(env.log_level)
    }
}

impl Resolver for ClientResolver<'_> {
    fn role(&self) -> Role {
        Role::Client
    }

    fn resolve(&self) -> Result<Resolution, ResolveError> {
        Ok(self.resolve_environment())
    }
}

fn apply_embedded_defaults(env: &mut RodsEnvironment) {
    env.max_size_for_single_buffer = DEFAULT_MAX_SIZE_FOR_SINGLE_BUFFER;
    env.default_number_transfer_threads = DEFAULT_NUMBER_TRANSFER_THREADS;
    env.trans_buffer_size_for_para_trans = DEFAULT_TRANS_BUFFER_SIZE_FOR_PARA_TRANS;
    env.connection_pool_refresh_time = DEFAULT_CONNECTION_POOL_REFRESH_TIME;

    env.tcp_keepalive_intvl = KEEPALIVE_UNSET;
    env.tcp_keepalive_probes = KEEPALIVE_UNSET;
    env.tcp_keepalive_time = KEEPALIVE_UNSET;

    env.auth_scheme.assign_truncating(DEFAULT_AUTH_SCHEME);
}

fn apply_override(env: &mut RodsEnvironment, over: &EnvOverride) {
    let key = over.spec.key;
    let Some(slot) = env.slot_mut(key) else {
        return;
    };

    match slot {
        Slot::Text(field) => match field.assign_text(&over.value) {
            Ok(()) => debug!(var = %over.var_name, key, value = %over.value, "captured env"),
            Err(err) => {
                warn!(var = %over.var_name, key, %err, "environment value does not fit, ignoring it")
            }
        },
        Slot::Integer(dest) => {
            let parsed = match over.spec.kind {
                ValueKind::LogLevel => parse_log_level(&over.value),
                _ => over.value.trim().parse::<i32>().ok(),
            };
            match parsed {
                Some(value) => {
                    *dest = value;
                    debug!(var = %over.var_name, key, value, "captured env");
                }
                None => {
                    warn!(var = %over.var_name, key, value = %over.value, "expected an integer, ignoring it")
                }
            }
        }
    }
}
