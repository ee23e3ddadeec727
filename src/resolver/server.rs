//! Server-role resolution from the structured server configuration.

use super::Resolver;
use crate::config::bounded::TextField;
use crate::config::keywords::server::*;
use crate::config::types::{KEEPALIVE_UNSET, Resolution, RodsEnvironment, Role, normalize_keepalive};
use crate::error::ResolveError;
use serde_json::{Map, Value};
use tracing::warn;

/// Reads the environment out of a server configuration document.
///
/// Identity, encryption and advanced settings are required; TLS, keepalive and
/// the plugin directory are optional.
pub struct ServerResolver<'a> {
    config: &'a Value,
}

enum Failure {
    Missing(String),
    Invalid(String, &'static str),
}

type Step = Result<(), Failure>;

impl<'a> ServerResolver<'a> {
    pub fn new(config: &'a Value) -> Self {
        Self { config }
    }

    fn fill(&self, env: &mut RodsEnvironment) -> Step {
        // Servers always request negotiation on redirects.
        env.force_negotiation();

        let config = object(self.config, "<root>")?;

        copy_string(config, KW_CFG_HOST, &mut env.host)?;
        copy_int(config, KW_CFG_ZONE_PORT, &mut env.port)?;

        copy_string(config, KW_CFG_ZONE_NAME, &mut env.zone)?;
        copy_string(config, KW_CFG_ZONE_USER, &mut env.user_name)?;
        copy_string(config, KW_CFG_ZONE_AUTH_SCHEME, &mut env.auth_scheme)?;

        copy_string(config, KW_CFG_CLIENT_SERVER_POLICY, &mut env.client_server_policy)?;

        let encryption = object(required(config, KW_CFG_ENCRYPTION)?, KW_CFG_ENCRYPTION)?;
        copy_string(encryption, KW_CFG_ENCRYPTION_ALGORITHM, &mut env.encryption_algorithm)?;
        copy_int(encryption, KW_CFG_ENCRYPTION_KEY_SIZE, &mut env.encryption_key_size)?;
        copy_int(
            encryption,
            KW_CFG_ENCRYPTION_NUM_HASH_ROUNDS,
            &mut env.encryption_num_hash_rounds,
        )?;
        copy_int(encryption, KW_CFG_ENCRYPTION_SALT_SIZE, &mut env.encryption_salt_size)?;

        copy_string(config, KW_CFG_DEFAULT_HASH_SCHEME, &mut env.default_hash_scheme)?;
        copy_string(config, KW_CFG_MATCH_HASH_POLICY, &mut env.match_hash_policy)?;

        copy_string(config, KW_CFG_DEFAULT_RESOURCE_NAME, &mut env.default_resource)?;
        copy_int(
            config,
            KW_CFG_CONNECTION_POOL_REFRESH_TIME,
            &mut env.connection_pool_refresh_time,
        )?;

        if let Some(tls) = config.get(KW_CFG_TLS_CLIENT) {
            for (k, v) in object(tls, KW_CFG_TLS_CLIENT)? {
                let dest: &mut dyn TextField = match k.as_str() {
                    KW_CFG_TLS_CA_CERTIFICATE_FILE => &mut env.ssl_ca_certificate_file,
                    KW_CFG_TLS_CA_CERTIFICATE_PATH => &mut env.ssl_ca_certificate_path,
                    KW_CFG_TLS_VERIFY_SERVER => &mut env.ssl_verify_server,
                    _ => continue,
                };
                copy_value(k, v, dest)?;
            }
        }

        // An unset keepalive option leaves the socket on kernel defaults.
        env.tcp_keepalive_intvl = optional_int(config, KW_CFG_TCP_KEEPALIVE_INTVL_IN_SECONDS)?;
        env.tcp_keepalive_probes = optional_int(config, KW_CFG_TCP_KEEPALIVE_PROBES)?;
        env.tcp_keepalive_time = optional_int(config, KW_CFG_TCP_KEEPALIVE_TIME_IN_SECONDS)?;

        let advanced = object(
            required(config, KW_CFG_ADVANCED_SETTINGS)?,
            KW_CFG_ADVANCED_SETTINGS,
        )?;
        copy_int(
            advanced,
            KW_CFG_DEF_NUMBER_TRANSFER_THREADS,
            &mut env.default_number_transfer_threads,
        )?;
        copy_int(
            advanced,
            KW_CFG_MAX_SIZE_FOR_SINGLE_BUFFER,
            &mut env.max_size_for_single_buffer,
        )?;
        copy_int(
            advanced,
            KW_CFG_TRANS_BUFFER_SIZE_FOR_PARA_TRANS,
            &mut env.trans_buffer_size_for_para_trans,
        )?;

        if let Some(dir) = config.get(KW_CFG_PLUGIN_DIRECTORY) {
            copy_value(KW_CFG_PLUGIN_DIRECTORY, dir, &mut env.plugin_directory)?;
        }

        Ok(())
    }
}

impl Resolver for ServerResolver<'_> {
    fn role(&self) -> Role {
        Role::Server
    }

    fn resolve(&self) -> Result<Resolution, ResolveError> {
        let mut env = RodsEnvironment::default();
        match self.fill(&mut env) {
            Ok(()) => Ok(Resolution {
                role: Role::Server,
                environment: env,
                ..Default::default()
            }),
            Err(failure) => {
                let partial = Box::new(env);
                let err = match failure {
                    Failure::Missing(key) => ResolveError::MissingRequiredKey { key, partial },
                    Failure::Invalid(key, expected) => ResolveError::InvalidRequiredValue {
                        key,
                        expected,
                        partial,
                    },
                };
                tracing::error!(code = ?err.code(), "{}", err);
                Err(err)
            }
        }
    }
}

fn object<'v>(value: &'v Value, key: &str) -> Result<&'v Map<String, Value>, Failure> {
    value
        .as_object()
        .ok_or_else(|| Failure::Invalid(key.to_string(), "an object"))
}

fn required<'v>(config: &'v Map<String, Value>, key: &str) -> Result<&'v Value, Failure> {
    config
        .get(key)
        .ok_or_else(|| Failure::Missing(key.to_string()))
}

fn copy_string(config: &Map<String, Value>, key: &str, dest: &mut dyn TextField) -> Step {
    copy_value(key, required(config, key)?, dest)
}

fn copy_value(key: &str, value: &Value, dest: &mut dyn TextField) -> Step {
    let s = value
        .as_str()
        .ok_or_else(|| Failure::Invalid(key.to_string(), "a string"))?;
    if dest.assign_text(s).is_err() {
        // Keep as much as fits.
        let mut end = dest.capacity().saturating_sub(1).min(s.len());
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        warn!(key, len = s.len(), capacity = dest.capacity(), "value truncated");
        if dest.assign_text(&s[..end]).is_err() {
            return Err(Failure::Invalid(key.to_string(), "a shorter string"));
        }
    }
    Ok(())
}

fn as_int(key: &str, value: &Value) -> Result<i32, Failure> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| Failure::Invalid(key.to_string(), "a 32-bit integer"))
}

fn copy_int(config: &Map<String, Value>, key: &str, dest: &mut i32) -> Step {
    *dest = as_int(key, required(config, key)?)?;
    Ok(())
}

fn optional_int(config: &Map<String, Value>, key: &str) -> Result<i32, Failure> {
    match config.get(key) {
        Some(value) => Ok(normalize_keepalive(as_int(key, value)?)),
        None => Ok(KEEPALIVE_UNSET),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REQ_SVR_NEG;
    use serde_json::json;

    fn server_config() -> Value {
        json!({
            "host": "provider.example.org",
            "zone_port": 1247,
            "zone_name": "tempZone",
            "zone_user": "rods",
            "zone_auth_scheme": "native",
            "client_server_policy": "CS_NEG_REFUSE",
            "encryption": {
                "algorithm": "AES-256-CBC",
                "key_size": 32,
                "num_hash_rounds": 16,
                "salt_size": 8
            },
            "default_hash_scheme": "SHA256",
            "match_hash_policy": "compatible",
            "default_resource_name": "demoResc",
            "connection_pool_refresh_time_in_seconds": 300,
            "advanced_settings": {
                "default_number_of_transfer_threads": 4,
                "maximum_size_for_single_buffer_in_megabytes": 32,
                "transfer_buffer_size_for_parallel_transfer_in_megabytes": 4
            }
        })
    }

    #[test]
    fn test_required_keys_are_read() {
        let config = server_config();
        let res = ServerResolver::new(&config).resolve().unwrap();
        let env = &res.environment;
        assert_eq!(res.role, Role::Server);
        assert_eq!(env.host, "provider.example.org");
        assert_eq!(env.port, 1247);
        assert_eq!(env.zone, "tempZone");
        assert_eq!(env.user_name, "rods");
        assert_eq!(env.encryption_algorithm, "AES-256-CBC");
        assert_eq!(env.encryption_key_size, 32);
        assert_eq!(env.encryption_num_hash_rounds, 16);
        assert_eq!(env.encryption_salt_size, 8);
        assert_eq!(env.default_resource, "demoResc");
        assert_eq!(env.default_number_transfer_threads, 4);
        assert_eq!(env.client_server_negotiation, REQ_SVR_NEG);
        // No derived defaults on the server path.
        assert!(env.home.is_empty());
    }

    #[test]
    fn test_optional_groups_absent() {
        let config = server_config();
        let env = ServerResolver::new(&config).resolve().unwrap().environment;
        assert!(env.ssl_ca_certificate_file.is_empty());
        assert!(env.ssl_verify_server.is_empty());
        assert_eq!(env.tcp_keepalive_intvl, -1);
        assert_eq!(env.tcp_keepalive_probes, -1);
        assert_eq!(env.tcp_keepalive_time, -1);
        assert!(env.plugin_directory.is_empty());
    }

    #[test]
    fn test_optional_groups_present() {
        let mut config = server_config();
        config["tls_client"] = json!({
            "ca_certificate_file": "/etc/irods/ca.crt",
            "verify_server": "cert",
            "unrelated": 1
        });
        config["tcp_keepalive_probes"] = json!(6);
        config["tcp_keepalive_time_in_seconds"] = json!(-20);
        config["plugin_directory"] = json!("/usr/lib/irods/plugins");

        let env = ServerResolver::new(&config).resolve().unwrap().environment;
        assert_eq!(env.ssl_ca_certificate_file, "/etc/irods/ca.crt");
        assert_eq!(env.ssl_verify_server, "cert");
        assert!(env.ssl_ca_certificate_path.is_empty());
        assert_eq!(env.tcp_keepalive_probes, 6);
        assert_eq!(env.tcp_keepalive_time, -1);
        assert_eq!(env.plugin_directory, "/usr/lib/irods/plugins");
    }

    #[test]
    fn test_missing_required_key_is_fatal_with_partial_record() {
        let mut config = server_config();
        config.as_object_mut().unwrap().remove("advanced_settings");

        let err = ServerResolver::new(&config).resolve().unwrap_err();
        match &err {
            ResolveError::MissingRequiredKey { key, .. } => assert_eq!(key, "advanced_settings"),
            other => panic!("unexpected error: {other}"),
        }
        let partial = err.partial().unwrap();
        assert_eq!(partial.host, "provider.example.org");
        assert_eq!(partial.encryption_key_size, 32);
        assert_eq!(partial.default_number_transfer_threads, 0);
    }

    #[test]
    fn test_missing_nested_encryption_key() {
        let mut config = server_config();
        config["encryption"].as_object_mut().unwrap().remove("salt_size");
        let err = ServerResolver::new(&config).resolve().unwrap_err();
        assert!(matches!(err, ResolveError::MissingRequiredKey { ref key, .. } if key == "salt_size"));
    }

    #[test]
    fn test_wrong_type_is_fatal() {
        let mut config = server_config();
        config["zone_port"] = json!("1247");
        let err = ServerResolver::new(&config).resolve().unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRequiredValue { .. }));
    }

    #[test]
    fn test_long_values_are_truncated() {
        let mut config = server_config();
        config["host"] = json!("h".repeat(100));
        let env = ServerResolver::new(&config).resolve().unwrap().environment;
        assert_eq!(env.host.len(), 63);
    }
}
