//! Canonical configuration keys.
//!
//! Client keys name entries of the flattened environment property store; the
//! environment variable for each one is derived with [`to_env`]. Server keys
//! name entries of the structured server configuration document.

use heck::ToShoutySnakeCase;

pub const KW_CFG_IRODS_USER_NAME: &str = "irods_user_name";
pub const KW_CFG_IRODS_HOST: &str = "irods_host";
pub const KW_CFG_IRODS_PORT: &str = "irods_port";
pub const KW_CFG_IRODS_HOME: &str = "irods_home";
pub const KW_CFG_IRODS_CWD: &str = "irods_cwd";
pub const KW_CFG_IRODS_AUTHENTICATION_SCHEME: &str = "irods_authentication_scheme";
pub const KW_CFG_IRODS_DEFAULT_RESOURCE: &str = "irods_default_resource";
pub const KW_CFG_IRODS_ZONE: &str = "irods_zone_name";
pub const KW_CFG_IRODS_CLIENT_SERVER_POLICY: &str = "irods_client_server_policy";
pub const KW_CFG_IRODS_CLIENT_SERVER_NEGOTIATION: &str = "irods_client_server_negotiation";
pub const KW_CFG_IRODS_ENCRYPTION_KEY_SIZE: &str = "irods_encryption_key_size";
pub const KW_CFG_IRODS_ENCRYPTION_SALT_SIZE: &str = "irods_encryption_salt_size";
pub const KW_CFG_IRODS_ENCRYPTION_NUM_HASH_ROUNDS: &str = "irods_encryption_num_hash_rounds";
pub const KW_CFG_IRODS_ENCRYPTION_ALGORITHM: &str = "irods_encryption_algorithm";
pub const KW_CFG_IRODS_DEFAULT_HASH_SCHEME: &str = "irods_default_hash_scheme";
pub const KW_CFG_IRODS_MATCH_HASH_POLICY: &str = "irods_match_hash_policy";
pub const KW_CFG_IRODS_LOG_LEVEL: &str = "irods_log_level";
pub const KW_CFG_IRODS_AUTHENTICATION_FILE: &str = "irods_authentication_file";
pub const KW_CFG_IRODS_SSL_CA_CERTIFICATE_PATH: &str = "irods_ssl_ca_certificate_path";
pub const KW_CFG_IRODS_SSL_CA_CERTIFICATE_FILE: &str = "irods_ssl_ca_certificate_file";
pub const KW_CFG_IRODS_SSL_VERIFY_SERVER: &str = "irods_ssl_verify_server";
pub const KW_CFG_IRODS_MAX_SIZE_FOR_SINGLE_BUFFER: &str =
    "irods_maximum_size_for_single_buffer_in_megabytes";
pub const KW_CFG_IRODS_DEF_NUMBER_TRANSFER_THREADS: &str =
    "irods_default_number_of_transfer_threads";
pub const KW_CFG_IRODS_TRANS_BUFFER_SIZE_FOR_PARA_TRANS: &str =
    "irods_transfer_buffer_size_for_parallel_transfer_in_megabytes";
pub const KW_CFG_IRODS_CONNECTION_POOL_REFRESH_TIME: &str =
    "irods_connection_pool_refresh_time_in_seconds";
pub const KW_CFG_IRODS_PLUGIN_DIRECTORY: &str = "irods_plugin_directory";
pub const KW_CFG_IRODS_TCP_KEEPALIVE_INTVL_IN_SECONDS: &str = "irods_tcp_keepalive_intvl_in_seconds";
pub const KW_CFG_IRODS_TCP_KEEPALIVE_PROBES: &str = "irods_tcp_keepalive_probes";
pub const KW_CFG_IRODS_TCP_KEEPALIVE_TIME_IN_SECONDS: &str = "irods_tcp_keepalive_time_in_seconds";

/// Path of the environment file the store was captured from.
pub const KW_CFG_IRODS_ENVIRONMENT_FILE: &str = "irods_environment_file";
/// Path of the per-session overlay file.
pub const KW_CFG_IRODS_SESSION_ENVIRONMENT_FILE: &str = "irods_session_environment_file";

/// Keys of the structured server configuration document.
pub mod server {
    pub const KW_CFG_HOST: &str = "host";
    pub const KW_CFG_ZONE_PORT: &str = "zone_port";
    pub const KW_CFG_ZONE_NAME: &str = "zone_name";
    pub const KW_CFG_ZONE_USER: &str = "zone_user";
    pub const KW_CFG_ZONE_AUTH_SCHEME: &str = "zone_auth_scheme";
    pub const KW_CFG_CLIENT_SERVER_POLICY: &str = "client_server_policy";

    pub const KW_CFG_ENCRYPTION: &str = "encryption";
    pub const KW_CFG_ENCRYPTION_ALGORITHM: &str = "algorithm";
    pub const KW_CFG_ENCRYPTION_KEY_SIZE: &str = "key_size";
    pub const KW_CFG_ENCRYPTION_NUM_HASH_ROUNDS: &str = "num_hash_rounds";
    pub const KW_CFG_ENCRYPTION_SALT_SIZE: &str = "salt_size";

    pub const KW_CFG_DEFAULT_HASH_SCHEME: &str = "default_hash_scheme";
    pub const KW_CFG_MATCH_HASH_POLICY: &str = "match_hash_policy";
    pub const KW_CFG_DEFAULT_RESOURCE_NAME: &str = "default_resource_name";
    pub const KW_CFG_CONNECTION_POOL_REFRESH_TIME: &str =
        "connection_pool_refresh_time_in_seconds";

    pub const KW_CFG_TLS_CLIENT: &str = "tls_client";
    pub const KW_CFG_TLS_CA_CERTIFICATE_FILE: &str = "ca_certificate_file";
    pub const KW_CFG_TLS_CA_CERTIFICATE_PATH: &str = "ca_certificate_path";
    pub const KW_CFG_TLS_VERIFY_SERVER: &str = "verify_server";

    pub const KW_CFG_TCP_KEEPALIVE_INTVL_IN_SECONDS: &str = "tcp_keepalive_intvl_in_seconds";
    pub const KW_CFG_TCP_KEEPALIVE_PROBES: &str = "tcp_keepalive_probes";
    pub const KW_CFG_TCP_KEEPALIVE_TIME_IN_SECONDS: &str = "tcp_keepalive_time_in_seconds";

    pub const KW_CFG_ADVANCED_SETTINGS: &str = "advanced_settings";
    pub const KW_CFG_DEF_NUMBER_TRANSFER_THREADS: &str = "default_number_of_transfer_threads";
    pub const KW_CFG_MAX_SIZE_FOR_SINGLE_BUFFER: &str =
        "maximum_size_for_single_buffer_in_megabytes";
    pub const KW_CFG_TRANS_BUFFER_SIZE_FOR_PARA_TRANS: &str =
        "transfer_buffer_size_for_parallel_transfer_in_megabytes";

    pub const KW_CFG_PLUGIN_DIRECTORY: &str = "plugin_directory";
}

/// How a key's value is parsed from text sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    /// Integer that also accepts a symbolic level name such as `LOG_NOTICE`.
    LogLevel,
}

/// One client-side canonical key and the names it is known by elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySpec {
    pub key: &'static str,
    pub kind: ValueKind,
    /// Untransformed environment variable names consulted before the
    /// canonical one.
    pub legacy_env: &'static [&'static str],
    /// Name of the key in the legacy flat-file format.
    pub legacy_file: Option<&'static str>,
}

const fn text(key: &'static str, legacy_file: Option<&'static str>) -> KeySpec {
    KeySpec {
        key,
        kind: ValueKind::Text,
        legacy_env: &[],
        legacy_file,
    }
}

const fn integer(key: &'static str, legacy_file: Option<&'static str>) -> KeySpec {
    KeySpec {
        key,
        kind: ValueKind::Integer,
        legacy_env: &[],
        legacy_file,
    }
}

const fn tls(
    key: &'static str,
    legacy: &'static [&'static str],
    legacy_file: &'static str,
) -> KeySpec {
    KeySpec {
        key,
        kind: ValueKind::Text,
        legacy_env: legacy,
        legacy_file: Some(legacy_file),
    }
}

/// Every client key backed by a record field, in capture order.
pub const CLIENT_KEYS: &[KeySpec] = &[
    text(KW_CFG_IRODS_USER_NAME, Some("irodsUserName")),
    text(KW_CFG_IRODS_HOST, Some("irodsHost")),
    integer(KW_CFG_IRODS_PORT, Some("irodsPort")),
    text(KW_CFG_IRODS_HOME, Some("irodsHome")),
    text(KW_CFG_IRODS_CWD, Some("irodsCwd")),
    text(KW_CFG_IRODS_AUTHENTICATION_SCHEME, Some("irodsAuthScheme")),
    text(KW_CFG_IRODS_DEFAULT_RESOURCE, Some("irodsDefResource")),
    text(KW_CFG_IRODS_ZONE, Some("irodsZone")),
    text(KW_CFG_IRODS_CLIENT_SERVER_POLICY, Some("irodsClientServerPolicy")),
    text(
        KW_CFG_IRODS_CLIENT_SERVER_NEGOTIATION,
        Some("irodsClientServerNegotiation"),
    ),
    integer(KW_CFG_IRODS_ENCRYPTION_KEY_SIZE, Some("irodsEncryptionKeySize")),
    integer(KW_CFG_IRODS_ENCRYPTION_SALT_SIZE, Some("irodsEncryptionSaltSize")),
    integer(
        KW_CFG_IRODS_ENCRYPTION_NUM_HASH_ROUNDS,
        Some("irodsEncryptionNumHashRounds"),
    ),
    text(KW_CFG_IRODS_ENCRYPTION_ALGORITHM, Some("irodsEncryptionAlgorithm")),
    text(KW_CFG_IRODS_DEFAULT_HASH_SCHEME, Some("irodsDefaultHashScheme")),
    text(KW_CFG_IRODS_MATCH_HASH_POLICY, Some("irodsMatchHashPolicy")),
    KeySpec {
        key: KW_CFG_IRODS_LOG_LEVEL,
        kind: ValueKind::LogLevel,
        legacy_env: &[],
        legacy_file: Some("irodsLogLevel"),
    },
    text(KW_CFG_IRODS_AUTHENTICATION_FILE, Some("irodsAuthFileName")),
    tls(
        KW_CFG_IRODS_SSL_CA_CERTIFICATE_PATH,
        &["irodsSSLCACertificatePath"],
        "irodsSSLCACertificatePath",
    ),
    tls(
        KW_CFG_IRODS_SSL_CA_CERTIFICATE_FILE,
        &["irodsSSLCACertificateFile"],
        "irodsSSLCACertificateFile",
    ),
    tls(
        KW_CFG_IRODS_SSL_VERIFY_SERVER,
        &["irodsSSLVerifyServer"],
        "irodsSSLVerifyServer",
    ),
    integer(KW_CFG_IRODS_MAX_SIZE_FOR_SINGLE_BUFFER, None),
    integer(KW_CFG_IRODS_DEF_NUMBER_TRANSFER_THREADS, None),
    integer(KW_CFG_IRODS_TRANS_BUFFER_SIZE_FOR_PARA_TRANS, None),
    integer(KW_CFG_IRODS_CONNECTION_POOL_REFRESH_TIME, None),
    text(KW_CFG_IRODS_PLUGIN_DIRECTORY, Some("irodsPluginDirectory")),
    integer(KW_CFG_IRODS_TCP_KEEPALIVE_INTVL_IN_SECONDS, None),
    integer(KW_CFG_IRODS_TCP_KEEPALIVE_PROBES, None),
    integer(KW_CFG_IRODS_TCP_KEEPALIVE_TIME_IN_SECONDS, None),
];

/// Look up a client key by its canonical name.
pub fn client_key(key: &str) -> Option<&'static KeySpec> {
    CLIENT_KEYS.iter().find(|spec| spec.key == key)
}

/// Map a legacy flat-file name (`irodsHost`) to its canonical key.
pub fn canonical_for_legacy(name: &str) -> Option<&'static KeySpec> {
    CLIENT_KEYS
        .iter()
        .find(|spec| spec.legacy_file == Some(name))
}

/// Environment variable name for a canonical key: `irods_host` -> `IRODS_HOST`.
pub fn to_env(key: &str) -> String {
    key.to_shouty_snake_case()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_to_env() {
        assert_eq!(to_env(KW_CFG_IRODS_HOST), "IRODS_HOST");
        assert_eq!(
            to_env(KW_CFG_IRODS_TCP_KEEPALIVE_INTVL_IN_SECONDS),
            "IRODS_TCP_KEEPALIVE_INTVL_IN_SECONDS"
        );
    }

    #[test]
    fn test_client_keys_are_unique() {
        let keys: HashSet<_> = CLIENT_KEYS.iter().map(|spec| spec.key).collect();
        assert_eq!(keys.len(), CLIENT_KEYS.len());
    }

    #[test]
    fn test_only_tls_keys_have_legacy_env_names() {
        let with_legacy: Vec<_> = CLIENT_KEYS
            .iter()
            .filter(|spec| !spec.legacy_env.is_empty())
            .map(|spec| spec.key)
            .collect();
        assert_eq!(
            with_legacy,
            vec![
                KW_CFG_IRODS_SSL_CA_CERTIFICATE_PATH,
                KW_CFG_IRODS_SSL_CA_CERTIFICATE_FILE,
                KW_CFG_IRODS_SSL_VERIFY_SERVER,
            ]
        );
    }

    #[test]
    fn test_canonical_for_legacy() {
        assert_eq!(
            canonical_for_legacy("irodsZone").map(|spec| spec.key),
            Some(KW_CFG_IRODS_ZONE)
        );
        assert!(canonical_for_legacy("irods_zone_name").is_none());
    }
}
