//! The resolved environment record and the result of a resolution pass.

use super::bounded::{
    BoundedString, HEADER_TYPE_LEN, LONG_NAME_LEN, MAX_NAME_LEN, NAME_LEN, TextField,
};
use super::keywords::*;
use serde::Serialize;

/// Negotiation policy every resolution pass ends with.
pub const REQ_SVR_NEG: &str = "request_server_negotiation";

/// Authentication scheme used when nothing else is configured.
pub const DEFAULT_AUTH_SCHEME: &str = "native";

/// Client-side transfer tuning defaults.
pub const DEFAULT_MAX_SIZE_FOR_SINGLE_BUFFER: i32 = 32;
pub const DEFAULT_NUMBER_TRANSFER_THREADS: i32 = 4;
pub const DEFAULT_TRANS_BUFFER_SIZE_FOR_PARA_TRANS: i32 = 4;
pub const DEFAULT_CONNECTION_POOL_REFRESH_TIME: i32 = 300;

/// Keepalive value meaning "leave the socket option to the kernel".
pub const KEEPALIVE_UNSET: i32 = -1;

/// Collapse any negative keepalive setting to [`KEEPALIVE_UNSET`].
pub fn normalize_keepalive(value: i32) -> i32 {
    if value < 0 { KEEPALIVE_UNSET } else { value }
}

/// Operating mode selecting the resolution path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Client,
    Server,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Server => write!(f, "server"),
        }
    }
}

/// Effective runtime environment of a client connection.
///
/// `Default` is the all-zero record every pass starts from. String fields that
/// are empty mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RodsEnvironment {
    // Identity
    pub user_name: BoundedString<NAME_LEN>,
    pub zone: BoundedString<NAME_LEN>,
    pub host: BoundedString<NAME_LEN>,
    pub port: i32,
    pub default_resource: BoundedString<NAME_LEN>,

    // Authentication
    pub auth_scheme: BoundedString<NAME_LEN>,
    pub auth_file: BoundedString<LONG_NAME_LEN>,

    // Session paths
    pub home: BoundedString<MAX_NAME_LEN>,
    pub cwd: BoundedString<MAX_NAME_LEN>,

    // Security
    pub ssl_ca_certificate_file: BoundedString<MAX_NAME_LEN>,
    pub ssl_ca_certificate_path: BoundedString<MAX_NAME_LEN>,
    pub ssl_verify_server: BoundedString<MAX_NAME_LEN>,
    pub client_server_policy: BoundedString<LONG_NAME_LEN>,
    pub client_server_negotiation: BoundedString<NAME_LEN>,
    pub encryption_algorithm: BoundedString<HEADER_TYPE_LEN>,
    pub encryption_key_size: i32,
    pub encryption_salt_size: i32,
    pub encryption_num_hash_rounds: i32,

    // Hashing policy
    pub default_hash_scheme: BoundedString<NAME_LEN>,
    pub match_hash_policy: BoundedString<NAME_LEN>,

    // Transfer tuning
    pub max_size_for_single_buffer: i32,
    pub default_number_transfer_threads: i32,
    pub trans_buffer_size_for_para_trans: i32,
    pub connection_pool_refresh_time: i32,

    // Keepalive tuning, -1 when unset
    pub tcp_keepalive_intvl: i32,
    pub tcp_keepalive_probes: i32,
    pub tcp_keepalive_time: i32,

    pub plugin_directory: BoundedString<MAX_NAME_LEN>,

    pub log_level: i32,
}

/// Mutable handle on one record field, addressed by canonical key.
pub enum Slot<'a> {
    Text(&'a mut dyn TextField),
    Integer(&'a mut i32),
}

/// Read-only view of one record field, addressed by canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Text(&'a str),
    Integer(i32),
}

impl std::fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Text(s) => write!(f, "{}", s),
            Field::Integer(n) => write!(f, "{}", n),
        }
    }
}

// One row per client key, generating `slot_mut` and `field`.
macro_rules! record_fields {
    (@slot Text, $value:expr) => { Slot::Text(&mut $value) };
    (@slot Integer, $value:expr) => { Slot::Integer(&mut $value) };
    (@field Text, $value:expr) => { Field::Text($value.as_str()) };
    (@field Integer, $value:expr) => { Field::Integer($value) };
    ($($key:ident => $kind:ident($field:ident),)*) => {
        impl RodsEnvironment {
            /// Field backing a client canonical key.
            pub fn slot_mut(&mut self, key: &str) -> Option<Slot<'_>> {
                match key {
                    $($key => Some(record_fields!(@slot $kind, self.$field)),)*
                    _ => None,
                }
            }

            /// Current value of the field backing a client canonical key.
            pub fn field(&self, key: &str) -> Option<Field<'_>> {
                match key {
                    $($key => Some(record_fields!(@field $kind, self.$field)),)*
                    _ => None,
                }
            }
        }
    };
}

record_fields! {
    KW_CFG_IRODS_USER_NAME => Text(user_name),
    KW_CFG_IRODS_HOST => Text(host),
    KW_CFG_IRODS_PORT => Integer(port),
    KW_CFG_IRODS_HOME => Text(home),
    KW_CFG_IRODS_CWD => Text(cwd),
    KW_CFG_IRODS_AUTHENTICATION_SCHEME => Text(auth_scheme),
    KW_CFG_IRODS_DEFAULT_RESOURCE => Text(default_resource),
    KW_CFG_IRODS_ZONE => Text(zone),
    KW_CFG_IRODS_CLIENT_SERVER_POLICY => Text(client_server_policy),
    KW_CFG_IRODS_CLIENT_SERVER_NEGOTIATION => Text(client_server_negotiation),
    KW_CFG_IRODS_ENCRYPTION_KEY_SIZE => Integer(encryption_key_size),
    KW_CFG_IRODS_ENCRYPTION_SALT_SIZE => Integer(encryption_salt_size),
    KW_CFG_IRODS_ENCRYPTION_NUM_HASH_ROUNDS => Integer(encryption_num_hash_rounds),
    KW_CFG_IRODS_ENCRYPTION_ALGORITHM => Text(encryption_algorithm),
    KW_CFG_IRODS_DEFAULT_HASH_SCHEME => Text(default_hash_scheme),
    KW_CFG_IRODS_MATCH_HASH_POLICY => Text(match_hash_policy),
    KW_CFG_IRODS_LOG_LEVEL => Integer(log_level),
    KW_CFG_IRODS_AUTHENTICATION_FILE => Text(auth_file),
    KW_CFG_IRODS_SSL_CA_CERTIFICATE_PATH => Text(ssl_ca_certificate_path),
    KW_CFG_IRODS_SSL_CA_CERTIFICATE_FILE => Text(ssl_ca_certificate_file),
    KW_CFG_IRODS_SSL_VERIFY_SERVER => Text(ssl_verify_server),
    KW_CFG_IRODS_MAX_SIZE_FOR_SINGLE_BUFFER => Integer(max_size_for_single_buffer),
    KW_CFG_IRODS_DEF_NUMBER_TRANSFER_THREADS => Integer(default_number_transfer_threads),
    KW_CFG_IRODS_TRANS_BUFFER_SIZE_FOR_PARA_TRANS => Integer(trans_buffer_size_for_para_trans),
    KW_CFG_IRODS_CONNECTION_POOL_REFRESH_TIME => Integer(connection_pool_refresh_time),
    KW_CFG_IRODS_PLUGIN_DIRECTORY => Text(plugin_directory),
    KW_CFG_IRODS_TCP_KEEPALIVE_INTVL_IN_SECONDS => Integer(tcp_keepalive_intvl),
    KW_CFG_IRODS_TCP_KEEPALIVE_PROBES => Integer(tcp_keepalive_probes),
    KW_CFG_IRODS_TCP_KEEPALIVE_TIME_IN_SECONDS => Integer(tcp_keepalive_time),
}

impl RodsEnvironment {
    /// Collapse every keepalive field to the tri-state convention.
    pub fn normalize_keepalive(&mut self) {
        self.tcp_keepalive_intvl = normalize_keepalive(self.tcp_keepalive_intvl);
        self.tcp_keepalive_probes = normalize_keepalive(self.tcp_keepalive_probes);
        self.tcp_keepalive_time = normalize_keepalive(self.tcp_keepalive_time);
    }

    /// Pin the negotiation field to [`REQ_SVR_NEG`].
    pub fn force_negotiation(&mut self) {
        self.client_server_negotiation.assign_truncating(REQ_SVR_NEG);
    }

    /// `(canonical key, display value)` pairs in client key order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CLIENT_KEYS
            .iter()
            .filter_map(|spec| Some((spec.key, self.field(spec.key)?.to_string())))
            .collect()
    }
}

/// Outcome of one resolution pass.
///
/// Carries the paths and log level that the pass would otherwise publish as
/// process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub role: Role,
    pub environment: RodsEnvironment,
    /// Authentication file path, when one was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_file: Option<String>,
    /// Session environment file path recorded by the capture step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<String>,
    /// Threshold pushed to the log filter, when the pass applied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_log_level: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_client_key_has_a_slot() {
        let mut env = RodsEnvironment::default();
        for spec in CLIENT_KEYS {
            assert!(env.slot_mut(spec.key).is_some(), "no slot for {}", spec.key);
        }
        assert!(env.slot_mut("irods_unknown").is_none());
    }

    #[test]
    fn test_slot_kinds_match_key_kinds() {
        let mut env = RodsEnvironment::default();
        for spec in CLIENT_KEYS {
            let is_text = matches!(env.slot_mut(spec.key), Some(Slot::Text(_)));
            assert_eq!(is_text, spec.kind == ValueKind::Text, "{}", spec.key);
        }
    }

    #[test]
    fn test_normalize_keepalive() {
        let mut env = RodsEnvironment {
            tcp_keepalive_intvl: -7,
            tcp_keepalive_probes: 0,
            tcp_keepalive_time: 30,
            ..Default::default()
        };
        env.normalize_keepalive();
        assert_eq!(env.tcp_keepalive_intvl, KEEPALIVE_UNSET);
        assert_eq!(env.tcp_keepalive_probes, 0);
        assert_eq!(env.tcp_keepalive_time, 30);
    }

    #[test]
    fn test_force_negotiation() {
        let mut env = RodsEnvironment::default();
        env.client_server_negotiation.assign("dont_negotiate").unwrap();
        env.force_negotiation();
        assert_eq!(env.client_server_negotiation, REQ_SVR_NEG);
    }

    #[test]
    fn test_field_reads_what_slot_writes() {
        let mut env = RodsEnvironment::default();
        for (i, spec) in CLIENT_KEYS.iter().enumerate() {
            let text = format!("value-{}", i);
            match env.slot_mut(spec.key).unwrap() {
                Slot::Text(field) => field.assign_text(&text).unwrap(),
                Slot::Integer(value) => *value = i as i32,
            }
        }
        for (i, spec) in CLIENT_KEYS.iter().enumerate() {
            let expected = match spec.kind {
                ValueKind::Text => format!("value-{}", i),
                _ => i.to_string(),
            };
            assert_eq!(
                env.field(spec.key).unwrap().to_string(),
                expected,
                "{}",
                spec.key
            );
        }
        assert_eq!(
            env.field(KW_CFG_IRODS_SSL_CA_CERTIFICATE_FILE),
            Some(Field::Text(env.ssl_ca_certificate_file.as_str()))
        );
        assert!(env.field("irods_unknown").is_none());
    }

    #[test]
    fn test_entries_follow_key_order() {
        let mut env = RodsEnvironment::default();
        env.user_name.assign("alice").unwrap();
        env.port = 1247;
        let entries = env.entries();
        assert_eq!(entries[0], (KW_CFG_IRODS_USER_NAME, "alice".to_string()));
        assert_eq!(entries[2], (KW_CFG_IRODS_PORT, "1247".to_string()));
        assert_eq!(entries.len(), CLIENT_KEYS.len());
    }
}
