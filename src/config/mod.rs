//! Environment configuration model.
//!
//! Client settings come from three layers, later layers overwriting only the
//! fields they set:
//! 1. **Defaults** - embedded tuning values and `native` authentication
//! 2. **Files** - `~/.irods/irods_environment.json`, then the session file
//! 3. **Environment** - `IRODS_*` variables (plus legacy TLS names)
//!
//! ## Environment Variables
//! - `IRODS_ENVIRONMENT_FILE` - Explicit environment file
//! - `IRODS_SESSION_ENVIRONMENT_FILE` - Explicit session file
//! - `IRODS_<KEY>` - Override for the client key `irods_<key>`
//!
//! Server settings are read from a single structured document instead; see
//! [`crate::resolver::ServerResolver`].

pub mod bounded;
pub mod capture;
pub mod defaults;
pub mod env_vars;
pub mod keywords;
pub mod loader;
pub mod store;
pub mod types;

pub use bounded::{BoundedString, LONG_NAME_LEN, MAX_NAME_LEN, NAME_LEN, TextField};
pub use capture::{capture_integer, capture_string};
pub use defaults::create_env_defaults;
pub use env_vars::{EnvOverride, EnvSource, ProcessEnv, collect_overrides};
pub use keywords::{CLIENT_KEYS, KeySpec, ValueKind};
pub use loader::{
    ConfigLoader, ConfigPaths, load_legacy_file, load_server_config, parse_legacy,
};
pub use store::{PropertyStore, PropertyValue};
pub use types::*;
