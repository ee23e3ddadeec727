//! Capture step: populate a property store from configuration files.
//!
//! The JSON environment file is read first; the per-session file, when it
//! exists, is laid over it key by key. The legacy flat file is read through the
//! tokenizer and its names are mapped onto canonical keys.

use super::env_vars::EnvSource;
use super::keywords::{
    KW_CFG_IRODS_ENVIRONMENT_FILE, KW_CFG_IRODS_SESSION_ENVIRONMENT_FILE, ValueKind,
    canonical_for_legacy, client_key,
};
use super::store::{PropertyStore, PropertyValue};
use crate::error::LoadError;
use crate::logging::parse_log_level;
use crate::tokenizer::{ScanOutcome, parse_line};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment file location relative to the home directory.
pub const ENVIRONMENT_FILE: &str = ".irods/irods_environment.json";
/// Legacy flat environment file relative to the home directory.
pub const LEGACY_ENVIRONMENT_FILE: &str = ".irods/.irodsEnv";

pub const ENV_ENVIRONMENT_FILE: &str = "IRODS_ENVIRONMENT_FILE";
pub const ENV_SESSION_ENVIRONMENT_FILE: &str = "IRODS_SESSION_ENVIRONMENT_FILE";

/// Files making up the client property store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    pub environment_file: Option<PathBuf>,
    pub session_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover file locations from environment variables and the home
    /// directory.
    pub fn discover(env: &dyn EnvSource) -> Self {
        // Environment file: IRODS_ENVIRONMENT_FILE or ~/.irods/irods_environment.json
        let environment_file = env
            .var(ENV_ENVIRONMENT_FILE)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(ENVIRONMENT_FILE)));

        // Session file: IRODS_SESSION_ENVIRONMENT_FILE or <environment file>.<ppid>
        let session_file = env
            .var(ENV_SESSION_ENVIRONMENT_FILE)
            .map(PathBuf::from)
            .or_else(|| {
                environment_file
                    .as_deref()
                    .and_then(default_session_file)
            });

        Self {
            environment_file,
            session_file,
        }
    }

    /// Create paths with explicit files.
    pub fn with_files(environment_file: Option<PathBuf>, session_file: Option<PathBuf>) -> Self {
        Self {
            environment_file,
            session_file,
        }
    }
}

#[cfg(unix)]
fn default_session_file(environment_file: &Path) -> Option<PathBuf> {
    let mut name = environment_file.as_os_str().to_owned();
    name.push(format!(".{}", std::os::unix::process::parent_id()));
    Some(PathBuf::from(name))
}

#[cfg(not(unix))]
fn default_session_file(_environment_file: &Path) -> Option<PathBuf> {
    None
}

/// Captured property store together with the files it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths that were consulted
    pub paths: ConfigPaths,
    store: PropertyStore,
    /// Files that existed and were read, in order
    loaded: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Capture the store from discovered locations.
    pub fn load(env: &dyn EnvSource) -> Result<Self, LoadError> {
        Self::load_with_paths(ConfigPaths::discover(env))
    }

    /// Capture the store from explicit locations.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self, LoadError> {
        let mut store = PropertyStore::new();
        let mut loaded = Vec::new();

        if let Some(ref file) = paths.environment_file {
            if let Some(environment) = load_json_file(file)? {
                store.overlay(environment);
                loaded.push(file.clone());
            }
            store.set(KW_CFG_IRODS_ENVIRONMENT_FILE, file.to_string_lossy().into_owned());
        }

        if let Some(ref file) = paths.session_file {
            if let Some(session) = load_json_file(file)? {
                store.overlay(session);
                loaded.push(file.clone());
            }
            store.set(
                KW_CFG_IRODS_SESSION_ENVIRONMENT_FILE,
                file.to_string_lossy().into_owned(),
            );
        }

        Ok(Self {
            paths,
            store,
            loaded,
        })
    }

    /// Get the captured store.
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Files that were actually read.
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded
    }
}

fn read_file(path: &Path) -> Result<Option<String>, LoadError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "configuration file does not exist");
            Ok(None)
        }
        Err(source) => Err(LoadError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_json_object(path: &Path) -> Result<Option<serde_json::Map<String, Value>>, LoadError> {
    let Some(content) = read_file(path)? else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(LoadError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a JSON environment document. `Ok(None)` if the file does not exist.
pub fn load_json_file(path: &Path) -> Result<Option<PropertyStore>, LoadError> {
    Ok(read_json_object(path)?.map(PropertyStore::from_json_object))
}

/// Load a structured server configuration document.
pub fn load_server_config(path: &Path) -> Result<Value, LoadError> {
    match read_json_object(path)? {
        Some(map) => Ok(Value::Object(map)),
        None => Err(LoadError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }),
    }
}

/// Load a legacy flat environment file.
pub fn load_legacy_file(path: &Path) -> Result<PropertyStore, LoadError> {
    let content = read_file(path)?.ok_or_else(|| LoadError::Read {
        path: path.to_path_buf(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    })?;
    Ok(parse_legacy(&content))
}

/// Parse legacy `name value` lines into canonical properties.
///
/// Known legacy names are mapped to their canonical keys; other names are
/// kept verbatim. Values of integer keys are stored as integers when they
/// parse, and as text otherwise.
pub fn parse_legacy(content: &str) -> PropertyStore {
    let mut store = PropertyStore::new();

    for (line_no, line) in content.lines().enumerate() {
        let Some((name, scan)) = parse_line(line) else {
            continue;
        };
        if scan.outcome == ScanOutcome::RecoveredUnterminatedQuote {
            debug!(line = line_no + 1, name = %name, "unterminated quote, keeping it as content");
        }

        let spec = canonical_for_legacy(&name).or_else(|| client_key(&name));
        let key = spec.map_or(name.clone(), |spec| spec.key.to_string());
        let value = match spec.map(|spec| spec.kind) {
            Some(ValueKind::Integer) => match scan.token.trim().parse::<i64>() {
                Ok(n) => PropertyValue::Integer(n),
                Err(_) => {
                    warn!(line = line_no + 1, name = %name, value = %scan.token, "expected an integer");
                    PropertyValue::Text(scan.token)
                }
            },
            Some(ValueKind::LogLevel) => match parse_log_level(&scan.token) {
                Some(level) => PropertyValue::Integer(i64::from(level)),
                None => PropertyValue::Text(scan.token),
            },
            _ => PropertyValue::Text(scan.token),
        };
        store.set(key, value);
    }

    store
}
