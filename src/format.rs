//! Output formatting for resolved environments and property stores.

use crate::config::{CLIENT_KEYS, PropertyStore, Resolution, env_vars::lookup_order};

/// Output format for `show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Invalid format '{}'. Valid options: text, json, yaml",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Render a resolution in the requested format.
pub fn format_resolution(res: &Resolution, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => format_resolution_text(res),
        OutputFormat::Json => serde_json::to_string_pretty(res)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(res)?,
    })
}

/// One `key - value` line per client key, followed by the side outputs.
pub fn format_resolution_text(res: &Resolution) -> String {
    let mut out = format!("role - {}\n", res.role);
    for (key, value) in res.environment.entries() {
        out.push_str(&format!("{} - {}\n", key, value));
    }
    if let Some(ref path) = res.auth_file {
        out.push_str(&format!("auth file - {}\n", path));
    }
    if let Some(ref path) = res.session_file {
        out.push_str(&format!("session file - {}\n", path));
    }
    if let Some(level) = res.applied_log_level {
        out.push_str(&format!("applied log level - {}\n", level));
    }
    out
}

/// Dump of a property store, headed by the crate version.
pub fn format_properties_text(store: &PropertyStore) -> String {
    let mut out = format!("irods_version - {}\n", env!("CARGO_PKG_VERSION"));
    for (key, value) in store.iter() {
        out.push_str(&format!("{} - {}\n", key, value));
    }
    out
}

/// The environment variables consulted for each client key, in lookup order.
pub fn format_env_vars_text() -> String {
    let mut out = String::new();
    for spec in CLIENT_KEYS {
        out.push_str(&format!("{} - {}\n", spec.key, lookup_order(spec).join(", ")));
    }
    out
}
