//! Environment resolution.
//!
//! A [`Role`] selects one of two resolvers behind the [`Resolver`] trait:
//!
//! - **Client** - embedded defaults, then the captured property store, then
//!   environment variables; later layers overwrite only the fields they set.
//!   Field-level failures are logged and absorbed, so the pass always
//!   completes.
//! - **Server** - a single pass over the structured server configuration.
//!   Missing required keys abort the pass.
//!
//! Both end with the negotiation policy pinned to [`REQ_SVR_NEG`].
//!
//! [`REQ_SVR_NEG`]: crate::config::REQ_SVR_NEG

mod client;
mod server;

pub use client::ClientResolver;
pub use server::ServerResolver;

use crate::config::{EnvSource, ProcessEnv, PropertyStore, Resolution, Role};
use crate::error::ResolveError;
use crate::logging::LogLevelFilter;
use serde_json::Value;

/// Computes a [`Resolution`] for one role.
pub trait Resolver {
    fn role(&self) -> Role;

    fn resolve(&self) -> Result<Resolution, ResolveError>;
}

/// Inputs shared by both roles.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub store: &'a PropertyStore,
    pub env: &'a dyn EnvSource,
    pub server_config: Option<&'a Value>,
    pub log_filter: &'a LogLevelFilter,
}

impl<'a> ResolveContext<'a> {
    /// Context reading the process environment and updating the global log
    /// filter.
    pub fn new(store: &'a PropertyStore) -> Self {
        Self {
            store,
            env: &ProcessEnv,
            server_config: None,
            log_filter: LogLevelFilter::global(),
        }
    }

    pub fn with_env(mut self, env: &'a dyn EnvSource) -> Self {
        self.env = env;
        self
    }

    pub fn with_server_config(mut self, config: &'a Value) -> Self {
        self.server_config = Some(config);
        self
    }

    pub fn with_log_filter(mut self, filter: &'a LogLevelFilter) -> Self {
        self.log_filter = filter;
        self
    }

    /// Select the resolver for `role`.
    pub fn resolver(&self, role: Role) -> Result<Box<dyn Resolver + 'a>, ResolveError> {
        match role {
            Role::Client => Ok(Box::new(ClientResolver::new(
                self.store,
                self.env,
                self.log_filter,
            ))),
            Role::Server => {
                let config = self.server_config.ok_or(ResolveError::MissingServerConfig)?;
                Ok(Box::new(ServerResolver::new(config)))
            }
        }
    }
}

/// Resolve the environment for `role`.
pub fn resolve(role: Role, ctx: &ResolveContext<'_>) -> Result<Resolution, ResolveError> {
    ctx.resolver(role)?.resolve()
}
