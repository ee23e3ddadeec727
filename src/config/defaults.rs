//! Derived defaults for the session paths.

use super::types::RodsEnvironment;
use tracing::warn;

/// Fill `home` and `cwd` from the identity fields when they are unset.
///
/// 1. `home = /<zone>/home/<user>` when home is empty and both user and zone
///    are set.
/// 2. `cwd = home` when cwd is empty and home is set.
///
/// Running it again on its own output changes nothing.
pub fn create_env_defaults(env: &mut RodsEnvironment) {
    if env.home.is_empty() && !env.user_name.is_empty() && !env.zone.is_empty() {
        let home = format!("/{}/home/{}", env.zone, env.user_name);
        if let Err(err) = env.home.assign(&home) {
            warn!(%err, "derived home collection does not fit, leaving it unset");
        }
    }

    if env.cwd.is_empty() && !env.home.is_empty() {
        let home = env.home.clone();
        if let Err(err) = env.cwd.assign(&home) {
            warn!(%err, "home collection does not fit the cwd, leaving it unset");
        }
    }
}
