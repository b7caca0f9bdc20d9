use crate::error::ConfigError;
use crate::model::Mode;

/// Resolve the configured light mode.
///
/// Only the exact values `public` and `ci` are accepted; anything else,
/// including an unset value, is a configuration error. Call once at startup.
pub fn resolve(raw: Option<&str>) -> Result<Mode, ConfigError> {
    match raw {
        Some("public") => Ok(Mode::Public),
        Some("ci") => Ok(Mode::Ci),
        other => Err(ConfigError::InvalidMode(other.map(str::to_string))),
    }
}
