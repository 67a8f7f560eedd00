//! Process configuration, built once at start-up and read-only afterwards.

use chrono_tz::Tz;

use crate::dst::DstPolicy;
use crate::error::ConfigError;

pub const ENV_DEFAULT_ZONE: &str = "SLOTMATCH_DEFAULT_ZONE";
pub const ENV_DST_POLICY: &str = "SLOTMATCH_DST_POLICY";
pub const ENV_SENDER: &str = "SLOTMATCH_SENDER";

pub const DEFAULT_SENDER: &str = "scheduler@localhost";

/// Settings shared by the matcher and the notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Zone assumed for slots written without one. Both sides share it.
    pub default_zone: Tz,
    pub dst_policy: DstPolicy,
    /// Sender identity on confirmation messages.
    pub sender: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_zone: Tz::UTC,
            dst_policy: DstPolicy::default(),
            sender: DEFAULT_SENDER.to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Read `SLOTMATCH_*` variables from the process environment.
    ///
    /// Unset or blank variables keep their defaults; set but invalid ones are
    /// errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(zone) = value(ENV_DEFAULT_ZONE) {
            config.default_zone = parse_zone(&zone)?;
        }
        if let Some(policy) = value(ENV_DST_POLICY) {
            config.dst_policy = policy.parse()?;
        }
        if let Some(sender) = value(ENV_SENDER) {
            config.sender = sender.trim().to_string();
        }
        Ok(config)
    }
}

/// Parse an IANA timezone name, ignoring case (`europe/berlin` is accepted).
pub fn parse_zone(name: &str) -> Result<Tz, ConfigError> {
    let name = name.trim();
    Tz::from_str_insensitive(name).map_err(|_| ConfigError::InvalidTimezone(name.to_string()))
}
