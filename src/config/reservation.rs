//! Reservation engine configuration.

use serde::{Deserialize, Serialize};

use crate::core::seat_inventory::SEATS_PER_NEW_COACH;
use crate::core::{AppResult, ReservationError};

/// Prefix for environment overrides, e.g. `RESERVATION_RAC_LIMIT`.
pub const ENV_PREFIX: &str = "RESERVATION_";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationConfig {
    /// Coaches created at start-up (2 cabins each).
    pub initial_coaches: u32,
    /// Confirmed capacity at start-up, independent of the physical seat count.
    pub initial_confirmed_seats: u32,
    /// Maximum passengers held in RAC.
    pub rac_limit: usize,
    /// Audit events retained by the in-memory sink.
    pub audit_capacity: usize,
    /// Pending commands the serialized service accepts before blocking.
    pub command_queue_depth: usize,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            initial_coaches: 1,
            initial_confirmed_seats: 14,
            rac_limit: 2,
            audit_capacity: 256,
            command_queue_depth: 64,
        }
    }
}

impl ReservationConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), ReservationError> {
        if self.rac_limit == 0 {
            return Err(ReservationError::InvalidConfig(
                "rac_limit must be greater than 0".into(),
            ));
        }
        if self.audit_capacity == 0 {
            return Err(ReservationError::InvalidConfig(
                "audit_capacity must be greater than 0".into(),
            ));
        }
        if self.command_queue_depth == 0 {
            return Err(ReservationError::InvalidConfig(
                "command_queue_depth must be greater than 0".into(),
            ));
        }
        let physical = u64::from(self.initial_coaches) * u64::from(SEATS_PER_NEW_COACH);
        if u64::from(self.initial_confirmed_seats) > physical {
            return Err(ReservationError::InvalidConfig(format!(
                "initial_confirmed_seats ({}) exceeds {physical} physical seats",
                self.initial_confirmed_seats
            )));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on a parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, ReservationError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| ReservationError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment, reading a `.env` file first
    /// when one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails when a variable is not a valid number or validation fails.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Fails when a variable is not a valid number or validation fails.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        override_from(&lookup, "INITIAL_COACHES", &mut cfg.initial_coaches)?;
        override_from(&lookup, "INITIAL_CONFIRMED_SEATS", &mut cfg.initial_confirmed_seats)?;
        override_from(&lookup, "RAC_LIMIT", &mut cfg.rac_limit)?;
        override_from(&lookup, "AUDIT_CAPACITY", &mut cfg.audit_capacity)?;
        override_from(&lookup, "COMMAND_QUEUE_DEPTH", &mut cfg.command_queue_depth)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn override_from<F, T>(lookup: &F, key: &str, slot: &mut T) -> AppResult<()>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let name = format!("{ENV_PREFIX}{key}");
    if let Some(raw) = lookup(&name) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{name}={raw}: {e}"))?;
    }
    Ok(())
}
