//! # Runtime Configuration
//!
//! Environment-driven configuration for the guard runtime.
//!
//! ## Security Requirements
//!
//! - Every identity MUST be non-zero: a zero owner, avatar or recovery owner
//!   would leave the guard without an accountable admin
//! - The expiration window MUST be 0 or at least 60 seconds

use std::env;

use dg_01_delay::{DelayConfig, DelayError};
use dg_03_recovery_orchestrator::{DeploymentConfig, DEFAULT_MODULE_FACTORY};
use guard_telemetry::TelemetryConfig;
use serde::Serialize;
use shared_types::entities::{Address, Seconds};
use shared_types::errors::ParseAddressError;
use thiserror::Error;

/// Default cooldown, three minutes.
pub const DEFAULT_COOLDOWN_SECS: Seconds = 180;

/// Default expiration window, fifty hours.
pub const DEFAULT_EXPIRATION_SECS: Seconds = 180_000;

/// Delay guard implementation deployed behind module proxies.
pub const DEFAULT_DELAY_MASTER_COPY: &str = "0xe82814727799742403a4c41bec96996fce6d2719";

/// Swap-owner module implementation deployed behind module proxies.
pub const DEFAULT_SWAP_MASTER_COPY: &str = "0xc31161a7f7588d80782272a974fa8676d40299d1";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable does not hold an address.
    #[error("{var} is not an address: {source}")]
    InvalidAddress {
        /// Variable name.
        var: &'static str,
        /// Parse failure.
        #[source]
        source: ParseAddressError,
    },

    /// A variable does not hold a whole number of seconds.
    #[error("{var} is not a number of seconds: {value}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// An identity is the zero address.
    #[error("{0} can not be zero address")]
    ZeroIdentity(&'static str),

    /// The timing policy is rejected by the guard.
    #[error("invalid delay policy: {0}")]
    InvalidPolicy(#[from] DelayError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeConfig {
    /// Protected wallet (avatar and execution target of the guard).
    pub avatar: Address,
    /// Guard admin. Defaults to the avatar.
    pub owner: Address,
    /// Account allowed to start recoveries.
    pub recovery_owner: Address,
    /// Guard cooldown.
    pub cooldown: Seconds,
    /// Guard expiration (0 = never).
    pub expiration: Seconds,
    /// Module proxy factory.
    pub factory: Address,
    /// Delay guard implementation.
    pub delay_master_copy: Address,
    /// Swap-owner module implementation.
    pub swap_master_copy: Address,
    /// Logging configuration.
    #[serde(skip)]
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `DG_AVATAR` (required): protected wallet
    /// - `DG_RECOVERY_OWNER` (required): recovery module owner
    /// - `DG_OWNER`: guard admin (default: the avatar)
    /// - `DG_COOLDOWN_SECS`: cooldown (default: 180)
    /// - `DG_EXPIRATION_SECS`: expiration (default: 180000, 0 = never)
    /// - `DG_MODULE_FACTORY`, `DG_DELAY_MASTER_COPY`, `DG_SWAP_MASTER_COPY`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let avatar = required_address(&lookup, "DG_AVATAR")?;
        let recovery_owner = required_address(&lookup, "DG_RECOVERY_OWNER")?;
        let owner = optional_address(&lookup, "DG_OWNER")?.unwrap_or(avatar);

        let factory = optional_address(&lookup, "DG_MODULE_FACTORY")?.unwrap_or(DEFAULT_MODULE_FACTORY);
        let delay_master_copy = match optional_address(&lookup, "DG_DELAY_MASTER_COPY")? {
            Some(address) => address,
            None => parse_address("DG_DELAY_MASTER_COPY", DEFAULT_DELAY_MASTER_COPY)?,
        };
        let swap_master_copy = match optional_address(&lookup, "DG_SWAP_MASTER_COPY")? {
            Some(address) => address,
            None => parse_address("DG_SWAP_MASTER_COPY", DEFAULT_SWAP_MASTER_COPY)?,
        };

        let config = Self {
            avatar,
            owner,
            recovery_owner,
            cooldown: seconds(&lookup, "DG_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS)?,
            expiration: seconds(&lookup, "DG_EXPIRATION_SECS", DEFAULT_EXPIRATION_SECS)?,
            factory,
            delay_master_copy,
            swap_master_copy,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        };
        config.validate()?;
        Ok(config)
    }

    /// Fails closed on zero identities or a policy the guard would refuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, address) in [
            ("avatar", self.avatar),
            ("owner", self.owner),
            ("recovery owner", self.recovery_owner),
            ("module factory", self.factory),
            ("delay master copy", self.delay_master_copy),
            ("swap master copy", self.swap_master_copy),
        ] {
            if address.is_zero() {
                return Err(ConfigError::ZeroIdentity(name));
            }
        }
        self.delay_config()?;
        Ok(())
    }

    /// Guard timing policy.
    pub fn delay_config(&self) -> Result<DelayConfig, ConfigError> {
        Ok(DelayConfig::new(self.cooldown, self.expiration)?)
    }

    /// Planning inputs for the recovery orchestrator.
    #[must_use]
    pub fn deployment(&self) -> DeploymentConfig {
        DeploymentConfig {
            factory: self.factory,
            delay_master_copy: self.delay_master_copy,
            swap_master_copy: self.swap_master_copy,
            wallet: self.avatar,
            recovery_owner: self.recovery_owner,
            cooldown: self.cooldown,
            expiration: self.expiration,
        }
    }
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidAddress { var, source })
}

fn optional_address(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<Address>, ConfigError> {
    lookup(var).map(|value| parse_address(var, &value)).transpose()
}

fn required_address(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Address, ConfigError> {
    optional_address(lookup, var)?.ok_or(ConfigError::Missing(var))
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Seconds,
) -> Result<Seconds, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
