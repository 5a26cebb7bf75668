//! Process configuration.
//!
//! Everything is read from environment variables with defaults suitable for
//! an in-cluster deployment (certificates mounted by cert-manager at
//! `/etc/webhook/certs/`).

use std::time::Duration;

use crate::error::{Error, Result};
use crate::feature::FeatureGates;

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;
/// Default health server port
pub const HEALTH_PORT: u16 = 8080;
/// Default number of attempts when looking up the parent MachinePool
pub const PARENT_LOOKUP_ATTEMPTS: u32 = 5;
/// Default pause between parent lookup attempts
pub const PARENT_LOOKUP_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime configuration for the webhook process.
#[derive(Clone, Debug)]
pub struct Config {
    pub webhook_port: u16,
    pub cert_path: String,
    pub key_path: String,
    pub health_port: u16,
    pub feature_gates: FeatureGates,
    pub lookup: LookupConfig,
}

/// Retry policy for finding the parent MachinePool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LookupConfig {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Pause between attempts.
    pub interval: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            attempts: PARENT_LOOKUP_ATTEMPTS,
            interval: PARENT_LOOKUP_INTERVAL,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_port: WEBHOOK_PORT,
            cert_path: WEBHOOK_CERT_PATH.to_string(),
            key_path: WEBHOOK_KEY_PATH.to_string(),
            health_port: HEALTH_PORT,
            feature_gates: FeatureGates::default(),
            lookup: LookupConfig::default(),
        }
    }
}

impl Config {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let lookup = LookupConfig {
            attempts: parse_var(&var, "PARENT_LOOKUP_ATTEMPTS")?
                .unwrap_or(defaults.lookup.attempts),
            interval: parse_var::<u64, _>(&var, "PARENT_LOOKUP_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.lookup.interval),
        };
        if lookup.attempts == 0 {
            return Err(Error::Config(
                "PARENT_LOOKUP_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let feature_gates = match var("FEATURE_GATES") {
            Some(spec) => FeatureGates::parse(&spec)?,
            None => defaults.feature_gates,
        };

        Ok(Self {
            webhook_port: parse_var(&var, "WEBHOOK_PORT")?.unwrap_or(defaults.webhook_port),
            cert_path: var("WEBHOOK_CERT_PATH").unwrap_or(defaults.cert_path),
            key_path: var("WEBHOOK_KEY_PATH").unwrap_or(defaults.key_path),
            health_port: parse_var(&var, "HEALTH_PORT")?.unwrap_or(defaults.health_port),
            feature_gates,
            lookup,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {} '{}': {}", key, raw, e))),
    }
}
