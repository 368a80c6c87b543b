//! Configuration loading and representation.
//!
//! Everything comes from environment variables with dev-friendly defaults:
//!
//! | variable                        | default        |
//! |---------------------------------|----------------|
//! | `PRICEGATE_BIND_ADDR`           | `0.0.0.0:8080` |
//! | `PRICEGATE_REVIEW_THRESHOLD`    | `5000`         |
//! | `PRICEGATE_CREATION_CAP`        | `10000`        |
//! | `PRICEGATE_MAX_INCREASE_RATIO`  | `1.5`          |

use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use pricegate_approvals::PricePolicy;

pub const BIND_ADDR: &str = "PRICEGATE_BIND_ADDR";
pub const REVIEW_THRESHOLD: &str = "PRICEGATE_REVIEW_THRESHOLD";
pub const CREATION_CAP: &str = "PRICEGATE_CREATION_CAP";
pub const MAX_INCREASE_RATIO: &str = "PRICEGATE_MAX_INCREASE_RATIO";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub policy: PricePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            policy: PricePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PricePolicy::default();

        let bind_addr = parse_or(&lookup, BIND_ADDR, default_bind_addr)?;
        let review_threshold = parse_or(&lookup, REVIEW_THRESHOLD, || defaults.review_threshold())?;
        let creation_cap = parse_or(&lookup, CREATION_CAP, || defaults.creation_cap())?;
        let max_increase_ratio =
            parse_or(&lookup, MAX_INCREASE_RATIO, || defaults.max_increase_ratio())?;

        let policy = PricePolicy::new(review_threshold, creation_cap, max_increase_ratio)
            .map_err(|e| ConfigError::Inconsistent(e.to_string()))?;

        Ok(Self { bind_addr, policy })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default()),
        Some(raw) if raw.trim().is_empty() => Ok(default()),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
