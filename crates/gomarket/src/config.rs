//! Cart configuration, with defaults and an environment loader.
//!
//! # Environment Variables
//!
//! All optional:
//! - `GOMARKET_STORAGE_KEY` - Key the cart is stored under (default: `@GoMarket:products`)
//! - `GOMARKET_PERSIST_DEBOUNCE_MS` - Coalesce writes for this many ms (default: write-through)
//! - `GOMARKET_PERSIST_EMPTY` - Persist an emptied cart as `[]` (default: true)
//! - `GOMARKET_ZERO_QUANTITY` - `revive` or `append` (default: revive)

use std::time::Duration;

use gomarket_core::ZeroQuantityPolicy;
use thiserror::Error;

/// The key the cart has always been stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarket:products";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Configuration for a cart store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage key of the persisted cart.
    pub storage_key: String,
    /// Wait this long after a change before writing, coalescing any further
    /// changes into the same write. `None` writes after every change.
    pub persist_debounce: Option<Duration>,
    /// Write `[]` when the cart becomes empty. With `false`, an empty cart is
    /// never written and a previously stored cart survives.
    pub persist_empty: bool,
    /// How `add_to_cart` treats an existing entry with quantity 0.
    pub zero_quantity: ZeroQuantityPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            persist_debounce: None,
            persist_empty: true,
            zero_quantity: ZeroQuantityPolicy::Revive,
        }
    }
}

impl CartConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("GOMARKET_STORAGE_KEY") {
            if key.trim().is_empty() {
                return Err(invalid("GOMARKET_STORAGE_KEY", "must not be empty"));
            }
            config.storage_key = key;
        }

        if let Some(ms) = lookup("GOMARKET_PERSIST_DEBOUNCE_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|e| invalid("GOMARKET_PERSIST_DEBOUNCE_MS", e))?;
            config.persist_debounce = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(flag) = lookup("GOMARKET_PERSIST_EMPTY") {
            config.persist_empty = parse_bool(&flag)
                .ok_or_else(|| invalid("GOMARKET_PERSIST_EMPTY", "expected true or false"))?;
        }

        if let Some(policy) = lookup("GOMARKET_ZERO_QUANTITY") {
            config.zero_quantity = match policy.trim().to_ascii_lowercase().as_str() {
                "revive" => ZeroQuantityPolicy::Revive,
                "append" => ZeroQuantityPolicy::AppendDuplicate,
                _ => {
                    return Err(invalid(
                        "GOMARKET_ZERO_QUANTITY",
                        "expected revive or append",
                    ))
                }
            };
        }

        Ok(config)
    }

    /// Builder-style override of the debounce window.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.persist_debounce = Some(delay);
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(name.to_owned(), reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "@GoMarket:products");
        assert!(config.persist_empty);
        assert_eq!(config.persist_debounce, None);
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup(&[
            ("GOMARKET_STORAGE_KEY", "@Test:cart"),
            ("GOMARKET_PERSIST_DEBOUNCE_MS", "250"),
            ("GOMARKET_PERSIST_EMPTY", "false"),
            ("GOMARKET_ZERO_QUANTITY", "append"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, "@Test:cart");
        assert_eq!(config.persist_debounce, Some(Duration::from_millis(250)));
        assert!(!config.persist_empty);
        assert_eq!(config.zero_quantity, ZeroQuantityPolicy::AppendDuplicate);
    }

    #[test]
    fn test_zero_debounce_is_write_through() {
        let config =
            CartConfig::from_lookup(lookup(&[("GOMARKET_PERSIST_DEBOUNCE_MS", "0")])).unwrap();
        assert_eq!(config.persist_debounce, None);
    }

    #[test]
    fn test_invalid_values() {
        let err = CartConfig::from_lookup(lookup(&[("GOMARKET_PERSIST_DEBOUNCE_MS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("GOMARKET_PERSIST_DEBOUNCE_MS"));

        assert!(CartConfig::from_lookup(lookup(&[("GOMARKET_PERSIST_EMPTY", "maybe")])).is_err());
        assert!(CartConfig::from_lookup(lookup(&[("GOMARKET_ZERO_QUANTITY", "drop")])).is_err());
        assert!(CartConfig::from_lookup(lookup(&[("GOMARKET_STORAGE_KEY", " ")])).is_err());
    }
}
