//! Payer signature waivers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Accounts whose signature is not required when they pay for a
/// transaction.
///
/// Listed accounts must be system accounts; the cross-check against the
/// reserved range happens in [`super::SigningConfig::validate`].
///
/// # Validation Rules
///
/// - `waived_payer_accounts` must not contain zero or duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WaiverConfig {
    /// Account numbers, in the configured shard and realm.
    #[serde(default)]
    pub waived_payer_accounts: Vec<u64>,
}

#[bon::bon]
impl WaiverConfig {
    /// Creates a validated waiver configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero or duplicated account.
    #[builder]
    pub fn new(#[builder(default)] waived_payer_accounts: Vec<u64>) -> Result<Self, ConfigError> {
        let config = Self { waived_payer_accounts };
        config.validate()?;
        Ok(config)
    }
}

impl WaiverConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero or duplicated account.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::BTreeSet::new();
        for &num in &self.waived_payer_accounts {
            if num == 0 {
                return Err(ConfigError::Validation {
                    message: "waived_payer_accounts must not contain 0".to_string(),
                });
            }
            if !seen.insert(num) {
                return Err(ConfigError::Validation {
                    message: format!("waived_payer_accounts lists {num} more than once"),
                });
            }
        }
        Ok(())
    }
}
