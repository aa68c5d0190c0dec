//! Configuration types for signing-order resolution.
//!
//! Configuration is loaded from TOML files. All config structs validate
//! their values at construction time via fallible builders.
//! Post-deserialization validation is available via the `validate()` method
//! on each struct; [`SigningConfig::from_toml_str`] and
//! [`SigningConfig::load`] run it automatically.

// The schemars `JsonSchema` derive macro internally uses `.unwrap()` in its
// expansions.
#![allow(clippy::disallowed_methods)]

mod entities;
mod waivers;

use std::path::Path;

pub use entities::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
pub use waivers::*;

/// Configuration loading or validation error.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// The configuration file could not be read.
    #[snafu(display("failed to read config file {path}: {source}"))]
    Io {
        /// Path that was read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[snafu(display("failed to parse config: {source}"))]
    Parse {
        /// The underlying TOML error.
        source: toml::de::Error,
    },
}

/// Complete configuration of the signing-order engine.
///
/// # Validation Rules
///
/// - `entities` and `waivers` must each be valid
/// - Every waived payer must be a system account
///
/// # Example
///
/// ```no_run
/// # use ledger_sigs_types::config::SigningConfig;
/// let config = SigningConfig::from_toml_str(
///     r#"
///     [entities]
///     treasury = 2
///     system_admin = 50
///
///     [waivers]
///     waived_payer_accounts = [58]
///     "#,
/// )
/// .expect("valid signing config");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SigningConfig {
    /// Well-known entity numbers.
    #[serde(default)]
    pub entities: EntityNumbers,
    /// Payer signature waivers.
    #[serde(default)]
    pub waivers: WaiverConfig,
}

#[bon::bon]
impl SigningConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any rule is violated.
    #[builder]
    pub fn new(
        #[builder(default)] entities: EntityNumbers,
        #[builder(default)] waivers: WaiverConfig,
    ) -> Result<Self, ConfigError> {
        let config = Self { entities, waivers };
        config.validate()?;
        Ok(config)
    }
}

impl SigningConfig {
    /// Validates the configuration, including cross-section rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.entities.validate()?;
        self.waivers.validate()?;
        let limit = self.entities.num_reserved_system_entities;
        if let Some(num) = self.waivers.waived_payer_accounts.iter().find(|&&num| num > limit) {
            return Err(ConfigError::Validation {
                message: format!(
                    "waived payer {num} is not a system account (must be <= {limit})"
                ),
            });
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml).context(ParseSnafu)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`SigningConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).context(IoSnafu { path: path.display().to_string() })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::types::{AccountId, FileId};

    // =========================================================================
    // EntityNumbers validation tests
    // =========================================================================

    #[test]
    fn test_entity_numbers_defaults_are_valid() {
        let numbers = EntityNumbers::builder().build().expect("defaults should be valid");
        assert_eq!(numbers, EntityNumbers::default());
        assert_eq!(numbers.treasury, 2);
        assert_eq!(numbers.system_admin, 50);
        assert_eq!(numbers.num_reserved_system_entities, 750);
        assert_eq!(numbers.files.fee_schedules, 111);
    }

    #[test]
    fn test_entity_numbers_reserved_range_minimum() {
        let result = EntityNumbers::builder().num_reserved_system_entities(99).build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("num_reserved_system_entities"));
    }

    #[test]
    fn test_entity_numbers_admin_outside_range() {
        let result = EntityNumbers::builder().system_admin(751).build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("system_admin"));

        let result = EntityNumbers::builder().treasury(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_entity_numbers_special_file_outside_range() {
        let files = SpecialFiles { exchange_rates: 1_000, ..SpecialFiles::default() };
        let err = EntityNumbers::builder().files(files).build().unwrap_err();
        assert!(err.to_string().contains("exchange_rates"));
    }

    #[test]
    fn test_entity_numbers_treasury_must_differ_from_admin() {
        let err = EntityNumbers::builder().treasury(50).build().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_entity_numbers_classification() {
        let numbers = EntityNumbers::default();
        assert!(numbers.is_superuser(AccountId::num_only(2)));
        assert!(numbers.is_superuser(AccountId::num_only(50)));
        assert!(!numbers.is_superuser(AccountId::num_only(55)));
        assert!(!numbers.is_superuser(AccountId::new(1, 0, 2)));
        assert!(numbers.is_treasury(AccountId::num_only(2)));
        assert!(numbers.is_system_account(AccountId::num_only(750)));
        assert!(!numbers.is_system_account(AccountId::num_only(751)));
        assert!(numbers.is_system_file(FileId::num_only(111)));
        assert!(!numbers.is_system_file(FileId::new(0, 1, 111)));
    }

    // =========================================================================
    // WaiverConfig validation tests
    // =========================================================================

    #[test]
    fn test_waiver_config_rejects_duplicates_and_zero() {
        assert!(WaiverConfig::builder().waived_payer_accounts(vec![58, 59]).build().is_ok());
        let err = WaiverConfig::builder().waived_payer_accounts(vec![58, 58]).build().unwrap_err();
        assert!(err.to_string().contains("more than once"));
        assert!(WaiverConfig::builder().waived_payer_accounts(vec![0]).build().is_err());
    }

    // =========================================================================
    // SigningConfig tests
    // =========================================================================

    #[test]
    fn test_signing_config_rejects_non_system_waived_payer() {
        let waivers = WaiverConfig { waived_payer_accounts: vec![1_001] };
        let err = SigningConfig::builder().waivers(waivers).build().unwrap_err();
        assert!(err.to_string().contains("not a system account"));
    }

    #[test]
    fn test_signing_config_from_toml_with_defaults() {
        let config = SigningConfig::from_toml_str(
            r#"
            [entities]
            num_reserved_system_entities = 1000

            [entities.files]
            address_book = 150
            "#,
        )
        .unwrap();
        assert_eq!(config.entities.num_reserved_system_entities, 1000);
        assert_eq!(config.entities.treasury, 2);
        assert_eq!(config.entities.files.address_book, 150);
        assert_eq!(config.entities.files.node_details, 102);
        assert!(config.waivers.waived_payer_accounts.is_empty());
    }

    #[test]
    fn test_signing_config_from_empty_toml() {
        let config = SigningConfig::from_toml_str("").unwrap();
        assert_eq!(config, SigningConfig::default());
    }

    #[test]
    fn test_signing_config_from_toml_validates() {
        let err = SigningConfig::from_toml_str("[entities]\ntreasury = 5000\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_signing_config_from_malformed_toml() {
        let err = SigningConfig::from_toml_str("[entities\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_signing_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[waivers]\nwaived_payer_accounts = [58, 60]").unwrap();
        let config = SigningConfig::load(file.path()).unwrap();
        assert_eq!(config.waivers.waived_payer_accounts, vec![58, 60]);
    }

    #[test]
    fn test_signing_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SigningConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn test_signing_config_serde_roundtrip() {
        let config = SigningConfig::builder()
            .waivers(WaiverConfig { waived_payer_accounts: vec![58] })
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SigningConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_signing_config_json_schema_lists_sections() {
        let schema = schemars::schema_for!(SigningConfig);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("entities"));
        assert!(json.contains("waived_payer_accounts"));
    }
}
