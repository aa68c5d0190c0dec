//! Test configuration helpers.
//!
//! Centralizes the signing configuration the scenario ledger assumes, so
//! tests agree on which accounts are privileged.

// Fixtures are expected to panic on malformed setup
#![allow(clippy::expect_used)]

use ledger_sigs_types::config::{EntityNumbers, SigningConfig, WaiverConfig};

use crate::scenarios::WAIVED_PAYER;

/// Returns the signing configuration matching the scenario ledger.
///
/// - Well-known entities: `EntityNumbers::default()` (treasury 2, system
///   admin 50, file admins 55-57)
/// - Waived payers: [`WAIVED_PAYER`] only
///
/// # Panics
///
/// Panics if the fixture configuration fails validation.
#[must_use]
pub fn test_signing_config() -> SigningConfig {
    let waivers = WaiverConfig::builder()
        .waived_payer_accounts(vec![WAIVED_PAYER.num])
        .build()
        .expect("valid waiver config");
    SigningConfig::builder()
        .entities(EntityNumbers::default())
        .waivers(waivers)
        .build()
        .expect("valid signing config")
}

/// The same configuration rendered as TOML, for loader tests.
#[must_use]
pub fn test_signing_config_toml() -> String {
    format!(
        "[entities]\ntreasury = 2\nsystem_admin = 50\n\n[waivers]\nwaived_payer_accounts = [{}]\n",
        WAIVED_PAYER.num
    )
}
