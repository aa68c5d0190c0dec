//! Shared test utilities for ledger-sigs crates.
//!
//! This crate provides common fixtures to reduce boilerplate across test modules:
//!
//! - [`fixture_key`] - Deterministic ed25519 keys derived from a label
//! - [`scenario_snapshot`] - Canonical ledger with one entity per signing situation
//! - [`txn`] / [`scheduled_txn`] - Transactions with a fixed valid start
//! - [`test_signing_config`] - Signing configuration matching the scenario ledger
//! - [`strategies`] - Proptest strategies for keys and scenario bodies

#![deny(unsafe_code)]
// Test utilities are allowed to use unwrap for simplicity
#![cfg_attr(test, allow(clippy::disallowed_methods))]

mod config;
pub use config::{test_signing_config, test_signing_config_toml};

mod keys;
pub use keys::{fixture_key, fixture_leaf, fixture_list, fixture_threshold};

mod scenarios;
pub use scenarios::*;

pub mod strategies;
