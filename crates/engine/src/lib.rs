//! Signing order resolution for a permissioned ledger.
//!
//! Given a transaction, [`SigningOrderResolver`] computes the ordered,
//! deduplicated keys whose signatures authorize it:
//!
//! - [`SigningOrderResolver::keys_for_payer`] for the fee payer
//! - [`SigningOrderResolver::keys_for_other_parties`] for every other party,
//!   including the inner transaction of a schedule
//!
//! Entity metadata comes from a [`ledger_sigs_state::SigMetadataLookup`].
//! Privileged payers may skip signatures through [`SignatureWaivers`].
//! Failures are reported through a caller-chosen
//! [`SigningOrderResultFactory`].
//!
//! # Example
//!
//! ```no_run
//! use ledger_sigs_engine::{PrecheckResultFactory, SigningOrderResolver};
//! use ledger_sigs_state::LedgerState;
//! use ledger_sigs_types::{Transaction, config::SigningConfig};
//!
//! # fn check(state: &LedgerState, txn: &Transaction) {
//! let config = SigningConfig::default();
//! let resolver = SigningOrderResolver::from_config(state.snapshot(), &config);
//! let result = resolver.keys_for_other_parties(txn, &PrecheckResultFactory);
//! if let Some(rejection) = result.error_report() {
//!     println!("rejected: {}", rejection.code);
//! }
//! # }
//! ```

#![deny(unsafe_code)]

pub mod activation;
mod factory;
mod order;
mod policies;
mod resolver;
mod waivers;

pub use activation::{
    DefaultActivation, KeyActivationCharacteristics, RevocationCharacteristics, is_key_active,
};
pub use factory::{
    HandleResultFactory, OrderingFailure, PrecheckRejection, PrecheckResultFactory, ResponseCode,
    SignatureStatus, SignatureStatusCode, SigningOrderResultFactory,
};
pub use order::{KeyActivation, KeyScope, OrderedKey, SigningOrderResult};
pub use policies::{SystemOpAuthorization, SystemOpPolicies};
pub use resolver::SigningOrderResolver;
pub use waivers::{NoSigWaivers, PolicyBasedSigWaivers, SignatureWaivers};
