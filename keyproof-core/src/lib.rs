//! # keyproof Core
//!
//! Core types, chain parameters, and errors shared by every keyproof crate.
//!
//! This crate provides the foundational building blocks:
//!
//! - **Chain**: Per-network constants (version bytes, bech32 prefixes, WIF prefixes)
//! - **Types**: Private key records, public key material, address sets, verified messages
//! - **Errors**: One error enum covering the WIF codec, deriver, verifier, and parser
//! - **Constants**: Wire-format sizes and markers
//!
//! ## Example
//!
//! ```rust
//! use keyproof_core::{ChainParams, Network, BITCOIN};
//!
//! assert_eq!(BITCOIN.p2pkh_version(), 0x00);
//! assert_eq!(Network::from_wif_version(0xb0), Some(Network::Litecoin));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod chain;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use chain::*;
pub use constants::*;
pub use error::{KeyproofError, Result};
pub use types::*;
