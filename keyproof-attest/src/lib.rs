//! # keyproof Attestation
//!
//! Parsing and verification of the fixed-size signed-message records that
//! hardware wallets write to prove control of their deposit address.
//!
//! - **Parser**: 512-byte record to [`AttestationRecord`]
//! - **Verification**: feeds a parsed record through the message verifier
//! - **Self-test**: built-in known-answer vectors for the whole pipeline
//!
//! ## Example
//!
//! ```rust,no_run
//! use keyproof_attest::{parse_file, verify_attestation};
//!
//! let record = parse_file("verify.txt")?;
//! let verified = verify_attestation(&record)?;
//! println!("{} controls {}", verified.public_key_hex, verified.address);
//! # Ok::<(), keyproof_core::KeyproofError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod parser;
pub mod selftest;

use tracing::instrument;

use keyproof_core::error::Result;
use keyproof_core::types::{AttestationRecord, VerifiedMessage};

pub use parser::{parse, parse_bytes, parse_file};
pub use selftest::{run_selftest, CheckResult, SelfTestReport};

/// Verifies the signature carried by a parsed attestation record.
///
/// The message is hashed exactly as stored on the record, `\r\n` endings
/// included.
#[instrument(skip(record), fields(address = %record.address, network = %record.network))]
pub fn verify_attestation(record: &AttestationRecord) -> Result<VerifiedMessage> {
    keyproof_crypto::verify_message(&record.address, &record.signature, &record.message)
}
