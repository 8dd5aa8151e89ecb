//! Domain types for keyproof.
//!
//! - [`PrivateKeyRecord`]: Decoded WIF key
//! - [`PublicKeyMaterial`]: Compressed and uncompressed public key
//! - [`AddressSet`]: Every address derived from one key
//! - [`VerifiedMessage`]: Result of signature verification
//! - [`AttestationRecord`]: Parsed device attestation

mod address;
mod keys;
mod message;

pub use address::*;
pub use keys::*;
pub use message::*;
