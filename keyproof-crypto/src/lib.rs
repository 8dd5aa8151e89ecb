//! # keyproof Cryptography
//!
//! secp256k1 key handling for the keyproof toolkit.
//!
//! This crate provides:
//!
//! - **Hash**: SHA-256d, hash160, Keccak-256, base58check
//! - **WIF**: Private key import format encode/decode
//! - **Address**: P2PKH, P2WPKH and Ethereum address derivation
//! - **Message**: Signed-message digest, compact key recovery, verification
//!
//! ## Example
//!
//! ```rust
//! use keyproof_crypto::{derive_addresses, verify_message};
//!
//! let verified = verify_message(
//!     "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg",
//!     "Hz0pDxS09fEdjKrSJenLYsz05gakT6eW9GdzKDopnlwUL3bf3mQeJcS+takCIMuavK/NLOorXWXZCqV0KBMlwgU=",
//!     "Hello World",
//! ).unwrap();
//!
//! let addresses = derive_addresses(&verified.public_key_hex).unwrap();
//! assert_eq!(addresses.ethereum, "0x148582b4f60139ce2bc7e25e7551f31c1122b6f4");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod hash;
pub mod message;
pub mod wif;

// Re-export main functions at crate root
pub use address::{
    derive_addresses, derive_from_material, ethereum_address, p2pkh_address, p2wpkh_address,
    parse_public_key, public_key_from_secret,
};
pub use hash::{base58check_encode, double_sha256, hash160, keccak256};
pub use message::{
    chain_for_address, decode_signature, message_digest, recover_compact, verify_message,
    verify_signature, write_var_bytes,
};
pub use wif::{decode_wif, encode_for, encode_wif, encode_wif_bytes, WifExt};
