//! Hashing and checksum helpers.
//!
//! The Bitcoin family hashes everything with SHA-256 and RIPEMD-160:
//!
//! ```text
//! sha256d(x)  = SHA256(SHA256(x))
//! hash160(x)  = RIPEMD160(SHA256(x))
//! checksum(x) = sha256d(x)[0..4]
//! base58check(x) = base58(x || checksum(x))
//! ```
//!
//! Ethereum addresses use Keccak-256 instead.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use keyproof_core::constants::{CHECKSUM_SIZE, HASH160_SIZE, KECCAK256_SIZE};

// ═══════════════════════════════════════════════════════════════════════════════
// SHA-256 / RIPEMD-160
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes SHA-256.
pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// Computes SHA-256 applied twice.
pub fn double_sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(input)).into()
}

/// Computes RIPEMD-160 of the SHA-256 digest.
pub fn hash160(input: &[u8]) -> [u8; HASH160_SIZE] {
    Ripemd160::digest(Sha256::digest(input)).into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// KECCAK256 (for Ethereum addresses)
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes Keccak256 hash (used for Ethereum addresses).
///
/// Note: Keccak256 is NOT SHA3-256. They use different padding.
pub fn keccak256(input: &[u8]) -> [u8; KECCAK256_SIZE] {
    Keccak256::digest(input).into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// BASE58CHECK
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns the 4-byte base58check checksum of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let digest = double_sha256(payload);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}

/// Encodes `payload || checksum(payload)` in base58.
pub fn base58check_encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_SIZE);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).into_string()
}
