//! Wire-format constants for keyproof.
//!
//! Sizes follow the Bitcoin serialization rules for secp256k1 keys, WIF
//! strings and compact signatures. The attestation markers match the text
//! records written by the hardware device.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a secp256k1 secret exponent in bytes.
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a SEC1 compressed public key (`02`/`03` || X).
pub const COMPRESSED_PUBLIC_KEY_SIZE: usize = 33;

/// Size of a SEC1 uncompressed public key (`04` || X || Y).
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;

/// Size of a compact recoverable signature (header || r || s).
pub const COMPACT_SIGNATURE_SIZE: usize = 65;

/// Smallest valid compact signature header byte.
pub const COMPACT_HEADER_MIN: u8 = 27;

/// Largest valid compact signature header byte (27 + 3 + 4).
pub const COMPACT_HEADER_MAX: u8 = 34;

// ═══════════════════════════════════════════════════════════════════════════════
// HASH SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a RIPEMD-160(SHA-256(x)) digest.
pub const HASH160_SIZE: usize = 20;

/// Size of the base58check checksum (first bytes of SHA-256d).
pub const CHECKSUM_SIZE: usize = 4;

/// Size of an Ethereum address in bytes.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of a Keccak-256 digest.
pub const KECCAK256_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// WIF LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Marker byte appended to the secret when the key is used compressed.
pub const WIF_COMPRESSION_FLAG: u8 = 0x01;

/// Decoded length of an uncompressed WIF: version + secret + checksum.
pub const WIF_UNCOMPRESSED_LEN: usize = 1 + SECRET_KEY_SIZE + CHECKSUM_SIZE;

/// Decoded length of a compressed WIF: version + secret + flag + checksum.
pub const WIF_COMPRESSED_LEN: usize = 1 + SECRET_KEY_SIZE + 1 + CHECKSUM_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// ATTESTATION RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed size of a device attestation record (`verify.txt`).
pub const ATTESTATION_RECORD_SIZE: usize = 512;

/// Header of a Bitcoin attestation record.
pub const ATTESTATION_HEADER_BITCOIN: &str = "-----BEGIN BITCOIN SIGNED MESSAGE-----\n";

/// Header of a Litecoin attestation record.
pub const ATTESTATION_HEADER_LITECOIN: &str = "-----BEGIN LITECOIN SIGNED MESSAGE-----\n";

/// Separator between the message body and the signature block.
pub const ATTESTATION_SIGNATURE_MARKER: &str = "\n-----BEGIN SIGNATURE-----\n";

/// Prefix of the footer that closes the signature block.
pub const ATTESTATION_FOOTER_PREFIX: &str = "\n-----END ";
