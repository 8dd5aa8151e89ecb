//! Wallet Import Format codec.
//!
//! ## Layout
//!
//! ```text
//! uncompressed: version (1) || secret (32)        || checksum (4)   = 37 bytes
//! compressed:   version (1) || secret (32) || 01  || checksum (4)   = 38 bytes
//! ```
//!
//! The checksum is the first four bytes of SHA-256d over everything before
//! it, and the whole string is base58 encoded.
//!
//! ## Decode order
//!
//! Length, compression marker, version prefix, then checksum. Structural
//! problems are reported before a checksum mismatch so the caller always
//! learns the most specific reason a key was rejected.

use tracing::{debug, instrument};
use zeroize::{Zeroize, Zeroizing};

use keyproof_core::chain::{ChainParams, Network};
use keyproof_core::constants::{
    CHECKSUM_SIZE, SECRET_KEY_SIZE, WIF_COMPRESSED_LEN, WIF_COMPRESSION_FLAG, WIF_UNCOMPRESSED_LEN,
};
use keyproof_core::error::{KeyproofError, Result};
use keyproof_core::types::PrivateKeyRecord;

use crate::hash::{base58check_encode, checksum};

// ═══════════════════════════════════════════════════════════════════════════════
// DECODE
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes a WIF string into its network, secret exponent and compression flag.
///
/// # Errors
///
/// - `InvalidBase58` if the string has symbols outside the alphabet
/// - `MalformedLength` unless the decoded form is 37 or 38 bytes
/// - `MalformedCompressionByte` if a 38-byte key lacks the `0x01` marker
/// - `UnknownPrefix` unless the version byte is Bitcoin or Litecoin
/// - `ChecksumMismatch` if the trailing four bytes do not match
///
/// # Example
///
/// ```rust
/// use keyproof_core::Network;
/// use keyproof_crypto::decode_wif;
///
/// let key = decode_wif("L5g3omnu8BYUS5zUA74AW1eSbZ1xx72HzSVgJcejsvMTn3P579qd").unwrap();
/// assert_eq!(key.network(), Network::Bitcoin);
/// assert!(key.is_compressed());
/// ```
#[instrument(skip_all)]
pub fn decode_wif(key: &str) -> Result<PrivateKeyRecord> {
    let bytes = Zeroizing::new(
        bs58::decode(key)
            .into_vec()
            .map_err(|e| KeyproofError::InvalidBase58(e.to_string()))?,
    );

    let record = parse_wif_bytes(&bytes)?;
    debug!(
        network = %record.network(),
        compressed = record.is_compressed(),
        "Decoded WIF"
    );
    Ok(record)
}

fn parse_wif_bytes(bytes: &[u8]) -> Result<PrivateKeyRecord> {
    let compressed = match bytes.len() {
        WIF_COMPRESSED_LEN => {
            let flag = bytes[WIF_COMPRESSED_LEN - CHECKSUM_SIZE - 1];
            if flag != WIF_COMPRESSION_FLAG {
                return Err(KeyproofError::MalformedCompressionByte(flag));
            }
            true
        }
        WIF_UNCOMPRESSED_LEN => false,
        actual => return Err(KeyproofError::MalformedLength { actual }),
    };

    let network =
        Network::from_wif_version(bytes[0]).ok_or(KeyproofError::UnknownPrefix(bytes[0]))?;

    let (payload, trailer) = bytes.split_at(bytes.len() - CHECKSUM_SIZE);
    let expected = checksum(payload);
    if expected[..] != *trailer {
        return Err(KeyproofError::ChecksumMismatch {
            expected: hex::encode(expected),
            actual: hex::encode(trailer),
        });
    }

    let mut secret = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
    secret.copy_from_slice(&payload[1..1 + SECRET_KEY_SIZE]);
    Ok(PrivateKeyRecord::new(network, *secret, compressed))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENCODE
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a hex secret exponent as WIF under an arbitrary version byte.
///
/// # Errors
///
/// Returns `Hex` for malformed hex and `InvalidSecretLength` unless the
/// secret is exactly 32 bytes.
pub fn encode_wif(version: u8, secret_hex: &str, compress: bool) -> Result<String> {
    let secret = Zeroizing::new(hex::decode(secret_hex)?);
    if secret.len() != SECRET_KEY_SIZE {
        return Err(KeyproofError::InvalidSecretLength {
            expected: SECRET_KEY_SIZE,
            actual: secret.len(),
        });
    }

    let mut bytes = [0u8; SECRET_KEY_SIZE];
    bytes.copy_from_slice(&secret);
    let wif = encode_wif_bytes(version, &bytes, compress);
    bytes.zeroize();
    Ok(wif)
}

/// Encodes a raw secret exponent as WIF under an arbitrary version byte.
pub fn encode_wif_bytes(version: u8, secret: &[u8; SECRET_KEY_SIZE], compress: bool) -> String {
    let mut payload = Zeroizing::new(Vec::with_capacity(WIF_COMPRESSED_LEN));
    payload.push(version);
    payload.extend_from_slice(secret);
    if compress {
        payload.push(WIF_COMPRESSION_FLAG);
    }
    base58check_encode(&payload)
}

/// Re-encodes a decoded key for another chain and/or compression setting.
///
/// ```rust
/// use keyproof_core::LITECOIN;
/// use keyproof_crypto::{decode_wif, encode_for};
///
/// let key = decode_wif("5KjNw6cmtUK1KpoYytfnCZKTC11DgDhAjvMYZYBpKncuHd6YzkX").unwrap();
/// let ltc = encode_for(&key, &LITECOIN, true);
/// assert!(ltc.starts_with('T'));
/// ```
pub fn encode_for(
    record: &PrivateKeyRecord,
    params: &dyn ChainParams,
    compress: bool,
) -> String {
    encode_wif_bytes(params.wif_version(), record.secret(), compress)
}

/// WIF re-encoding on a decoded key.
pub trait WifExt {
    /// Encodes the key for `params`, compressed or not.
    fn to_wif(&self, params: &dyn ChainParams, compress: bool) -> String;
}

impl WifExt for PrivateKeyRecord {
    fn to_wif(&self, params: &dyn ChainParams, compress: bool) -> String {
        encode_for(self, params, compress)
    }
}
