//! Key types for keyproof.
//!
//! - [`PrivateKeyRecord`]: Decoded WIF key (network, secret exponent, compression flag)
//! - [`PublicKeyMaterial`]: A secp256k1 point in both SEC1 serializations

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::chain::Network;
use crate::constants::{COMPRESSED_PUBLIC_KEY_SIZE, SECRET_KEY_SIZE, UNCOMPRESSED_PUBLIC_KEY_SIZE};
use crate::error::{KeyproofError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEY RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of decoding a WIF private key.
///
/// The secret exponent is always exactly 32 bytes and is zeroized when the
/// record is dropped. Records are transient and never persisted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyRecord {
    #[zeroize(skip)]
    network: Network,
    secret: [u8; SECRET_KEY_SIZE],
    compressed: bool,
}

impl PrivateKeyRecord {
    /// Creates a record from a raw secret exponent.
    pub fn new(network: Network, secret: [u8; SECRET_KEY_SIZE], compressed: bool) -> Self {
        Self {
            network,
            secret,
            compressed,
        }
    }

    /// Creates a record from a hex-encoded secret exponent.
    ///
    /// # Errors
    /// Returns an error if the hex is malformed or not 32 bytes long.
    pub fn from_secret_hex(network: Network, secret_hex: &str, compressed: bool) -> Result<Self> {
        let mut bytes = hex::decode(secret_hex)?;
        if bytes.len() != SECRET_KEY_SIZE {
            let actual = bytes.len();
            bytes.zeroize();
            return Err(KeyproofError::InvalidSecretLength {
                expected: SECRET_KEY_SIZE,
                actual,
            });
        }

        let mut secret = [0u8; SECRET_KEY_SIZE];
        secret.copy_from_slice(&bytes);
        bytes.zeroize();
        Ok(Self::new(network, secret, compressed))
    }

    /// Returns the network tag.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns the raw secret exponent.
    pub fn secret(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.secret
    }

    /// Returns the secret exponent as lowercase hex.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret)
    }

    /// Returns true if the key is used with compressed public keys.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }
}

impl std::fmt::Debug for PrivateKeyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeyRecord")
            .field("network", &self.network)
            .field("secret", &"[REDACTED]")
            .field("compressed", &self.compressed)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY MATERIAL
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 public key carried in both SEC1 serializations.
///
/// Legacy addresses hash either form, segwit hashes only the compressed one,
/// and Ethereum hashes the raw X || Y coordinates.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    compressed: [u8; COMPRESSED_PUBLIC_KEY_SIZE],
    uncompressed: [u8; UNCOMPRESSED_PUBLIC_KEY_SIZE],
}

impl PublicKeyMaterial {
    /// Builds from the two serializations of the same point.
    ///
    /// Only the framing is checked here; curve membership is the job of
    /// whoever produced the bytes.
    pub fn from_serializations(compressed: &[u8], uncompressed: &[u8]) -> Result<Self> {
        if compressed.len() != COMPRESSED_PUBLIC_KEY_SIZE || !matches!(compressed[0], 0x02 | 0x03) {
            return Err(KeyproofError::InvalidPublicKey(format!(
                "bad compressed serialization ({} bytes)",
                compressed.len()
            )));
        }
        if uncompressed.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE || uncompressed[0] != 0x04 {
            return Err(KeyproofError::InvalidPublicKey(format!(
                "bad uncompressed serialization ({} bytes)",
                uncompressed.len()
            )));
        }
        if compressed[1..] != uncompressed[1..COMPRESSED_PUBLIC_KEY_SIZE] {
            return Err(KeyproofError::InvalidPublicKey(
                "serializations describe different points".into(),
            ));
        }

        let mut c = [0u8; COMPRESSED_PUBLIC_KEY_SIZE];
        c.copy_from_slice(compressed);
        let mut u = [0u8; UNCOMPRESSED_PUBLIC_KEY_SIZE];
        u.copy_from_slice(uncompressed);
        Ok(Self {
            compressed: c,
            uncompressed: u,
        })
    }

    /// Returns the 33-byte compressed serialization.
    pub fn compressed(&self) -> &[u8] {
        &self.compressed
    }

    /// Returns the 65-byte uncompressed serialization.
    pub fn uncompressed(&self) -> &[u8] {
        &self.uncompressed
    }

    /// Returns the 64-byte X || Y coordinates without the format byte.
    pub fn coordinates(&self) -> &[u8] {
        &self.uncompressed[1..]
    }

    /// Returns the compressed serialization as hex.
    pub fn compressed_hex(&self) -> String {
        hex::encode(self.compressed)
    }

    /// Returns the uncompressed serialization as hex.
    pub fn uncompressed_hex(&self) -> String {
        hex::encode(self.uncompressed)
    }
}

impl std::fmt::Debug for PublicKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKeyMaterial({})", self.compressed_hex())
    }
}
