//! Multi-chain address derivation.
//!
//! ## Derivation
//!
//! ```text
//! pk_u, pk_c          = SEC1 uncompressed / compressed serializations
//! P2PKH(chain, pk)    = base58check(chain.p2pkh_version || hash160(pk))
//! P2WPKH(chain)       = bech32(chain.hrp, witness v0, hash160(pk_c))
//! ethereum            = "0x" || hex(keccak256(pk_u[1..])[12..32])
//! ```
//!
//! Bitcoin and Litecoin get all three script types; Dogecoin only the
//! uncompressed P2PKH form.

use bech32::{segwit, Hrp};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use tracing::{debug, instrument};

use keyproof_core::chain::{ChainParams, BITCOIN, DOGECOIN, LITECOIN};
use keyproof_core::constants::{
    COMPRESSED_PUBLIC_KEY_SIZE, ETH_ADDRESS_SIZE, KECCAK256_SIZE, SECRET_KEY_SIZE,
    UNCOMPRESSED_PUBLIC_KEY_SIZE,
};
use keyproof_core::error::{KeyproofError, Result};
use keyproof_core::types::{AddressSet, PublicKeyMaterial};

use crate::hash::{base58check_encode, hash160, keccak256};

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses a compressed or uncompressed SEC1 public key from hex.
///
/// # Errors
///
/// Returns `InvalidPublicKey` for malformed hex, a bad SEC1 encoding, or a
/// point that is not on secp256k1.
pub fn parse_public_key(public_key_hex: &str) -> Result<PublicKeyMaterial> {
    let bytes = hex::decode(public_key_hex.trim())
        .map_err(|e| KeyproofError::InvalidPublicKey(format!("hex: {}", e)))?;
    // k256 also takes the compact (0x05) and hybrid (0x06/0x07) tags
    match (bytes.len(), bytes.first()) {
        (COMPRESSED_PUBLIC_KEY_SIZE, Some(0x02 | 0x03))
        | (UNCOMPRESSED_PUBLIC_KEY_SIZE, Some(0x04)) => {}
        (len, tag) => {
            return Err(KeyproofError::InvalidPublicKey(format!(
                "unsupported SEC1 encoding: {} bytes, tag {:#04x}",
                len,
                tag.copied().unwrap_or_default()
            )))
        }
    }
    let point = PublicKey::from_sec1_bytes(&bytes)
        .map_err(|_| KeyproofError::InvalidPublicKey("not a secp256k1 point".into()))?;
    material_from_point(&point)
}

/// Computes the public key of a secret exponent.
///
/// # Errors
///
/// Returns `InvalidSecretKey` if the exponent is zero or not below the
/// curve order.
pub fn public_key_from_secret(secret: &[u8; SECRET_KEY_SIZE]) -> Result<PublicKeyMaterial> {
    let secret_key = SecretKey::from_slice(secret)
        .map_err(|_| KeyproofError::InvalidSecretKey("exponent out of range".into()))?;
    material_from_point(&secret_key.public_key())
}

pub(crate) fn material_from_point(point: &PublicKey) -> Result<PublicKeyMaterial> {
    let compressed = point.to_encoded_point(true);
    let uncompressed = point.to_encoded_point(false);
    PublicKeyMaterial::from_serializations(compressed.as_bytes(), uncompressed.as_bytes())
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS FORMATS
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a legacy pay-to-pubkey-hash address for `params`.
///
/// `public_key` is hashed as given, so the compressed and uncompressed
/// serializations of one key give two different addresses.
pub fn p2pkh_address(params: &dyn ChainParams, public_key: &[u8]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(params.p2pkh_version());
    payload.extend_from_slice(&hash160(public_key));
    base58check_encode(&payload)
}

/// Encodes a segwit v0 pay-to-witness-pubkey-hash address for `params`.
///
/// # Errors
///
/// Returns `AddressEncoding` if the chain has no bech32 prefix.
pub fn p2wpkh_address(params: &dyn ChainParams, compressed_key: &[u8]) -> Result<String> {
    let prefix = params.bech32_hrp().ok_or_else(|| {
        KeyproofError::AddressEncoding(format!("{} has no segwit prefix", params.name()))
    })?;
    let hrp = Hrp::parse(prefix).map_err(|e| KeyproofError::AddressEncoding(e.to_string()))?;

    segwit::encode_v0(hrp, &hash160(compressed_key))
        .map_err(|e| KeyproofError::AddressEncoding(e.to_string()))
}

/// Derives the Ethereum address of a key.
///
/// Lowercase hex, no EIP-55 checksum casing.
pub fn ethereum_address(key: &PublicKeyMaterial) -> String {
    let hash = keccak256(key.coordinates());
    format!("0x{}", hex::encode(&hash[KECCAK256_SIZE - ETH_ADDRESS_SIZE..]))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives every supported address from a hex public key.
///
/// # Example
///
/// ```rust
/// use keyproof_crypto::derive_addresses;
///
/// let set = derive_addresses(
///     "036afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b2",
/// ).unwrap();
/// assert_eq!(set.bitcoin_p2pkh_compressed, "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg");
/// ```
#[instrument(level = "debug")]
pub fn derive_addresses(public_key_hex: &str) -> Result<AddressSet> {
    let key = parse_public_key(public_key_hex)?;
    derive_from_material(&key)
}

/// Derives every supported address from parsed key material.
pub fn derive_from_material(key: &PublicKeyMaterial) -> Result<AddressSet> {
    let set = AddressSet {
        bitcoin_p2pkh: p2pkh_address(&BITCOIN, key.uncompressed()),
        bitcoin_p2pkh_compressed: p2pkh_address(&BITCOIN, key.compressed()),
        bitcoin_p2wpkh: p2wpkh_address(&BITCOIN, key.compressed())?,
        ethereum: ethereum_address(key),
        litecoin_p2pkh: p2pkh_address(&LITECOIN, key.uncompressed()),
        litecoin_p2pkh_compressed: p2pkh_address(&LITECOIN, key.compressed()),
        litecoin_p2wpkh: p2wpkh_address(&LITECOIN, key.compressed())?,
        dogecoin_p2pkh: p2pkh_address(&DOGECOIN, key.uncompressed()),
        uncompressed_hex: key.uncompressed_hex(),
        compressed_hex: key.compressed_hex(),
    };

    debug!(compressed = %set.compressed_hex, "Derived address set");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const HELLO_UNCOMPRESSED: &str = "046afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b287224ee09db6d217912f4706147bb96762d1e11e7ce2e928fd61ecdbd2e37a99";
    const HELLO_COMPRESSED: &str =
        "036afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b2";

    #[test]
    fn test_derive_known_key() {
        let set = derive_addresses(HELLO_UNCOMPRESSED).unwrap();

        assert_eq!(set.bitcoin_p2pkh, "19MkFnavAVX9Njwt43a2sWZrVg9G5jLntU");
        assert_eq!(set.bitcoin_p2pkh_compressed, "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg");
        assert_eq!(set.bitcoin_p2wpkh, "bc1qzeapyvz7kl7v5vj865rahts2jjcdz0ssyc3wl8");
        assert_eq!(set.ethereum, "0x148582b4f60139ce2bc7e25e7551f31c1122b6f4");
        assert_eq!(set.litecoin_p2pkh, "LTahWztkF9mCdYe3EBZL9XdchtWYC8LJYm");
        assert_eq!(set.litecoin_p2pkh_compressed, "LMGoN5WZRVLRra8Vv6uH6EyCs1zDmVPhZV");
        assert_eq!(set.litecoin_p2wpkh, "ltc1qzeapyvz7kl7v5vj865rahts2jjcdz0ssqyt28h");
        assert_eq!(set.dogecoin_p2pkh, "DDVqo3XZTuRRuk8UndZbRGjTNosZNGHQdo");
        assert_eq!(set.uncompressed_hex, HELLO_UNCOMPRESSED);
        assert_eq!(set.compressed_hex, HELLO_COMPRESSED);
    }

    #[test]
    fn test_derive_from_compressed_matches_uncompressed() {
        let from_u = derive_addresses(HELLO_UNCOMPRESSED).unwrap();
        let from_c = derive_addresses(HELLO_COMPRESSED).unwrap();
        assert_eq!(from_u, from_c);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let first = derive_addresses(HELLO_UNCOMPRESSED).unwrap();
        let second = derive_addresses(&first.compressed_hex).unwrap();
        assert_eq!(first, second);
    }

    #[test_case("" ; "empty")]
    #[test_case("zz" ; "not hex")]
    #[test_case("02" ; "prefix only")]
    #[test_case("056afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b2" ; "bad prefix")]
    #[test_case("066afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b287224ee09db6d217912f4706147bb96762d1e11e7ce2e928fd61ecdbd2e37a99" ; "hybrid even tag")]
    #[test_case("076afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b287224ee09db6d217912f4706147bb96762d1e11e7ce2e928fd61ecdbd2e37a99" ; "hybrid odd tag")]
    #[test_case("046afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b2" ; "uncompressed tag on compressed length")]
    #[test_case("04ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff0000000000000000000000000000000000000000000000000000000000000001" ; "off curve")]
    fn test_derive_rejects_invalid_key(hex: &str) {
        let err = derive_addresses(hex).unwrap_err();
        assert!(matches!(err, KeyproofError::InvalidPublicKey(_)));
    }

    #[test]
    fn test_public_key_from_secret() {
        let secret: [u8; 32] =
            hex::decode("fc3fa47324ceb77e1160833eddd30ea15efa22a6e59c204921e12fbbab1becb8")
                .unwrap()
                .try_into()
                .unwrap();
        let key = public_key_from_secret(&secret).unwrap();
        assert_eq!(
            key.compressed_hex(),
            "0375ebeb90f0f0043edeea9d5b7b5caee52dbf8cbefe93a47c4e47f764e614a666"
        );

        let set = derive_from_material(&key).unwrap();
        assert_eq!(set.bitcoin_p2pkh, "15ivJZsn3qrAVQTeL4DA9FthHkVhvMDUNJ");
        assert_eq!(set.bitcoin_p2pkh_compressed, "1N1A85pnVeYcEWDk39HrKTsZzi4ZTRRwS2");
        assert_eq!(set.bitcoin_p2wpkh, "bc1que3yr9lst3ejh8nphpvrcym7v75z4gfuglsh7f");
        assert_eq!(set.litecoin_p2pkh, "LPwsZnBc8W6DkD9oWCCTRGxTVxrz2yZMxG");
        assert_eq!(set.litecoin_p2pkh_compressed, "LgE7PJ8caJnfVJuuDHH9bUwLCvRqbG3s7y");
        assert_eq!(set.dogecoin_p2pkh, "D9s1qppRMFkT2QeF4eCih24JAtE1AuXWGx");
    }

    #[test]
    fn test_public_key_from_zero_secret_fails() {
        let err = public_key_from_secret(&[0u8; 32]).unwrap_err();
        assert!(matches!(err, KeyproofError::InvalidSecretKey(_)));
    }

    #[test]
    fn test_dogecoin_has_no_segwit() {
        let key = parse_public_key(HELLO_COMPRESSED).unwrap();
        let err = p2wpkh_address(&DOGECOIN, key.compressed()).unwrap_err();
        assert!(matches!(err, KeyproofError::AddressEncoding(_)));
    }

    proptest! {
        #[test]
        fn prop_derive_idempotent(
            secret in any::<[u8; 32]>().prop_filter("valid scalar", |s| SecretKey::from_slice(s).is_ok())
        ) {
            let key = public_key_from_secret(&secret).unwrap();
            let first = derive_addresses(&key.uncompressed_hex()).unwrap();
            let second = derive_addresses(&first.compressed_hex).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert!(first.bitcoin_p2pkh.starts_with('1'));
            prop_assert!(first.litecoin_p2pkh.starts_with('L'));
            prop_assert!(first.dogecoin_p2pkh.starts_with('D'));
            prop_assert!(first.bitcoin_p2wpkh.starts_with("bc1q"));
            prop_assert!(first.litecoin_p2wpkh.starts_with("ltc1q"));
            prop_assert_eq!(first.ethereum.len(), 42);
        }
    }
}
