//! Signed-message verification.
//!
//! ## Protocol
//!
//! ```text
//! magic    = "Bitcoin Signed Message:\n"  if address ~ ^(1|3|bc1).
//!          | "Litecoin Signed Message:\n" otherwise
//! preimage = varint(len(magic)) || magic || varint(len(msg)) || msg
//! digest   = SHA256(SHA256(preimage))
//! Q        = recover(digest, compact_signature)
//! ```
//!
//! The signature is accepted when the claimed address is a legacy P2PKH
//! address of `Q` on Bitcoin or Litecoin. The compression hint in the
//! header byte selects which serialization of `Q` the address must hash.
//!
//! ## Compact Signature
//!
//! ```text
//! byte 0      27 + recovery_id (+ 4 when the signer's key is compressed)
//! bytes 1-32  r
//! bytes 33-64 s
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::PublicKey;
use tracing::{debug, instrument};

use keyproof_core::chain::{ChainParams, BITCOIN, LITECOIN};
use keyproof_core::constants::{COMPACT_HEADER_MAX, COMPACT_HEADER_MIN, COMPACT_SIGNATURE_SIZE};
use keyproof_core::error::{KeyproofError, Result};
use keyproof_core::types::{PublicKeyMaterial, VerifiedMessage};

use crate::address::{derive_from_material, material_from_point};
use crate::hash::double_sha256;

const BITCOIN_ADDRESS_PREFIXES: [&str; 3] = ["1", "3", "bc1"];

// ═══════════════════════════════════════════════════════════════════════════════
// PREIMAGE
// ═══════════════════════════════════════════════════════════════════════════════

/// Appends `data` to `buf` with a CompactSize length prefix.
pub fn write_var_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    let len = data.len() as u64;
    if len < 0xfd {
        buf.push(len as u8);
    } else if len <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(len as u16).to_le_bytes());
    } else if len <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(len as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&len.to_le_bytes());
    }
    buf.extend_from_slice(data);
}

/// Picks the chain whose message magic is used for `address`.
///
/// Bitcoin-looking addresses (`1...`, `3...`, `bc1...`) get the Bitcoin
/// magic; anything else is treated as Litecoin.
pub fn chain_for_address(address: &str) -> &'static dyn ChainParams {
    let is_bitcoin = BITCOIN_ADDRESS_PREFIXES.iter().any(|prefix| {
        address
            .strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c != '\n')
    });

    if is_bitcoin {
        &BITCOIN
    } else {
        &LITECOIN
    }
}

/// Computes the digest a wallet signs for `message` under `magic`.
pub fn message_digest(magic: &str, message: &[u8]) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(magic.len() + message.len() + 10);
    write_var_bytes(&mut preimage, magic.as_bytes());
    write_var_bytes(&mut preimage, message);
    double_sha256(&preimage)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECOVERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Recovers the signer's public key from a 65-byte compact signature.
///
/// Returns the key and whether the header marks it as compressed. High-S
/// signatures are normalized before recovery.
///
/// # Errors
///
/// `WrongSignatureLength` unless the signature is 65 bytes, `RecoveryFailed`
/// for a bad header byte, out-of-range scalars, or an unrecoverable point.
pub fn recover_compact(digest: &[u8; 32], signature: &[u8]) -> Result<(PublicKeyMaterial, bool)> {
    if signature.len() != COMPACT_SIGNATURE_SIZE {
        return Err(KeyproofError::WrongSignatureLength {
            actual: signature.len(),
        });
    }

    let header = signature[0];
    if !(COMPACT_HEADER_MIN..=COMPACT_HEADER_MAX).contains(&header) {
        return Err(KeyproofError::RecoveryFailed(format!(
            "header byte {} outside {}..={}",
            header, COMPACT_HEADER_MIN, COMPACT_HEADER_MAX
        )));
    }
    let offset = header - COMPACT_HEADER_MIN;
    let compressed = offset & 0x04 != 0;
    let mut recovery_byte = offset & 0x03;

    let mut sig = Signature::from_slice(&signature[1..])
        .map_err(|_| KeyproofError::RecoveryFailed("r or s out of range".into()))?;
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recovery_byte ^= 1;
    }

    let recovery_id = RecoveryId::from_byte(recovery_byte)
        .ok_or_else(|| KeyproofError::RecoveryFailed("invalid recovery id".into()))?;
    let verifying_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| KeyproofError::RecoveryFailed("no key recovers this signature".into()))?;

    let material = material_from_point(&PublicKey::from(&verifying_key))?;
    Ok((material, compressed))
}

// ═══════════════════════════════════════════════════════════════════════════════
// VERIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Verifies a raw compact signature over `message` for a claimed address.
///
/// # Arguments
///
/// * `address` - Legacy P2PKH address the signer claims to own
/// * `signature` - 65-byte compact signature
/// * `message` - Message bytes exactly as signed
///
/// # Errors
///
/// `RecoveryFailed` if no key can be recovered, `AddressMismatch` if the
/// recovered key does not own `address`.
#[instrument(skip(signature, message), fields(message_len = message.len()))]
pub fn verify_signature(address: &str, signature: &[u8], message: &[u8]) -> Result<VerifiedMessage> {
    let chain = chain_for_address(address);
    debug!(chain = chain.name(), "Selected message magic");

    let digest = message_digest(chain.message_magic(), message);
    let (key, compressed) = recover_compact(&digest, signature)?;
    debug!(public_key = %key.compressed_hex(), compressed, "Recovered public key");

    let addresses = derive_from_material(&key)?;
    let candidates = if compressed {
        [&addresses.bitcoin_p2pkh_compressed, &addresses.litecoin_p2pkh_compressed]
    } else {
        [&addresses.bitcoin_p2pkh, &addresses.litecoin_p2pkh]
    };

    if !candidates.iter().any(|candidate| candidate.as_str() == address) {
        debug!(?candidates, "Recovered key does not own the address");
        return Err(KeyproofError::AddressMismatch {
            address: address.to_string(),
        });
    }

    debug!("Signature verified");
    Ok(VerifiedMessage {
        address: address.to_string(),
        signature: signature.to_vec(),
        message: message.to_vec(),
        is_valid: true,
        public_key_hex: key.uncompressed_hex(),
    })
}

/// Decodes a base64 compact signature.
///
/// # Errors
///
/// `InvalidBase64` for bad input, `WrongSignatureLength` unless it decodes
/// to 65 bytes.
pub fn decode_signature(signature_base64: &str) -> Result<Vec<u8>> {
    let bytes = STANDARD
        .decode(signature_base64.trim())
        .map_err(|e| KeyproofError::InvalidBase64(e.to_string()))?;
    if bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(KeyproofError::WrongSignatureLength {
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Verifies a base64 signature over a text message.
///
/// # Example
///
/// ```rust
/// use keyproof_crypto::verify_message;
///
/// let verified = verify_message(
///     "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg",
///     "Hz0pDxS09fEdjKrSJenLYsz05gakT6eW9GdzKDopnlwUL3bf3mQeJcS+takCIMuavK/NLOorXWXZCqV0KBMlwgU=",
///     "Hello World",
/// ).unwrap();
/// assert!(verified.is_valid);
/// ```
pub fn verify_message(address: &str, signature_base64: &str, message: &str) -> Result<VerifiedMessage> {
    let signature = decode_signature(signature_base64)?;
    verify_signature(address, &signature, message.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::p2pkh_address;
    use k256::ecdsa::SigningKey;
    use proptest::prelude::*;
    use test_case::test_case;

    const HELLO_ADDRESS: &str = "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg";
    const HELLO_SIGNATURE: &str =
        "Hz0pDxS09fEdjKrSJenLYsz05gakT6eW9GdzKDopnlwUL3bf3mQeJcS+takCIMuavK/NLOorXWXZCqV0KBMlwgU=";
    const HELLO_PUBLIC_KEY: &str = "046afa3afc399f7f332866e37f475938589de0a3298a3aa062c8f4c74450e3d3b287224ee09db6d217912f4706147bb96762d1e11e7ce2e928fd61ecdbd2e37a99";

    #[test_case(
        "133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg",
        "Hz0pDxS09fEdjKrSJenLYsz05gakT6eW9GdzKDopnlwUL3bf3mQeJcS+takCIMuavK/NLOorXWXZCqV0KBMlwgU=",
        "Hello World",
        HELLO_PUBLIC_KEY
        ; "bitcoin hello world"
    )]
    #[test_case(
        "LLsXEU59RyoMmjgCkUAghxTLr6FXoRCgQT",
        "H021r+HxbXZo2Vkuyq0D/pfz8kllqDzmOzczJXBanIytdsbZKPlg3q1NhytyLXp03DQa//0zoOjoJfVUjZORql8=",
        "Hello World",
        "04a2e8f5aa9c46242cdc6463adac2ef8e6bb8b17202c06d17c647066ed143535ac1f93e66cc499170185ec79b2ef5c04119282544fea4c8072ff87711e13597bcf"
        ; "litecoin hello world"
    )]
    #[test_case(
        "1Nu1QpfegiGmqHS6YZxkaiGpnqAUXvZz2f",
        "HwPlEOxTxs62ruMHZvamv0wmUlbbaY/2ZSqw9Hpdw+FWfgXuSxQ9x55ceSiFyvnlpiZjt+KIhSYnhGnCv8iDe5o=",
        "Hello World!",
        "0471bb3ef523055565dd5f9864047b9fe93efa10151ff4bb3640f7de6dfdd76cea9d5cb2da17d725a835f25971818e54acc1db69e4866ea23c9dc33f57cb286315"
        ; "bitcoin hello world bang"
    )]
    fn test_verify_known_vectors(address: &str, signature: &str, message: &str, public_key: &str) {
        let verified = verify_message(address, signature, message).unwrap();
        assert!(verified.is_valid);
        assert_eq!(verified.address, address);
        assert_eq!(verified.message, message.as_bytes());
        assert_eq!(verified.signature.len(), 65);
        assert_eq!(verified.public_key_hex, public_key);
    }

    #[test]
    fn test_verify_high_s_signature() {
        // same signature with s replaced by n - s and the recovery parity flipped
        let high_s =
            "ID0pDxS09fEdjKrSJenLYsz05gakT6eW9GdzKDopnlwU0IkgIZvh2jtBSlb93zRlQgrhr/yD6zpitSzqZL0Qfzw=";
        let verified = verify_message(HELLO_ADDRESS, high_s, "Hello World").unwrap();
        assert_eq!(verified.public_key_hex, HELLO_PUBLIC_KEY);
    }

    #[test]
    fn test_verify_wrong_message() {
        let err = verify_message(HELLO_ADDRESS, HELLO_SIGNATURE, "Hello World!").unwrap_err();
        assert!(err.is_verification_error());
    }

    #[test]
    fn test_verify_wrong_address() {
        let err =
            verify_message("1Nu1QpfegiGmqHS6YZxkaiGpnqAUXvZz2f", HELLO_SIGNATURE, "Hello World")
                .unwrap_err();
        assert!(matches!(err, KeyproofError::AddressMismatch { .. }));
    }

    #[test]
    fn test_segwit_address_is_not_accepted() {
        let err = verify_message(
            "bc1qzeapyvz7kl7v5vj865rahts2jjcdz0ssyc3wl8",
            HELLO_SIGNATURE,
            "Hello World",
        )
        .unwrap_err();
        assert!(matches!(err, KeyproofError::AddressMismatch { .. }));
    }

    #[test]
    fn test_uncompressed_address_rejected_for_compressed_header() {
        let err =
            verify_message("19MkFnavAVX9Njwt43a2sWZrVg9G5jLntU", HELLO_SIGNATURE, "Hello World")
                .unwrap_err();
        assert!(matches!(err, KeyproofError::AddressMismatch { .. }));
    }

    #[test_case(26 ; "below range")]
    #[test_case(35 ; "above range")]
    #[test_case(0 ; "zero")]
    fn test_bad_header_byte(header: u8) {
        let mut sig = decode_signature(HELLO_SIGNATURE).unwrap();
        sig[0] = header;
        let err = verify_signature(HELLO_ADDRESS, &sig, b"Hello World").unwrap_err();
        assert!(matches!(err, KeyproofError::RecoveryFailed(_)));
    }

    #[test]
    fn test_zero_scalars_fail_recovery() {
        let mut sig = vec![0u8; 65];
        sig[0] = 31;
        let err = verify_signature(HELLO_ADDRESS, &sig, b"Hello World").unwrap_err();
        assert!(matches!(err, KeyproofError::RecoveryFailed(_)));
    }

    #[test]
    fn test_decode_signature_errors() {
        assert!(matches!(
            decode_signature("not base64!").unwrap_err(),
            KeyproofError::InvalidBase64(_)
        ));
        assert!(matches!(
            decode_signature("AAAA").unwrap_err(),
            KeyproofError::WrongSignatureLength { actual: 3 }
        ));
    }

    #[test]
    fn test_wrong_signature_length() {
        let err = verify_signature(HELLO_ADDRESS, &[31u8; 64], b"Hello World").unwrap_err();
        assert!(matches!(err, KeyproofError::WrongSignatureLength { actual: 64 }));
    }

    #[test_case("133r6sCjLq6NbmSLjxuypDuSeocwenu1Qg", "Bitcoin" ; "legacy")]
    #[test_case("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy", "Bitcoin" ; "script hash")]
    #[test_case("bc1qzeapyvz7kl7v5vj865rahts2jjcdz0ssyc3wl8", "Bitcoin" ; "segwit")]
    #[test_case("LLsXEU59RyoMmjgCkUAghxTLr6FXoRCgQT", "Litecoin" ; "litecoin")]
    #[test_case("1", "Litecoin" ; "bare prefix")]
    #[test_case("", "Litecoin" ; "empty")]
    fn test_chain_for_address(address: &str, chain: &str) {
        assert_eq!(chain_for_address(address).name(), chain);
    }

    #[test]
    fn test_var_bytes_prefixes() {
        let mut buf = Vec::new();
        write_var_bytes(&mut buf, &[0xaa; 0xfc]);
        assert_eq!(buf[0], 0xfc);
        assert_eq!(buf.len(), 1 + 0xfc);

        let mut buf = Vec::new();
        write_var_bytes(&mut buf, &[0xaa; 0xfd]);
        assert_eq!(&buf[..3], &[0xfd, 0xfd, 0x00]);

        let mut buf = Vec::new();
        write_var_bytes(&mut buf, &vec![0xaa; 0x1_0000]);
        assert_eq!(&buf[..5], &[0xfe, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_message_digest_depends_on_magic() {
        let btc = message_digest(BITCOIN.message_magic(), b"Hello World");
        let ltc = message_digest(LITECOIN.message_magic(), b"Hello World");
        assert_ne!(btc, ltc);
    }

    fn sign(key: &SigningKey, magic: &str, message: &[u8], compressed: bool) -> Vec<u8> {
        let digest = message_digest(magic, message);
        let (sig, recovery_id) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut out = Vec::with_capacity(65);
        out.push(27 + recovery_id.to_byte() + if compressed { 4 } else { 0 });
        out.extend_from_slice(&sig.to_bytes());
        out
    }

    proptest! {
        #[test]
        fn prop_sound_for_own_signatures(
            secret in any::<[u8; 32]>().prop_filter("valid scalar", |s| SigningKey::from_slice(s).is_ok()),
            message in proptest::collection::vec(any::<u8>(), 0..300),
            litecoin in any::<bool>(),
            compressed in any::<bool>(),
        ) {
            let key = SigningKey::from_slice(&secret).unwrap();
            let point = PublicKey::from(key.verifying_key());
            let material = material_from_point(&point).unwrap();

            let chain: &dyn ChainParams = if litecoin { &LITECOIN } else { &BITCOIN };
            let serialized = if compressed { material.compressed() } else { material.uncompressed() };
            let address = p2pkh_address(chain, serialized);

            let signature = sign(&key, chain.message_magic(), &message, compressed);
            let verified = verify_signature(&address, &signature, &message).unwrap();

            prop_assert!(verified.is_valid);
            prop_assert_eq!(&verified.public_key_hex, &material.uncompressed_hex());
            let derived = derive_from_material(&material).unwrap();
            prop_assert!(derived.matches_legacy(&address));
        }

        #[test]
        fn prop_single_byte_mutation_fails(
            index in 0usize..65 + 11,
            flip in 1u8..=255,
        ) {
            let mut signature = decode_signature(HELLO_SIGNATURE).unwrap();
            let mut message = b"Hello World".to_vec();
            if index < 65 {
                signature[index] ^= flip;
            } else {
                message[index - 65] ^= flip;
            }

            let failed = matches!(
                verify_signature(HELLO_ADDRESS, &signature, &message),
                Err(KeyproofError::AddressMismatch { .. }) | Err(KeyproofError::RecoveryFailed(_))
            );
            prop_assert!(failed);
        }

        #[test]
        fn prop_address_mutation_fails(index in 0usize..34, replacement in "[1-9A-HJ-NP-Za-km-z]") {
            let mut chars: Vec<char> = HELLO_ADDRESS.chars().collect();
            let replacement = replacement.chars().next().unwrap();
            prop_assume!(chars[index] != replacement);
            chars[index] = replacement;
            let address: String = chars.into_iter().collect();

            let failed = matches!(
                verify_message(&address, HELLO_SIGNATURE, "Hello World"),
                Err(KeyproofError::AddressMismatch { .. })
            );
            prop_assert!(failed);
        }
    }
}
