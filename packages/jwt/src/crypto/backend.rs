//! Host ECDSA primitive behind a narrow capability interface
//!
//! Backends speak ASN.1 DER; the signer and verifier convert to and from
//! the raw JWS form through [`crate::signature`].

use crate::error::{JwtError, JwtResult};
use p256::ecdsa::{
    signature::{DigestSigner, DigestVerifier},
    Signature, SigningKey, VerifyingKey,
};
use sha2::{Digest, Sha256};

/// ECDSA P-256 with SHA-256, DER in and out.
pub trait EcdsaBackend: Send + Sync + 'static {
    /// Sign `SHA-256(message)`; returns a DER `SEQUENCE { r, s }`.
    ///
    /// Output may differ between calls with identical input.
    fn sign_der(&self, key: &SigningKey, message: &[u8]) -> JwtResult<Vec<u8>>;

    /// Check a DER signature over `SHA-256(message)`.
    ///
    /// `Ok(false)` means the signature was examined and does not match.
    fn verify_der(&self, key: &VerifyingKey, message: &[u8], der: &[u8]) -> JwtResult<bool>;
}

/// RustCrypto `p256` backend
#[derive(Debug, Clone, Copy, Default)]
pub struct P256Backend;

impl EcdsaBackend for P256Backend {
    fn sign_der(&self, key: &SigningKey, message: &[u8]) -> JwtResult<Vec<u8>> {
        let digest = Sha256::new_with_prefix(message);
        let signature: Signature = key
            .try_sign_digest(digest)
            .map_err(|e| JwtError::Signing(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify_der(&self, key: &VerifyingKey, message: &[u8], der: &[u8]) -> JwtResult<bool> {
        // Zero or out-of-range scalars cannot match any message
        let Ok(signature) = Signature::from_der(der) else {
            tracing::debug!("signature scalars outside the P-256 group order");
            return Ok(false);
        };
        let digest = Sha256::new_with_prefix(message);
        Ok(key.verify_digest(digest, &signature).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn key() -> SigningKey {
        SigningKey::from_slice(&[0x24; 32]).unwrap()
    }

    #[test]
    fn sign_then_verify() {
        let key = key();
        let der = P256Backend.sign_der(&key, b"payload").unwrap();
        assert_eq!(der[0], 0x30);
        assert!(P256Backend
            .verify_der(key.verifying_key(), b"payload", &der)
            .unwrap());
        assert!(!P256Backend
            .verify_der(key.verifying_key(), b"other", &der)
            .unwrap());
    }

    #[test]
    fn zero_scalars_do_not_match() {
        let der = hex!("3006 020100 020100");
        let key = key();
        assert_eq!(
            P256Backend.verify_der(key.verifying_key(), b"payload", &der),
            Ok(false)
        );
    }
}
