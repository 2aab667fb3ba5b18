//! ES256 verification with ECDSA P-256

use super::backend::{EcdsaBackend, P256Backend};
use super::es256_keys::verifying_key_from_pem;
use crate::{
    error::{JwtError, JwtResult},
    signature::RawSignature,
    types::{JwsParts, JwtClaims, ES256},
    validation::ValidationOptions,
};
use p256::ecdsa::VerifyingKey;
use serde::Deserialize;

// Only `exp` is needed for the expiry layer; other members are ignored.
#[derive(Deserialize)]
struct ExpiryOnly {
    exp: i64,
}

/// Checks compact JWS tokens against one public key.
pub struct Es256Verifier<B: EcdsaBackend = P256Backend> {
    key: VerifyingKey,
    options: ValidationOptions,
    backend: B,
}

impl Es256Verifier {
    /// Verifier for an SPKI PEM public key with default options.
    ///
    /// # Errors
    /// `KeyFormat` if the PEM or key cannot be parsed.
    pub fn from_pem(public_key_pem: &str) -> JwtResult<Self> {
        Ok(Self::new(verifying_key_from_pem(public_key_pem)?))
    }

    /// Verifier for an already parsed key
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self::with_backend(key, P256Backend)
    }
}

impl<B: EcdsaBackend> Es256Verifier<B> {
    /// Verifier with an explicit ECDSA backend
    #[must_use]
    pub fn with_backend(key: VerifyingKey, backend: B) -> Self {
        Self {
            key,
            options: ValidationOptions::default(),
            backend,
        }
    }

    /// Replace the validation options.
    #[must_use]
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Active validation options
    #[must_use]
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Check the token's signature, then any enabled extra layers.
    ///
    /// `Ok(false)` means the token was readable and the signature does not
    /// match this key.
    ///
    /// # Errors
    /// `MalformedToken` unless the token has three segments (or, with the
    /// header check on, a readable header), `SignatureFormat` if the
    /// signature segment is not 64 bytes of base64url, `TokenExpired` when
    /// expiry validation is on and `exp` has passed.
    pub fn verify(&self, token: &str) -> JwtResult<bool> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// [`verify`](Self::verify) against a fixed clock (unix seconds).
    ///
    /// # Errors
    /// See [`verify`](Self::verify).
    pub fn verify_at(&self, token: &str, now: i64) -> JwtResult<bool> {
        let parts = JwsParts::split(token)?;

        if self.options.require_es256_header {
            let header = parts.decode_header()?;
            if header.alg != ES256 {
                return Err(JwtError::MalformedToken(format!(
                    "header names algorithm `{}`",
                    header.alg
                )));
            }
        }

        let raw = RawSignature::from_base64url(parts.signature)?;
        // Zero or out-of-range scalars are well formed but match nothing
        let Some(signature) = raw.to_signature() else {
            tracing::debug!("ES256 signature scalars outside the group order");
            return Ok(false);
        };
        let der = signature.to_der();
        let signing_input = parts.signing_input();

        if !self
            .backend
            .verify_der(&self.key, signing_input.as_bytes(), der.as_bytes())?
        {
            tracing::debug!("ES256 signature does not match");
            return Ok(false);
        }

        if self.options.validate_exp {
            let ExpiryOnly { exp } = parts.decode_payload()?;
            if self.options.is_expired(exp, now) {
                tracing::debug!(exp, now, "ES256 token expired");
                return Err(JwtError::TokenExpired);
            }
        }

        Ok(true)
    }

    /// Verify, then return the payload.
    ///
    /// # Errors
    /// Everything [`verify`](Self::verify) reports, `SignatureInvalid` on a
    /// mismatch, `MalformedToken` if the payload is not a claims object.
    pub fn decode(&self, token: &str) -> JwtResult<JwtClaims> {
        self.decode_at(token, chrono::Utc::now().timestamp())
    }

    /// [`decode`](Self::decode) against a fixed clock (unix seconds).
    ///
    /// # Errors
    /// See [`decode`](Self::decode).
    pub fn decode_at(&self, token: &str, now: i64) -> JwtResult<JwtClaims> {
        if !self.verify_at(token, now)? {
            return Err(JwtError::SignatureInvalid);
        }
        JwsParts::split(token)?.decode_payload()
    }
}

/// One-shot verification: parse the key, check the signature only.
///
/// Returns `Ok(true)` or an error; a mismatch is `SignatureInvalid`.
///
/// # Errors
/// `KeyFormat`, `MalformedToken`, `SignatureFormat` or `SignatureInvalid`.
pub fn es256_verify(token: &str, public_key_pem: &str) -> JwtResult<bool> {
    let verifier = Es256Verifier::from_pem(public_key_pem)?;
    if verifier.verify(token)? {
        Ok(true)
    } else {
        Err(JwtError::SignatureInvalid)
    }
}
