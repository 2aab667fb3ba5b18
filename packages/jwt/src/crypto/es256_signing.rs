//! ES256 compact JWS signing

use super::backend::{EcdsaBackend, P256Backend};
use super::es256_keys::signing_key_from_pem;
use crate::{
    claims::Claims,
    error::JwtResult,
    signature::RawSignature,
    types::{CompactJws, JwsHeader, JwtClaims},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use p256::ecdsa::SigningKey;

/// Produces compact JWS tokens with one private key.
pub struct Es256Signer<B: EcdsaBackend = P256Backend> {
    key: SigningKey,
    backend: B,
}

impl Es256Signer {
    /// Signer for a PKCS#8 PEM private key.
    ///
    /// # Errors
    /// `KeyFormat` if the PEM or key cannot be parsed.
    pub fn from_pem(private_key_pem: &str) -> JwtResult<Self> {
        Ok(Self::new(signing_key_from_pem(private_key_pem)?))
    }

    /// Signer for an already parsed key
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        Self::with_backend(key, P256Backend)
    }
}

impl<B: EcdsaBackend> Es256Signer<B> {
    /// Signer with an explicit ECDSA backend
    #[must_use]
    pub fn with_backend(key: SigningKey, backend: B) -> Self {
        Self { key, backend }
    }

    /// Stamp `claims` with `iat = now`, `exp = now + expires_in` and sign.
    ///
    /// # Errors
    /// `InvalidClaims` if the expiry overflows, `Signing` if the backend
    /// fails.
    pub fn sign(&self, claims: &Claims, expires_in: u64) -> JwtResult<CompactJws> {
        let now = chrono::Utc::now().timestamp();
        self.sign_claims(&claims.stamp(now, expires_in)?)
    }

    /// Sign a fully stamped payload.
    ///
    /// # Errors
    /// `Serialization` if the claims cannot be encoded, `Signing` or
    /// `SignatureFormat` if the backend fails or emits malformed DER.
    pub fn sign_claims(&self, claims: &JwtClaims) -> JwtResult<CompactJws> {
        let header_json = serde_json::to_vec(&JwsHeader::STANDARD)?;
        let claims_json = serde_json::to_vec(claims)?;

        let header_b64 = URL_SAFE_NO_PAD.encode(&header_json);
        let claims_b64 = URL_SAFE_NO_PAD.encode(&claims_json);

        let mut signing_input = String::with_capacity(header_b64.len() + 1 + claims_b64.len());
        signing_input.push_str(&header_b64);
        signing_input.push('.');
        signing_input.push_str(&claims_b64);

        // The token carries r || s, never the backend's DER
        let der = self.backend.sign_der(&self.key, signing_input.as_bytes())?;
        let signature_b64 = RawSignature::from_der(&der)?.to_base64url();

        let mut jwt = String::with_capacity(signing_input.len() + 1 + signature_b64.len());
        jwt.push_str(&signing_input);
        jwt.push('.');
        jwt.push_str(&signature_b64);

        tracing::trace!(iat = claims.iat, exp = claims.exp, "signed ES256 token");
        Ok(CompactJws::from(jwt))
    }
}

/// One-shot signing: parse the key, stamp the four claims, sign.
///
/// # Errors
/// `KeyFormat` for an unusable private key; see [`Es256Signer::sign`].
pub fn es256_sign(
    iss: &str,
    sub: &str,
    expires_in: u64,
    private_key_pem: &str,
) -> JwtResult<CompactJws> {
    Es256Signer::from_pem(private_key_pem)?.sign(&Claims::new(iss, sub), expires_in)
}
