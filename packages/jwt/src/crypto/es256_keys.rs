//! ES256 key generation and PEM key parsing for ECDSA P-256

use crate::{
    error::{JwtError, JwtResult},
    pem::{PemBlob, PemLabel},
    types::Es256KeyPair,
};
use p256::{
    ecdsa::{SigningKey, VerifyingKey},
    elliptic_curve::rand_core::{OsRng, RngCore},
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey},
};
use zeroize::Zeroizing;

// Rejection sampling hits a scalar outside [1, n-1] with probability ~2^-32.
const MAX_SAMPLING_ATTEMPTS: usize = 8;

/// A freshly generated P-256 key pair.
///
/// Immutable; the private scalar is wiped when the pair is dropped.
#[derive(Clone)]
pub struct EcKeyPair {
    signing_key: SigningKey,
}

impl EcKeyPair {
    /// Draw a new key pair from the operating system's CSPRNG.
    ///
    /// The private scalar is uniform in `[1, n-1]`; every call is
    /// independent.
    ///
    /// # Errors
    /// `KeyGeneration` if the randomness source fails.
    pub fn generate() -> JwtResult<Self> {
        let mut candidate = Zeroizing::new([0u8; 32]);
        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            OsRng
                .try_fill_bytes(&mut candidate[..])
                .map_err(|e| JwtError::KeyGeneration(format!("randomness unavailable: {e}")))?;

            if let Ok(signing_key) = SigningKey::from_slice(&candidate[..]) {
                return Ok(Self { signing_key });
            }
        }
        Err(JwtError::key_generation(
            "no valid scalar after repeated sampling",
        ))
    }

    /// Load a pair from a PKCS#8 PEM private key.
    ///
    /// # Errors
    /// `KeyFormat` on bad PEM, bad DER, wrong curve or an invalid scalar.
    pub fn from_private_key_pem(text: &str) -> JwtResult<Self> {
        signing_key_from_pem(text).map(|signing_key| Self { signing_key })
    }

    /// Signing half
    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Verifying half (`d·G`)
    #[must_use]
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Affine public point `(x, y)`, big-endian, 32 bytes each.
    #[must_use]
    pub fn public_point(&self) -> ([u8; 32], [u8; 32]) {
        let point = self.verifying_key().to_encoded_point(false);
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        // uncompressed points always carry both coordinates
        if let (Some(px), Some(py)) = (point.x(), point.y()) {
            x.copy_from_slice(px);
            y.copy_from_slice(py);
        }
        (x, y)
    }

    /// PKCS#8 DER of the private key
    ///
    /// # Errors
    /// `KeyFormat` if the encoder fails.
    pub fn private_key_der(&self) -> JwtResult<Zeroizing<Vec<u8>>> {
        let document = self
            .signing_key
            .to_pkcs8_der()
            .map_err(|e| JwtError::KeyFormat(format!("PKCS#8 encoding failed: {e}")))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// SubjectPublicKeyInfo DER of the public key
    ///
    /// # Errors
    /// `KeyFormat` if the encoder fails.
    pub fn public_key_der(&self) -> JwtResult<Vec<u8>> {
        public_key_der(self.verifying_key())
    }

    /// Both halves as PEM text.
    ///
    /// # Errors
    /// `KeyFormat` if DER encoding fails.
    pub fn to_pem(&self) -> JwtResult<Es256KeyPair> {
        let private = PemBlob::new(PemLabel::Private, self.private_key_der()?.to_vec());
        let public = PemBlob::new(PemLabel::Public, self.public_key_der()?);
        Ok(Es256KeyPair {
            private_key_pem: private.encode(),
            public_key_pem: public.encode(),
        })
    }
}

impl std::fmt::Debug for EcKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcKeyPair")
            .field("verifying_key", self.verifying_key())
            .finish_non_exhaustive()
    }
}

/// Generate a key pair and return it as PEM text.
///
/// # Errors
/// `KeyGeneration` if randomness is unavailable, `KeyFormat` if encoding
/// fails.
pub fn es256_generate_keys() -> JwtResult<Es256KeyPair> {
    let pair = EcKeyPair::generate()?.to_pem()?;
    tracing::debug!("generated ES256 key pair");
    Ok(pair)
}

/// Parse a PKCS#8 `PRIVATE KEY` PEM block.
///
/// # Errors
/// `KeyFormat` on bad PEM, bad DER, a non-P-256 curve or an invalid scalar.
pub fn signing_key_from_pem(text: &str) -> JwtResult<SigningKey> {
    let blob = PemBlob::decode(text, PemLabel::Private)?;
    SigningKey::from_pkcs8_der(blob.der())
        .map_err(|e| JwtError::KeyFormat(format!("not a P-256 PKCS#8 private key: {e}")))
}

/// Parse an SPKI `PUBLIC KEY` PEM block.
///
/// # Errors
/// `KeyFormat` on bad PEM, bad DER, a non-P-256 curve or a point off the
/// curve.
pub fn verifying_key_from_pem(text: &str) -> JwtResult<VerifyingKey> {
    let blob = PemBlob::decode(text, PemLabel::Public)?;
    VerifyingKey::from_public_key_der(blob.der())
        .map_err(|e| JwtError::KeyFormat(format!("not a P-256 public key: {e}")))
}

/// SubjectPublicKeyInfo DER for a verifying key
///
/// # Errors
/// `KeyFormat` if the encoder fails.
pub fn public_key_der(key: &VerifyingKey) -> JwtResult<Vec<u8>> {
    key.to_public_key_der()
        .map(|document| document.as_bytes().to_vec())
        .map_err(|e| JwtError::KeyFormat(format!("SPKI encoding failed: {e}")))
}

/// SPKI PEM for a verifying key
///
/// # Errors
/// `KeyFormat` if the encoder fails.
pub fn public_key_pem(key: &VerifyingKey) -> JwtResult<String> {
    public_key_der(key).map(|der| PemBlob::new(PemLabel::Public, der).encode())
}
