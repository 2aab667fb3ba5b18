//! ES256 JWT builder
//!
//! `Jwt::es256()` starts every flow. A result handler, when installed with
//! `on_result`, comes before the action and receives the raw result; without
//! one, failures are logged and returned.

use super::operations::{self, log_failure};
use crate::{
    claims::Claims,
    error::{JwtError, JwtResult},
    types::{Es256KeyPair, JwtClaims},
    validation::ValidationOptions,
};
use zeroize::Zeroizing;

/// Expiry offset used when `expires_in` is not called
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

type Handler<T> = Box<dyn Fn(JwtResult<T>) -> T + Send + Sync>;

/// Direct builder entry point
pub struct Jwt;

impl Jwt {
    /// Start an ES256 flow.
    #[must_use]
    pub fn es256() -> Es256Builder {
        Es256Builder::new()
    }
}

/// ES256 JWT builder - initial state
#[derive(Debug, Default)]
pub struct Es256Builder;

impl Es256Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Handle the key generation result before it is returned.
    pub fn on_result<F>(self, handler: F) -> Es256KeyGenerator
    where
        F: Fn(JwtResult<Es256KeyPair>) -> Es256KeyPair + Send + Sync + 'static,
    {
        Es256KeyGenerator {
            result_handler: Some(Box::new(handler)),
        }
    }

    /// Generate a key pair.
    ///
    /// # Errors
    /// `KeyGeneration` if randomness is unavailable.
    pub async fn generate_keys(self) -> JwtResult<Es256KeyPair> {
        Es256KeyGenerator {
            result_handler: None,
        }
        .generate_keys()
        .await
    }

    /// Set the PKCS#8 PEM private key for signing.
    pub fn with_private_key(self, private_key_pem: impl Into<String>) -> Es256WithPrivateKey {
        Es256WithPrivateKey {
            private_key_pem: Zeroizing::new(private_key_pem.into()),
            result_handler: None,
        }
    }

    /// Set the SPKI PEM public key for verification.
    pub fn with_public_key(self, public_key_pem: impl Into<String>) -> Es256WithPublicKey {
        Es256WithPublicKey {
            public_key_pem: public_key_pem.into(),
            options: ValidationOptions::default(),
        }
    }
}

/// ES256 key generator
pub struct Es256KeyGenerator {
    result_handler: Option<Handler<Es256KeyPair>>,
}

impl Es256KeyGenerator {
    /// Generate keys, passing the result through the handler if any.
    ///
    /// # Errors
    /// `KeyGeneration` if randomness is unavailable and no handler is set.
    pub async fn generate_keys(self) -> JwtResult<Es256KeyPair> {
        let result = operations::generate_key_pair().await;
        finish(result, self.result_handler, "key_generation")
    }
}

/// ES256 builder with private key configured
pub struct Es256WithPrivateKey {
    private_key_pem: Zeroizing<String>,
    result_handler: Option<Handler<String>>,
}

impl Es256WithPrivateKey {
    /// Add result handler; comes before the action.
    #[must_use]
    pub fn on_result<F>(mut self, handler: F) -> Self
    where
        F: Fn(JwtResult<String>) -> String + Send + Sync + 'static,
    {
        self.result_handler = Some(Box::new(handler));
        self
    }

    /// Set the claims to sign.
    #[must_use]
    pub fn with_claims(self, claims: Claims) -> Es256WithClaims {
        Es256WithClaims {
            private_key_pem: self.private_key_pem,
            claims,
            expires_in: DEFAULT_EXPIRES_IN,
            result_handler: self.result_handler,
        }
    }
}

/// ES256 builder with claims configured
pub struct Es256WithClaims {
    private_key_pem: Zeroizing<String>,
    claims: Claims,
    expires_in: u64,
    result_handler: Option<Handler<String>>,
}

impl Es256WithClaims {
    /// Seconds from signing until `exp`.
    #[must_use]
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = seconds;
        self
    }

    /// Add result handler; comes before the action.
    #[must_use]
    pub fn on_result<F>(mut self, handler: F) -> Self
    where
        F: Fn(JwtResult<String>) -> String + Send + Sync + 'static,
    {
        self.result_handler = Some(Box::new(handler));
        self
    }

    /// Sign the token.
    ///
    /// # Errors
    /// `KeyFormat` for an unusable private key, `InvalidClaims` if the
    /// expiry overflows; never when a handler is set.
    pub async fn sign(self) -> JwtResult<String> {
        let result =
            operations::sign_claims(self.claims, self.expires_in, self.private_key_pem).await;
        finish(result, self.result_handler, "jwt_signing")
    }
}

/// ES256 builder with public key configured
pub struct Es256WithPublicKey {
    public_key_pem: String,
    options: ValidationOptions,
}

impl Es256WithPublicKey {
    /// Replace the validation options (signature only by default).
    #[must_use]
    pub fn with_validation(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle the verification result before it is returned.
    pub fn on_result<F>(self, handler: F) -> Es256Verify
    where
        F: Fn(JwtResult<bool>) -> bool + Send + Sync + 'static,
    {
        Es256Verify {
            inner: self,
            result_handler: Box::new(handler),
        }
    }

    /// Verify the token; `Ok(true)` or a typed error.
    ///
    /// # Errors
    /// `KeyFormat`, `MalformedToken`, `SignatureFormat`, `SignatureInvalid`,
    /// or `TokenExpired` when expiry validation is enabled.
    pub async fn verify(self, token: impl AsRef<str>) -> JwtResult<bool> {
        let result = self.run_verify(token.as_ref()).await;
        finish(result, None, "jwt_verification")
    }

    /// Verify the token and return its claims.
    ///
    /// # Errors
    /// As [`verify`](Self::verify), plus `MalformedToken` for a payload
    /// that is not a claims object.
    pub async fn decode(self, token: impl AsRef<str>) -> JwtResult<JwtClaims> {
        let result =
            operations::decode_with(token.as_ref().to_string(), self.public_key_pem, self.options)
                .await;
        finish(result, None, "jwt_decoding")
    }

    async fn run_verify(self, token: &str) -> JwtResult<bool> {
        operations::verify_with(token.to_string(), self.public_key_pem, self.options).await
    }
}

/// ES256 verification with a result handler installed
pub struct Es256Verify {
    inner: Es256WithPublicKey,
    result_handler: Handler<bool>,
}

impl Es256Verify {
    /// Verify and pass the result through the handler.
    ///
    /// # Errors
    /// Never; the handler decides the outcome.
    pub async fn verify(self, token: impl AsRef<str>) -> JwtResult<bool> {
        let result = self.inner.run_verify(token.as_ref()).await;
        finish(result, Some(self.result_handler), "jwt_verification")
    }
}

fn finish<T>(result: JwtResult<T>, handler: Option<Handler<T>>, operation: &str) -> JwtResult<T> {
    if let Some(handler) = handler {
        Ok(handler(result))
    } else {
        result.map_err(|e: JwtError| {
            log_failure(operation, &e);
            e
        })
    }
}
