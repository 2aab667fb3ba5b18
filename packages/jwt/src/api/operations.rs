//! Core operations: generate, sign and verify
//!
//! Each call is independent, runs once off the async executor and resolves
//! to a value or one typed error.

use super::validation::AsyncJwtResult;
use crate::{
    claims::Claims,
    crypto::{es256_generate_keys, es256_sign, es256_verify, Es256Signer, Es256Verifier},
    error::{JwtError, JwtResult},
    types::{Es256KeyPair, JwtClaims, ES256},
    validation::ValidationOptions,
};
use p256jws_common::LoggingTransformer;
use std::time::Instant;

/// Generate a fresh P-256 key pair as PEM text.
pub fn generate_key_pair() -> AsyncJwtResult<Es256KeyPair> {
    AsyncJwtResult::spawn_blocking(|| {
        timed("key_generation", || {
            let pair = es256_generate_keys()?;
            LoggingTransformer::log_key_event("generate", &pair.public_key_pem);
            Ok(pair)
        })
    })
}

/// Sign `{iss, sub, iat: now, exp: now + exp_seconds}` with a PEM private key.
pub fn sign_jwt(
    iss: impl Into<String>,
    sub: impl Into<String>,
    exp_seconds: u64,
    private_key_pem: impl Into<String>,
) -> AsyncJwtResult<String> {
    let (iss, sub) = (iss.into(), sub.into());
    let private_key_pem = zeroize::Zeroizing::new(private_key_pem.into());
    AsyncJwtResult::spawn_blocking(move || {
        timed("jwt_signing", || {
            es256_sign(&iss, &sub, exp_seconds, &private_key_pem).map(String::from)
        })
    })
}

/// Verify a token's signature against a PEM public key.
///
/// Resolves to `true`, or to an error; a mismatch is `SignatureInvalid`.
pub fn verify_jwt(
    token: impl Into<String>,
    public_key_pem: impl Into<String>,
) -> AsyncJwtResult<bool> {
    let (token, public_key_pem) = (token.into(), public_key_pem.into());
    AsyncJwtResult::spawn_blocking(move || {
        timed("jwt_verification", || es256_verify(&token, &public_key_pem))
    })
}

pub(crate) fn sign_claims(
    claims: Claims,
    expires_in: u64,
    private_key_pem: zeroize::Zeroizing<String>,
) -> AsyncJwtResult<String> {
    AsyncJwtResult::spawn_blocking(move || {
        timed("jwt_signing", || {
            Es256Signer::from_pem(&private_key_pem)?
                .sign(&claims, expires_in)
                .map(String::from)
        })
    })
}

pub(crate) fn verify_with(
    token: String,
    public_key_pem: String,
    options: ValidationOptions,
) -> AsyncJwtResult<bool> {
    AsyncJwtResult::spawn_blocking(move || {
        timed("jwt_verification", || {
            let verifier = Es256Verifier::from_pem(&public_key_pem)?.with_options(options);
            if verifier.verify(&token)? {
                Ok(true)
            } else {
                Err(JwtError::SignatureInvalid)
            }
        })
    })
}

pub(crate) fn decode_with(
    token: String,
    public_key_pem: String,
    options: ValidationOptions,
) -> AsyncJwtResult<JwtClaims> {
    AsyncJwtResult::spawn_blocking(move || {
        timed("jwt_decoding", || {
            Es256Verifier::from_pem(&public_key_pem)?
                .with_options(options)
                .decode(&token)
        })
    })
}

fn timed<T>(operation: &str, op: impl FnOnce() -> JwtResult<T>) -> JwtResult<T> {
    let started = Instant::now();
    let result = op();
    LoggingTransformer::log_performance_metric(
        operation,
        started.elapsed().as_micros(),
        result.is_ok(),
    );
    result
}

/// Log a failed operation at the level its kind deserves.
pub(crate) fn log_failure(operation: &str, error: &JwtError) {
    if error.is_rejection() {
        LoggingTransformer::log_jwt_rejection(operation, ES256, error.kind());
    } else {
        LoggingTransformer::log_jwt_error(operation, ES256, error.kind(), &error.to_string());
    }
}
