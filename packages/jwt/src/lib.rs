//! Interoperable ES256 JSON Web Tokens
//!
//! This crate provides:
//! - P-256 key generation with PKCS#8 / SPKI PEM encoding
//! - Explicit DER ↔ raw `r || s` signature conversion
//! - Compact JWS signing and verification that agree byte-for-byte with
//!   other JOSE implementations
//! - Single-completion async operations and a fluent builder
//!
//! ```no_run
//! use p256jws::{generate_key_pair, sign_jwt, verify_jwt};
//!
//! # async fn run() -> p256jws::JwtResult<()> {
//! let keys = generate_key_pair().await?;
//! let token = sign_jwt("consumer", "subject", 3600, keys.private_key_pem.as_str()).await?;
//! assert!(verify_jwt(token, keys.public_key_pem.as_str()).await?);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod claims;
pub mod crypto;
mod error;
pub mod pem;
pub mod signature;
mod types;
pub mod validation;

pub use api::{generate_key_pair, sign_jwt, verify_jwt, AsyncJwtResult, Jwt};
pub use claims::{Claims, ClaimsBuilder};
pub use crypto::{EcKeyPair, EcdsaBackend, Es256Signer, Es256Verifier, P256Backend};
pub use error::*;
pub use signature::{der_to_raw, raw_to_der, RawSignature};
pub use types::*;
pub use validation::ValidationOptions;
