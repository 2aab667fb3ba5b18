//! Async JWT API: free functions and the fluent ES256 builder

pub mod es256_builder;
pub mod operations;
pub mod validation;

pub use es256_builder::{
    Es256Builder, Es256KeyGenerator, Es256Verify, Es256WithClaims, Es256WithPrivateKey,
    Es256WithPublicKey, Jwt, DEFAULT_EXPIRES_IN,
};
pub use operations::{generate_key_pair, sign_jwt, verify_jwt};
pub use validation::AsyncJwtResult;
