//! ES256 key handling, signing and verification

pub mod backend;
pub mod es256_keys;
pub mod es256_signing;
pub mod es256_verification;

pub use backend::{EcdsaBackend, P256Backend};
pub use es256_keys::{
    es256_generate_keys, public_key_der, public_key_pem, signing_key_from_pem,
    verifying_key_from_pem, EcKeyPair,
};
pub use es256_signing::{es256_sign, Es256Signer};
pub use es256_verification::{es256_verify, Es256Verifier};
