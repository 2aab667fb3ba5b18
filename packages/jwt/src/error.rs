//! Error types for key, token and signature handling

use thiserror::Error;

/// Result alias used across the crate
pub type JwtResult<T> = Result<T, JwtError>;

/// Every failure the crate can report.
///
/// Input that could not be examined (`MalformedToken`, `KeyFormat`,
/// `SignatureFormat`) is always distinct from input that was examined and
/// rejected (`SignatureInvalid`, `TokenExpired`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Randomness or the curve provider was unavailable
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// PEM, DER, curve or point could not be parsed
    #[error("invalid key: {0}")]
    KeyFormat(String),

    /// Token is not three dot-separated segments (or a segment is unreadable)
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Signature segment has the wrong length or encoding
    #[error("invalid signature encoding: {0}")]
    SignatureFormat(String),

    /// Signature is well formed but does not match the key and input
    #[error("signature verification failed")]
    SignatureInvalid,

    /// `exp` is not after the current time (only when expiry checks are on)
    #[error("token has expired")]
    TokenExpired,

    /// The signing primitive refused to produce a signature
    #[error("signing failed: {0}")]
    Signing(String),

    /// Claims could not be assembled
    #[error("invalid claims: {0}")]
    InvalidClaims(String),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The background task finished without delivering a result
    #[error("background task failed")]
    TaskFailed,
}

impl JwtError {
    /// Stable error code shared with every platform binding.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::KeyGeneration(_) => "KeyGenerationError",
            JwtError::KeyFormat(_) => "KeyFormatError",
            JwtError::MalformedToken(_) => "MalformedTokenError",
            JwtError::SignatureFormat(_) => "SignatureFormatError",
            JwtError::SignatureInvalid => "SignatureInvalidError",
            JwtError::TokenExpired => "ExpiredTokenError",
            JwtError::Signing(_) => "SigningError",
            JwtError::InvalidClaims(_) => "InvalidClaimsError",
            JwtError::Serialization(_) => "SerializationError",
            JwtError::TaskFailed => "TaskFailedError",
        }
    }

    /// True when the token was examined and rejected, as opposed to being
    /// unreadable.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, JwtError::SignatureInvalid | JwtError::TokenExpired)
    }

    /// Create a key generation error
    #[inline]
    #[must_use]
    pub fn key_generation(msg: &str) -> Self {
        JwtError::KeyGeneration(msg.to_string())
    }

    /// Create a key format error
    #[inline]
    #[must_use]
    pub fn key_format(msg: &str) -> Self {
        JwtError::KeyFormat(msg.to_string())
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed_token(msg: &str) -> Self {
        JwtError::MalformedToken(msg.to_string())
    }

    /// Create a signature format error
    #[inline]
    #[must_use]
    pub fn signature_format(msg: &str) -> Self {
        JwtError::SignatureFormat(msg.to_string())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing(msg: &str) -> Self {
        JwtError::Signing(msg.to_string())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: &str) -> Self {
        JwtError::InvalidClaims(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwtError::Serialization(msg.to_string())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct_per_variant() {
        let all = [
            JwtError::key_generation("x"),
            JwtError::key_format("x"),
            JwtError::malformed_token("x"),
            JwtError::signature_format("x"),
            JwtError::SignatureInvalid,
            JwtError::TokenExpired,
            JwtError::signing("x"),
            JwtError::invalid_claims("x"),
            JwtError::serialization("x"),
            JwtError::TaskFailed,
        ];
        let mut kinds: Vec<_> = all.iter().map(JwtError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), all.len());
    }

    #[test]
    fn rejection_vs_unreadable() {
        assert!(JwtError::SignatureInvalid.is_rejection());
        assert!(JwtError::TokenExpired.is_rejection());
        assert!(!JwtError::signature_format("len").is_rejection());
        assert!(!JwtError::malformed_token("parts").is_rejection());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            JwtError::key_format("missing PEM header").to_string(),
            "invalid key: missing PEM header"
        );
        assert_eq!(
            JwtError::SignatureInvalid.to_string(),
            "signature verification failed"
        );
    }
}
