//! JWT validation options and configuration.
//!
//! The default checks the signature and nothing else. Expiry and header
//! checks are opt-in layers on top of a valid signature.

use chrono::Duration;

/// JWT validation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject tokens whose `exp` is not after the current time.
    pub validate_exp: bool,
    /// Grace period added to `exp` when expiry is validated.
    pub leeway: Duration,
    /// Require the decoded header to name `ES256`.
    pub require_es256_header: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            validate_exp: false,
            leeway: Duration::zero(),
            require_es256_header: false,
        }
    }
}

impl ValidationOptions {
    /// Signature only; the same as `Default`.
    #[must_use]
    pub fn signature_only() -> Self {
        Self::default()
    }

    /// Expiry and header checks with no leeway.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            validate_exp: true,
            leeway: Duration::zero(),
            require_es256_header: true,
        }
    }

    /// Set the time leeway for expiry validation.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set whether to validate expiration.
    #[must_use]
    pub fn validate_expiration(mut self, validate: bool) -> Self {
        self.validate_exp = validate;
        self
    }

    /// Set whether the header must carry `alg: ES256`.
    #[must_use]
    pub fn require_header_alg(mut self, require: bool) -> Self {
        self.require_es256_header = require;
        self
    }

    /// Whether a token with `exp` has expired at `now` (both unix seconds).
    #[must_use]
    pub fn is_expired(&self, exp: i64, now: i64) -> bool {
        exp.saturating_add(self.leeway.num_seconds()) <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_checks_signature_only() {
        let opts = ValidationOptions::default();
        assert!(!opts.validate_exp);
        assert!(!opts.require_es256_header);
        assert_eq!(opts, ValidationOptions::signature_only());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let opts = ValidationOptions::strict();
        assert!(opts.is_expired(100, 100));
        assert!(opts.is_expired(99, 100));
        assert!(!opts.is_expired(101, 100));
    }

    #[test]
    fn leeway_extends_expiry() {
        let opts = ValidationOptions::strict().with_leeway(Duration::seconds(30));
        assert!(!opts.is_expired(100, 129));
        assert!(opts.is_expired(100, 130));
    }

    #[test]
    fn setters_toggle_layers() {
        let opts = ValidationOptions::default()
            .validate_expiration(true)
            .require_header_alg(true);
        assert_eq!(opts, ValidationOptions::strict());
    }
}
