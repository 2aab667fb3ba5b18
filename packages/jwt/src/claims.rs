//! JWT claims template and builder with compile-time validation.
//!
//! Only `iss` and `sub` are supplied by the caller; `iat` and `exp` are
//! stamped when the token is signed.

use crate::error::{JwtError, JwtResult};
use crate::types::JwtClaims;
use serde_json::Value;
use std::{collections::BTreeMap, marker::PhantomData};

/// Claim names owned by the fixed payload layout
pub const RESERVED_CLAIMS: [&str; 4] = ["iss", "sub", "iat", "exp"];

/// Typestate markers for builder pattern.
pub mod ts {
    /// Marker for a field that has been set.
    pub struct Set;
    /// Marker for a field that has not been set.
    pub struct Unset;
}

/// Claims without times, ready to be stamped and signed.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    iss: String,
    sub: String,
    extra: BTreeMap<String, Value>,
}

impl Claims {
    /// The fixed claim set with no custom members
    pub fn new(iss: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            iss: iss.into(),
            sub: sub.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Issuer
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.iss
    }

    /// Subject
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Custom claims
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Fix `iat = issued_at` and `exp = issued_at + expires_in`.
    ///
    /// # Errors
    /// `InvalidClaims` if the expiry does not fit in an `i64`.
    pub fn stamp(&self, issued_at: i64, expires_in: u64) -> JwtResult<JwtClaims> {
        let exp = i64::try_from(expires_in)
            .ok()
            .and_then(|secs| issued_at.checked_add(secs))
            .ok_or_else(|| JwtError::invalid_claims("expiry offset overflows the timestamp"))?;

        Ok(JwtClaims {
            iss: self.iss.clone(),
            sub: self.sub.clone(),
            iat: issued_at,
            exp,
            extra: self.extra.clone(),
        })
    }
}

/// Compile-time checked builder for [`Claims`].
pub struct ClaimsBuilder<Iss = ts::Unset, Sub = ts::Unset> {
    iss: Option<String>,
    sub: Option<String>,
    extra: BTreeMap<String, Value>,
    _phantom: PhantomData<(Iss, Sub)>,
}

impl ClaimsBuilder {
    /// Create a new claims builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            iss: None,
            sub: None,
            extra: BTreeMap::new(),
            _phantom: PhantomData,
        }
    }
}

impl Default for ClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sub> ClaimsBuilder<ts::Unset, Sub> {
    /// Set the issuer (iss) claim.
    pub fn issuer(self, iss: impl Into<String>) -> ClaimsBuilder<ts::Set, Sub> {
        ClaimsBuilder {
            iss: Some(iss.into()),
            sub: self.sub,
            extra: self.extra,
            _phantom: PhantomData,
        }
    }
}

impl<Iss> ClaimsBuilder<Iss, ts::Unset> {
    /// Set the subject (sub) claim.
    pub fn subject(self, sub: impl Into<String>) -> ClaimsBuilder<Iss, ts::Set> {
        ClaimsBuilder {
            iss: self.iss,
            sub: Some(sub.into()),
            extra: self.extra,
            _phantom: PhantomData,
        }
    }
}

impl<Iss, Sub> ClaimsBuilder<Iss, Sub> {
    /// Add a custom claim. Later values for the same name win.
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

impl ClaimsBuilder<ts::Set, ts::Set> {
    /// Build the claims.
    ///
    /// # Errors
    /// `InvalidClaims` if a custom claim reuses one of [`RESERVED_CLAIMS`].
    pub fn build(self) -> JwtResult<Claims> {
        if let Some(name) = self
            .extra
            .keys()
            .find(|name| RESERVED_CLAIMS.contains(&name.as_str()))
        {
            return Err(JwtError::InvalidClaims(format!(
                "custom claim `{name}` collides with a fixed claim"
            )));
        }

        // Both are Some by construction of the typestate
        match (self.iss, self.sub) {
            (Some(iss), Some(sub)) => Ok(Claims {
                iss,
                sub,
                extra: self.extra,
            }),
            _ => Err(JwtError::invalid_claims("issuer and subject are required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stamp_adds_offset() {
        let claims = Claims::new("issuer", "subject");
        let stamped = claims.stamp(1_700_000_000, 3600).unwrap();
        assert_eq!(stamped.iat, 1_700_000_000);
        assert_eq!(stamped.exp, 1_700_003_600);
        assert_eq!(stamped.iss, "issuer");
        assert_eq!(stamped.sub, "subject");
        assert!(stamped.extra.is_empty());
    }

    #[test]
    fn stamp_rejects_overflow() {
        let claims = Claims::new("i", "s");
        assert!(matches!(
            claims.stamp(i64::MAX - 10, 11),
            Err(JwtError::InvalidClaims(_))
        ));
        assert!(claims.stamp(0, u64::MAX).is_err());
    }

    #[test]
    fn builder_in_either_order() {
        let a = ClaimsBuilder::new().issuer("i").subject("s").build().unwrap();
        let b = ClaimsBuilder::new().subject("s").issuer("i").build().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn builder_rejects_reserved_names() {
        for name in RESERVED_CLAIMS {
            let err = ClaimsBuilder::new()
                .issuer("i")
                .subject("s")
                .claim(name, json!(1))
                .build()
                .unwrap_err();
            assert_eq!(err.kind(), "InvalidClaimsError");
        }
    }

    #[test]
    fn custom_claims_are_carried() {
        let claims = ClaimsBuilder::new()
            .issuer("i")
            .claim("role", json!("admin"))
            .subject("s")
            .build()
            .unwrap();
        let stamped = claims.stamp(10, 5).unwrap();
        assert_eq!(stamped.extra.get("role"), Some(&json!("admin")));
    }
}
