//! ECDSA signature wire forms
//!
//! JOSE (RFC 7518 §3.4) puts the fixed-width IEEE P1363 form `r || s` into
//! the JWS signature segment, each integer big-endian and left-padded to
//! the curve's field size. Many signing primitives (OpenSSL, the JCA,
//! RustCrypto's `DerSignature`) natively speak ASN.1 DER instead:
//!
//! ```text
//! SEQUENCE {
//!     r INTEGER,
//!     s INTEGER,
//! }
//! ```
//!
//! Every conversion between the two forms goes through this module. The
//! ASN.1 work itself is done by [`p256::ecdsa::Signature`].

use crate::error::{JwtError, JwtResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use p256::ecdsa::Signature;

/// Byte width of one P-256 scalar (N)
pub const SCALAR_SIZE: usize = 32;

/// Byte width of a raw signature (2N)
pub const RAW_SIGNATURE_SIZE: usize = 2 * SCALAR_SIZE;

/// Largest DER encoding of a P-256 signature: `30 44 (02 21 00 r) (02 21 00 s)`
pub const MAX_DER_SIGNATURE_SIZE: usize = 2 + 2 * (2 + SCALAR_SIZE + 1);

/// Fixed-width `r || s` signature as carried in a JWS
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawSignature([u8; RAW_SIGNATURE_SIZE]);

impl RawSignature {
    /// Build from two big-endian integers of at most N significant bytes
    /// each. Shorter inputs are left-padded with zeros.
    ///
    /// # Errors
    /// `SignatureFormat` if either integer needs more than N bytes.
    pub fn from_scalars(r: &[u8], s: &[u8]) -> JwtResult<Self> {
        let mut out = [0u8; RAW_SIGNATURE_SIZE];
        left_pad_into(strip_leading_zeros(r), &mut out[..SCALAR_SIZE], "r")?;
        left_pad_into(strip_leading_zeros(s), &mut out[SCALAR_SIZE..], "s")?;
        Ok(Self(out))
    }

    /// Interpret exactly 2N bytes as `r || s`.
    ///
    /// # Errors
    /// `SignatureFormat` on any other length.
    pub fn from_slice(bytes: &[u8]) -> JwtResult<Self> {
        let raw: [u8; RAW_SIGNATURE_SIZE] = bytes.try_into().map_err(|_| {
            JwtError::SignatureFormat(format!(
                "raw signature must be {RAW_SIGNATURE_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(raw))
    }

    /// Decode a JWS signature segment.
    ///
    /// # Errors
    /// `SignatureFormat` on characters outside the base64url alphabet, any
    /// padding, non-canonical trailing bits or a decoded length other
    /// than 2N.
    pub fn from_base64url(segment: &str) -> JwtResult<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
            JwtError::SignatureFormat(format!("signature segment is not base64url: {e}"))
        })?;
        Self::from_slice(&bytes)
    }

    /// Encode as a JWS signature segment
    #[must_use]
    pub fn to_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Big-endian `r`, N bytes
    #[must_use]
    pub fn r(&self) -> &[u8] {
        &self.0[..SCALAR_SIZE]
    }

    /// Big-endian `s`, N bytes
    #[must_use]
    pub fn s(&self) -> &[u8] {
        &self.0[SCALAR_SIZE..]
    }

    /// All 2N bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; RAW_SIGNATURE_SIZE] {
        &self.0
    }

    /// Parse a DER `SEQUENCE { r INTEGER, s INTEGER }`.
    ///
    /// # Errors
    /// `SignatureFormat` for anything that is not canonical DER, or whose
    /// scalars are zero or not below the group order.
    pub fn from_der(der: &[u8]) -> JwtResult<Self> {
        let signature = Signature::from_der(der)
            .map_err(|e| JwtError::SignatureFormat(format!("invalid DER signature: {e}")))?;
        Ok(Self::from(&signature))
    }

    /// The scalars as a curve signature; `None` when `r` or `s` is zero or
    /// not below the group order, which no valid signature can carry.
    #[must_use]
    pub fn to_signature(&self) -> Option<Signature> {
        Signature::from_slice(&self.0).ok()
    }

    /// Encode as DER.
    ///
    /// # Errors
    /// `SignatureFormat` if either scalar is out of range.
    pub fn to_der(&self) -> JwtResult<Vec<u8>> {
        self.to_signature()
            .map(|signature| signature.to_der().as_bytes().to_vec())
            .ok_or_else(|| JwtError::signature_format("signature scalars out of range"))
    }
}

impl From<&Signature> for RawSignature {
    fn from(signature: &Signature) -> Self {
        let mut raw = [0u8; RAW_SIGNATURE_SIZE];
        raw.copy_from_slice(&signature.to_bytes());
        Self(raw)
    }
}

impl std::fmt::Debug for RawSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawSignature({})", self.to_base64url())
    }
}

impl AsRef<[u8]> for RawSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Convert a DER signature to the raw JWS form.
///
/// # Errors
/// See [`RawSignature::from_der`].
pub fn der_to_raw(der: &[u8]) -> JwtResult<RawSignature> {
    RawSignature::from_der(der)
}

/// Convert a raw JWS signature to DER.
///
/// # Errors
/// `SignatureFormat` unless `raw` is exactly 2N bytes holding two in-range
/// scalars.
pub fn raw_to_der(raw: &[u8]) -> JwtResult<Vec<u8>> {
    RawSignature::from_slice(raw)?.to_der()
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

fn left_pad_into(value: &[u8], out: &mut [u8], name: &str) -> JwtResult<()> {
    if value.len() > out.len() {
        return Err(JwtError::SignatureFormat(format!(
            "{name} is {} bytes, wider than {SCALAR_SIZE}",
            value.len()
        )));
    }
    let offset = out.len() - value.len();
    out[offset..].copy_from_slice(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use p256::ecdsa::{signature::Signer, SigningKey};

    #[test]
    fn raw_to_der_small_values() {
        let mut raw = [0u8; 64];
        raw[31] = 0x01;
        raw[63] = 0x7f;
        let der = raw_to_der(&raw).unwrap();
        assert_eq!(der, hex!("3006 020101 02017f"));
        let decoded = der_to_raw(&der).unwrap();
        assert_eq!(decoded.as_bytes(), &raw);
    }

    #[test]
    fn high_bit_gets_zero_prefix() {
        let raw = RawSignature::from_slice(&[0x80; 64]).unwrap();
        let der = raw.to_der().unwrap();
        assert_eq!(der.len(), MAX_DER_SIGNATURE_SIZE);
        assert_eq!(&der[..6], &hex!("3046 022100 80"));
        assert_eq!(RawSignature::from_der(&der).unwrap(), raw);
    }

    #[test]
    fn leading_zeros_are_stripped_and_restored() {
        let mut raw = [0u8; 64];
        raw[2..32].copy_from_slice(&[0x11; 30]);
        raw[32..].copy_from_slice(&[0x22; 32]);
        let der = raw_to_der(&raw).unwrap();
        // r: 30 significant bytes, s: 32 bytes without pad
        assert_eq!(&der[..4], &hex!("3042 021e"));
        let decoded = der_to_raw(&der).unwrap();
        assert_eq!(decoded.as_bytes(), &raw);
    }

    #[test]
    fn from_scalars_left_pads() {
        let raw = RawSignature::from_scalars(&[0x01], &[0x00, 0x00, 0x7f]).unwrap();
        assert_eq!(raw.r()[31], 0x01);
        assert_eq!(raw.s()[31], 0x7f);
        assert!(raw.r()[..31].iter().all(|&b| b == 0));

        let err = RawSignature::from_scalars(&[0x01; 33], &[0x01]).unwrap_err();
        assert!(err.to_string().contains("wider than 32"));
    }

    #[test]
    fn out_of_range_scalars_have_no_der() {
        for raw in [[0u8; 64], [0xff; 64]] {
            let raw = RawSignature::from_slice(&raw).unwrap();
            assert!(raw.to_signature().is_none());
            assert_eq!(raw.to_der().unwrap_err().kind(), "SignatureFormatError");
        }
        // zero INTEGERs are well-formed DER but never a signature
        assert!(der_to_raw(&hex!("3006 020100 020100")).is_err());
    }

    #[test]
    fn raw_length_must_be_exact() {
        for len in [0usize, 63, 65, 72] {
            let err = RawSignature::from_slice(&vec![1u8; len]).unwrap_err();
            assert_eq!(err.kind(), "SignatureFormatError");
        }
        assert!(raw_to_der(&[1u8; 63]).is_err());
    }

    #[test]
    fn rejects_wrong_tags() {
        let err = der_to_raw(&hex!("3106 020101 020101")).unwrap_err();
        assert!(matches!(err, JwtError::SignatureFormat(_)));
        assert!(der_to_raw(&hex!("3006 030101 020101")).is_err());
    }

    #[test]
    fn rejects_inconsistent_lengths() {
        // outer length claims 7, only 6 follow
        assert!(der_to_raw(&hex!("3007 020101 020101")).is_err());
        // inner length overruns the sequence
        assert!(der_to_raw(&hex!("3006 020201 020101")).is_err());
        // trailing byte after the sequence
        assert!(der_to_raw(&hex!("3006 020101 020101 00")).is_err());
        // third integer inside the sequence
        assert!(der_to_raw(&hex!("3009 020101 020101 020101")).is_err());
    }

    #[test]
    fn rejects_non_canonical_integers() {
        // negative r
        assert!(der_to_raw(&hex!("3006 020181 020101")).is_err());
        // superfluous leading zero
        assert!(der_to_raw(&hex!("3007 02020001 020101")).is_err());
        // empty integer
        assert!(der_to_raw(&hex!("3005 0200 020101")).is_err());
        // long-form length where the short form fits
        assert!(der_to_raw(&hex!("308106 020101 020101")).is_err());
    }

    #[test]
    fn base64url_segment_round_trip() {
        let raw = RawSignature::from_slice(&[0xfb; 64]).unwrap();
        let segment = raw.to_base64url();
        assert_eq!(segment.len(), 86);
        assert!(!segment.contains('=') && !segment.contains('+') && !segment.contains('/'));
        assert_eq!(RawSignature::from_base64url(&segment).unwrap(), raw);
    }

    #[test]
    fn base64url_rejects_padding_and_standard_alphabet() {
        let raw = RawSignature::from_slice(&[0xfb; 64]).unwrap();
        let segment = raw.to_base64url();
        assert!(RawSignature::from_base64url(&format!("{segment}==")).is_err());
        assert!(RawSignature::from_base64url(&segment.replace('-', "+")).is_err());
        // 85 characters can never be a whole number of bytes
        assert!(RawSignature::from_base64url(&segment[..85]).is_err());
    }

    #[test]
    fn real_signatures_convert_both_ways() {
        let key = SigningKey::from_slice(&[0x5a; 32]).unwrap();
        for n in 0u32..200 {
            let msg = format!("eyJhbGciOiJFUzI1NiJ9.{n}");
            let sig: Signature = key.sign(msg.as_bytes());
            let der = sig.to_der();

            let raw = der_to_raw(der.as_bytes()).unwrap();
            assert_eq!(raw.as_bytes()[..], sig.to_bytes()[..]);
            assert_eq!(raw.to_der().unwrap(), der.as_bytes());
            assert!(der.as_bytes().len() <= MAX_DER_SIGNATURE_SIZE);
        }
    }
}
