//! PEM text codec for PKCS#8 private keys and SPKI public keys
//!
//! The layout is fixed so that every platform produces byte-identical text
//! for the same DER: header line, standard base64 wrapped at 64 columns,
//! footer line, `\n` separators and no trailing newline. Decoding is
//! lenient about whitespace (CRLF, indentation, a trailing newline) but not
//! about the header and footer.

use crate::error::{JwtError, JwtResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Characters per base64 line
pub const PEM_LINE_WIDTH: usize = 64;

/// Which kind of key a PEM block carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemLabel {
    /// PKCS#8 `PRIVATE KEY`
    Private,
    /// SubjectPublicKeyInfo `PUBLIC KEY`
    Public,
}

impl PemLabel {
    /// `true` for [`PemLabel::Private`]
    #[must_use]
    pub fn from_is_private(is_private: bool) -> Self {
        if is_private {
            PemLabel::Private
        } else {
            PemLabel::Public
        }
    }

    fn word(self) -> &'static str {
        match self {
            PemLabel::Private => "PRIVATE",
            PemLabel::Public => "PUBLIC",
        }
    }

    /// `-----BEGIN {PRIVATE|PUBLIC} KEY-----`
    #[must_use]
    pub fn header(self) -> String {
        format!("-----BEGIN {} KEY-----", self.word())
    }

    /// `-----END {PRIVATE|PUBLIC} KEY-----`
    #[must_use]
    pub fn footer(self) -> String {
        format!("-----END {} KEY-----", self.word())
    }
}

/// DER bytes tagged with their PEM label.
///
/// The buffer is wiped on drop since it may hold a private scalar.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PemBlob {
    #[zeroize(skip)]
    label: PemLabel,
    der: Vec<u8>,
}

impl PemBlob {
    /// Wrap DER bytes
    #[must_use]
    pub fn new(label: PemLabel, der: Vec<u8>) -> Self {
        Self { label, der }
    }

    /// Label of this block
    #[must_use]
    pub fn label(&self) -> PemLabel {
        self.label
    }

    /// DER payload
    #[must_use]
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Render as PEM text
    #[must_use]
    pub fn encode(&self) -> String {
        encode(&self.der, self.label)
    }

    /// Parse PEM text that must carry `label`
    ///
    /// # Errors
    /// `KeyFormat` on a wrong or missing header/footer, invalid base64 or an
    /// empty body.
    pub fn decode(text: &str, label: PemLabel) -> JwtResult<Self> {
        decode(text, label).map(|der| Self { label, der })
    }
}

impl std::fmt::Debug for PemBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PemBlob")
            .field("label", &self.label)
            .field("der_len", &self.der.len())
            .finish()
    }
}

/// Encode DER bytes as PEM text.
#[must_use]
pub fn encode(der: &[u8], label: PemLabel) -> String {
    let body = STANDARD.encode(der);
    let header = label.header();
    let footer = label.footer();

    let line_count = body.len().div_ceil(PEM_LINE_WIDTH);
    let mut out = String::with_capacity(header.len() + body.len() + line_count + footer.len() + 1);
    out.push_str(&header);
    out.push('\n');
    for (i, line) in body.as_bytes().chunks(PEM_LINE_WIDTH).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // base64 output is ASCII, so every chunk boundary is a char boundary
        out.extend(line.iter().map(|&b| char::from(b)));
    }
    out.push('\n');
    out.push_str(&footer);
    out
}

/// Decode PEM text carrying `label` back to DER bytes.
///
/// # Errors
/// `KeyFormat` on a wrong or missing header/footer, invalid base64 or an
/// empty body.
pub fn decode(text: &str, label: PemLabel) -> JwtResult<Vec<u8>> {
    let header = label.header();
    let footer = label.footer();

    let body = text
        .trim()
        .strip_prefix(header.as_str())
        .ok_or_else(|| JwtError::KeyFormat(format!("expected PEM header {header}")))?
        .strip_suffix(footer.as_str())
        .ok_or_else(|| JwtError::KeyFormat(format!("expected PEM footer {footer}")))?;

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(JwtError::key_format("PEM body is empty"));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| JwtError::KeyFormat(format!("PEM body is not valid base64: {e}")))
}
