//! Base64 data URIs used to hand payloads between pipeline stages.

use crate::{Error, Result};
use base64::Engine as Base64Engine;
use std::fmt;

pub const SVG_MIME: &str = "image/svg+xml";
pub const PNG_MIME: &str = "image/png";

/// A `data:<mime>;base64,<payload>` resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn svg(markup: &str) -> Self {
        Self::new(SVG_MIME, markup.as_bytes().to_vec())
    }

    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(PNG_MIME, bytes)
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Parse a base64 data URI. Only the `;base64` form is accepted.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::DecodeError("missing `data:` scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::DecodeError("missing `,` separator".into()))?;
        let mime = header.strip_suffix(";base64").ok_or_else(|| {
            Error::DecodeError(format!("unsupported data URI encoding `{}`", header))
        })?;
        if mime.is_empty() {
            return Err(Error::DecodeError("empty MIME type".into()));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::DecodeError(format!("invalid base64 payload: {}", e)))?;
        Ok(Self::new(mime, bytes))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b64 = Base64Engine::encode(&base64::engine::general_purpose::STANDARD, &self.bytes);
        write!(f, "data:{};base64,{}", self.mime, b64)
    }
}
