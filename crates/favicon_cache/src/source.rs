//! Favicon sources, rendered artifacts and the loader seam.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// Eight-byte signature every PNG stream starts with.
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Errors produced while loading or rendering a favicon.
#[derive(Debug, Error)]
pub enum FaviconError {
    /// The loader could not produce image bytes for the source.
    #[error("failed to load favicon source: {0}")]
    Load(String),

    /// I/O failure while reading the source.
    #[error("favicon i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The loaded bytes are not a PNG stream.
    #[error("favicon data is not a valid PNG image")]
    NotPng,
}

/// How the raw source reference of a [`FaviconSource`] is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A path on the local filesystem.
    File,
    /// A remote URL.
    Url,
    /// Base64-encoded image data carried inline in the configuration.
    Encoded,
}

/// Identifies one logical image input.
///
/// Equality and hashing are structural, so repeated requests for the same
/// kind + source pair coalesce onto one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaviconSource {
    pub kind: SourceKind,
    pub source: String,
}

impl FaviconSource {
    pub fn new(kind: SourceKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Supplies raw image bytes for a source.
///
/// Implemented by the decision core, which knows how to resolve each
/// [`SourceKind`]. Loaders may block (network, disk) and own any timeout
/// behavior; the cache only guarantees that at most one load per key runs
/// at a time.
pub trait FaviconLoader: Send + Sync {
    fn load_bytes(&self, source: &FaviconSource) -> Result<Vec<u8>, FaviconError>;
}

/// A rendered, protocol-ready favicon.
///
/// Immutable once created; the cache hands out shared references to a single
/// rendered artifact per source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favicon {
    data_uri: String,
}

impl Favicon {
    /// Renders PNG bytes into the data URI the status protocol embeds.
    ///
    /// Rejects anything without a PNG signature; favicon sources are
    /// required to be PNG images.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, FaviconError> {
        if !bytes.starts_with(&PNG_SIGNATURE) {
            return Err(FaviconError::NotPng);
        }
        Ok(Self {
            data_uri: format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
        })
    }

    /// The `data:image/png;base64,...` string to embed in a ping.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}
