//! Error types for the XML map codecs.
//!
//! The first three variants are decode-time schema violations raised by the
//! codecs themselves. The remaining variants wrap failures of the underlying
//! token stream (malformed XML, writer or I/O errors) and configuration errors.

use thiserror::Error;

/// The error type for all map codec operations.
#[derive(Error, Debug)]
pub enum XmlMapError {
    /// An element was found where a different tag was required.
    #[error("unexpected element {found} while looking for {expected} entries")]
    StructuralMismatch { expected: String, found: String },

    /// An entry element lacks its key attribute, or the attribute is empty.
    #[error("found {entry} entry with empty key")]
    MissingRequiredKey { entry: String },

    /// The token stream ended before the wrapper's end element.
    #[error("EOF while decoding <{wrapper}> map")]
    UnexpectedEndOfStream { wrapper: String },

    /// The input is not well-formed XML, or could not be decoded.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// The XML writer failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error while reading or writing the stream.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The codec configuration is not usable.
    #[error("invalid codec configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}

impl XmlMapError {
    /// Builds a [`XmlMapError::Parse`] from any displayable error.
    pub(crate) fn parse<E: std::fmt::Display>(err: E) -> Self {
        XmlMapError::Parse(err.to_string())
    }

    pub(crate) fn unexpected_eof(wrapper: &str) -> Self {
        XmlMapError::UnexpectedEndOfStream {
            wrapper: wrapper.to_string(),
        }
    }
}

/// Result type alias for map codec operations.
pub type Result<T> = std::result::Result<T, XmlMapError>;
