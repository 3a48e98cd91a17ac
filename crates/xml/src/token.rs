//! Streaming token model shared by the map codecs.
//!
//! An outer encoder/decoder owns the token stream and hands it to a codec by
//! `&mut` for the duration of one call. The codecs only ever see three token
//! kinds: start elements (with attributes), end elements and text content.
//! End of stream is reported by [`TokenSource::next_token`] returning `None`.

use crate::error::Result;
use std::collections::VecDeque;

/// A start element: its local name plus attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    /// Creates a start tag without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute, returning the tag for chaining.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A single structural XML event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlToken {
    /// `<name attr="...">`
    Start(StartTag),
    /// `</name>`
    End(String),
    /// Text content, already unescaped.
    Text(String),
}

impl XmlToken {
    pub fn start(name: impl Into<String>) -> Self {
        XmlToken::Start(StartTag::new(name))
    }

    pub fn end(name: impl Into<String>) -> Self {
        XmlToken::End(name.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        XmlToken::Text(text.into())
    }
}

/// A sequential source of tokens.
pub trait TokenSource {
    /// Returns the next token, or `None` once the stream is exhausted.
    fn next_token(&mut self) -> Result<Option<XmlToken>>;
}

/// A sequential sink of tokens.
pub trait TokenSink {
    fn write_token(&mut self, token: XmlToken) -> Result<()>;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Option<XmlToken>> {
        (**self).next_token()
    }
}

impl<T: TokenSink + ?Sized> TokenSink for &mut T {
    fn write_token(&mut self, token: XmlToken) -> Result<()> {
        (**self).write_token(token)
    }
}

/// In-memory FIFO of tokens.
///
/// Written tokens are queued at the back and read from the front, so a buffer
/// filled by an encoder can be handed straight to a decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBuffer {
    tokens: VecDeque<XmlToken>,
}

impl TokenBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns the queued tokens front to back without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &XmlToken> {
        self.tokens.iter()
    }

    pub fn into_vec(self) -> Vec<XmlToken> {
        self.tokens.into()
    }
}

impl From<Vec<XmlToken>> for TokenBuffer {
    fn from(tokens: Vec<XmlToken>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }
}

impl FromIterator<XmlToken> for TokenBuffer {
    fn from_iter<I: IntoIterator<Item = XmlToken>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Result<Option<XmlToken>> {
        Ok(self.tokens.pop_front())
    }
}

impl TokenSink for TokenBuffer {
    fn write_token(&mut self, token: XmlToken) -> Result<()> {
        self.tokens.push_back(token);
        Ok(())
    }
}
