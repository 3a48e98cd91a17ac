//! [`TokenSource`] adapter over a quick-xml reader.
//!
//! The adapter turns quick-xml events into the three-token model used by the
//! codecs:
//!
//! - `<a/>` is reported as `Start(a)` followed by `End(a)`;
//! - element and attribute names are reported by local name;
//! - attribute values are unescaped;
//! - adjacent text, CDATA sections and entity references are merged into a
//!   single `Text` token;
//! - comments, processing instructions, declarations and doctypes are skipped.

use crate::error::{Result, XmlMapError};
use crate::token::{StartTag, TokenSource, XmlToken};
use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::collections::VecDeque;
use std::io::BufRead;
use tracing::trace;

/// Reads [`XmlToken`]s from XML text.
pub struct XmlTokenReader<R: BufRead> {
    reader: Reader<R>,
    /// Buffer for reading events
    buf: Vec<u8>,
    /// Tokens already produced but not yet handed out
    pending: VecDeque<XmlToken>,
}

impl<'a> XmlTokenReader<&'a [u8]> {
    /// Creates a token reader over an XML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &'a str) -> Self {
        Self::from_reader(Reader::from_str(xml))
    }
}

impl<R: BufRead> XmlTokenReader<R> {
    /// Creates a token reader over any buffered input.
    pub fn new(input: R) -> Self {
        Self::from_reader(Reader::from_reader(input))
    }

    fn from_reader(mut reader: Reader<R>) -> Self {
        // Text is reported verbatim; the element codec decides what whitespace means.
        reader.config_mut().trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Consumes the adapter and returns the underlying input.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Byte offset of the reader in the input, for error reporting.
    pub fn buffer_position(&self) -> u64 {
        self.reader.buffer_position()
    }

    fn read_event(&mut self) -> Result<Event<'static>> {
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf) {
            Ok(event) => Ok(event.into_owned()),
            Err(e) => Err(XmlMapError::Parse(format!(
                "{} at position {}",
                e,
                self.reader.buffer_position()
            ))),
        }
    }
}

impl<R: BufRead> TokenSource for XmlTokenReader<R> {
    fn next_token(&mut self) -> Result<Option<XmlToken>> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(Some(token));
        }

        let mut text: Option<String> = None;
        loop {
            let token = match self.read_event()? {
                Event::Text(t) => {
                    append_text(&mut text, utf8(t.as_ref())?);
                    continue;
                }
                Event::CData(c) => {
                    append_text(&mut text, utf8(&c)?);
                    continue;
                }
                Event::GeneralRef(r) => {
                    let resolved = resolve_reference(&r)?;
                    append_text(&mut text, &resolved);
                    continue;
                }
                Event::Start(e) => XmlToken::Start(start_tag(&e, self.reader.decoder())?),
                Event::Empty(e) => {
                    let tag = start_tag(&e, self.reader.decoder())?;
                    self.pending.push_back(XmlToken::End(tag.name.clone()));
                    XmlToken::Start(tag)
                }
                Event::End(e) => XmlToken::End(utf8(e.local_name().as_ref())?.to_string()),
                Event::Eof => return Ok(text.map(XmlToken::Text)),
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {
                    trace!("skipping non-structural XML event");
                    continue;
                }
            };

            // Text collected so far goes out before the structural token.
            return match text {
                Some(text) => {
                    self.pending.push_front(token);
                    Ok(Some(XmlToken::Text(text)))
                }
                None => Ok(Some(token)),
            };
        }
    }
}

fn append_text(text: &mut Option<String>, chunk: &str) {
    text.get_or_insert_with(String::new).push_str(chunk);
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| XmlMapError::Parse(format!("Invalid UTF-8: {}", e)))
}

fn is_namespace_declaration(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

fn start_tag(e: &BytesStart<'_>, decoder: Decoder) -> Result<StartTag> {
    let mut tag = StartTag::new(utf8(e.local_name().as_ref())?);
    for attr in e.attributes() {
        let attr =
            attr.map_err(|e| XmlMapError::Parse(format!("Failed to parse attribute: {}", e)))?;
        if is_namespace_declaration(attr.key.as_ref()) {
            continue;
        }
        let key = utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(XmlMapError::parse)?;
        tag.attributes.push((key, value.into_owned()));
    }
    Ok(tag)
}

/// Resolves `&name;` and `&#NN;` / `&#xNN;` references.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    let name = utf8(reference)?;
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        };
        return parsed
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| XmlMapError::Parse(format!("invalid character reference &{};", name)));
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| XmlMapError::Parse(format!("unknown entity &{};", name)))
}
