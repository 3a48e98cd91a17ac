//! [`TokenSink`] adapter over a quick-xml writer.

use crate::error::Result;
use crate::token::{StartTag, TokenSink, XmlToken};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Writes [`XmlToken`]s as XML text.
///
/// Attribute values and text are escaped here. When `collapse_empty` is on,
/// a start tag immediately followed by its own end tag is written as a
/// self-closing element, so `Start(entry) End(entry)` becomes `<entry .../>`.
pub struct XmlTokenWriter<W: Write> {
    writer: Writer<W>,
    /// Start tag held back until we know whether the element has content
    held: Option<StartTag>,
    collapse_empty: bool,
}

impl<W: Write> XmlTokenWriter<W> {
    /// Creates a compact writer that collapses empty elements.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            held: None,
            collapse_empty: true,
        }
    }

    /// Creates a writer indenting each nesting level by `indent` spaces.
    ///
    /// An indent of 0 produces compact output.
    pub fn with_indent(inner: W, indent: usize) -> Self {
        let writer = if indent == 0 {
            Writer::new(inner)
        } else {
            Writer::new_with_indent(inner, b' ', indent)
        };
        Self {
            writer,
            held: None,
            collapse_empty: true,
        }
    }

    /// Sets whether empty elements are written self-closing.
    pub fn collapse_empty(mut self, collapse: bool) -> Self {
        self.collapse_empty = collapse;
        self
    }

    /// Flushes any held start tag and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.flush_held()?;
        Ok(self.writer.into_inner())
    }

    fn flush_held(&mut self) -> Result<()> {
        if let Some(tag) = self.held.take() {
            self.writer.write_event(Event::Start(bytes_start(&tag)))?;
        }
        Ok(())
    }
}

impl<W: Write> TokenSink for XmlTokenWriter<W> {
    fn write_token(&mut self, token: XmlToken) -> Result<()> {
        match token {
            XmlToken::Start(tag) => {
                self.flush_held()?;
                if self.collapse_empty {
                    self.held = Some(tag);
                } else {
                    self.writer.write_event(Event::Start(bytes_start(&tag)))?;
                }
            }
            XmlToken::End(name) => {
                if let Some(tag) = self.held.take() {
                    if tag.name == name {
                        self.writer.write_event(Event::Empty(bytes_start(&tag)))?;
                        return Ok(());
                    }
                    self.writer.write_event(Event::Start(bytes_start(&tag)))?;
                }
                self.writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            XmlToken::Text(text) => {
                // Empty text does not count as content.
                if text.is_empty() {
                    return Ok(());
                }
                self.flush_held()?;
                self.writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
        }
        Ok(())
    }
}

fn bytes_start(tag: &StartTag) -> BytesStart<'_> {
    let mut element = BytesStart::new(tag.name.as_str());
    for (name, value) in &tag.attributes {
        element.push_attribute((name.as_str(), value.as_str()));
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(tokens: Vec<XmlToken>, collapse: bool) -> Result<String> {
        let mut writer = XmlTokenWriter::new(Vec::new()).collapse_empty(collapse);
        for token in tokens {
            writer.write_token(token)?;
        }
        let bytes = writer.finish()?;
        Ok(String::from_utf8(bytes).expect("writer emits UTF-8"))
    }

    #[test]
    fn test_collapses_empty_elements() -> Result<()> {
        let xml = render(
            vec![
                XmlToken::Start(StartTag::new("entry").with_attribute("key", "a")),
                XmlToken::end("entry"),
            ],
            true,
        )?;
        assert_eq!(xml, r#"<entry key="a"/>"#);
        Ok(())
    }

    #[test]
    fn test_keeps_explicit_end_when_not_collapsing() -> Result<()> {
        let xml = render(vec![XmlToken::start("entry"), XmlToken::end("entry")], false)?;
        assert_eq!(xml, "<entry></entry>");
        Ok(())
    }

    #[test]
    fn test_escapes_text_and_attributes() -> Result<()> {
        let xml = render(
            vec![
                XmlToken::Start(StartTag::new("a").with_attribute("v", "x\"<&")),
                XmlToken::text("1 < 2 & 3"),
                XmlToken::end("a"),
            ],
            true,
        )?;
        assert_eq!(xml, r#"<a v="x&quot;&lt;&amp;">1 &lt; 2 &amp; 3</a>"#);
        Ok(())
    }

    #[test]
    fn test_finish_flushes_held_start() -> Result<()> {
        let xml = render(vec![XmlToken::start("open")], true)?;
        assert_eq!(xml, "<open>");
        Ok(())
    }

    #[test]
    fn test_indentation() -> Result<()> {
        let mut writer = XmlTokenWriter::with_indent(Vec::new(), 2);
        for token in [
            XmlToken::start("config"),
            XmlToken::Start(StartTag::new("entry").with_attribute("key", "a")),
            XmlToken::end("entry"),
            XmlToken::end("config"),
        ] {
            writer.write_token(token)?;
        }
        let xml = String::from_utf8(writer.finish()?).expect("writer emits UTF-8");
        assert_eq!(xml, "<config>\n  <entry key=\"a\"/>\n</config>");
        Ok(())
    }
}
