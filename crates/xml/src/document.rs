//! Whole-document helpers for maps stored as standalone XML.
//!
//! The codecs themselves work inside a stream owned by an outer decoder. These
//! helpers cover the common case where the map field is the whole document:
//! they set up the quick-xml adapters from a [`CodecConfig`], locate the
//! wrapper element and delegate to the codec.

use crate::StringMap;
use crate::attribute::{decode_attribute_map, encode_attribute_map};
use crate::config::CodecConfig;
use crate::element::{decode_element_map, encode_element_map};
use crate::error::{Result, XmlMapError};
use crate::token::{StartTag, TokenSource, XmlToken};

/// Serializes an attribute-style map to an XML string.
///
/// An empty map produces an empty string.
///
/// # Examples
///
/// ```
/// use jobconf_xml::{CodecConfig, StringMap, attribute_map_to_xml_string};
///
/// let mut map = StringMap::new();
/// map.insert("command".to_string(), "ls -l".to_string());
/// let xml = attribute_map_to_xml_string(&map, "config", &CodecConfig::default())?;
/// assert_eq!(xml, r#"<config><entry key="command" value="ls -l"/></config>"#);
/// # Ok::<(), jobconf_xml::XmlMapError>(())
/// ```
pub fn attribute_map_to_xml_string(
    map: &StringMap,
    wrapper_name: &str,
    config: &CodecConfig,
) -> Result<String> {
    config.ensure_valid()?;
    let mut writer = config.writer(Vec::new());
    encode_attribute_map(map, &mut writer, &StartTag::new(wrapper_name), &config.layout())?;
    into_string(writer.finish()?)
}

/// Deserializes an attribute-style map from an XML string.
///
/// The first element of the document is taken as the wrapper. Returns the
/// wrapper's name together with the decoded map. Anything but whitespace
/// after the wrapper's end element is a parse error.
pub fn attribute_map_from_xml_str(xml: &str, config: &CodecConfig) -> Result<(String, StringMap)> {
    config.ensure_valid()?;
    let mut reader = config.reader(xml.as_bytes());
    let wrapper = read_wrapper(&mut reader)?;
    let map = decode_attribute_map(&mut reader, &wrapper, &config.layout())?;
    ensure_document_end(&mut reader, &wrapper.name)?;
    Ok((wrapper.name, map))
}

/// Serializes an element-style map to an XML string.
///
/// An empty map produces an empty string.
pub fn element_map_to_xml_string(
    map: &StringMap,
    wrapper_name: &str,
    config: &CodecConfig,
) -> Result<String> {
    let mut writer = config.writer(Vec::new());
    encode_element_map(map, &mut writer, &StartTag::new(wrapper_name))?;
    into_string(writer.finish()?)
}

/// Deserializes an element-style map from an XML string.
///
/// The first element of the document is taken as the wrapper. Returns the
/// wrapper's name together with the decoded map. Anything but whitespace
/// after the wrapper's end element is a parse error.
pub fn element_map_from_xml_str(xml: &str, config: &CodecConfig) -> Result<(String, StringMap)> {
    let mut reader = config.reader(xml.as_bytes());
    let wrapper = read_wrapper(&mut reader)?;
    let map = decode_element_map(&mut reader, &wrapper, config.empty_content)?;
    ensure_document_end(&mut reader, &wrapper.name)?;
    Ok((wrapper.name, map))
}

/// Skips leading text and returns the first start element.
fn read_wrapper<S: TokenSource + ?Sized>(source: &mut S) -> Result<StartTag> {
    loop {
        match source.next_token()? {
            Some(XmlToken::Start(tag)) => return Ok(tag),
            Some(XmlToken::Text(text)) if text.trim().is_empty() => continue,
            Some(other) => {
                return Err(XmlMapError::Parse(format!(
                    "expected a wrapper element, found {:?}",
                    other
                )));
            }
            None => return Err(XmlMapError::unexpected_eof("document")),
        }
    }
}

/// Drains the source, allowing only whitespace after the wrapper.
fn ensure_document_end<S: TokenSource + ?Sized>(source: &mut S, wrapper: &str) -> Result<()> {
    while let Some(token) = source.next_token()? {
        match token {
            XmlToken::Text(text) if text.trim().is_empty() => continue,
            other => {
                return Err(XmlMapError::Parse(format!(
                    "unexpected content after </{}>: {:?}",
                    wrapper, other
                )));
            }
        }
    }
    Ok(())
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| XmlMapError::Parse(format!("Invalid UTF-8: {}", e)))
}
