//! Element-per-key map encoding.
//!
//! A map is written as a wrapper element holding one child per key. The
//! child's tag name is the key and its text content is the value:
//!
//! ```xml
//! <logging>
//!   <format>json</format>
//!   <level>info</level>
//! </logging>
//! ```
//!
//! Keys must be valid XML element names. Nothing here checks that; callers
//! that accept arbitrary keys should use the attribute encoding instead.

use crate::StringMap;
use crate::error::{Result, XmlMapError};
use crate::token::{StartTag, TokenSink, TokenSource, XmlToken};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// What to do with a field element that carries no text at all, e.g. `<x></x>`.
///
/// Many XML readers produce no text event for empty content, so the field
/// only shows up as a start tag followed by its end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmptyContent {
    /// Record the key with an empty string value.
    #[default]
    Keep,
    /// Leave the key out of the decoded map.
    Drop,
}

/// Writes `map` as an element-style wrapper element.
///
/// An empty map writes nothing at all, not even the wrapper. Fields are
/// written in ascending key order so the output is reproducible.
pub fn encode_element_map<S>(map: &StringMap, sink: &mut S, wrapper: &StartTag) -> Result<()>
where
    S: TokenSink + ?Sized,
{
    if map.is_empty() {
        debug!(wrapper = %wrapper.name, "eliding empty element map");
        return Ok(());
    }

    sink.write_token(XmlToken::Start(wrapper.clone()))?;

    for (key, value) in crate::sorted_entries(map) {
        trace!(key = %key, "encoding map field");
        sink.write_token(XmlToken::start(key.as_str()))?;
        sink.write_token(XmlToken::text(value.as_str()))?;
        sink.write_token(XmlToken::end(key.as_str()))?;
    }

    sink.write_token(XmlToken::end(wrapper.name.as_str()))?;
    Ok(())
}

/// Reads an element-style map whose wrapper start has already been consumed.
///
/// A start element names the pending key and the next text token supplies its
/// value. Text outside a field (indentation between elements) is ignored.
/// Consumes tokens up to and including the wrapper's end element.
pub fn decode_element_map<S>(
    source: &mut S,
    wrapper: &StartTag,
    empty_content: EmptyContent,
) -> Result<StringMap>
where
    S: TokenSource + ?Sized,
{
    let mut result = StringMap::new();
    let mut pending: Option<String> = None;
    let mut committed = false;
    // Elements open inside the wrapper; only a wrapper-named end at depth 0 terminates.
    let mut depth = 0usize;

    loop {
        let Some(token) = source.next_token()? else {
            return Err(XmlMapError::unexpected_eof(&wrapper.name));
        };

        match token {
            XmlToken::Start(tag) => {
                depth += 1;
                pending = Some(tag.name);
                committed = false;
            }
            XmlToken::Text(text) => {
                if let Some(key) = &pending {
                    trace!(key = %key, "decoded map field");
                    result.insert(key.clone(), text);
                    committed = true;
                }
            }
            XmlToken::End(name) if depth == 0 && name == wrapper.name => {
                debug!(wrapper = %wrapper.name, entries = result.len(), "decoded element map");
                return Ok(result);
            }
            XmlToken::End(name) => {
                depth = depth.saturating_sub(1);
                if let Some(key) = pending.take() {
                    if key == name && !committed {
                        match empty_content {
                            EmptyContent::Keep => {
                                trace!(key = %key, "decoded empty map field");
                                result.insert(key, String::new());
                            }
                            EmptyContent::Drop => {
                                trace!(key = %key, "dropping map field without content");
                            }
                        }
                    }
                }
                committed = false;
            }
        }
    }
}
