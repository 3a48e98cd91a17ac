//! Attribute-pair map encoding.
//!
//! A map is written as a wrapper element holding one entry element per key,
//! with the key and value carried in two attributes whose names are chosen by
//! the caller:
//!
//! ```xml
//! <config>
//!   <entry key="command" value="ls"/>
//!   <entry key="user" value="deploy"/>
//! </config>
//! ```

use crate::StringMap;
use crate::error::{Result, XmlMapError};
use crate::token::{StartTag, TokenSink, TokenSource, XmlToken};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Names of the entry element and its key/value attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLayout {
    pub entry_tag: String,
    pub key_attr: String,
    pub value_attr: String,
}

impl EntryLayout {
    pub fn new(
        entry_tag: impl Into<String>,
        key_attr: impl Into<String>,
        value_attr: impl Into<String>,
    ) -> Self {
        Self {
            entry_tag: entry_tag.into(),
            key_attr: key_attr.into(),
            value_attr: value_attr.into(),
        }
    }
}

impl Default for EntryLayout {
    fn default() -> Self {
        Self::new("entry", "key", "value")
    }
}

/// Writes `map` as an attribute-style wrapper element.
///
/// An empty map writes nothing at all, not even the wrapper. Entries are
/// written in ascending key order so the output is reproducible.
pub fn encode_attribute_map<S>(
    map: &StringMap,
    sink: &mut S,
    wrapper: &StartTag,
    layout: &EntryLayout,
) -> Result<()>
where
    S: TokenSink + ?Sized,
{
    if map.is_empty() {
        debug!(wrapper = %wrapper.name, "eliding empty attribute map");
        return Ok(());
    }

    sink.write_token(XmlToken::Start(wrapper.clone()))?;

    for (key, value) in crate::sorted_entries(map) {
        trace!(key = %key, "encoding map entry");
        let entry = StartTag::new(layout.entry_tag.as_str())
            .with_attribute(layout.key_attr.as_str(), key.as_str())
            .with_attribute(layout.value_attr.as_str(), value.as_str());
        sink.write_token(XmlToken::Start(entry))?;
        sink.write_token(XmlToken::end(layout.entry_tag.as_str()))?;
    }

    sink.write_token(XmlToken::end(wrapper.name.as_str()))?;
    Ok(())
}

/// Reads an attribute-style map whose wrapper start has already been consumed.
///
/// Consumes tokens up to and including the wrapper's end element and returns
/// a freshly built map. Any element other than `layout.entry_tag` is rejected,
/// as is an entry without a key. A missing value attribute reads as an empty
/// string.
pub fn decode_attribute_map<S>(
    source: &mut S,
    wrapper: &StartTag,
    layout: &EntryLayout,
) -> Result<StringMap>
where
    S: TokenSource + ?Sized,
{
    let mut result = StringMap::new();
    // Entries open inside the wrapper; only a wrapper-named end at depth 0 terminates.
    let mut depth = 0usize;
    loop {
        let Some(token) = source.next_token()? else {
            return Err(XmlMapError::unexpected_eof(&wrapper.name));
        };

        match token {
            XmlToken::Start(tag) => {
                if tag.name != layout.entry_tag {
                    return Err(XmlMapError::StructuralMismatch {
                        expected: layout.entry_tag.clone(),
                        found: tag.name,
                    });
                }
                depth += 1;
                let (key, value) = read_entry(tag, layout)?;
                trace!(key = %key, "decoded map entry");
                if let Some(previous) = result.insert(key, value) {
                    warn!(
                        wrapper = %wrapper.name,
                        previous = %previous,
                        "duplicate map entry key, keeping the last value"
                    );
                }
            }
            XmlToken::End(name) if depth == 0 && name == wrapper.name => {
                debug!(wrapper = %wrapper.name, entries = result.len(), "decoded attribute map");
                return Ok(result);
            }
            XmlToken::End(_) => depth = depth.saturating_sub(1),
            XmlToken::Text(_) => continue,
        }
    }
}

fn read_entry(tag: StartTag, layout: &EntryLayout) -> Result<(String, String)> {
    let mut key = None;
    let mut value = None;
    for (name, attr_value) in tag.attributes {
        if name == layout.key_attr {
            key = Some(attr_value);
        } else if name == layout.value_attr {
            value = Some(attr_value);
        }
    }

    match key {
        Some(key) if !key.is_empty() => Ok((key, value.unwrap_or_default())),
        _ => Err(XmlMapError::MissingRequiredKey { entry: tag.name }),
    }
}
