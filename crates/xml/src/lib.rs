//! # jobconf-xml
//!
//! Deterministic XML codecs for string-keyed, string-valued maps embedded in
//! job and plugin configuration documents.
//!
//! The configuration dialect stores maps in two historical shapes:
//!
//! | Style | XML |
//! |-------|-----|
//! | attribute pairs | `<config><entry key="a" value="1"/></config>` |
//! | element per key | `<logging><a>1</a></logging>` |
//!
//! Both codecs work on a token stream owned by the caller (see [`token`]).
//! Decoding starts after the caller has consumed the wrapper start element and
//! stops right after the matching end element. Encoding writes the wrapper
//! itself, and only when the map is non-empty.
//!
//! ## Guarantees
//!
//! - Keys are always written in ascending lexicographic order, so encoding the
//!   same map twice yields identical output.
//! - An empty map is elided completely; a missing field decodes as empty.
//! - Decoding builds a new map and returns it; nothing is returned on error.
//!
//! ## Example
//!
//! ```
//! use jobconf_xml::{CodecConfig, StringMap};
//! use jobconf_xml::{attribute_map_from_xml_str, attribute_map_to_xml_string};
//!
//! let mut map = StringMap::new();
//! map.insert("user".to_string(), "deploy".to_string());
//! map.insert("command".to_string(), "uptime".to_string());
//!
//! let config = CodecConfig::default();
//! let xml = attribute_map_to_xml_string(&map, "config", &config)?;
//! let (wrapper, decoded) = attribute_map_from_xml_str(&xml, &config)?;
//! assert_eq!(wrapper, "config");
//! assert_eq!(decoded, map);
//! # Ok::<(), jobconf_xml::XmlMapError>(())
//! ```

pub mod attribute;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod reader;
pub mod token;
pub mod writer;

use std::collections::HashMap;

pub use attribute::{EntryLayout, decode_attribute_map, encode_attribute_map};
pub use config::CodecConfig;
pub use document::{
    attribute_map_from_xml_str, attribute_map_to_xml_string, element_map_from_xml_str,
    element_map_to_xml_string,
};
pub use element::{EmptyContent, decode_element_map, encode_element_map};
pub use error::{Result, XmlMapError};
pub use reader::XmlTokenReader;
pub use token::{StartTag, TokenBuffer, TokenSink, TokenSource, XmlToken};
pub use writer::XmlTokenWriter;

/// A string-keyed, string-valued map. Iteration order carries no meaning.
pub type StringMap = HashMap<String, String>;

/// Entries of `map` in ascending key order.
pub(crate) fn sorted_entries(map: &StringMap) -> Vec<(&String, &String)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}
