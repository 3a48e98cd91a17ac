//! Codec configuration.
//!
//! Layout names and output options for the map codecs, with environment
//! variable overrides so the hosting application can adapt to documents that
//! use a different entry vocabulary.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `JOBCONF_ENTRY_TAG` | entry | Entry element name (attribute style) |
//! | `JOBCONF_KEY_ATTR` | key | Key attribute name (attribute style) |
//! | `JOBCONF_VALUE_ATTR` | value | Value attribute name (attribute style) |
//! | `JOBCONF_EMPTY_CONTENT` | keep | Empty field handling (element style): keep or drop |
//! | `JOBCONF_INDENT` | 0 | Spaces per nesting level, 0 for compact output |
//! | `JOBCONF_COLLAPSE_EMPTY` | true | Write empty elements self-closing |
//!
//! # Example
//!
//! ```rust
//! use jobconf_xml::CodecConfig;
//!
//! let config = CodecConfig {
//!     key_attr: "name".to_string(),
//!     indent: 2,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::attribute::EntryLayout;
use crate::element::EmptyContent;
use crate::error::{Result, XmlMapError};
use crate::reader::XmlTokenReader;
use crate::writer::XmlTokenWriter;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

/// Configuration for the map codecs and their XML adapters.
#[derive(Debug, Clone, PartialEq, Eq, Parser, Serialize, Deserialize)]
#[command(name = "jobconf-xml")]
#[command(about = "XML map codec settings")]
#[serde(default)]
pub struct CodecConfig {
    /// Entry element name for attribute-style maps.
    #[arg(long, env = "JOBCONF_ENTRY_TAG", default_value = "entry")]
    pub entry_tag: String,

    /// Attribute carrying the key of an entry.
    #[arg(long, env = "JOBCONF_KEY_ATTR", default_value = "key")]
    pub key_attr: String,

    /// Attribute carrying the value of an entry.
    #[arg(long, env = "JOBCONF_VALUE_ATTR", default_value = "value")]
    pub value_attr: String,

    /// Handling of element-style fields without text content.
    #[arg(long, env = "JOBCONF_EMPTY_CONTENT", value_enum, default_value = "keep")]
    pub empty_content: EmptyContent,

    /// Spaces per nesting level when writing (0 writes compact XML).
    #[arg(long, env = "JOBCONF_INDENT", default_value = "0")]
    pub indent: usize,

    /// Write elements without content as self-closing tags.
    #[arg(long, env = "JOBCONF_COLLAPSE_EMPTY", default_value = "true")]
    pub collapse_empty: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            entry_tag: "entry".to_string(),
            key_attr: "key".to_string(),
            value_attr: "value".to_string(),
            empty_content: EmptyContent::Keep,
            indent: 0,
            collapse_empty: true,
        }
    }
}

impl CodecConfig {
    /// Creates a configuration from environment variables.
    pub fn from_env() -> Self {
        // Parse without command line arguments so only the environment applies.
        Self::try_parse_from(["jobconf-xml"]).unwrap_or_default()
    }

    /// Creates a configuration suitable for testing: indented, readable output.
    pub fn for_testing() -> Self {
        Self {
            indent: 2,
            ..Default::default()
        }
    }

    /// Returns the attribute-style entry layout.
    pub fn layout(&self) -> EntryLayout {
        EntryLayout::new(
            self.entry_tag.as_str(),
            self.key_attr.as_str(),
            self.value_attr.as_str(),
        )
    }

    /// Creates a token reader over `input`.
    pub fn reader<R: BufRead>(&self, input: R) -> XmlTokenReader<R> {
        XmlTokenReader::new(input)
    }

    /// Creates a token writer over `output` using the configured formatting.
    pub fn writer<W: Write>(&self, output: W) -> XmlTokenWriter<W> {
        XmlTokenWriter::with_indent(output, self.indent).collapse_empty(self.collapse_empty)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (field, name) in [
            ("entry tag", &self.entry_tag),
            ("key attribute", &self.key_attr),
            ("value attribute", &self.value_attr),
        ] {
            if name.is_empty() {
                errors.push(format!("{} cannot be empty", field));
            } else if !is_xml_name(name) {
                errors.push(format!("{} '{}' is not a valid XML name", field, name));
            }
        }

        if self.key_attr == self.value_attr {
            errors.push("Key and value attributes must differ".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Like [`CodecConfig::validate`], as a codec error.
    pub(crate) fn ensure_valid(&self) -> Result<()> {
        self.validate().map_err(XmlMapError::InvalidConfig)
    }
}

/// Checks a name against the XML `Name` production, restricted to ASCII plus
/// any non-ASCII character. Colons are rejected since names are local.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') || !c.is_ascii())
}
