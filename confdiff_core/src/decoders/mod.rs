//! Text decoders producing canonical trees.
//!
//! Each decoder turns the full text of one document into a [`CanonicalValue`].
//! Decoders are registered by name in a [`DecoderRegistry`](crate::DecoderRegistry).

use confdiff_common::{CanonicalValue, ConfDiffError};

pub mod json;
pub mod keyvalue;
pub mod libconfig;
#[cfg(feature = "toml-format")]
pub mod toml;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use json::JsonDecoder;
pub use keyvalue::KeyValueDecoder;
pub use libconfig::LibconfigDecoder;
#[cfg(feature = "toml-format")]
pub use self::toml::TomlDecoder;
#[cfg(feature = "yaml")]
pub use yaml::YamlDecoder;

/// Per-load settings that some decoders consult
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Key/value separator for line-oriented documents
    pub separator: char,
    /// Comment marker for line-oriented documents
    pub comment_prefix: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            separator: '=',
            comment_prefix: "#".to_string(),
        }
    }
}

/// Capability to parse a document's text into a canonical tree
pub trait Decoder: Send + Sync {
    fn decode(&self, text: &str, options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError>;
}
