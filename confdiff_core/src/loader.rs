use crate::decoders::{DecodeOptions, Decoder};
use crate::registry::DecoderRegistry;
use confdiff_common::{CanonicalValue, ConfDiffError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a document comes from.
///
/// A path is always read from disk; text is always decoded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Text(String),
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Source::Text(text.into())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Text(text) => write!(f, "<text, {} bytes>", text.len()),
        }
    }
}

/// Turns paths or raw text into canonical trees using a decoder registry
pub struct FormatLoader<'r> {
    registry: &'r DecoderRegistry,
    options: DecodeOptions,
}

impl<'r> FormatLoader<'r> {
    pub fn new(registry: &'r DecoderRegistry) -> Self {
        Self {
            registry,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.options.separator = separator;
        self
    }

    /// Pick the format name: explicit hint, then file extension, then the registry default.
    ///
    /// An extension with no registered format is returned as-is so that resolving it fails
    /// with `UnsupportedFormat`; the default only applies when there is no extension at all.
    pub fn resolve_format(&self, path: Option<&Path>, hint: Option<&str>) -> String {
        if let Some(hint) = hint {
            return hint.trim().to_ascii_lowercase();
        }
        let Some(ext) = path.and_then(Path::extension) else {
            return self.registry.default_format().to_string();
        };
        match path.and_then(|p| self.registry.format_for_path(p)) {
            Some(format) => format.to_string(),
            None => ext.to_string_lossy().to_ascii_lowercase(),
        }
    }

    /// Read and decode a file; a missing or unreadable file is an I/O error
    pub fn load_path(&self, path: &Path, hint: Option<&str>) -> Result<CanonicalValue, ConfDiffError> {
        let format = self.resolve_format(Some(path), hint);
        let (name, decoder) = self.registry.resolve(&format)?;
        debug!("Loading {} as {}", path.display(), name);
        let text = fs::read_to_string(path)?;
        self.decode(decoder, &text)
    }

    /// Decode in-memory text
    pub fn load_text(&self, text: &str, hint: Option<&str>) -> Result<CanonicalValue, ConfDiffError> {
        let format = self.resolve_format(None, hint);
        let (name, decoder) = self.registry.resolve(&format)?;
        debug!("Loading {} bytes of text as {}", text.len(), name);
        self.decode(decoder, text)
    }

    pub fn load(&self, source: &Source, hint: Option<&str>) -> Result<CanonicalValue, ConfDiffError> {
        match source {
            Source::Path(path) => self.load_path(path, hint),
            Source::Text(text) => self.load_text(text, hint),
        }
    }

    fn decode(&self, decoder: &dyn Decoder, text: &str) -> Result<CanonicalValue, ConfDiffError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        match decoder.decode(text, &self.options)? {
            // An empty document has nothing to compare; treat it as an empty mapping
            CanonicalValue::Null => Ok(CanonicalValue::empty_mapping()),
            value => Ok(value),
        }
    }
}
