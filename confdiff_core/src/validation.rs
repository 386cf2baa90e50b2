use crate::comparator::compare;
use crate::decoders::DecodeOptions;
use crate::loader::{FormatLoader, Source};
use crate::policy::MatchPolicy;
use crate::registry::{builtin_registry, DecoderRegistry};
use confdiff_common::{AppConfig, ConfDiffError, DiffReport, LegacyReport, Side};
use std::fmt;
use tracing::{debug, error, info, trace, warn, Level};

pub const MATCH_MESSAGE: &str = "All keys and values match";

/// Destination for the human-readable outcome lines
pub trait LogSink: Send + Sync {
    fn accept(&self, level: Level, message: &str);
}

/// Forwards outcome lines to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn accept(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => error!("{}", message),
            Level::WARN => warn!("{}", message),
            Level::INFO => info!("{}", message),
            Level::DEBUG => debug!("{}", message),
            _ => trace!("{}", message),
        }
    }
}

/// One side could not be loaded, so nothing was compared
#[derive(Debug)]
pub struct LoadFailure {
    pub side: Side,
    pub error: ConfDiffError,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {}: {}", self.side, self.error)
    }
}

impl std::error::Error for LoadFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[derive(Debug)]
pub enum ValidationOutcome {
    Match,
    Mismatch(DiffReport),
    LoadFailure(LoadFailure),
}

impl ValidationOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ValidationOutcome::Match)
    }

    pub fn report(&self) -> Option<&DiffReport> {
        match self {
            ValidationOutcome::Mismatch(report) => Some(report),
            _ => None,
        }
    }

    /// `(differing_values, missing_from_b, extra_in_b)` for a mismatch
    pub fn into_legacy(self) -> Option<LegacyReport> {
        match self {
            ValidationOutcome::Mismatch(report) => Some(report.into_legacy()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    pub format_a: Option<String>,
    pub format_b: Option<String>,
    pub separator: char,
    pub comment_prefix: String,
    pub ignore_extra: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        let decode = DecodeOptions::default();
        Self {
            format_a: None,
            format_b: None,
            separator: decode.separator,
            comment_prefix: decode.comment_prefix,
            ignore_extra: false,
        }
    }
}

impl ValidationOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            separator: config.separator,
            comment_prefix: config.comment_prefix.clone(),
            ignore_extra: config.ignore_extra,
            ..Self::default()
        }
    }

    pub fn with_format_a(mut self, format: impl Into<String>) -> Self {
        self.format_a = Some(format.into());
        self
    }

    pub fn with_format_b(mut self, format: impl Into<String>) -> Self {
        self.format_b = Some(format.into());
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_ignore_extra(mut self, ignore_extra: bool) -> Self {
        self.ignore_extra = ignore_extra;
        self
    }

    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            separator: self.separator,
            comment_prefix: self.comment_prefix.clone(),
        }
    }
}

/// Loads two documents, compares them and applies the match policy
pub struct Validator<'a> {
    registry: &'a DecoderRegistry,
    sink: &'a dyn LogSink,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a DecoderRegistry, sink: &'a dyn LogSink) -> Self {
        Self { registry, sink }
    }

    pub fn validate(&self, a: &Source, b: &Source, options: &ValidationOptions) -> ValidationOutcome {
        let loader = FormatLoader::new(self.registry).with_options(options.decode_options());

        let (tree_a, tree_b) = rayon::join(
            || loader.load(a, options.format_a.as_deref()),
            || loader.load(b, options.format_b.as_deref()),
        );

        let tree_a = match tree_a {
            Ok(tree) => tree,
            Err(error) => return self.load_failure(Side::A, a, error),
        };
        let tree_b = match tree_b {
            Ok(tree) => tree,
            Err(error) => return self.load_failure(Side::B, b, error),
        };

        let report = compare(&tree_a, &tree_b);
        if MatchPolicy::new(options.ignore_extra).is_match(&report) {
            if !report.extra_in_b.is_empty() {
                debug!("Ignoring {} extra keys in B", report.extra_in_b.len());
            }
            self.sink.accept(Level::INFO, MATCH_MESSAGE);
            return ValidationOutcome::Match;
        }

        for line in render_report(&report) {
            self.sink.accept(Level::INFO, &line);
        }
        ValidationOutcome::Mismatch(report)
    }

    fn load_failure(&self, side: Side, source: &Source, error: ConfDiffError) -> ValidationOutcome {
        warn!("Failed to load {} from {}: {}", side, source, error);
        ValidationOutcome::LoadFailure(LoadFailure { side, error })
    }
}

/// One line per non-empty report category
pub fn render_report(report: &DiffReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.differing_values.is_empty() {
        let entries: Vec<String> = report
            .differing_values
            .iter()
            .map(|diff| diff.to_string())
            .collect();
        lines.push(format!("Differing values: {}", entries.join("; ")));
    }
    if !report.missing_from_b.is_empty() {
        lines.push(format!("Missing from B: {}", report.missing_from_b.join(", ")));
    }
    if !report.extra_in_b.is_empty() {
        lines.push(format!("Extra in B: {}", report.extra_in_b.join(", ")));
    }

    lines
}

/// Validate with the built-in decoders
pub fn validate(
    source_a: &Source,
    source_b: &Source,
    format_a: Option<&str>,
    format_b: Option<&str>,
    separator: char,
    ignore_extra: bool,
    sink: &dyn LogSink,
) -> ValidationOutcome {
    let options = ValidationOptions {
        format_a: format_a.map(str::to_string),
        format_b: format_b.map(str::to_string),
        separator,
        ignore_extra,
        ..ValidationOptions::default()
    };
    Validator::new(builtin_registry(), sink).validate(source_a, source_b, &options)
}
