pub mod comparator;
pub mod decoders;
pub mod loader;
pub mod policy;
pub mod registry;
pub mod validation;

pub use comparator::compare;
pub use decoders::{DecodeOptions, Decoder};
pub use loader::{FormatLoader, Source};
pub use policy::{is_match, MatchPolicy};
pub use registry::{builtin_registry, DecoderRegistry};
pub use validation::{
    render_report, validate, LoadFailure, LogSink, TracingSink, ValidationOptions,
    ValidationOutcome, Validator,
};
