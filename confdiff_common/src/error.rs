use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse error ({format}): {message}")]
    Parse { format: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConfDiffError {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        ConfDiffError::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Short machine-friendly name of the error category
    pub fn kind(&self) -> &'static str {
        match self {
            ConfDiffError::Io(_) => "io",
            ConfDiffError::UnsupportedFormat(_) => "unsupported_format",
            ConfDiffError::Parse { .. } => "parse",
            ConfDiffError::Config(_) => "config",
            ConfDiffError::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfDiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ConfDiffError::parse("json", "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "Parse error (json): expected value at line 1 column 1"
        );
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ConfDiffError = io.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().starts_with("IO error:"));
    }
}
