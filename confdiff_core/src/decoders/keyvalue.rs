use super::{DecodeOptions, Decoder};
use confdiff_common::{CanonicalValue, ConfDiffError, Mapping};

/// Flat line-oriented `key<sep>value` decoder.
///
/// Every value is kept as a string; there is no nesting. Blank lines and
/// lines starting with the comment prefix are skipped.
pub struct KeyValueDecoder;

impl Decoder for KeyValueDecoder {
    fn decode(&self, text: &str, options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError> {
        let mut map = Mapping::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(options.comment_prefix.as_str()) {
                continue;
            }

            let (key, value) = line.split_once(options.separator).ok_or_else(|| {
                ConfDiffError::parse(
                    "keyvalue",
                    format!("line {}: missing '{}' separator", index + 1, options.separator),
                )
            })?;

            let key = key.trim();
            if key.is_empty() {
                return Err(ConfDiffError::parse(
                    "keyvalue",
                    format!("line {}: empty key", index + 1),
                ));
            }

            map.insert(key.to_string(), CanonicalValue::String(value.trim().to_string()));
        }

        Ok(CanonicalValue::Mapping(map))
    }
}
