use super::{DecodeOptions, Decoder};
use confdiff_common::{CanonicalValue, ConfDiffError, Number};
use serde_json::Value as JsonValue;

/// Structured markup (JSON) decoder
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode(&self, text: &str, _options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError> {
        let value: JsonValue =
            serde_json::from_str(text).map_err(|e| ConfDiffError::parse("json", e.to_string()))?;
        Ok(json_to_canonical(value))
    }
}

/// Convert a JSON value into a canonical tree
pub fn json_to_canonical(value: JsonValue) -> CanonicalValue {
    match value {
        JsonValue::Null => CanonicalValue::Null,
        JsonValue::Bool(b) => CanonicalValue::Bool(b),
        JsonValue::Number(n) => {
            let number = if let Some(i) = n.as_i64() {
                Number::Int(i)
            } else if let Some(u) = n.as_u64() {
                Number::from_u64(u)
            } else {
                Number::Float(n.as_f64().unwrap_or(f64::NAN))
            };
            CanonicalValue::Number(number)
        }
        JsonValue::String(s) => CanonicalValue::String(s),
        JsonValue::Array(arr) => {
            CanonicalValue::Sequence(arr.into_iter().map(json_to_canonical).collect())
        }
        JsonValue::Object(map) => CanonicalValue::Mapping(
            map.into_iter()
                .map(|(key, val)| (key, json_to_canonical(val)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<CanonicalValue, ConfDiffError> {
        JsonDecoder.decode(text, &DecodeOptions::default())
    }

    #[test]
    fn test_scalars_keep_their_types() {
        let tree = decode(r#"{"mtu": 9000, "ratio": 0.5, "up": true, "gw": null, "name": "eth0"}"#)
            .unwrap();
        assert_eq!(tree.get_path("mtu"), Some(&CanonicalValue::from(9000)));
        assert_eq!(tree.get_path("ratio"), Some(&CanonicalValue::from(0.5)));
        assert_eq!(tree.get_path("up"), Some(&CanonicalValue::Bool(true)));
        assert_eq!(tree.get_path("gw"), Some(&CanonicalValue::Null));
        assert_eq!(tree.get_path("name"), Some(&CanonicalValue::from("eth0")));
    }

    #[test]
    fn test_large_unsigned_and_float_integral() {
        let tree = decode(r#"{"big": 18446744073709551615, "f": 1.0}"#).unwrap();
        assert_eq!(
            tree.get_path("big"),
            Some(&CanonicalValue::Number(Number::UInt(u64::MAX)))
        );
        assert_eq!(tree.get_path("f"), Some(&CanonicalValue::from(1.0)));
        assert_ne!(tree.get_path("f"), Some(&CanonicalValue::from(1)));
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let tree = decode(r#"{"iface": {"eth0": {"mtu": 1500}}, "dns": ["1.1.1.1", "8.8.8.8"]}"#)
            .unwrap();
        assert_eq!(tree.get_path("iface.eth0.mtu"), Some(&CanonicalValue::from(1500)));
        assert_eq!(
            tree.get_path("dns"),
            Some(&CanonicalValue::sequence(["1.1.1.1", "8.8.8.8"]))
        );
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = decode(r#"{"mtu": }"#).unwrap_err();
        match err {
            ConfDiffError::Parse { format, message } => {
                assert_eq!(format, "json");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
