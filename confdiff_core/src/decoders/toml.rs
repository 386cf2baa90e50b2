use super::{DecodeOptions, Decoder};
use confdiff_common::{CanonicalValue, ConfDiffError, Number};
use toml::Value as TomlValue;

/// TOML decoder; datetimes are kept as their textual form
pub struct TomlDecoder;

impl Decoder for TomlDecoder {
    fn decode(&self, text: &str, _options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| ConfDiffError::parse("toml", e.to_string()))?;
        Ok(toml_to_canonical(TomlValue::Table(table)))
    }
}

pub fn toml_to_canonical(value: TomlValue) -> CanonicalValue {
    match value {
        TomlValue::String(s) => CanonicalValue::String(s),
        TomlValue::Integer(i) => CanonicalValue::Number(Number::Int(i)),
        TomlValue::Float(f) => CanonicalValue::Number(Number::Float(f)),
        TomlValue::Boolean(b) => CanonicalValue::Bool(b),
        TomlValue::Datetime(dt) => CanonicalValue::String(dt.to_string()),
        TomlValue::Array(arr) => {
            CanonicalValue::Sequence(arr.into_iter().map(toml_to_canonical).collect())
        }
        TomlValue::Table(table) => CanonicalValue::Mapping(
            table
                .into_iter()
                .map(|(key, val)| (key, toml_to_canonical(val)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<CanonicalValue, ConfDiffError> {
        TomlDecoder.decode(text, &DecodeOptions::default())
    }

    #[test]
    fn test_tables_and_scalars() {
        let text = r#"
ntp = "pool.ntp.org"
dns = ["1.1.1.1", "8.8.8.8"]

[iface.eth0]
mtu = 9000
state = "up"
"#;
        let tree = decode(text).unwrap();
        assert_eq!(tree.get_path("iface.eth0.mtu"), Some(&CanonicalValue::from(9000)));
        assert_eq!(tree.get_path("ntp"), Some(&CanonicalValue::from("pool.ntp.org")));
        assert_eq!(
            tree.get_path("dns"),
            Some(&CanonicalValue::sequence(["1.1.1.1", "8.8.8.8"]))
        );
    }

    #[test]
    fn test_datetime_becomes_string() {
        let tree = decode("built = 1979-05-27T07:32:00Z\n").unwrap();
        assert_eq!(
            tree.get_path("built"),
            Some(&CanonicalValue::from("1979-05-27T07:32:00Z"))
        );
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        assert_eq!(decode("").unwrap(), CanonicalValue::empty_mapping());
    }

    #[test]
    fn test_invalid_toml() {
        let err = decode("mtu = = 1").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}
