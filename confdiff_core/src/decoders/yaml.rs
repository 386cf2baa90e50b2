use super::{DecodeOptions, Decoder};
use confdiff_common::{CanonicalValue, ConfDiffError, Mapping, Number};
use serde_yml::Value as YamlValue;

/// Indentation-based (YAML) decoder, also used for netplan interface declarations
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn decode(&self, text: &str, _options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError> {
        let mut value: YamlValue =
            serde_yml::from_str(text).map_err(|e| ConfDiffError::parse("yaml", e.to_string()))?;
        // Expand `<<: *anchor` merge keys into the mappings that use them
        value
            .apply_merge()
            .map_err(|e| ConfDiffError::parse("yaml", e.to_string()))?;
        Ok(yaml_to_canonical(value))
    }
}

/// Convert a YAML value into a canonical tree
pub fn yaml_to_canonical(yaml: YamlValue) -> CanonicalValue {
    match yaml {
        YamlValue::Null => CanonicalValue::Null,
        YamlValue::Bool(b) => CanonicalValue::Bool(b),
        YamlValue::Number(n) => {
            let number = if let Some(i) = n.as_i64() {
                Number::Int(i)
            } else if let Some(u) = n.as_u64() {
                Number::from_u64(u)
            } else {
                Number::Float(n.as_f64().unwrap_or(f64::NAN))
            };
            CanonicalValue::Number(number)
        }
        YamlValue::String(s) => CanonicalValue::String(s),
        YamlValue::Sequence(seq) => {
            CanonicalValue::Sequence(seq.into_iter().map(yaml_to_canonical).collect())
        }
        YamlValue::Mapping(map) => {
            let mut out = Mapping::new();
            for (k, v) in map {
                out.insert(key_text(k), yaml_to_canonical(v));
            }
            CanonicalValue::Mapping(out)
        }
        YamlValue::Tagged(tagged) => yaml_to_canonical(tagged.value),
    }
}

/// Render a mapping key as text; netplan uses numeric keys for e.g. routing tables
fn key_text(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => String::from("null"),
        YamlValue::Tagged(tagged) => key_text(tagged.value),
        other => yaml_to_canonical(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<CanonicalValue, ConfDiffError> {
        YamlDecoder.decode(text, &DecodeOptions::default())
    }

    #[test]
    fn test_netplan_document() {
        let text = r#"
network:
  version: 2
  renderer: networkd
  ethernets:
    eth0:
      dhcp4: false
      mtu: 9000
      addresses:
        - 10.0.0.5/24
      nameservers:
        addresses: [1.1.1.1, 8.8.8.8]
"#;
        let tree = decode(text).unwrap();
        assert_eq!(tree.get_path("network.version"), Some(&CanonicalValue::from(2)));
        assert_eq!(
            tree.get_path("network.ethernets.eth0.dhcp4"),
            Some(&CanonicalValue::Bool(false))
        );
        assert_eq!(
            tree.get_path("network.ethernets.eth0.mtu"),
            Some(&CanonicalValue::from(9000))
        );
        assert_eq!(
            tree.get_path("network.ethernets.eth0.nameservers.addresses"),
            Some(&CanonicalValue::sequence(["1.1.1.1", "8.8.8.8"]))
        );
    }

    #[test]
    fn test_quoted_number_stays_string() {
        let tree = decode("port: \"8080\"\nmtu: 1500\n").unwrap();
        assert_eq!(tree.get_path("port"), Some(&CanonicalValue::from("8080")));
        assert_eq!(tree.get_path("mtu"), Some(&CanonicalValue::from(1500)));
    }

    #[test]
    fn test_non_string_keys() {
        let tree = decode("100: main\ntrue: yes-key\n").unwrap();
        assert_eq!(tree.get_path("100"), Some(&CanonicalValue::from("main")));
        assert_eq!(tree.get_path("true"), Some(&CanonicalValue::from("yes-key")));
    }

    #[test]
    fn test_merge_keys_are_expanded() {
        let text = r#"
defaults: &defaults
  mtu: 9000
  dhcp4: false
ethernets:
  eth0:
    <<: *defaults
    dhcp4: true
"#;
        let tree = decode(text).unwrap();
        let expected = CanonicalValue::mapping([
            ("dhcp4", CanonicalValue::Bool(true)),
            ("mtu", CanonicalValue::from(9000)),
        ]);
        assert_eq!(tree.get_path("ethernets.eth0"), Some(&expected));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = decode("key: [unclosed").unwrap_err();
        assert!(matches!(err, ConfDiffError::Parse { ref format, .. } if format == "yaml"));
    }
}
