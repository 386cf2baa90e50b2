use crate::decoders::{Decoder, JsonDecoder, KeyValueDecoder, LibconfigDecoder};
use confdiff_common::{AppConfig, ConfDiffError};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const DEFAULT_FORMAT: &str = "json";

/// Maps format names (and aliases, and file extensions) to decoders.
///
/// All names are matched case-insensitively. New formats are added with
/// [`register`](Self::register) without touching the lookup code.
pub struct DecoderRegistry {
    decoders: HashMap<String, Box<dyn Decoder>>,
    aliases: HashMap<String, String>,
    extensions: HashMap<String, String>,
    default_format: String,
}

impl DecoderRegistry {
    /// Registry with no decoders
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
            aliases: HashMap::new(),
            extensions: HashMap::new(),
            default_format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// Registry with every decoder shipped in this crate
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry
            .register("json", JsonDecoder)
            .map_extension("json", "json");

        #[cfg(feature = "yaml")]
        registry
            .register("yaml", crate::decoders::YamlDecoder)
            .alias("yml", "yaml")
            .alias("netplan", "yaml")
            .map_extension("yaml", "yaml")
            .map_extension("yml", "yaml");

        #[cfg(feature = "toml-format")]
        registry
            .register("toml", crate::decoders::TomlDecoder)
            .map_extension("toml", "toml");

        registry
            .register("libconfig", LibconfigDecoder)
            .alias("cfg", "libconfig")
            .map_extension("cfg", "libconfig")
            .map_extension("libconfig", "libconfig");

        registry
            .register("keyvalue", KeyValueDecoder)
            .alias("kv", "keyvalue")
            .alias("flat", "keyvalue")
            .alias("properties", "keyvalue")
            .alias("env", "keyvalue")
            .map_extension("kv", "keyvalue")
            .map_extension("properties", "keyvalue")
            .map_extension("env", "keyvalue");

        registry
    }

    pub fn register(&mut self, name: &str, decoder: impl Decoder + 'static) -> &mut Self {
        self.decoders.insert(name.to_ascii_lowercase(), Box::new(decoder));
        self
    }

    pub fn alias(&mut self, alias: &str, target: &str) -> &mut Self {
        self.aliases
            .insert(alias.to_ascii_lowercase(), target.to_ascii_lowercase());
        self
    }

    pub fn map_extension(&mut self, extension: &str, name: &str) -> &mut Self {
        self.extensions.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            name.to_ascii_lowercase(),
        );
        self
    }

    pub fn with_default_format(mut self, name: &str) -> Self {
        self.default_format = name.to_ascii_lowercase();
        self
    }

    /// Apply the user's default format and extra extension mappings
    pub fn apply_config(&mut self, config: &AppConfig) -> &mut Self {
        self.default_format = config.default_format.to_ascii_lowercase();
        for (extension, name) in &config.extensions {
            self.map_extension(extension, name);
        }
        self
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    /// Registered name a format name or alias refers to, if any
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_ascii_lowercase();
        if let Some((key, _)) = self.decoders.get_key_value(&name) {
            return Some(key.as_str());
        }
        let target = self.aliases.get(&name)?;
        self.decoders
            .get_key_value(target)
            .map(|(key, _)| key.as_str())
    }

    /// Look up the decoder for a format name or alias
    pub fn resolve(&self, name: &str) -> Result<(&str, &dyn Decoder), ConfDiffError> {
        let canonical = self
            .canonical_name(name)
            .ok_or_else(|| ConfDiffError::UnsupportedFormat(name.to_string()))?;
        let decoder = self
            .decoders
            .get(canonical)
            .ok_or_else(|| ConfDiffError::UnsupportedFormat(name.to_string()))?;
        debug!("Resolved format '{}' to decoder '{}'", name, canonical);
        Ok((canonical, decoder.as_ref()))
    }

    /// Format name implied by a path's extension
    pub fn format_for_path(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        self.extensions.get(&ext).map(String::as_str)
    }

    /// Sorted list of registered format names
    pub fn formats(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Sorted aliases pointing at a registered format
    pub fn aliases_for(&self, name: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Sorted file extensions mapped to a format
    pub fn extensions_for(&self, name: &str) -> Vec<&str> {
        let mut extensions: Vec<&str> = self
            .extensions
            .iter()
            .filter(|(_, target)| target.as_str() == name)
            .map(|(ext, _)| ext.as_str())
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Shared, immutable registry of the built-in decoders
pub fn builtin_registry() -> &'static DecoderRegistry {
    static REGISTRY: OnceLock<DecoderRegistry> = OnceLock::new();
    REGISTRY.get_or_init(DecoderRegistry::builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::DecodeOptions;
    use confdiff_common::CanonicalValue;

    struct ConstDecoder;

    impl Decoder for ConstDecoder {
        fn decode(&self, _text: &str, _options: &DecodeOptions) -> Result<CanonicalValue, ConfDiffError> {
            Ok(CanonicalValue::mapping([("const", true)]))
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = DecoderRegistry::builtin();
        let (name, _) = registry.resolve("JSON").unwrap();
        assert_eq!(name, "json");
        let (name, _) = registry.resolve("Cfg").unwrap();
        assert_eq!(name, "libconfig");
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let registry = DecoderRegistry::builtin();
        let err = registry.resolve("xml").err().unwrap();
        assert!(matches!(err, ConfDiffError::UnsupportedFormat(ref name) if name == "xml"));
    }

    #[test]
    fn test_alias_to_missing_decoder_is_unsupported() {
        let mut registry = DecoderRegistry::new();
        registry.alias("ghost", "nothing");
        assert!(registry.resolve("ghost").is_err());
    }

    #[test]
    fn test_register_custom_decoder() {
        let mut registry = DecoderRegistry::new();
        registry.register("Const", ConstDecoder).alias("c", "const");

        let (name, decoder) = registry.resolve("c").unwrap();
        assert_eq!(name, "const");
        let tree = decoder.decode("ignored", &DecodeOptions::default()).unwrap();
        assert_eq!(tree.get_path("const"), Some(&CanonicalValue::Bool(true)));
    }

    #[test]
    fn test_extension_lookup() {
        let registry = DecoderRegistry::builtin();
        assert_eq!(registry.format_for_path(Path::new("a/b.JSON")), Some("json"));
        assert_eq!(registry.format_for_path(Path::new("dev.cfg")), Some("libconfig"));
        assert_eq!(registry.format_for_path(Path::new("app.properties")), Some("keyvalue"));
        assert_eq!(registry.format_for_path(Path::new("noext")), None);
        assert_eq!(registry.format_for_path(Path::new("data.xml")), None);
    }

    #[test]
    fn test_apply_config() {
        let mut config = AppConfig::default();
        config.default_format = "KeyValue".to_string();
        config.extensions.insert(".ini".to_string(), "keyvalue".to_string());

        let mut registry = DecoderRegistry::builtin();
        registry.apply_config(&config);
        assert_eq!(registry.default_format(), "keyvalue");
        assert_eq!(registry.format_for_path(Path::new("x.ini")), Some("keyvalue"));
    }

    #[test]
    fn test_listing() {
        let registry = DecoderRegistry::builtin();
        let formats = registry.formats();
        assert!(formats.contains(&"json"));
        assert!(formats.contains(&"keyvalue"));
        assert!(formats.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(registry.aliases_for("keyvalue"), vec!["env", "flat", "kv", "properties"]);
        assert_eq!(registry.extensions_for("libconfig"), vec!["cfg", "libconfig"]);
    }

    #[test]
    fn test_builtin_registry_is_shared() {
        let first = builtin_registry() as *const DecoderRegistry;
        let second = builtin_registry() as *const DecoderRegistry;
        assert_eq!(first, second);
    }
}
