use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key-to-value table of a canonical tree node.
///
/// Keys are unique; inserting an existing key replaces the previous value.
pub type Mapping = BTreeMap<String, CanonicalValue>;

/// Numeric scalar, keeping integers and floats apart
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// Any integer that fits in an i64
    Int(i64),
    /// Integers above i64::MAX
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Int(i),
            Err(_) => Number::UInt(value),
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self, Number::Float(_))
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::UInt(u) => u as f64,
            Number::Float(f) => f,
        }
    }
}

// An integer never equals a float, even when the float is integral.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::UInt(a), Number::UInt(b)) => a == b,
            (Number::Int(a), Number::UInt(b)) | (Number::UInt(b), Number::Int(a)) => {
                u64::try_from(a).map_or(false, |a| a == b)
            }
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            // Debug keeps the trailing ".0" on integral floats
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Format-independent tree produced by every decoder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Order-significant list, compared as a single value
    Sequence(Vec<CanonicalValue>),
    Mapping(Mapping),
}

impl CanonicalValue {
    pub fn empty_mapping() -> Self {
        CanonicalValue::Mapping(Mapping::new())
    }

    /// Build a mapping from key/value pairs; later duplicates replace earlier ones.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<CanonicalValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        CanonicalValue::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn sequence<V, I>(items: I) -> Self
    where
        V: Into<CanonicalValue>,
        I: IntoIterator<Item = V>,
    {
        CanonicalValue::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, CanonicalValue::Mapping(_))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            CanonicalValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a dotted path such as `iface.eth0.mtu`
    pub fn get_path(&self, path: &str) -> Option<&CanonicalValue> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, key| node.as_mapping()?.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CanonicalValue::Null => "null",
            CanonicalValue::Bool(_) => "bool",
            CanonicalValue::Number(n) if n.is_integer() => "integer",
            CanonicalValue::Number(_) => "float",
            CanonicalValue::String(_) => "string",
            CanonicalValue::Sequence(_) => "sequence",
            CanonicalValue::Mapping(_) => "mapping",
        }
    }
}

impl fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalValue::Null => write!(f, "null"),
            CanonicalValue::Bool(b) => write!(f, "{}", b),
            CanonicalValue::Number(n) => write!(f, "{}", n),
            CanonicalValue::String(s) => write_quoted(f, s),
            CanonicalValue::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            CanonicalValue::Mapping(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {}", value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            _ => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

impl From<bool> for CanonicalValue {
    fn from(value: bool) -> Self {
        CanonicalValue::Bool(value)
    }
}

impl From<i64> for CanonicalValue {
    fn from(value: i64) -> Self {
        CanonicalValue::Number(Number::Int(value))
    }
}

impl From<i32> for CanonicalValue {
    fn from(value: i32) -> Self {
        CanonicalValue::Number(Number::Int(i64::from(value)))
    }
}

impl From<u64> for CanonicalValue {
    fn from(value: u64) -> Self {
        CanonicalValue::Number(Number::from_u64(value))
    }
}

impl From<f64> for CanonicalValue {
    fn from(value: f64) -> Self {
        CanonicalValue::Number(Number::Float(value))
    }
}

impl From<&str> for CanonicalValue {
    fn from(value: &str) -> Self {
        CanonicalValue::String(value.to_string())
    }
}

impl From<String> for CanonicalValue {
    fn from(value: String) -> Self {
        CanonicalValue::String(value)
    }
}

impl From<Vec<CanonicalValue>> for CanonicalValue {
    fn from(value: Vec<CanonicalValue>) -> Self {
        CanonicalValue::Sequence(value)
    }
}

impl From<Mapping> for CanonicalValue {
    fn from(value: Mapping) -> Self {
        CanonicalValue::Mapping(value)
    }
}
