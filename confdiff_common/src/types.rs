use crate::CanonicalValue;
use serde::Serialize;
use std::fmt;

/// Which of the two compared documents something refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// Reference document
    A,
    /// Candidate document under test
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// Join a dotted path with one more mapping key.
///
/// Dots inside keys are not escaped.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// A path whose value differs between A and B
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueDifference {
    pub path: String,
    pub value_a: CanonicalValue,
    pub value_b: CanonicalValue,
}

impl fmt::Display for ValueDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} != {}", self.path, self.value_a, self.value_b)
    }
}

/// Positional shape used by older call sites
pub type LegacyReport = (Vec<ValueDifference>, Vec<String>, Vec<String>);

/// Result of comparing two canonical trees
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffReport {
    /// Paths present on both sides with unequal values
    pub differing_values: Vec<ValueDifference>,
    /// Shallowest paths present in A but absent in B
    pub missing_from_b: Vec<String>,
    /// Shallowest paths present in B but absent in A
    pub extra_in_b: Vec<String>,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.differing_values.is_empty() && self.missing_from_b.is_empty() && self.extra_in_b.is_empty()
    }

    /// Total number of reported entries across all three categories
    pub fn len(&self) -> usize {
        self.differing_values.len() + self.missing_from_b.len() + self.extra_in_b.len()
    }

    /// Sort every category by path so output does not depend on input order
    pub fn sort(&mut self) {
        self.differing_values.sort_by(|a, b| a.path.cmp(&b.path));
        self.missing_from_b.sort();
        self.extra_in_b.sort();
    }

    pub fn as_legacy(&self) -> LegacyReport {
        (
            self.differing_values.clone(),
            self.missing_from_b.clone(),
            self.extra_in_b.clone(),
        )
    }

    pub fn into_legacy(self) -> LegacyReport {
        (self.differing_values, self.missing_from_b, self.extra_in_b)
    }
}

impl From<DiffReport> for LegacyReport {
    fn from(report: DiffReport) -> Self {
        report.into_legacy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "iface"), "iface");
        assert_eq!(join_path("iface.eth0", "mtu"), "iface.eth0.mtu");
    }

    #[test]
    fn test_report_sort_and_legacy_shape() {
        let mut report = DiffReport::new();
        report.missing_from_b.push("zeta".to_string());
        report.missing_from_b.push("alpha".to_string());
        report.differing_values.push(ValueDifference {
            path: "b".to_string(),
            value_a: CanonicalValue::from(1),
            value_b: CanonicalValue::from(2),
        });
        report.differing_values.push(ValueDifference {
            path: "a".to_string(),
            value_a: CanonicalValue::from("x"),
            value_b: CanonicalValue::Null,
        });
        report.sort();

        assert_eq!(report.len(), 4);
        let (differing, missing, extra) = report.into_legacy();
        assert_eq!(differing[0].path, "a");
        assert_eq!(missing, vec!["alpha".to_string(), "zeta".to_string()]);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_value_difference_display() {
        let diff = ValueDifference {
            path: "port".to_string(),
            value_a: CanonicalValue::from(8080),
            value_b: CanonicalValue::from("8080"),
        };
        assert_eq!(diff.to_string(), "port: 8080 != \"8080\"");
    }

    #[test]
    fn test_empty_report() {
        let report = DiffReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
    }
}
