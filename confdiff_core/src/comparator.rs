use confdiff_common::{join_path, CanonicalValue, DiffReport, Mapping, ValueDifference};
use tracing::debug;

/// Compare a reference tree `a` against a candidate tree `b`.
///
/// Mappings are walked key by key. A key missing on one side is reported once
/// at its own path, never per descendant. Anything that is not a pair of
/// mappings (sequences included) is compared as one value, and values of
/// different types are never equal. Every list in the report is sorted by path.
pub fn compare(a: &CanonicalValue, b: &CanonicalValue) -> DiffReport {
    let mut report = DiffReport::new();
    compare_at("", a, b, &mut report);
    report.sort();

    debug!(
        "Compared trees: {} differing, {} missing from B, {} extra in B",
        report.differing_values.len(),
        report.missing_from_b.len(),
        report.extra_in_b.len()
    );
    report
}

fn compare_at(path: &str, a: &CanonicalValue, b: &CanonicalValue, report: &mut DiffReport) {
    match (a, b) {
        (CanonicalValue::Mapping(left), CanonicalValue::Mapping(right)) => {
            compare_mappings(path, left, right, report)
        }
        _ => {
            if a != b {
                report.differing_values.push(ValueDifference {
                    path: path.to_string(),
                    value_a: a.clone(),
                    value_b: b.clone(),
                });
            }
        }
    }
}

fn compare_mappings(path: &str, a: &Mapping, b: &Mapping, report: &mut DiffReport) {
    for (key, value_a) in a {
        let child = join_path(path, key);
        match b.get(key) {
            Some(value_b) => compare_at(&child, value_a, value_b, report),
            None => report.missing_from_b.push(child),
        }
    }

    for key in b.keys() {
        if !a.contains_key(key) {
            report.extra_in_b.push(join_path(path, key));
        }
    }
}
