use confdiff_common::DiffReport;

/// Pass/fail rule applied to a [`DiffReport`].
///
/// Differing values and keys missing from B always fail. Keys that only
/// exist in B fail unless `ignore_extra` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchPolicy {
    pub ignore_extra: bool,
}

impl MatchPolicy {
    pub fn new(ignore_extra: bool) -> Self {
        Self { ignore_extra }
    }

    pub fn is_match(&self, report: &DiffReport) -> bool {
        report.differing_values.is_empty()
            && report.missing_from_b.is_empty()
            && (self.ignore_extra || report.extra_in_b.is_empty())
    }
}

pub fn is_match(report: &DiffReport, ignore_extra: bool) -> bool {
    MatchPolicy::new(ignore_extra).is_match(report)
}
