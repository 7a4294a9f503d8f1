use crate::domain::activity::{ActivityEntry, AnalysisRequest};
use crate::domain::fingerprint::Fingerprint;

/// Deterministic cache key for an analysis request.
///
/// Keys are identical to the ones the browser client derived with
/// `JSON.stringify` plus a 31-multiplier rolling hash over UTF-16 code units,
/// so previously memoized results stay addressable.
pub fn compute_fingerprint(activities: &[ActivityEntry], lost_item: Option<&str>) -> Fingerprint {
    let canonical = canonical_json(&AnalysisRequest::new(activities, lost_item));
    Fingerprint::from_value(rolling_hash(&canonical))
}

pub(crate) fn canonical_json(request: &AnalysisRequest<'_>) -> String {
    // Only strings inside; serde_json cannot fail on these.
    serde_json::to_string(request).unwrap_or_default()
}

pub(crate) fn rolling_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |acc, unit| acc.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
