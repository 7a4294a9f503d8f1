use serde::{Deserialize, Serialize};

/// One place the user visited and what they did there.
///
/// Field order is part of the fingerprint contract: entries serialize as
/// `location`, `activity`, `startTime`, `endTime`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub location: String,
    pub activity: String,
    pub start_time: String,
    pub end_time: String,
}

impl ActivityEntry {
    pub fn new(
        location: impl Into<String>,
        activity: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            activity: activity.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Text before the first comma, e.g. `"Mall ABC"` for `"Mall ABC, Jakarta"`.
    pub fn short_location(&self) -> &str {
        self.location
            .split(',')
            .next()
            .unwrap_or(self.location.as_str())
    }
}

/// Borrowed view of a request, serialized as `{"activities":[..],"lostItem":..}`.
///
/// An absent lost item is omitted entirely rather than written as `null`.
#[derive(Debug, Serialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest<'a> {
    pub activities: &'a [ActivityEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lost_item: Option<&'a str>,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(activities: &'a [ActivityEntry], lost_item: Option<&'a str>) -> Self {
        Self {
            activities,
            lost_item,
        }
    }
}
