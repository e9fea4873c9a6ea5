use serde::{Deserialize, Serialize};

/// One recurring weekly availability window for a provider.
///
/// `from_time`/`to_time` are wall-clock labels in the platform's 12-hour
/// display format (e.g. "09:00 AM"). A `to_time` that reads at or before
/// `from_time` means the window crosses the meridiem boundary; resolution
/// happens in the availability engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkScheduleEntry {
    #[serde(default)]
    pub provider_id: String,
    pub week_day: String,
    pub from_time: String,
    pub to_time: String,
}
