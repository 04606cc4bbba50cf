use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Raw per-server statistics entry as served by the billing API.
///
/// `playtime_cost` arrives as a JSON string in current API responses and
/// as a bare number in older ones; both are accepted. It is absent
/// entirely on deployments that bill at a fixed per-minute rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUsageEntry {
    #[serde(default)]
    pub vm_name: String,
    pub session_seconds: i64,
    #[serde(default, deserialize_with = "de_cost_rate")]
    pub playtime_cost: Option<f64>,
}

fn de_cost_rate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        None,
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(v) => Ok(Some(v)),
        Raw::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
        Raw::None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedUsage {
    pub vm_name: String,
    pub minutes: i64,
    pub cost_per_minute: f64,
    pub earnings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotals {
    pub total_minutes: i64,
    pub total_earnings: f64,
}

/// Rouble/kopeck split of a total, with the spelled-out rouble part.
/// `kopecks` is always in 0..=99; the 100-kopeck rounding case carries
/// into `rubles` before this value is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonetaryDisplay {
    pub rubles: i64,
    pub kopecks: u8,
    pub words: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerRow {
    pub index: usize,
    pub vm_name: String,
    pub minutes: i64,
    pub earnings: String,
}

/// The fully assembled rendering payload. Every field is a display
/// string; nothing downstream recomputes or reorders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub date: String,
    pub start_date: String,
    pub end_date: String,
    pub rows: Vec<ServerRow>,
    pub total_earnings: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RateSource {
    /// Use the per-entry `playtime_cost` supplied by the API.
    #[default]
    Api,
    /// Ignore the API rate and bill every minute at `fixed_rate`.
    Fixed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodPolicy {
    /// Report the month that just ended.
    #[default]
    PreviousMonth,
    /// Report the month containing "today".
    CurrentMonth,
}

impl PeriodPolicy {
    pub fn as_label(self) -> &'static str {
        match self {
            PeriodPolicy::PreviousMonth => "previous-month",
            PeriodPolicy::CurrentMonth => "current-month",
        }
    }
}
