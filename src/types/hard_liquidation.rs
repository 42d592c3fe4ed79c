use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A discrete, dated liquidation event with an associated repaid-debt
/// amount. Independent of snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardLiquidationEvent {
    #[serde(deserialize_with = "deserialize_event_date")]
    pub date: DateTime<Utc>,
    pub network: String,
    pub market: String,
    #[serde(default)]
    pub debt_repaid: f64,
}

impl HardLiquidationEvent {
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// The exporter writes timestamps in a handful of shapes (RFC 3339,
/// naive datetime, bare date). Naive values are taken as UTC.
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }
    None
}

fn deserialize_event_date<'de, D>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| {
        de::Error::custom(format!("unrecognized datetime: {}", raw))
    })
}
