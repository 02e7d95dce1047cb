use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A single maintenance announcement, as extracted by the completion model.
/// This is the canonical data model shared by the scraper and the published artifact.
///
/// Field order is the serialized order. Timestamps that the model could not
/// determine carry the epoch sentinel instead of being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceRecord {
    /// When the maintenance window starts
    #[serde(rename = "maintenance_time_start", with = "rfc3339")]
    pub maintenance_window_start: DateTime<FixedOffset>,

    /// When the maintenance window ends
    #[serde(rename = "maintenance_time_end", with = "rfc3339")]
    pub maintenance_window_end: DateTime<FixedOffset>,

    /// When players can no longer play
    #[serde(rename = "server_down_start", with = "rfc3339")]
    pub service_down_start: DateTime<FixedOffset>,

    /// When players can play again
    #[serde(rename = "server_down_end", with = "rfc3339")]
    pub service_down_end: DateTime<FixedOffset>,

    /// Short summary of the downtime
    pub description: String,
}

impl MaintenanceRecord {
    /// The "value not determined" timestamp, `1970-01-01T00:00:00Z`
    pub fn sentinel() -> DateTime<FixedOffset> {
        DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
    }

    pub fn is_sentinel(ts: &DateTime<FixedOffset>) -> bool {
        ts.timestamp() == 0 && ts.timestamp_subsec_nanos() == 0
    }

    /// True when both ends of the maintenance window are known
    pub fn has_known_window(&self) -> bool {
        !Self::is_sentinel(&self.maintenance_window_start)
            && !Self::is_sentinel(&self.maintenance_window_end)
    }

    /// True when both ends of the service-down period are known
    pub fn has_known_downtime(&self) -> bool {
        !Self::is_sentinel(&self.service_down_start) && !Self::is_sentinel(&self.service_down_end)
    }
}

/// Strict RFC 3339 codec that keeps the original offset.
/// A zero offset is written as `Z` so the sentinel serializes as `1970-01-01T00:00:00Z`.
pub mod rfc3339 {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map_err(|e| de::Error::custom(format!("invalid RFC 3339 timestamp {:?}: {}", raw, e)))
    }
}
