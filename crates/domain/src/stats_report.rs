use serde::{Deserialize, Serialize};

/// Granularity of the report series. Serialized values are part of the
/// dashboard contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnits {
    #[default]
    Hours,
    Days,
}

/// Dashboard statistics for a look-back window.
///
/// The series run oldest to newest, one entry per output time unit. Field
/// names are stable: the reporting layer serializes this struct as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub time_units: TimeUnits,

    pub dns_queries: Vec<u64>,
    pub blocked_filtering: Vec<u64>,
    pub replaced_safebrowsing: Vec<u64>,
    pub replaced_parental: Vec<u64>,

    pub num_dns_queries: u64,
    pub num_blocked_filtering: u64,
    pub num_replaced_safebrowsing: u64,
    pub num_replaced_safesearch: u64,
    pub num_replaced_parental: u64,

    /// Mean upstream processing time over the window, in seconds.
    pub avg_processing_time: f64,
}
