// Metric series domain models
use serde::{Deserialize, Serialize};

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Convert a provider timestamp (nanoseconds) to the millisecond unit the
/// pipeline works in.
pub fn nanos_to_millis(timestamp_nanos: i64) -> i64 {
    timestamp_nanos / NANOS_PER_MILLI
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDatapoint {
    pub timestamp_nanos: i64,
    pub value: f64,
}

impl RawDatapoint {
    pub fn new(timestamp_nanos: i64, value: f64) -> Self {
        Self {
            timestamp_nanos,
            value,
        }
    }
}

/// One named metric's samples as delivered by the metrics source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    pub name: String,
    pub sources: Vec<String>,
    pub datapoints: Vec<RawDatapoint>,
}

impl RawSeries {
    pub fn new(name: String, sources: Vec<String>, datapoints: Vec<RawDatapoint>) -> Self {
        Self {
            name,
            sources,
            datapoints,
        }
    }
}

/// Returns true when no series carries a single datapoint.
pub fn is_empty_result(series: &[RawSeries]) -> bool {
    series.iter().all(|s| s.datapoints.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datapoint {
    pub timestamp: i64,
    pub value: f64,
}

impl Datapoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Datapoints of several series merged by timestamp, in first-seen order.
pub type CombinedSeries = Vec<Datapoint>;

/// Minimum and maximum of `f` over `points`, ignoring values that do not
/// compare with themselves (NaN). `None` when nothing comparable remains.
pub fn extent<T, F>(points: &[Datapoint], f: F) -> Option<(T, T)>
where
    T: PartialOrd + Copy,
    F: Fn(&Datapoint) -> T,
{
    let mut iter = points
        .iter()
        .map(f)
        .filter(|v| v.partial_cmp(v).is_some());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| {
        let lo = if v < lo { v } else { lo };
        let hi = if v > hi { v } else { hi };
        (lo, hi)
    }))
}
