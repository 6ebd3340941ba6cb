// Series aggregator - Merge several metric series into one by timestamp
use crate::domain::series::{nanos_to_millis, CombinedSeries, Datapoint, RawSeries};
use std::collections::HashMap;

/// Sum the datapoints of `series` that share a millisecond timestamp.
///
/// Entries appear in the order their timestamp was first seen while walking
/// the series in input order. The result is not sorted.
pub fn aggregate(series: &[RawSeries]) -> CombinedSeries {
    let mut combined: CombinedSeries = Vec::new();
    let mut index_by_timestamp: HashMap<i64, usize> = HashMap::new();

    for s in series {
        for raw in &s.datapoints {
            let timestamp = nanos_to_millis(raw.timestamp_nanos);

            match index_by_timestamp.get(&timestamp) {
                Some(&idx) => combined[idx].value += raw.value,
                None => {
                    index_by_timestamp.insert(timestamp, combined.len());
                    combined.push(Datapoint::new(timestamp, raw.value));
                }
            }
        }
    }

    combined
}
