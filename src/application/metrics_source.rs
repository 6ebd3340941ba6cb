// Metrics source trait - Narrow interface to the external metrics provider
use crate::domain::series::RawSeries;
use async_trait::async_trait;

const QPS_KEY_PREFIX: &str = "sparkline.qps.nodes.";

/// The SQL statement counters summed into a QPS sparkline.
pub const QPS_METRICS: [&str; 4] = [
    "cr.node.sql.select.count",
    "cr.node.sql.insert.count",
    "cr.node.sql.update.count",
    "cr.node.sql.delete.count",
];

/// Identity a chart subscribes under; the provider uses it to dedupe requests.
pub fn subscription_key(nodes: &[String]) -> String {
    format!("{}{}", QPS_KEY_PREFIX, nodes.join("-"))
}

/// One metric to fetch, summed across `sources`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub name: String,
    pub sources: Vec<String>,
    pub non_negative_rate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRequest {
    pub id: String,
    pub queries: Vec<MetricQuery>,
}

impl MetricsRequest {
    /// Request a rate for each of `metrics` over `nodes`.
    pub fn for_nodes(nodes: &[String], metrics: &[String]) -> Self {
        let queries = metrics
            .iter()
            .map(|name| MetricQuery {
                name: name.clone(),
                sources: nodes.to_vec(),
                non_negative_rate: true,
            })
            .collect();

        Self {
            id: subscription_key(nodes),
            queries,
        }
    }
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the current window of every query in `request`, one series per
    /// query, in request order.
    async fn query(&self, request: &MetricsRequest) -> anyhow::Result<Vec<RawSeries>>;
}
