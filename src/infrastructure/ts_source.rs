// Time-series HTTP source - Adapter onto the provider's /ts/query endpoint
use crate::application::metrics_source::{MetricsRequest, MetricsSource};
use crate::domain::series::{RawDatapoint, RawSeries};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const NON_NEGATIVE_DERIVATIVE: &str = "NON_NEGATIVE_DERIVATIVE";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("time-series query failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid timestamp_nanos {0:?}")]
    BadTimestamp(String),
    #[error("query window does not fit in nanoseconds")]
    WindowOverflow,
}

#[derive(Debug, Serialize, PartialEq)]
struct TsQueryRequest {
    start_nanos: i64,
    end_nanos: i64,
    sample_nanos: i64,
    queries: Vec<TsQuery>,
}

#[derive(Debug, Serialize, PartialEq)]
struct TsQuery {
    name: String,
    sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    derivative: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct TsQueryResponse {
    #[serde(default)]
    results: Vec<TsResult>,
}

#[derive(Debug, Deserialize)]
struct TsResult {
    #[serde(default)]
    datapoints: Vec<TsDatapoint>,
}

#[derive(Debug, Deserialize)]
struct TsDatapoint {
    timestamp_nanos: Nanos,
    #[serde(default)]
    value: f64,
}

/// int64 fields arrive either as JSON numbers or as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Nanos {
    Number(i64),
    Text(String),
}

impl Nanos {
    fn to_i64(&self) -> Result<i64, SourceError> {
        match self {
            Nanos::Number(n) => Ok(*n),
            Nanos::Text(s) => s
                .parse()
                .map_err(|_| SourceError::BadTimestamp(s.clone())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpMetricsSource {
    host: String,
    window: Duration,
    sample_period: Duration,
    client: reqwest::Client,
}

impl HttpMetricsSource {
    pub fn new(host: String, window: Duration, sample_period: Duration) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            window,
            sample_period,
            client: reqwest::Client::new(),
        }
    }

    fn query_url(&self) -> String {
        format!("{}/ts/query", self.host)
    }

    fn build_request(
        &self,
        request: &MetricsRequest,
        now: DateTime<Utc>,
    ) -> Result<TsQueryRequest, SourceError> {
        let window = chrono::Duration::from_std(self.window).map_err(|_| SourceError::WindowOverflow)?;
        let sample_nanos =
            i64::try_from(self.sample_period.as_nanos()).map_err(|_| SourceError::WindowOverflow)?;

        let end_nanos = now.timestamp_nanos_opt().ok_or(SourceError::WindowOverflow)?;
        let start_nanos = (now - window)
            .timestamp_nanos_opt()
            .ok_or(SourceError::WindowOverflow)?;

        let queries = request
            .queries
            .iter()
            .map(|q| TsQuery {
                name: q.name.clone(),
                sources: q.sources.clone(),
                derivative: q.non_negative_rate.then_some(NON_NEGATIVE_DERIVATIVE),
            })
            .collect();

        Ok(TsQueryRequest {
            start_nanos,
            end_nanos,
            sample_nanos,
            queries,
        })
    }

    async fn execute_query(&self, body: &TsQueryRequest) -> Result<TsQueryResponse> {
        let response = self
            .client
            .post(self.query_url())
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .context("Failed to send request to time-series endpoint")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body }.into());
        }

        response
            .json::<TsQueryResponse>()
            .await
            .context("Failed to parse time-series response")
    }
}

/// Pair each result with the query that produced it. Results past the last
/// query are kept as unnamed series so their datapoints still count.
fn to_raw_series(request: &MetricsRequest, response: TsQueryResponse) -> Result<Vec<RawSeries>> {
    if response.results.len() != request.queries.len() {
        tracing::warn!(
            "Expected {} time-series results for {}, got {}",
            request.queries.len(),
            request.id,
            response.results.len()
        );
    }

    response
        .results
        .into_iter()
        .enumerate()
        .map(|(i, result)| -> Result<RawSeries> {
            let datapoints = result
                .datapoints
                .iter()
                .map(|d| -> Result<RawDatapoint, SourceError> {
                    Ok(RawDatapoint::new(d.timestamp_nanos.to_i64()?, d.value))
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(match request.queries.get(i) {
                Some(query) => {
                    RawSeries::new(query.name.clone(), query.sources.clone(), datapoints)
                }
                None => RawSeries::new(String::new(), Vec::new(), datapoints),
            })
        })
        .collect()
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    async fn query(&self, request: &MetricsRequest) -> Result<Vec<RawSeries>> {
        let body = self.build_request(request, Utc::now())?;

        tracing::debug!(
            "Querying {} metrics for {} from {}",
            body.queries.len(),
            request.id,
            self.query_url()
        );

        let response = self.execute_query(&body).await?;
        to_raw_series(request, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> MetricsRequest {
        MetricsRequest::for_nodes(
            &["1".to_string(), "2".to_string()],
            &[
                "cr.node.sql.select.count".to_string(),
                "cr.node.sql.insert.count".to_string(),
            ],
        )
    }

    #[test]
    fn test_build_request_window() {
        let source = HttpMetricsSource::new(
            "http://crdb:8080/".to_string(),
            Duration::from_secs(600),
            Duration::from_secs(10),
        );
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let body = source.build_request(&request(), now).unwrap();

        assert_eq!(source.query_url(), "http://crdb:8080/ts/query");
        assert_eq!(body.end_nanos, 1_700_000_000_000_000_000);
        assert_eq!(body.start_nanos, 1_699_999_400_000_000_000);
        assert_eq!(body.sample_nanos, 10_000_000_000);
        assert_eq!(body.queries.len(), 2);
        assert_eq!(body.queries[1].name, "cr.node.sql.insert.count");
        assert_eq!(body.queries[1].derivative, Some("NON_NEGATIVE_DERIVATIVE"));
    }

    #[test]
    fn test_request_serialization() {
        let body = TsQueryRequest {
            start_nanos: 1,
            end_nanos: 2,
            sample_nanos: 3,
            queries: vec![TsQuery {
                name: "m".to_string(),
                sources: vec!["1".to_string()],
                derivative: None,
            }],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start_nanos": 1,
                "end_nanos": 2,
                "sample_nanos": 3,
                "queries": [{ "name": "m", "sources": ["1"] }]
            })
        );
    }

    #[test]
    fn test_parse_response_with_string_and_numeric_nanos() {
        let response: TsQueryResponse = serde_json::from_str(
            r#"{
                "results": [
                    { "query": {}, "datapoints": [
                        { "timestamp_nanos": "1000000", "value": 2.0 },
                        { "timestamp_nanos": 2000000, "value": 4.5 }
                    ] },
                    { "datapoints": [] }
                ]
            }"#,
        )
        .unwrap();

        let series = to_raw_series(&request(), response).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "cr.node.sql.select.count");
        assert_eq!(series[0].sources, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(
            series[0].datapoints,
            vec![RawDatapoint::new(1_000_000, 2.0), RawDatapoint::new(2_000_000, 4.5)]
        );
        assert!(series[1].datapoints.is_empty());
    }

    #[test]
    fn test_parse_response_missing_results() {
        let response: TsQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(to_raw_series(&request(), response).unwrap().is_empty());
    }

    #[test]
    fn test_extra_results_keep_their_datapoints() {
        let response: TsQueryResponse = serde_json::from_str(
            r#"{
                "results": [
                    { "datapoints": [ { "timestamp_nanos": 1000000, "value": 1.0 } ] },
                    { "datapoints": [] },
                    { "datapoints": [ { "timestamp_nanos": 1000000, "value": 5.0 } ] }
                ]
            }"#,
        )
        .unwrap();

        let series = to_raw_series(&request(), response).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[1].name, "cr.node.sql.insert.count");
        assert_eq!(series[2].name, "");
        assert_eq!(series[2].datapoints, vec![RawDatapoint::new(1_000_000, 5.0)]);
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let response: TsQueryResponse = serde_json::from_str(
            r#"{ "results": [ { "datapoints": [ { "timestamp_nanos": "soon", "value": 1 } ] } ] }"#,
        )
        .unwrap();

        let err = to_raw_series(&request(), response).unwrap_err();
        assert!(err.to_string().contains("soon"));
    }
}
