// InfluxDB repository implementation
use crate::application::site_history_repository::SiteHistoryRepository;
use crate::domain::parameter::Parameter;
use crate::domain::reading::HistoricalReading;
use crate::domain::site::SiteLocation;
use crate::infrastructure::config::{prepare_query, InfluxSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const SITE_TAG: &str = "site_id";
const SUBURB_TAG: &str = "nearest_suburb";

const HISTORY_QUERY: &str =
    "SELECT ${fields} FROM \"${measurement}\" WHERE \"site_id\" = '${site_id}' ORDER BY time ASC";
const SITE_IDS_QUERY: &str = "SHOW TAG VALUES FROM \"${measurement}\" WITH KEY = \"site_id\"";
// COUNT(*) yields one series per tag combination that has any field data
const LOCATIONS_QUERY: &str =
    "SELECT COUNT(*) FROM \"${measurement}\" GROUP BY \"site_id\", \"nearest_suburb\"";

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    client: reqwest::Client,
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    measurement: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    #[allow(dead_code)]
    name: String,
    columns: Vec<String>,
    values: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    tags: Option<HashMap<String, String>>,
}

impl InfluxRepository {
    pub fn new(settings: InfluxSettings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build InfluxDB HTTP client")?;

        Ok(Self {
            client,
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token,
            database: settings.database,
            retention_policy: settings.retention_policy,
            measurement: settings.measurement,
            timeout,
        })
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    fn render(&self, template: &str, extra: &[(&str, String)]) -> String {
        let mut vars = HashMap::new();
        vars.insert("measurement".to_string(), self.measurement.clone());
        for (key, value) in extra {
            vars.insert(key.to_string(), value.clone());
        }
        prepare_query(template, &vars)
    }

    async fn execute_query(&self, query: &str) -> Result<InfluxQLResponse> {
        let url = self.build_query_url(query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("InfluxDB query timed out after {:?}", self.timeout)
                } else {
                    anyhow::Error::new(e).context("Failed to send request to InfluxDB")
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<InfluxQLResponse>()
            .await
            .context("Failed to parse InfluxDB response")?;

        // Check for errors in the response
        if let Some(result) = data.results.first() {
            if let Some(error) = &result.error {
                anyhow::bail!("InfluxDB query error: {}", error);
            }
        }

        Ok(data)
    }
}

/// Escapes a value for use inside a single-quoted InfluxQL string.
fn quote_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn history_fields() -> String {
    Parameter::ALL
        .iter()
        .map(|p| format!("\"{}\"", p.column()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn series_of(response: &InfluxQLResponse) -> &[InfluxQLSeries] {
    response
        .results
        .first()
        .and_then(|r| r.series.as_deref())
        .unwrap_or(&[])
}

fn readings_from_response(response: &InfluxQLResponse) -> Vec<HistoricalReading> {
    let mut readings = Vec::new();

    for series in series_of(response) {
        let time_idx = series.columns.iter().position(|c| c == "time").unwrap_or(0);
        let columns: Vec<(Parameter, usize)> = Parameter::ALL
            .into_iter()
            .filter_map(|p| series.columns.iter().position(|c| c == p.column()).map(|i| (p, i)))
            .collect();

        for row in &series.values {
            let Some(observed_at) = row
                .get(time_idx)
                .and_then(|v| v.as_str())
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc))
            else {
                tracing::warn!("Skipping row with unreadable time: {:?}", row.get(time_idx));
                continue;
            };

            let mut reading = HistoricalReading::new(observed_at);
            for (parameter, idx) in &columns {
                reading.set(*parameter, row.get(*idx).and_then(|v| v.as_f64()));
            }
            readings.push(reading);
        }
    }

    readings.sort_by_key(|r| r.observed_at);
    readings
}

fn tag_values_from_response(response: &InfluxQLResponse) -> Vec<String> {
    let mut values = Vec::new();
    for series in series_of(response) {
        for value_row in &series.values {
            if let Some(value) = value_row.get(1).and_then(|v| v.as_str()) {
                values.push(value.to_string());
            }
        }
    }
    values
}

fn locations_from_response(response: &InfluxQLResponse) -> Vec<SiteLocation> {
    series_of(response)
        .iter()
        .filter_map(|series| {
            let tags = series.tags.as_ref()?;
            let site_id = tags.get(SITE_TAG).filter(|s| !s.is_empty())?;
            Some(SiteLocation {
                site_id: site_id.clone(),
                nearest_suburb: tags.get(SUBURB_TAG).cloned().unwrap_or_default(),
            })
        })
        .collect()
}

#[async_trait]
impl SiteHistoryRepository for InfluxRepository {
    async fn history(&self, site_id: &str) -> Result<Vec<HistoricalReading>> {
        let query = self.render(
            HISTORY_QUERY,
            &[("fields", history_fields()), ("site_id", quote_literal(site_id))],
        );

        tracing::debug!("Executing history query: {}", query);
        let response = self.execute_query(&query).await?;
        let readings = readings_from_response(&response);

        tracing::debug!("Found {} readings for site {}", readings.len(), site_id);
        Ok(readings)
    }

    async fn list_site_ids(&self) -> Result<Vec<String>> {
        let query = self.render(SITE_IDS_QUERY, &[]);
        let response = self.execute_query(&query).await?;
        Ok(tag_values_from_response(&response))
    }

    async fn list_site_locations(&self) -> Result<Vec<SiteLocation>> {
        let query = self.render(LOCATIONS_QUERY, &[]);
        tracing::debug!("Executing site location query: {}", query);
        let response = self.execute_query(&query).await?;

        let locations = locations_from_response(&response);
        tracing::debug!("Found {} site locations", locations.len());
        Ok(locations)
    }
}
