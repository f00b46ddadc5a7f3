// HTTP metric repository implementation
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use crate::application::metric_repository::MetricRepository;
use crate::domain::item::{ItemMetadata, ItemReference, ValueType};
use crate::domain::sample::HistorySample;
use crate::error::FetchError;

/// JSON-over-HTTP backend client. Item resolution and history paging both
/// go through the same authenticated GET plumbing.
#[derive(Debug, Clone)]
pub struct HttpMetricRepository {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    brief: String,
    unit: String,
    #[serde(rename = "valueType")]
    value_type: String,
    server: String,
    host: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<WireHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct WireHistoryEntry {
    clock: i64,
    #[serde(default)]
    ns: i64,
    value: serde_json::Value,
}

impl HttpMetricRepository {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn items_url(&self, reference: &ItemReference) -> String {
        format!(
            "{}/api/v1/items?serverId={}&hostId={}&itemId={}",
            self.base_url,
            urlencoding::encode(&reference.server_id),
            urlencoding::encode(&reference.host_id),
            urlencoding::encode(&reference.item_id),
        )
    }

    fn history_url(&self, reference: &ItemReference, begin_sec: i64, end_sec: i64) -> String {
        format!(
            "{}/api/v1/history?serverId={}&hostId={}&itemId={}&beginTime={}&endTime={}",
            self.base_url,
            urlencoding::encode(&reference.server_id),
            urlencoding::encode(&reference.host_id),
            urlencoding::encode(&reference.item_id),
            begin_sec,
            end_sec,
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("failed to send backend request")
            .map_err(FetchError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Transport(anyhow::anyhow!(
                "backend request failed with status {status}: {body}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::MalformedResponse {
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl MetricRepository for HttpMetricRepository {
    async fn fetch_items(
        &self,
        reference: &ItemReference,
    ) -> Result<Vec<ItemMetadata>, FetchError> {
        tracing::debug!(item = %reference, "resolving item metadata");
        let response: ItemsResponse = self.get_json(&self.items_url(reference)).await?;
        response.items.into_iter().map(decode_item).collect()
    }

    async fn fetch_history(
        &self,
        reference: &ItemReference,
        begin_sec: i64,
        end_sec: i64,
    ) -> Result<Vec<HistorySample>, FetchError> {
        let url = self.history_url(reference, begin_sec, end_sec);
        let response: HistoryResponse = self.get_json(&url).await?;
        response.history.into_iter().map(decode_history).collect()
    }
}

fn decode_item(item: WireItem) -> Result<ItemMetadata, FetchError> {
    let value_type =
        ValueType::parse(&item.value_type).ok_or_else(|| FetchError::MalformedResponse {
            detail: format!("unknown value type {:?}", item.value_type),
        })?;
    Ok(ItemMetadata {
        brief: item.brief,
        unit: item.unit,
        value_type,
        server: item.server,
        host: item.host,
    })
}

fn decode_history(entry: WireHistoryEntry) -> Result<HistorySample, FetchError> {
    let value = decode_value(&entry.value).ok_or_else(|| FetchError::MalformedResponse {
        detail: format!("non-numeric history value {}", entry.value),
    })?;
    Ok(HistorySample::new(entry.clock, entry.ns, value))
}

/// The backend reports values either as JSON numbers or numeric strings.
fn decode_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
