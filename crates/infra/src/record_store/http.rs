//! REST record API adapter.
//!
//! Talks to a record service exposing `GET /k/v1/records.json` (filtered
//! query) and `PUT /k/v1/record.json` (single-record partial update). Field
//! values travel wrapped as `{ "value": .. }`; `$id` and `$revision` are the
//! store-managed identity and revision fields.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value as JsonValue, json};

use stockguard_core::field::field;
use stockguard_core::{DatasetId, RecordId};

use super::r#trait::{
    FieldFilter, FieldUpdate, RecordStore, RecordStoreError, RemoteRecord, UpdateReceipt,
};
use crate::config::HttpStoreConfig;

const ID_FIELD: &str = "$id";
const REVISION_FIELD: &str = "$revision";
/// Header carrying a per-app API token.
const API_TOKEN_HEADER: &str = "X-Cybozu-API-Token";
/// Error code the record API uses for a stale `revision` on update.
const REVISION_CONFLICT_CODE: &str = "GAIA_CO02";

/// `RecordStore` backed by the REST record API.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpRecordStore {
    pub fn new(config: &HttpStoreConfig) -> Result<Self, RecordStoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RecordStoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => req.header(API_TOKEN_HEADER, token),
            None => req,
        }
    }

    async fn read_json(resp: reqwest::Response) -> Result<JsonValue, RecordStoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }
        resp.json()
            .await
            .map_err(|e| RecordStoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn query(
        &self,
        dataset: &DatasetId,
        filter: &FieldFilter,
    ) -> Result<Vec<RemoteRecord>, RecordStoreError> {
        let query = filter.to_query();
        let req = self
            .client
            .get(self.url("/k/v1/records.json"))
            .query(&[("app", dataset.as_str()), ("query", query.as_str())]);

        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| RecordStoreError::Transport(e.to_string()))?;

        decode_records(Self::read_json(resp).await?)
    }

    async fn update(
        &self,
        dataset: &DatasetId,
        record_id: &RecordId,
        update: &FieldUpdate,
    ) -> Result<UpdateReceipt, RecordStoreError> {
        let req = self
            .client
            .put(self.url("/k/v1/record.json"))
            .json(&encode_update(dataset, record_id, update));

        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| RecordStoreError::Transport(e.to_string()))?;

        let body = Self::read_json(resp).await?;
        Ok(UpdateReceipt {
            revision: body.get("revision").and_then(parse_revision),
        })
    }
}

/// Decode a `{ "records": [..] }` query response, preserving order.
pub fn decode_records(body: JsonValue) -> Result<Vec<RemoteRecord>, RecordStoreError> {
    let records = match body.get("records") {
        Some(JsonValue::Array(records)) => records,
        _ => return Err(RecordStoreError::Decode("response has no `records` array".to_string())),
    };

    records
        .iter()
        .map(|raw| {
            let fields = raw
                .as_object()
                .ok_or_else(|| RecordStoreError::Decode("record is not an object".to_string()))?;

            let id = field(fields, ID_FIELD)
                .ok_or_else(|| RecordStoreError::Decode(format!("record has no `{ID_FIELD}`")))
                .and_then(|v| {
                    RecordId::from_json(v).map_err(|e| RecordStoreError::Decode(e.to_string()))
                })?;
            let revision = field(fields, REVISION_FIELD).and_then(parse_revision);

            Ok(RemoteRecord {
                id,
                revision,
                fields: fields.clone(),
            })
        })
        .collect()
}

/// Build the update request body; fields are wrapped as `{ "value": .. }`.
pub fn encode_update(dataset: &DatasetId, record_id: &RecordId, update: &FieldUpdate) -> JsonValue {
    let record: Map<String, JsonValue> = update
        .fields
        .iter()
        .map(|(code, value)| (code.clone(), json!({ "value": value })))
        .collect();

    let mut body = json!({
        "app": dataset.as_str(),
        "id": record_id.as_str(),
        "record": record,
    });
    if let Some(revision) = update.expected_revision {
        body["revision"] = json!(revision);
    }
    body
}

/// Map a non-success response into a store fault.
pub fn classify_error(status: StatusCode, body: &str) -> RecordStoreError {
    let parsed: Option<JsonValue> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|b| b.get("code"))
        .and_then(JsonValue::as_str);
    let message = parsed
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(JsonValue::as_str)
        .unwrap_or(body)
        .to_string();

    if status == StatusCode::CONFLICT || code == Some(REVISION_CONFLICT_CODE) {
        return RecordStoreError::Conflict(message);
    }
    if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::TOO_MANY_REQUESTS {
        return RecordStoreError::Unavailable(message);
    }
    RecordStoreError::Remote {
        status: status.as_u16(),
        message,
    }
}

fn parse_revision(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}
