//! HTTP client for the hosted realtime record store.
//!
//! Speaks the store's REST dialect: every node is addressable as
//! `<base>/<path>.json`, `GET` reads, `PUT` replaces, `PATCH` merges,
//! `POST` appends under a generated key, and `DELETE` removes. The REST
//! surface has no change stream, so subscriptions poll the node on an
//! interval and forward snapshots when they differ from the last one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;
use url::Url;

use crate::domain::ports::{
    JsonMap, RecordStore, StoreError, StorePath, StoreSubscription,
};

/// How often a polling subscription re-reads its node.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Per-request timeout for store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST adapter for the hosted record store.
#[derive(Clone)]
pub struct RestRecordStore {
    client: reqwest::Client,
    base: Url,
}

impl RestRecordStore {
    /// Create a client for the store rooted at `base`.
    pub fn new(base: Url) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| StoreError::unavailable(error.to_string()))?;
        Ok(Self { client, base })
    }

    fn node_url(&self, path: &StorePath) -> Result<Url, StoreError> {
        self.base
            .join(&format!("{}.json", path.as_str()))
            .map_err(|error| StoreError::invalid_path(error.to_string()))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|error| StoreError::unavailable(error.to_string()))?;
        let status = response.status();
        let body = response.text().await.ok();
        decode_response(status, body)
    }
}

/// Map a store HTTP response onto the port's error taxonomy.
fn decode_response(status: StatusCode, body: Option<String>) -> Result<Value, StoreError> {
    match status {
        StatusCode::OK => {
            let body = body.unwrap_or_default();
            serde_json::from_str(&body)
                .map_err(|error| StoreError::protocol(format!("unparseable store body: {error}")))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(StoreError::denied(format!("store answered {status}")))
        }
        status if status.is_server_error() => {
            Err(StoreError::unavailable(format!("store answered {status}")))
        }
        status => Err(StoreError::protocol(format!(
            "unexpected store status {status}"
        ))),
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() { None } else { Some(value) }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>, StoreError> {
        let url = self.node_url(path)?;
        let value = self.send(self.client.get(url)).await?;
        Ok(non_null(value))
    }

    async fn write(&self, path: &StorePath, value: Value) -> Result<(), StoreError> {
        let url = self.node_url(path)?;
        self.send(self.client.put(url).json(&value)).await?;
        Ok(())
    }

    async fn write_partial(&self, path: &StorePath, fields: JsonMap) -> Result<(), StoreError> {
        let url = self.node_url(path)?;
        self.send(self.client.patch(url).json(&Value::Object(fields)))
            .await?;
        Ok(())
    }

    async fn push(&self, path: &StorePath, value: Value) -> Result<String, StoreError> {
        let url = self.node_url(path)?;
        let answer = self.send(self.client.post(url).json(&value)).await?;
        answer
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| StoreError::protocol("push answer carried no generated key"))
    }

    async fn delete(&self, path: &StorePath) -> Result<(), StoreError> {
        let url = self.node_url(path)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn subscribe(&self, path: &StorePath) -> Result<StoreSubscription, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let store = self.clone();
        let poll_path = path.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            let mut last: Option<Option<Value>> = None;
            loop {
                interval.tick().await;
                match store.read_once(&poll_path).await {
                    Ok(value) => {
                        if last.as_ref() != Some(&value) {
                            if sender.send(value.clone()).is_err() {
                                break;
                            }
                            last = Some(value);
                        }
                    }
                    Err(error) => {
                        // A failed poll is not fatal; keep the cadence and
                        // try again.
                        warn!(path = %poll_path, %error, "store poll failed");
                    }
                }
            }
        });

        Ok(StoreSubscription::new(receiver, move || task.abort()))
    }
}
