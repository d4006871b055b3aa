// src/repositories/record_client.rs - Generic client for the remote record backend
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::errors::RecordClientError;

type Result<T> = std::result::Result<T, RecordClientError>;

/// Collection-oriented CRUD over schemaless JSON records.
///
/// Records are addressed by the backend-assigned integer `Id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordClient: Send + Sync {
    async fn fetch_records(&self, collection: &str) -> Result<Vec<Value>>;

    /// `Ok(None)` when the backend has no record with this Id
    async fn get_record(&self, collection: &str, id: i64) -> Result<Option<Value>>;

    /// Returns the stored record, including its new `Id`
    async fn create_record(&self, collection: &str, record: Value) -> Result<Value>;

    /// Applies the fields present in `patch`; returns whatever the backend echoes
    async fn update_record(&self, collection: &str, id: i64, patch: Value) -> Result<Value>;

    async fn delete_record(&self, collection: &str, id: i64) -> Result<()>;
}

/// Response wrapper used by every backend endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

pub struct HttpRecordClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRecordClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("sniplink/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/records", self.base_url, collection)
    }

    fn record_url(&self, collection: &str, id: i64) -> String {
        format!("{}/{}", self.records_url(collection), id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        debug!("Record backend request: {} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Sends the request and unwraps the envelope
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        target: String,
    ) -> Result<Option<T>> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(RecordClientError::NotFound(target));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) && status.is_success() {
            return Ok(None);
        }

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(RecordClientError::Rejected {
                    status: status.as_u16(),
                    message: String::from_utf8_lossy(&body).into_owned(),
                })
            }
            Err(e) => return Err(RecordClientError::Decode(e.to_string())),
        };

        if !status.is_success() || !envelope.success {
            return Err(RecordClientError::Rejected {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl RecordClient for HttpRecordClient {
    async fn fetch_records(&self, collection: &str) -> Result<Vec<Value>> {
        let builder = self.request(Method::GET, self.records_url(collection));
        let records: Option<Vec<Value>> = self.send(builder, collection.to_string()).await?;
        Ok(records.unwrap_or_default())
    }

    async fn get_record(&self, collection: &str, id: i64) -> Result<Option<Value>> {
        let builder = self.request(Method::GET, self.record_url(collection, id));
        match self.send(builder, format!("{} Id {}", collection, id)).await {
            Ok(record) => Ok(record),
            Err(RecordClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_record(&self, collection: &str, record: Value) -> Result<Value> {
        let builder = self
            .request(Method::POST, self.records_url(collection))
            .json(&record);
        self.send(builder, collection.to_string())
            .await?
            .ok_or_else(|| RecordClientError::Decode("create response carried no record".into()))
    }

    async fn update_record(&self, collection: &str, id: i64, patch: Value) -> Result<Value> {
        let builder = self
            .request(Method::PATCH, self.record_url(collection, id))
            .json(&patch);
        let record: Option<Value> = self
            .send(builder, format!("{} Id {}", collection, id))
            .await?;
        Ok(record.unwrap_or(Value::Null))
    }

    async fn delete_record(&self, collection: &str, id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, self.record_url(collection, id));
        let _: Option<Value> = self
            .send(builder, format!("{} Id {}", collection, id))
            .await?;
        Ok(())
    }
}
