//! HTTP record store
//!
//! Implements `RecordStore` against the REST API:
//! - `GET /categories`, `GET /bank-accounts`, `GET /bank-accounts/{id}`
//! - `GET /transactions`, `POST /transactions`, `PUT /transactions/{id}`,
//!   `DELETE /transactions/{id}`
//! - `DELETE /accounts/{id}`
//!
//! Create and update bodies are multipart forms built from `TransportPayload`.
//! Any 2xx answer to a create or update counts as saved; the echoed record is
//! read only when the body holds one.

pub mod error;
pub mod routes;

use async_trait::async_trait;
use cashdesk_config::{Config, RemoteConfig};
use cashdesk_core::store::operations;
use cashdesk_core::{
    BankAccount, BankAccountDetail, Category, CoreResult, PartValue, RecordStore, Transaction,
    TransportPayload,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub use error::ApiError;

/// Record store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRecordStore {
    pub fn new(remote: &RemoteConfig) -> Result<Self, ApiError> {
        let base_url = remote.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidConfig {
                message: format!("base_url must be an http(s) URL, got '{}'", remote.base_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(remote.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: remote
                .token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.remote)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, operation: &str) -> CoreResult<T> {
        log::debug!("GET {}", path);
        self.decode(self.request(Method::GET, path))
            .await
            .map_err(|e| e.into_core(operation))
    }

    async fn save(
        &self,
        method: Method,
        path: &str,
        payload: TransportPayload,
        operation: &str,
    ) -> CoreResult<Option<Transaction>> {
        log::debug!("{} {} ({} part(s))", method, path, payload.len());
        let form = multipart_form(payload).map_err(|e| e.into_core(operation))?;
        let response = self
            .send(self.request(method, path).multipart(form))
            .await
            .map_err(|e| e.into_core(operation))?;
        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("{}: {} accepted, body unreadable: {}", operation, status, e);
                return Ok(None);
            }
        };
        Ok(echoed_record(operation, &body))
    }

    async fn delete(&self, path: &str, operation: &str) -> CoreResult<()> {
        log::debug!("DELETE {}", path);
        self.send(self.request(Method::DELETE, path))
            .await
            .map(|_| ())
            .map_err(|e| e.into_core(operation))
    }
}

/// The record a store echoed after a save, if the body holds a whole one
fn echoed_record(operation: &str, body: &[u8]) -> Option<Transaction> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(body) {
        Ok(transaction) => Some(transaction),
        Err(e) => {
            log::debug!("{}: response body is not a transaction: {}", operation, e);
            None
        }
    }
}

/// Turn a payload into a multipart form, keeping part order
///
/// Files with no MIME type are sent as `application/octet-stream`.
pub fn multipart_form(payload: TransportPayload) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in payload {
        form = match part.value {
            PartValue::Text(value) => form.text(part.name, value),
            PartValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let content_type = match content_type.trim() {
                    "" => OCTET_STREAM,
                    given => given,
                };
                let length = bytes.len() as u64;
                let file = Part::stream_with_length(bytes, length)
                    .file_name(file_name)
                    .mime_str(content_type)?;
                form.part(part.name, file)
            }
        };
    }
    Ok(form)
}

const OCTET_STREAM: &str = "application/octet-stream";

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_categories(&self) -> CoreResult<Vec<Category>> {
        self.get(routes::CATEGORIES, operations::LIST_CATEGORIES).await
    }

    async fn list_bank_accounts(&self) -> CoreResult<Vec<BankAccount>> {
        self.get(routes::BANK_ACCOUNTS, operations::LIST_BANK_ACCOUNTS).await
    }

    async fn get_bank_account(&self, id: &str) -> CoreResult<BankAccountDetail> {
        self.get(&routes::bank_account(id), operations::GET_BANK_ACCOUNT).await
    }

    async fn list_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.get(routes::TRANSACTIONS, operations::LIST_TRANSACTIONS).await
    }

    async fn create_transaction(&self, payload: TransportPayload) -> CoreResult<Option<Transaction>> {
        self.save(Method::POST, routes::TRANSACTIONS, payload, operations::CREATE_TRANSACTION)
            .await
    }

    async fn update_transaction(
        &self,
        id: &str,
        payload: TransportPayload,
    ) -> CoreResult<Option<Transaction>> {
        self.save(
            Method::PUT,
            &routes::transaction(id),
            payload,
            operations::UPDATE_TRANSACTION,
        )
        .await
    }

    async fn delete_transaction(&self, id: &str) -> CoreResult<()> {
        self.delete(&routes::transaction(id), operations::DELETE_TRANSACTION)
            .await
    }

    async fn delete_account(&self, id: &str) -> CoreResult<()> {
        self.delete(&routes::account(id), operations::DELETE_ACCOUNT).await
    }
}
