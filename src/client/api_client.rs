use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::de::DeserializeOwned;
use store_object::Page;

use crate::api::{ApiResponse, DeleteResult};
use crate::entities::Entity;
use crate::reports::DashboardSummary;
use cache_system::CacheError;

/// Largest page the server hands out
const FETCH_ALL_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Non-2xx answer; `message` is the envelope's `error`
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Typed client for the `/api` routes
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: ReqwestClient,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8787`
    pub fn new(base_url: &str) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: ReqwestClient::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// One page of `E`
    pub async fn list<E: Entity>(&self, limit: Option<usize>, cursor: Option<&str>) -> Result<Page<E>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        self.send(self.client.get(self.url(E::RESOURCE)).query(&query))
            .await
    }

    /// Every record of `E`, following `next` until the last page
    pub async fn list_all<E: Entity>(&self) -> Result<Vec<E>> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .list::<E>(Some(FETCH_ALL_LIMIT), cursor.as_deref())
                .await?;
            records.extend(page.items);
            match page.next {
                Some(next) => cursor = Some(next),
                None => return Ok(records),
            }
        }
    }

    pub async fn get<E: Entity>(&self, id: &str) -> Result<E> {
        let url = self.url(&format!("{}/{}", E::RESOURCE, id));
        self.send(self.client.get(url)).await
    }

    pub async fn create<E: Entity>(&self, payload: &E::Patch) -> Result<E> {
        self.send(self.client.post(self.url(E::RESOURCE)).json(payload))
            .await
    }

    pub async fn update<E: Entity>(&self, id: &str, patch: &E::Patch) -> Result<E> {
        let url = self.url(&format!("{}/{}", E::RESOURCE, id));
        self.send(self.client.put(url).json(patch)).await
    }

    pub async fn delete<E: Entity>(&self, id: &str) -> Result<DeleteResult> {
        let url = self.url(&format!("{}/{}", E::RESOURCE, id));
        self.send(self.client.delete(url)).await
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary> {
        self.send(self.client.get(self.url("dashboard"))).await
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        self.send(self.client.get(self.url("health"))).await
    }

    /// Send `request` and unwrap the envelope
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
            Ok(ApiResponse {
                success: true,
                data: Some(data),
                ..
            }) if status.is_success() => Ok(data),
            Ok(envelope) if !status.is_success() || !envelope.success => Err(ClientError::Http {
                status: status.as_u16(),
                message: envelope.error.unwrap_or_else(|| status.to_string()),
            }),
            Ok(_) => Err(ClientError::InvalidResponse(
                "success envelope without data".to_string(),
            )),
            Err(e) if status.is_success() => Err(ClientError::InvalidResponse(e.to_string())),
            Err(_) => Err(ClientError::Http {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}
