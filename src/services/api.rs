use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::core::config::Settings;
use crate::schemas::assignment::{AssignmentPayload, AssignmentResponse};
use crate::schemas::category::{is_hex_color, CategoryCreate, CategoryResponse};
use crate::wizard::AssignmentBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{detail} (status {status})")]
    Status { status: u16, detail: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Thin client over the reporting backend's REST surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.api().connect_timeout_seconds))
            .timeout(Duration::from_secs(settings.api().timeout_seconds))
            .build()
            .context("Failed to build ReportDesk HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.api().base_url.trim_end_matches('/').to_string(),
            token: settings.api().token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let request = if self.token.is_empty() { request } else { request.bearer_auth(&self.token) };

        let response =
            request.send().await.map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        let raw_body =
            response.text().await.map_err(|err| ApiError::Transport(err.to_string()))?;

        let parsed = serde_json::from_str::<Value>(&raw_body).map_err(|_| {
            ApiError::Decode(format!("non-JSON body (status {status}): {raw_body}"))
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: extract_error_message(&parsed),
            });
        }

        Ok(parsed)
    }

    pub async fn create_category(
        &self,
        payload: &CategoryCreate,
    ) -> Result<CategoryResponse, ApiError> {
        payload.validate().map_err(|err| ApiError::Validation(err.to_string()))?;
        if !is_hex_color(&payload.color) {
            return Err(ApiError::Validation(format!(
                "color must be a hex value like #1f6f4a, got '{}'",
                payload.color
            )));
        }

        let value = self
            .execute(
                self.client
                    .post(self.endpoint("reports/categories/report_category/"))
                    .json(payload),
            )
            .await?;

        serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn create_assignment(
        &self,
        agency: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentResponse, ApiError> {
        payload.validate().map_err(|err| ApiError::Validation(err.to_string()))?;

        let value = self
            .execute(self.client.post(self.endpoint(&format!("{agency}/reports/"))).json(payload))
            .await?;

        serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn update_assignment(
        &self,
        id: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentResponse, ApiError> {
        payload.validate().map_err(|err| ApiError::Validation(err.to_string()))?;

        let value = self
            .execute(self.client.put(self.endpoint(&format!("reports/{id}/"))).json(payload))
            .await?;

        serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AssignmentBackend for ApiClient {
    async fn create_category(
        &self,
        payload: &CategoryCreate,
    ) -> Result<CategoryResponse, ApiError> {
        ApiClient::create_category(self, payload).await
    }

    async fn create_assignment(
        &self,
        agency: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentResponse, ApiError> {
        ApiClient::create_assignment(self, agency, payload).await
    }

    async fn update_assignment(
        &self,
        id: &str,
        payload: &AssignmentPayload,
    ) -> Result<AssignmentResponse, ApiError> {
        ApiClient::update_assignment(self, id, payload).await
    }
}

fn extract_error_message(payload: &Value) -> String {
    if let Some(detail) = payload.get("detail") {
        if let Some(text) = detail.as_str() {
            return text.to_string();
        }
        if let Some(items) = detail.as_array() {
            let joined = items
                .iter()
                .filter_map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .or_else(|| item.get("message").and_then(Value::as_str))
                })
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return joined;
            }
        }
    }

    payload
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("error").and_then(Value::as_str))
        .unwrap_or("unknown_error")
        .to_string()
}
