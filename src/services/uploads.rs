use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::core::config::Settings;
use crate::wizard::{FileUpload, FileUploader, UploadProgress};

pub type ProgressFn = Arc<dyn Fn(&UploadProgress) + Send + Sync>;

/// Multipart uploads to the product's `/uploads/` endpoint. The response
/// carries the storage key the assignment payload references.
#[derive(Clone)]
pub struct FileTransferService {
    client: Client,
    endpoint: String,
    token: String,
    max_bytes: u64,
    on_progress: Option<ProgressFn>,
}

impl FileTransferService {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.api().connect_timeout_seconds))
            .timeout(Duration::from_secs(settings.api().timeout_seconds))
            .build()
            .context("Failed to build upload HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/uploads/", settings.api().base_url.trim_end_matches('/')),
            token: settings.api().token.clone(),
            max_bytes: settings.uploads().max_upload_size_mb * 1024 * 1024,
            on_progress: None,
        })
    }

    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    fn report(&self, filename: &str, sent: u64, total: u64) {
        if let Some(on_progress) = &self.on_progress {
            on_progress(&UploadProgress { filename: filename.to_string(), sent, total });
        }
    }

    async fn send(&self, file: FileUpload<'_>) -> anyhow::Result<String> {
        let total = file.bytes.len() as u64;
        if total > self.max_bytes {
            anyhow::bail!(
                "file '{}' exceeds the {} byte upload limit",
                file.filename,
                self.max_bytes
            );
        }

        let digest = hex::encode(Sha256::digest(file.bytes));
        tracing::debug!(filename = file.filename, size = total, digest, "Uploading file");
        self.report(file.filename, 0, total);

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.filename.to_string())
            .mime_str(file.content_type)
            .with_context(|| format!("Invalid content type '{}'", file.content_type))?;
        let form = Form::new().part("file", part);

        let request = self.client.post(&self.endpoint).multipart(form);
        let request =
            if self.token.is_empty() { request } else { request.bearer_auth(&self.token) };

        let response = request.send().await.context("Failed to call upload endpoint")?;
        let status = response.status();
        let raw_body = response.text().await.context("Failed to read upload response")?;

        if !status.is_success() {
            anyhow::bail!("upload of '{}' failed (status {status}): {raw_body}", file.filename);
        }

        let parsed: Value = serde_json::from_str(&raw_body)
            .with_context(|| format!("upload returned non-JSON body: {raw_body}"))?;
        let key = parsed
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("upload response missing storage key: {raw_body}"))?
            .to_string();

        self.report(file.filename, total, total);
        Ok(key)
    }
}

#[async_trait]
impl FileUploader for FileTransferService {
    async fn upload(&self, file: FileUpload<'_>) -> anyhow::Result<String> {
        self.send(file).await
    }
}
