use uuid::Uuid;

use crate::wizard::{FileUpload, FileUploader};

/// Value a not-yet-uploaded file contributes to the aggregate's file list
/// until its storage key replaces it.
pub const PENDING_PLACEHOLDER: &str = "pending-upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Uploaded,
    Error,
}

/// A file the user picked but the backend may not have yet. Bytes are held
/// in memory until the Setup step's advance flushes them.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub status: UploadStatus,
    pub key: Option<String>,
}

impl PendingFile {
    fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
            status: UploadStatus::Pending,
            key: None,
        }
    }

    pub fn wire_key(&self) -> String {
        self.key.clone().unwrap_or_else(|| PENDING_PLACEHOLDER.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadFailure {
    pub filename: String,
    pub message: String,
}

/// Files staged during the Setup step: at most one video cover plus any
/// number of resource files. The cover always uploads first.
#[derive(Debug, Clone, Default)]
pub struct UploadQueue {
    cover: Option<PendingFile>,
    resources: Vec<PendingFile>,
}

impl UploadQueue {
    pub fn set_cover(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> String {
        let file = PendingFile::new(filename, content_type, bytes);
        let id = file.id.clone();
        self.cover = Some(file);
        id
    }

    pub fn clear_cover(&mut self) {
        self.cover = None;
    }

    pub fn add_resource(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> String {
        let file = PendingFile::new(filename, content_type, bytes);
        let id = file.id.clone();
        self.resources.push(file);
        id
    }

    /// Stop tracking a staged file. A request already issued for it is
    /// fire-and-forget and is not aborted.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.cover.as_ref().is_some_and(|file| file.id == id) {
            self.cover = None;
            return true;
        }
        let before = self.resources.len();
        self.resources.retain(|file| file.id != id);
        self.resources.len() != before
    }

    pub fn cover(&self) -> Option<&PendingFile> {
        self.cover.as_ref()
    }

    pub fn resources(&self) -> &[PendingFile] {
        &self.resources
    }

    pub fn resource_keys(&self) -> Vec<String> {
        self.resources.iter().map(PendingFile::wire_key).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cover.is_none() && self.resources.is_empty()
    }

    pub fn all_uploaded(&self) -> bool {
        self.files().all(|file| file.status == UploadStatus::Uploaded)
    }

    pub(crate) fn clear(&mut self) {
        self.cover = None;
        self.resources.clear();
    }

    fn files(&self) -> impl Iterator<Item = &PendingFile> {
        self.cover.iter().chain(self.resources.iter())
    }

    fn files_mut(&mut self) -> impl Iterator<Item = &mut PendingFile> {
        self.cover.iter_mut().chain(self.resources.iter_mut())
    }
}

/// Upload every staged file in order, cover first, strictly one at a time.
/// The first failure marks that file errored and aborts the rest; files
/// that already uploaded keep their keys and are not re-sent on retry.
pub(crate) async fn flush(
    queue: &mut UploadQueue,
    uploader: &dyn FileUploader,
) -> Result<(), UploadFailure> {
    for file in queue.files_mut() {
        if file.status == UploadStatus::Uploaded {
            continue;
        }

        file.status = UploadStatus::Uploading;
        let upload = FileUpload {
            filename: &file.filename,
            content_type: &file.content_type,
            bytes: &file.bytes,
        };

        match uploader.upload(upload).await {
            Ok(key) => {
                file.status = UploadStatus::Uploaded;
                file.key = Some(key);
            }
            Err(err) => {
                file.status = UploadStatus::Error;
                tracing::warn!(filename = %file.filename, error = %err, "File upload failed");
                return Err(UploadFailure {
                    filename: file.filename.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(())
}
