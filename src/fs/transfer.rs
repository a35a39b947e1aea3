//! Upload, download and delete.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backend::StorageBackend;
use crate::error::{ClientError, Result, TransferStep};
use crate::session::SessionStore;

/// What a download hands back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadMode {
    /// Fetch the body and return the bytes.
    #[default]
    Fetch,
    /// Return the one-time download URL for the caller to open.
    Redirect,
}

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub name: String,
    pub size: u64,
    /// Body returned by the upload endpoint (completion token).
    pub completion: String,
}

/// Outcome of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// One-time URL to open (redirect mode).
    Url(String),
    /// The file contents (fetch mode).
    Bytes(Bytes),
}

impl DownloadResult {
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            DownloadResult::Bytes(data) => Some(data),
            DownloadResult::Url(_) => None,
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            DownloadResult::Url(url) => Some(url),
            DownloadResult::Bytes(_) => None,
        }
    }
}

/// Transfer controller.
///
/// No retries and no rollback: an upload whose data step fails after the
/// slot was issued is left as is.
#[derive(Clone)]
pub struct Transfers {
    backend: Arc<dyn StorageBackend>,
    sessions: Arc<SessionStore>,
}

/// Attribute a backend error to `step` unless it already names one.
fn at_step(step: TransferStep, err: ClientError) -> ClientError {
    match err {
        ClientError::TransferError { .. } | ClientError::SessionRequiredError => err,
        other => ClientError::transfer(step, other),
    }
}

impl Transfers {
    pub fn new(backend: Arc<dyn StorageBackend>, sessions: Arc<SessionStore>) -> Self {
        Self { backend, sessions }
    }

    /// Upload `data` under `file_name`.
    ///
    /// # Errors
    /// [`ClientError::SessionRequiredError`] without a session (nothing is
    /// sent), otherwise [`ClientError::TransferError`] naming the failed step.
    pub async fn upload(&self, data: Bytes, file_name: &str) -> Result<UploadResult> {
        let session = self
            .sessions
            .active()
            .ok_or(ClientError::SessionRequiredError)?;

        self.backend
            .upload(&session, data, file_name)
            .await
            .map_err(|e| {
                warn!(file_name, error = %e, "upload failed");
                at_step(TransferStep::RequestUploadSlot, e)
            })
    }

    /// Download the file behind `handle`.
    pub async fn download(&self, handle: &str) -> Result<DownloadResult> {
        let session = self
            .sessions
            .active()
            .ok_or(ClientError::SessionRequiredError)?;

        self.backend.download(&session, handle).await.map_err(|e| {
            warn!(handle, error = %e, "download failed");
            at_step(TransferStep::RequestDownloadSlot, e)
        })
    }

    /// Delete the file behind `handle`. Refreshing the catalog afterwards is
    /// up to the caller.
    pub async fn delete(&self, handle: &str) -> Result<()> {
        let session = self
            .sessions
            .active()
            .ok_or(ClientError::SessionRequiredError)?;

        self.backend.delete(&session, handle).await.map_err(|e| {
            warn!(handle, error = %e, "delete failed");
            at_step(TransferStep::Delete, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LoginGrant;
    use crate::fs::FileRecord;
    use crate::session::Session;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; fails every transfer with a plain HTTP error.
    #[derive(Default)]
    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StorageBackend for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn login(&self, _: &str, _: &str) -> Result<LoginGrant> {
            unreachable!()
        }

        async fn logout(&self, _: &Session) -> Result<()> {
            Ok(())
        }

        async fn list(&self, _: &Session) -> Result<Vec<FileRecord>> {
            unreachable!()
        }

        async fn upload(&self, _: &Session, _: Bytes, _: &str) -> Result<UploadResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::HttpError(500))
        }

        async fn download(&self, _: &Session, _: &str) -> Result<DownloadResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::transfer(
                TransferStep::FetchData,
                ClientError::HttpError(404),
            ))
        }

        async fn delete(&self, _: &Session, _: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::HttpError(500))
        }
    }

    fn transfers(logged_in: bool) -> (Transfers, Arc<Failing>) {
        let backend = Arc::new(Failing::default());
        let sessions = Arc::new(SessionStore::new());
        if logged_in {
            sessions.set_session("SID", vec![]);
        }
        (Transfers::new(backend.clone(), sessions), backend)
    }

    #[tokio::test]
    async fn test_requires_session_and_sends_nothing() {
        let (transfers, backend) = transfers(false);
        assert!(matches!(
            transfers.upload(Bytes::new(), "a").await,
            Err(ClientError::SessionRequiredError)
        ));
        assert!(matches!(
            transfers.download("h").await,
            Err(ClientError::SessionRequiredError)
        ));
        assert!(matches!(
            transfers.delete("h").await,
            Err(ClientError::SessionRequiredError)
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_errors_are_attributed_to_steps() {
        let (transfers, _) = transfers(true);
        let err = transfers.upload(Bytes::new(), "a").await.unwrap_err();
        assert_eq!(err.transfer_step(), Some(TransferStep::RequestUploadSlot));

        // Already attributed by the backend.
        let err = transfers.download("h").await.unwrap_err();
        assert_eq!(err.transfer_step(), Some(TransferStep::FetchData));

        let err = transfers.delete("h").await.unwrap_err();
        assert_eq!(err.transfer_step(), Some(TransferStep::Delete));
    }

    #[test]
    fn test_download_result_accessors() {
        let bytes = DownloadResult::Bytes(Bytes::from_static(b"x"));
        assert_eq!(bytes.as_bytes().map(|b| b.len()), Some(1));
        assert!(bytes.as_url().is_none());
        let url = DownloadResult::Url("https://x".into());
        assert_eq!(url.as_url(), Some("https://x"));
    }
}
