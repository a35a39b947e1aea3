//! File listing.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::StorageBackend;
use crate::error::{ClientError, Result};
use crate::fs::node::FileRecord;
use crate::session::SessionStore;
use crate::view::FileTable;

/// Catalog controller: lists the files (not folders) of the account.
///
/// Nothing is cached; every call asks the backend again.
#[derive(Clone)]
pub struct FileCatalog {
    backend: Arc<dyn StorageBackend>,
    sessions: Arc<SessionStore>,
}

impl FileCatalog {
    pub fn new(backend: Arc<dyn StorageBackend>, sessions: Arc<SessionStore>) -> Self {
        Self { backend, sessions }
    }

    /// List the remote files.
    ///
    /// Folders are always left out. An empty or unreadable listing gives an
    /// empty vector: "no files" and "nothing found" look the same.
    ///
    /// # Errors
    /// [`ClientError::SessionRequiredError`] when nobody is logged in (no
    /// request is made). Connectivity and remote errors are passed through.
    pub async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let session = self
            .sessions
            .active()
            .ok_or(ClientError::SessionRequiredError)?;

        let records = match self.backend.list(&session).await {
            Ok(records) => records,
            Err(e) if e.is_protocol() => {
                warn!(error = %e, "unreadable listing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let files: Vec<FileRecord> = records.into_iter().filter(FileRecord::is_file).collect();
        debug!(count = files.len(), "listed files");
        Ok(files)
    }

    /// List the files as a display table.
    pub async fn table(&self) -> Result<FileTable> {
        Ok(FileTable::from_records(&self.list_files().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LoginGrant;
    use crate::fs::{DownloadResult, FileKind, UploadResult};
    use crate::session::Session;
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Listing {
        reply: Mutex<Option<Result<Vec<FileRecord>>>>,
        calls: AtomicUsize,
    }

    impl Listing {
        fn new(reply: Result<Vec<FileRecord>>) -> Arc<Self> {
            Arc::new(Self {
                reply: Mutex::new(Some(reply)),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl StorageBackend for Listing {
        fn name(&self) -> &'static str {
            "listing"
        }

        async fn login(&self, _: &str, _: &str) -> Result<LoginGrant> {
            unreachable!()
        }

        async fn logout(&self, _: &Session) -> Result<()> {
            Ok(())
        }

        async fn list(&self, session: &Session) -> Result<Vec<FileRecord>> {
            assert!(session.is_active());
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.lock().take().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn upload(&self, _: &Session, _: Bytes, _: &str) -> Result<UploadResult> {
            unreachable!()
        }

        async fn download(&self, _: &Session, _: &str) -> Result<DownloadResult> {
            unreachable!()
        }

        async fn delete(&self, _: &Session, _: &str) -> Result<()> {
            unreachable!()
        }
    }

    fn catalog(backend: Arc<Listing>, logged_in: bool) -> FileCatalog {
        let sessions = Arc::new(SessionStore::new());
        if logged_in {
            sessions.set_session("SID", vec![]);
        }
        FileCatalog::new(backend, sessions)
    }

    #[tokio::test]
    async fn test_no_session_no_call() {
        let backend = Listing::new(Ok(Vec::new()));
        let err = catalog(backend.clone(), false).list_files().await.unwrap_err();
        assert!(matches!(err, ClientError::SessionRequiredError));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_folders_are_filtered() {
        let backend = Listing::new(Ok(vec![
            FileRecord::new("a", "a.txt", 1, 0, FileKind::File),
            FileRecord::new("d", "dir", 0, 0, FileKind::Folder),
            FileRecord::new("b", "b.txt", 2, 0, FileKind::File),
        ]));
        let files = catalog(backend, true).list_files().await.unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(FileRecord::is_file));
    }

    #[tokio::test]
    async fn test_malformed_listing_is_empty() {
        let backend = Listing::new(Err(ClientError::ProtocolError("[]".into())));
        let files = catalog(backend, true).list_files().await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_remote_errors_propagate() {
        let backend = Listing::new(Err(ClientError::HttpError(500)));
        let err = catalog(backend, true).list_files().await.unwrap_err();
        assert!(err.is_connectivity());
    }

    #[tokio::test]
    async fn test_table_placeholder() {
        let backend = Listing::new(Ok(Vec::new()));
        let table = catalog(backend, true).table().await.unwrap();
        assert!(table.is_empty());
        assert_eq!(table.placeholder(), Some("No files found"));
    }
}
