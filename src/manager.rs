//! The file manager: one backend, one session, one operation at a time.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::backend::{ApiBackend, MegaCmdBackend, StorageBackend, TokioCommandRunner};
use crate::config::{BackendKind, ClientConfig};
use crate::crypto::KeyDeriver;
use crate::error::{ClientError, Result};
use crate::fs::{DownloadResult, FileCatalog, FileRecord, Transfers, UploadResult};
use crate::http::HttpClient;
use crate::session::{Session, SessionStore};
use crate::view::FileTable;

/// Owns the backend, the [`SessionStore`] and the controllers.
///
/// Operations that talk to the service hold an in-flight guard; starting a
/// second one while the first is pending fails with
/// [`ClientError::OperationInProgress`] instead of racing it.
pub struct FileManager {
    backend: Arc<dyn StorageBackend>,
    sessions: Arc<SessionStore>,
    catalog: FileCatalog,
    transfers: Transfers,
    inflight: Mutex<()>,
}

impl FileManager {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        let sessions = Arc::new(SessionStore::new());
        Self {
            catalog: FileCatalog::new(backend.clone(), sessions.clone()),
            transfers: Transfers::new(backend.clone(), sessions.clone()),
            backend,
            sessions,
            inflight: Mutex::new(()),
        }
    }

    /// Build the backend described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let deriver = KeyDeriver::new(config.key_derivation.clone());

        let backend: Arc<dyn StorageBackend> = match config.backend {
            BackendKind::Api => {
                let http =
                    HttpClient::with_options(config.proxy.as_deref(), config.request_timeout())?;
                let client = ApiClient::with_transport(Arc::new(http), config.api_url.clone());
                Arc::new(ApiBackend::new(client, deriver, config.download_mode))
            }
            BackendKind::Megacmd => Arc::new(MegaCmdBackend::new(
                Arc::new(TokioCommandRunner),
                config.megacmd_root.clone(),
                deriver,
            )),
        };

        Ok(Self::new(backend))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.sessions.current()
    }

    pub fn is_logged_in(&self) -> bool {
        self.sessions.is_active()
    }

    pub fn catalog(&self) -> &FileCatalog {
        &self.catalog
    }

    pub fn transfers(&self) -> &Transfers {
        &self.transfers
    }

    fn begin(&self) -> Result<MutexGuard<'_, ()>> {
        self.inflight
            .try_lock()
            .map_err(|_| ClientError::OperationInProgress)
    }

    /// Log in and store the session.
    ///
    /// A rejected email/password pair clears any stored session; other
    /// failures leave it as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let _guard = self.begin()?;

        match self.backend.login(email, password).await {
            Ok(grant) => {
                self.sessions.set_session(grant.token, grant.derived_key);
                info!(backend = self.backend.name(), "logged in");
                Ok(())
            }
            Err(ClientError::InvalidCredentials) => {
                self.sessions.clear();
                Err(ClientError::InvalidCredentials)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the session. Safe to call when not logged in.
    pub async fn logout(&self) {
        if let Some(session) = self.sessions.active() {
            if let Err(e) = self.backend.logout(&session).await {
                warn!(error = %e, "backend logout failed, clearing session anyway");
            }
            info!("logged out");
        }
        self.sessions.clear();
    }

    pub async fn list_files(&self) -> Result<Vec<FileRecord>> {
        let _guard = self.begin()?;
        self.catalog.list_files().await
    }

    pub async fn file_table(&self) -> Result<FileTable> {
        let _guard = self.begin()?;
        self.catalog.table().await
    }

    pub async fn upload(&self, data: impl Into<Bytes>, file_name: &str) -> Result<UploadResult> {
        let _guard = self.begin()?;
        self.transfers.upload(data.into(), file_name).await
    }

    /// Upload a local file under its own name.
    pub async fn upload_file<P: AsRef<Path>>(&self, path: P) -> Result<UploadResult> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::ConfigError(format!("not a file: {}", path.display())))?
            .to_string();
        let data = tokio::fs::read(path).await?;
        self.upload(data, &file_name).await
    }

    pub async fn download(&self, handle: &str) -> Result<DownloadResult> {
        let _guard = self.begin()?;
        self.transfers.download(handle).await
    }

    pub async fn delete(&self, handle: &str) -> Result<()> {
        let _guard = self.begin()?;
        self.transfers.delete(handle).await
    }

    /// Delete `handle`, then list the files again.
    pub async fn delete_and_refresh(&self, handle: &str) -> Result<Vec<FileRecord>> {
        let _guard = self.begin()?;
        self.transfers.delete(handle).await?;
        self.catalog.list_files().await
    }

    /// Upload, then list the files again.
    pub async fn upload_and_refresh(
        &self,
        data: impl Into<Bytes>,
        file_name: &str,
    ) -> Result<(UploadResult, Vec<FileRecord>)> {
        let _guard = self.begin()?;
        let uploaded = self.transfers.upload(data.into(), file_name).await?;
        let files = self.catalog.list_files().await?;
        Ok((uploaded, files))
    }
}
