//! Storage backends.
//!
//! Every way of talking to the storage service implements [`StorageBackend`],
//! so the catalog and transfer controllers exist once:
//!
//! ```text
//!          FileCatalog / Transfers / FileManager
//!                        │
//!               StorageBackend trait
//!                 ┌──────┴───────┐
//!                 ▼              ▼
//!            ApiBackend    MegaCmdBackend
//!         (JSON gateway)   (MEGAcmd tools)
//! ```

pub mod api;
pub mod megacmd;

pub use api::ApiBackend;
pub use megacmd::{CommandRunner, MegaCmdBackend, TokioCommandRunner};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::fs::{DownloadResult, FileRecord, UploadResult};
use crate::session::Session;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    /// Server-issued session token.
    pub token: String,
    /// Key material derived from the password.
    pub derived_key: Vec<u8>,
}

/// Remote storage capability shared by all adapters.
///
/// Implementations report failures of multi-step transfers as
/// [`crate::ClientError::TransferError`] with the step that failed; plain
/// errors are attributed to the operation's main step by the controllers.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Authenticate. A rejected email/password pair is
    /// [`crate::ClientError::InvalidCredentials`].
    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant>;

    /// End the remote session, if the backend has one to end.
    async fn logout(&self, session: &Session) -> Result<()>;

    /// Raw listing, folders included.
    async fn list(&self, session: &Session) -> Result<Vec<FileRecord>>;

    async fn upload(&self, session: &Session, data: Bytes, file_name: &str)
    -> Result<UploadResult>;

    async fn download(&self, session: &Session, handle: &str) -> Result<DownloadResult>;

    async fn delete(&self, session: &Session, handle: &str) -> Result<()>;
}
