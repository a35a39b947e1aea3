//! # megafm
//!
//! Minimal file manager client for MEGA-style cloud storage.
//!
//! ## Features
//!
//! - **Authentication**: email/password login against the JSON action
//!   gateway, with a configurable password key derivation.
//! - **Files**: list the files of the account (folders are left out),
//!   upload, download and delete.
//! - **Backends**: the raw gateway protocol ([`backend::ApiBackend`]) or the
//!   MEGAcmd command-line tools ([`backend::MegaCmdBackend`]).
//! - **View helpers**: size/date formatting, status banners and file table
//!   rows for a front end.
//!
//! There is no client-side encryption: file bytes go to the service as they
//! are, and names are stored as given.
//!
//! ## Example
//!
//! ```no_run
//! use megafm::{ClientConfig, FileManager};
//!
//! # async fn example() -> megafm::Result<()> {
//! let manager = FileManager::from_config(&ClientConfig::default())?;
//! manager.login("user@example.com", "password").await?;
//!
//! for file in manager.list_files().await? {
//!     println!("{} ({})", file.name, megafm::format_size(file.size));
//! }
//!
//! manager.upload(b"hello".to_vec(), "hello.txt").await?;
//! manager.logout().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod crypto;
pub mod error;
pub mod format;
pub mod fs;
pub mod http;
pub mod manager;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use backend::{LoginGrant, StorageBackend};
pub use config::{BackendKind, ClientConfig};
pub use error::{ClientError, Result, TransferStep};
pub use format::{format_size, format_timestamp};
pub use fs::{
    DownloadMode, DownloadResult, FileCatalog, FileKind, FileRecord, Transfers, UploadResult,
};
pub use manager::FileManager;
pub use session::{Session, SessionStore};
pub use view::{FileRow, FileTable, Operation, RowAction, RowActions, Severity, StatusBanner};
