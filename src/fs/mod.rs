//! Remote files: records, listing and transfers.

mod catalog;
pub(crate) mod node;
mod transfer;

pub use catalog::FileCatalog;
pub use node::{FileKind, FileRecord};
pub use transfer::{DownloadMode, DownloadResult, Transfers, UploadResult};
