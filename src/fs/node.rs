//! Remote file records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a remote entry is a file or a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    File,
    /// Folders and the special containers (root, inbox, trash, ...).
    Folder,
}

impl FileKind {
    /// Map the gateway's node type (`t`): 0 is a file, anything else a container.
    pub fn from_node_type(t: i64) -> Self {
        if t == 0 {
            FileKind::File
        } else {
            FileKind::Folder
        }
    }
}

/// A remote file or folder as returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Opaque handle used for download and delete.
    pub handle: String,
    pub name: String,
    /// Size in bytes (0 for folders).
    pub size: u64,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    pub kind: FileKind,
}

impl FileRecord {
    pub fn new(
        handle: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        timestamp: i64,
        kind: FileKind,
    ) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            size,
            timestamp,
            kind,
        }
    }

    /// Build a record from one element of the gateway's `f` array.
    ///
    /// Returns `None` when the handle or type is missing. A missing name
    /// falls back to the handle; missing size and timestamp become 0.
    pub fn from_api(raw: &Value) -> Option<Self> {
        let handle = raw.get("h")?.as_str()?;
        let kind = FileKind::from_node_type(raw.get("t")?.as_i64()?);
        let name = raw.get("n").and_then(Value::as_str).unwrap_or(handle);
        let size = raw.get("s").and_then(Value::as_u64).unwrap_or(0);
        let timestamp = raw.get("ts").and_then(Value::as_i64).unwrap_or(0);

        Some(Self::new(handle, name, size, timestamp, kind))
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }
}
