//! Display-only projections for a view layer.
//!
//! Nothing here touches the network. A front end renders [`FileTable`] rows,
//! shows a [`StatusBanner`], and dispatches row buttons through
//! [`RowActions`].

use std::collections::HashMap;
use std::fmt;

use crate::error::ClientError;
use crate::format::{format_size, format_timestamp};
use crate::fs::FileRecord;

/// Banner severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Danger,
    Success,
}

impl Severity {
    /// CSS class name (`alert-info`, `alert-danger`, ...).
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "alert-info",
            Severity::Warning => "alert-warning",
            Severity::Danger => "alert-danger",
            Severity::Success => "alert-success",
        }
    }
}

/// User-triggered operations, for status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    ListFiles,
    Upload,
    Download,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Login => "Login",
            Operation::ListFiles => "Loading files",
            Operation::Upload => "Upload",
            Operation::Download => "Download",
            Operation::Delete => "Delete",
        })
    }
}

/// A status message with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub message: String,
    pub severity: Severity,
}

impl StatusBanner {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    /// Progress message shown while `op` runs.
    pub fn in_progress(op: Operation) -> Self {
        Self::info(match op {
            Operation::Login => "Logging in...",
            Operation::ListFiles => "Loading files...",
            Operation::Upload => "Uploading file...",
            Operation::Download => "Preparing download...",
            Operation::Delete => "Deleting file...",
        })
    }

    /// Message shown after `op` succeeded, if any.
    pub fn completed(op: Operation) -> Option<Self> {
        match op {
            Operation::Upload => Some(Self::success("File uploaded successfully!")),
            Operation::Delete => Some(Self::success("File deleted successfully!")),
            _ => None,
        }
    }

    /// Message shown after `op` failed with `err`.
    pub fn from_error(err: &ClientError, op: Operation) -> Self {
        match err {
            ClientError::InvalidCredentials => {
                Self::new("Invalid email or password", Severity::Danger)
            }
            ClientError::SessionRequiredError => Self::new("Please login first", Severity::Warning),
            ClientError::OperationInProgress => Self::new(
                "Please wait for the current operation to finish",
                Severity::Warning,
            ),
            ClientError::RemoteError { code } if code.is_transient() => Self::new(
                format!("{} failed: {}. Please try again later.", op, code.description()),
                Severity::Danger,
            ),
            _ => Self::new(format!("{} failed. Please try again.", op), Severity::Danger),
        }
    }
}

/// One rendered file row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    /// Row identity; also the argument for the row's actions.
    pub handle: String,
    pub name: String,
    pub size: String,
    pub modified: String,
}

impl FileRow {
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            handle: record.handle.clone(),
            name: record.name.clone(),
            size: format_size(record.size),
            modified: format_timestamp(record.timestamp),
        }
    }
}

/// Rows of the file table, or a placeholder when there are none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileTable {
    rows: Vec<FileRow>,
}

impl FileTable {
    pub const EMPTY_PLACEHOLDER: &'static str = "No files found";

    pub fn from_records(records: &[FileRecord]) -> Self {
        Self {
            rows: records.iter().map(FileRow::from_record).collect(),
        }
    }

    pub fn rows(&self) -> &[FileRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text for the single placeholder row shown when the table is empty.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.rows.is_empty().then_some(Self::EMPTY_PLACEHOLDER)
    }
}

/// Actions a file row exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Download,
    Delete,
}

type Handler<T> = Box<dyn Fn(&str) -> T + Send + Sync>;

/// Per-row handler registry.
///
/// Handlers are bound when a table is rendered and looked up by row handle
/// and action when a button fires. Rendering a new table replaces them.
pub struct RowActions<T> {
    handlers: HashMap<(String, RowAction), Handler<T>>,
}

impl<T> Default for RowActions<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<T> RowActions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `action` on the row with `handle`.
    pub fn bind<F>(&mut self, handle: &str, action: RowAction, handler: F)
    where
        F: Fn(&str) -> T + Send + Sync + 'static,
    {
        self.handlers
            .insert((handle.to_string(), action), Box::new(handler));
    }

    /// Bind the same download/delete handlers to every row of `table`,
    /// dropping bindings from earlier renders.
    pub fn bind_table<D, R>(&mut self, table: &FileTable, download: D, delete: R)
    where
        D: Fn(&str) -> T + Clone + Send + Sync + 'static,
        R: Fn(&str) -> T + Clone + Send + Sync + 'static,
    {
        self.handlers.clear();
        for row in table.rows() {
            self.bind(&row.handle, RowAction::Download, download.clone());
            self.bind(&row.handle, RowAction::Delete, delete.clone());
        }
    }

    /// Run the handler bound to (`handle`, `action`), if any.
    pub fn dispatch(&self, handle: &str, action: RowAction) -> Option<T> {
        self.handlers
            .get(&(handle.to_string(), action))
            .map(|handler| handler(handle))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
