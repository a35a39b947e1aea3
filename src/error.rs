//! Error types for the megafm library.

use std::fmt;

use thiserror::Error;

use crate::api::ApiErrorCode;

/// The step of a transfer that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    /// Asking the service for an upload slot (`u`).
    RequestUploadSlot,
    /// Sending the file body to the upload slot.
    UploadData,
    /// Asking the service for a download URL (`g`).
    RequestDownloadSlot,
    /// Fetching the file body from the download URL.
    FetchData,
    /// Deleting the node (`d`).
    Delete,
}

impl TransferStep {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TransferStep::RequestUploadSlot => "request upload slot",
            TransferStep::UploadData => "upload data",
            TransferStep::RequestDownloadSlot => "request download slot",
            TransferStep::FetchData => "fetch data",
            TransferStep::Delete => "delete",
        }
    }
}

impl fmt::Display for TransferStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main error type for megafm operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network request failed before a response arrived.
    #[error("Connectivity error: {0}")]
    ConnectivityError(#[from] reqwest::Error),

    /// HTTP request failed with status code.
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// No response within the configured request timeout.
    #[error("Request timed out")]
    TimeoutError,

    /// Response could not be parsed into the expected shape.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The service returned a negative status code.
    #[error("API error: {} - {}", .code.code(), .code.description())]
    RemoteError { code: ApiErrorCode },

    /// Login was rejected by the service.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Operation needs a logged-in session.
    #[error("Not logged in")]
    SessionRequiredError,

    /// A transfer step failed.
    #[error("Transfer failed at step '{step}': {source}")]
    TransferError {
        step: TransferStep,
        #[source]
        source: Box<ClientError>,
    },

    /// Another operation is still running on this manager.
    #[error("Another operation is already in progress")]
    OperationInProgress,

    /// An external MEGAcmd tool failed.
    #[error("Command error: {0}")]
    CommandError(String),

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ClientError {
    /// Wrap an error as a failure of `step`.
    pub fn transfer(step: TransferStep, source: ClientError) -> Self {
        ClientError::TransferError {
            step,
            source: Box::new(source),
        }
    }

    /// The failed transfer step, if this is a transfer error.
    pub fn transfer_step(&self) -> Option<TransferStep> {
        match self {
            ClientError::TransferError { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// True for failures to reach the service at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectivityError(_)
                | ClientError::HttpError(_)
                | ClientError::TimeoutError
        )
    }

    /// True when the service answered with something we could not understand.
    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::ProtocolError(_) | ClientError::JsonError(_))
    }

    /// True when the service reported an error code, including rejected logins.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ClientError::RemoteError { .. } | ClientError::InvalidCredentials
        )
    }
}

/// Result type alias for megafm operations.
pub type Result<T> = std::result::Result<T, ClientError>;
