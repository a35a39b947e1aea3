//! Raw-protocol backend over the JSON action gateway.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ActionRequest, ApiClient, ApiErrorCode};
use crate::backend::{LoginGrant, StorageBackend};
use crate::crypto::KeyDeriver;
use crate::error::{ClientError, Result, TransferStep};
use crate::fs::{DownloadMode, DownloadResult, FileRecord, UploadResult};
use crate::session::Session;

/// Multipart field name the upload slot expects.
const UPLOAD_FIELD: &str = "file";

/// Backend that speaks the gateway protocol directly.
pub struct ApiBackend {
    client: ApiClient,
    deriver: KeyDeriver,
    download_mode: DownloadMode,
}

impl ApiBackend {
    pub fn new(client: ApiClient, deriver: KeyDeriver, download_mode: DownloadMode) -> Self {
        Self {
            client,
            deriver,
            download_mode,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn string_field(value: &Value, key: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::ProtocolError(format!("response has no '{}' field", key)))
}

#[async_trait]
impl StorageBackend for ApiBackend {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant> {
        let derived_key = self.deriver.derive_password_key(password)?;
        let email_hash = self.deriver.email_hash(email)?;

        let response = self
            .client
            .execute(ActionRequest::login(email, &email_hash))
            .await
            .map_err(|e| match e {
                ClientError::RemoteError {
                    code: ApiErrorCode::NotExist,
                } => ClientError::InvalidCredentials,
                other => other,
            })?;

        let token = string_field(&response, "csid")?;
        info!(backend = self.name(), "login accepted");
        Ok(LoginGrant { token, derived_key })
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        // The gateway session simply stops being used.
        Ok(())
    }

    async fn list(&self, session: &Session) -> Result<Vec<FileRecord>> {
        let response = self
            .client
            .execute(ActionRequest::list_files().with_session(session.token()))
            .await?;

        let Some(raw) = response.get("f").and_then(Value::as_array) else {
            debug!("listing has no 'f' array");
            return Ok(Vec::new());
        };

        Ok(raw.iter().filter_map(FileRecord::from_api).collect())
    }

    async fn upload(
        &self,
        session: &Session,
        data: Bytes,
        file_name: &str,
    ) -> Result<UploadResult> {
        let size = data.len() as u64;

        let slot = self
            .client
            .execute(ActionRequest::upload_slot(size).with_session(session.token()))
            .await
            .and_then(|response| string_field(&response, "p"))
            .map_err(|e| ClientError::transfer(TransferStep::RequestUploadSlot, e))?;
        debug!(file_name, size, "upload slot issued");

        let completion = self
            .client
            .transport()
            .post_multipart(&slot, UPLOAD_FIELD, file_name, data)
            .await
            .map_err(|e| ClientError::transfer(TransferStep::UploadData, e))?;

        info!(file_name, size, "upload finished");
        Ok(UploadResult {
            name: file_name.to_string(),
            size,
            completion,
        })
    }

    async fn download(&self, session: &Session, handle: &str) -> Result<DownloadResult> {
        let url = self
            .client
            .execute(ActionRequest::download_slot(handle).with_session(session.token()))
            .await
            .and_then(|response| string_field(&response, "g"))
            .map_err(|e| ClientError::transfer(TransferStep::RequestDownloadSlot, e))?;

        match self.download_mode {
            DownloadMode::Redirect => Ok(DownloadResult::Url(url)),
            DownloadMode::Fetch => {
                let data = self
                    .client
                    .transport()
                    .get_bytes(&url)
                    .await
                    .map_err(|e| ClientError::transfer(TransferStep::FetchData, e))?;
                info!(handle, bytes = data.len(), "download finished");
                Ok(DownloadResult::Bytes(data))
            }
        }
    }

    async fn delete(&self, session: &Session, handle: &str) -> Result<()> {
        self.client
            .execute(ActionRequest::delete(handle).with_session(session.token()))
            .await
            .map_err(|e| ClientError::transfer(TransferStep::Delete, e))?;
        info!(handle, "deleted");
        Ok(())
    }
}
