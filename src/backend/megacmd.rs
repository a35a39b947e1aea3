//! Backend driving the MEGAcmd command-line tools.
//!
//! MEGAcmd keeps its own logged-in session; this adapter only shells out to
//! `mega-login`, `mega-session`, `mega-ls`, `mega-put`, `mega-get`, `mega-rm`
//! and `mega-logout`. Requires MEGAcmd on `PATH` (https://mega.nz/cmd).

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDateTime;
use tokio::process::Command;
use tracing::{debug, info};

use crate::backend::{LoginGrant, StorageBackend};
use crate::crypto::KeyDeriver;
use crate::error::{ClientError, Result, TransferStep};
use crate::fs::{DownloadResult, FileKind, FileRecord, UploadResult};
use crate::session::Session;

/// Runs an external program and returns its stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        debug!(program, "running MEGAcmd tool");
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                ClientError::CommandError(format!("Failed to execute {}: {}", program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", program, output.status)
            } else {
                stderr
            };
            return Err(ClientError::CommandError(message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Backend over MEGAcmd.
pub struct MegaCmdBackend {
    runner: Arc<dyn CommandRunner>,
    root: String,
    deriver: KeyDeriver,
}

impl MegaCmdBackend {
    /// Create a backend listing and uploading under `root` (e.g. `/`).
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        root: impl Into<String>,
        deriver: KeyDeriver,
    ) -> Self {
        let mut root = root.into();
        if root.is_empty() {
            root.push('/');
        }
        Self {
            runner,
            root,
            deriver,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(program, &args).await
    }

    fn remote_path(&self, name: &str) -> String {
        format!("{}/{}", self.root.trim_end_matches('/'), name)
    }
}

/// Extract the token from `mega-session` output ("... session is: <token>").
fn parse_session_token(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.split_once("session is:"))
        .map(|(_, token)| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Parse one line of `mega-ls -l` output: `FLAGS VERS SIZE DATE TIME NAME...`.
fn parse_ls_line(line: &str, parent: &str) -> Option<FileRecord> {
    if line.contains("FLAGS") && line.contains("VERS") {
        return None;
    }
    if line.starts_with('/') && line.ends_with(':') {
        return None;
    }

    // The name is everything after the fifth column, inner spaces included.
    let mut rest = line.trim_start();
    let mut parts = [""; 5];
    for part in parts.iter_mut() {
        let end = rest.find(char::is_whitespace)?;
        *part = &rest[..end];
        rest = rest[end..].trim_start();
    }
    let name = rest.trim_end_matches(['\r', '\n']);
    if name.is_empty() {
        return None;
    }

    let kind = if parts[0].starts_with('d') {
        FileKind::Folder
    } else {
        FileKind::File
    };
    let size = parts[2].parse::<u64>().unwrap_or(0);
    let timestamp = NaiveDateTime::parse_from_str(
        &format!("{} {}", parts[3], parts[4]),
        "%d%b%Y %H:%M:%S",
    )
    .map(|dt| dt.and_utc().timestamp())
    .unwrap_or(0);
    let handle = format!("{}/{}", parent.trim_end_matches('/'), name);

    Some(FileRecord::new(handle, name, size, timestamp, kind))
}

fn base_name(path: &str) -> Result<&str> {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ClientError::ProtocolError(format!("no file name in '{}'", path)))
}

fn is_rejected_login(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("invalid email or password") || lower.contains("login failed")
}

#[async_trait]
impl StorageBackend for MegaCmdBackend {
    fn name(&self) -> &'static str {
        "megacmd"
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginGrant> {
        let derived_key = self.deriver.derive_password_key(password)?;

        self.run("mega-login", &[email, password])
            .await
            .map_err(|e| match e {
                ClientError::CommandError(msg) if is_rejected_login(&msg) => {
                    ClientError::InvalidCredentials
                }
                other => other,
            })?;

        let output = self.run("mega-session", &[]).await?;
        let token = parse_session_token(&output).ok_or_else(|| {
            ClientError::ProtocolError("mega-session printed no session".to_string())
        })?;

        info!(backend = self.name(), "login accepted");
        Ok(LoginGrant { token, derived_key })
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        self.run("mega-logout", &[]).await.map(|_| ())
    }

    async fn list(&self, _session: &Session) -> Result<Vec<FileRecord>> {
        let output = self.run("mega-ls", &["-l", &self.root]).await?;
        Ok(output
            .lines()
            .filter_map(|line| parse_ls_line(line, &self.root))
            .collect())
    }

    async fn upload(
        &self,
        _session: &Session,
        data: Bytes,
        file_name: &str,
    ) -> Result<UploadResult> {
        let upload = async {
            let name = base_name(file_name)?;
            let staging = tempfile::tempdir()?;
            let local = staging.path().join(name);
            tokio::fs::write(&local, &data).await?;

            let local = local.to_string_lossy().into_owned();
            let output = self.run("mega-put", &[&local, &self.remote_path(name)]).await?;
            Ok::<_, ClientError>(output.trim().to_string())
        };

        let completion = upload
            .await
            .map_err(|e| ClientError::transfer(TransferStep::UploadData, e))?;

        info!(file_name, size = data.len(), "upload finished");
        Ok(UploadResult {
            name: file_name.to_string(),
            size: data.len() as u64,
            completion,
        })
    }

    async fn download(&self, _session: &Session, handle: &str) -> Result<DownloadResult> {
        let fetch = async {
            let name = base_name(handle)?;
            let staging = tempfile::tempdir()?;
            let target = staging.path().to_string_lossy().into_owned();
            self.run("mega-get", &[handle, &target]).await?;

            let data = tokio::fs::read(staging.path().join(name)).await?;
            Ok::<_, ClientError>(Bytes::from(data))
        };

        let data = fetch
            .await
            .map_err(|e| ClientError::transfer(TransferStep::FetchData, e))?;
        info!(handle, bytes = data.len(), "download finished");
        Ok(DownloadResult::Bytes(data))
    }

    async fn delete(&self, _session: &Session, handle: &str) -> Result<()> {
        self.run("mega-rm", &[handle])
            .await
            .map_err(|e| ClientError::transfer(TransferStep::Delete, e))?;
        info!(handle, "deleted");
        Ok(())
    }
}
