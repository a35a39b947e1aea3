//! FileManager over the MEGAcmd backend, with the tools faked out.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use megafm::backend::{CommandRunner, MegaCmdBackend};
use megafm::crypto::KeyDeriver;
use megafm::{ClientError, FileManager, Result, TransferStep};
use parking_lot::Mutex;

/// Remote folder contents kept by the fake `mega-*` tools.
#[derive(Default)]
struct FakeTools {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    logged_out: Mutex<bool>,
}

#[async_trait]
impl CommandRunner for FakeTools {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        match program {
            "mega-login" if args[1] == "right" => Ok(String::new()),
            "mega-login" => Err(ClientError::CommandError(
                "[API:err: 12:00:00] Login failed: invalid email or password".into(),
            )),
            "mega-session" => Ok("Your (secret) session is: CMD-SESSION\n".into()),
            "mega-logout" => {
                *self.logged_out.lock() = true;
                Ok("Logging out...".into())
            }
            "mega-ls" => {
                let mut out = String::from("FLAGS VERS SIZE    DATE                NAME\n");
                out.push_str("d---- - -  01Jan2024 00:00:00 Photos\n");
                for (name, data) in self.files.lock().iter() {
                    out.push_str(&format!("---- 1 {} 14Nov2023 22:13:20 {}\n", data.len(), name));
                }
                Ok(out)
            }
            "mega-put" => {
                let data = tokio::fs::read(&args[0]).await?;
                let name = args[1].trim_start_matches("/Docs/").to_string();
                self.files.lock().insert(name, data);
                Ok(String::new())
            }
            "mega-get" => {
                let name = args[0].rsplit('/').next().unwrap_or_default().to_string();
                let data = self
                    .files
                    .lock()
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| ClientError::CommandError("Couldn't find".into()))?;
                tokio::fs::write(std::path::Path::new(&args[1]).join(&name), data).await?;
                Ok(String::new())
            }
            "mega-rm" => {
                let name = args[0].rsplit('/').next().unwrap_or_default();
                self.files
                    .lock()
                    .remove(name)
                    .map(|_| String::new())
                    .ok_or_else(|| ClientError::CommandError("No such file".into()))
            }
            other => panic!("unexpected tool {}", other),
        }
    }
}

fn manager(tools: Arc<FakeTools>) -> FileManager {
    FileManager::new(Arc::new(MegaCmdBackend::new(
        tools,
        "/Docs",
        KeyDeriver::default(),
    )))
}

#[tokio::test]
async fn full_session_over_megacmd() {
    let tools = Arc::new(FakeTools::default());
    let manager = manager(tools.clone());

    manager.login("bob@example.com", "right").await.unwrap();
    assert_eq!(manager.session().token(), Some("CMD-SESSION"));
    assert!(manager.list_files().await.unwrap().is_empty());

    manager.upload(b"abc".to_vec(), "notes.txt").await.unwrap();
    let files = manager.list_files().await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].handle, "/Docs/notes.txt");
    assert_eq!(files[0].size, 3);

    let data = manager.download(&files[0].handle).await.unwrap();
    assert_eq!(data.as_bytes().map(|b| b.to_vec()), Some(b"abc".to_vec()));

    assert!(manager.delete_and_refresh("/Docs/notes.txt").await.unwrap().is_empty());

    manager.logout().await;
    assert!(*tools.logged_out.lock());
    assert!(!manager.is_logged_in());
}

#[tokio::test]
async fn rejected_megacmd_login() {
    let manager = manager(Arc::new(FakeTools::default()));
    let err = manager.login("bob@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidCredentials));
    assert!(!manager.is_logged_in());
}

#[tokio::test]
async fn failed_tool_reports_transfer_step() {
    let manager = manager(Arc::new(FakeTools::default()));
    manager.login("bob@example.com", "right").await.unwrap();

    let err = manager.delete("/Docs/ghost.txt").await.unwrap_err();
    assert_eq!(err.transfer_step(), Some(TransferStep::Delete));

    let err = manager.download("/Docs/ghost.txt").await.unwrap_err();
    assert_eq!(err.transfer_step(), Some(TransferStep::FetchData));
}
