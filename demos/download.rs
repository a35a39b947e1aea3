//! Example: Download a file by handle
//!
//! Usage:
//!   cargo run --example download -- --email YOUR_EMAIL --password YOUR_PASSWORD <HANDLE> [LOCAL_PATH]
//!
//! With `download_mode = "redirect"` in the config, the download URL is
//! printed instead.

mod cli;

use std::path::PathBuf;

use clap::Parser;
use cli::{fail, init_tracing, Connection};
use megafm::{format_size, DownloadResult, Operation};

#[derive(Parser, Debug)]
#[command(about = "Download a remote file")]
struct Opts {
    #[command(flatten)]
    conn: Connection,

    /// Handle from `ls`
    handle: String,

    /// Where to write the file (defaults to the remote name)
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = Opts::parse();
    let manager = opts.conn.login().await;

    let files = manager
        .list_files()
        .await
        .unwrap_or_else(|e| fail(&e, Operation::ListFiles));
    let name = files
        .iter()
        .find(|f| f.handle == opts.handle)
        .map(|f| f.name.clone())
        .unwrap_or_else(|| opts.handle.clone());

    match manager.download(&opts.handle).await {
        Ok(DownloadResult::Url(url)) => println!("Download URL: {}", url),
        Ok(DownloadResult::Bytes(data)) => {
            let output = opts.output.unwrap_or_else(|| PathBuf::from(&name));
            if let Err(e) = tokio::fs::write(&output, &data).await {
                eprintln!("Failed to write {}: {}", output.display(), e);
                std::process::exit(1);
            }
            println!(
                "Saved {} ({}) to {}",
                name,
                format_size(data.len() as u64),
                output.display()
            );
        }
        Err(e) => fail(&e, Operation::Download),
    }

    manager.logout().await;
}
