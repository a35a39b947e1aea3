//! Example: Upload a local file
//!
//! Usage:
//!   cargo run --example upload -- --email YOUR_EMAIL --password YOUR_PASSWORD <LOCAL_FILE>

mod cli;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use cli::{fail, init_tracing, Connection};
use indicatif::{ProgressBar, ProgressStyle};
use megafm::{format_size, Operation, StatusBanner};

#[derive(Parser, Debug)]
#[command(about = "Upload a file and list the account again")]
struct Opts {
    #[command(flatten)]
    conn: Connection,

    /// File to upload
    file: PathBuf,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = Opts::parse();
    let manager = opts.conn.login().await;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(StatusBanner::in_progress(Operation::Upload).message);

    let uploaded = match manager.upload_file(&opts.file).await {
        Ok(uploaded) => uploaded,
        Err(e) => {
            spinner.finish_and_clear();
            fail(&e, Operation::Upload);
        }
    };
    if let Some(done) = StatusBanner::completed(Operation::Upload) {
        spinner.finish_with_message(format!(
            "{} {} ({})",
            done.message,
            uploaded.name,
            format_size(uploaded.size)
        ));
    }

    let files = manager
        .list_files()
        .await
        .unwrap_or_else(|e| fail(&e, Operation::ListFiles));
    println!("{} file(s) in the account", files.len());

    manager.logout().await;
}
