//! Example: Delete a file by handle
//!
//! Usage:
//!   cargo run --example rm -- --email YOUR_EMAIL --password YOUR_PASSWORD <HANDLE>

mod cli;

use clap::Parser;
use cli::{fail, init_tracing, Connection};
use megafm::{Operation, StatusBanner};

#[derive(Parser, Debug)]
#[command(about = "Delete a remote file and list what is left")]
struct Opts {
    #[command(flatten)]
    conn: Connection,

    /// Handle from `ls`
    handle: String,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = Opts::parse();
    let manager = opts.conn.login().await;

    println!("{}", StatusBanner::in_progress(Operation::Delete).message);
    let remaining = manager
        .delete_and_refresh(&opts.handle)
        .await
        .unwrap_or_else(|e| fail(&e, Operation::Delete));

    if let Some(done) = StatusBanner::completed(Operation::Delete) {
        println!("{}", done.message);
    }
    for file in remaining {
        println!("  {}", file.name);
    }

    manager.logout().await;
}
