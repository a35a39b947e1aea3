//! Example: List files through MEGAcmd instead of the gateway
//!
//! Usage:
//!   cargo run --example megacmd_ls -- --email YOUR_EMAIL --password YOUR_PASSWORD [--root /Root]
//!
//! Needs the MEGAcmd tools (`mega-login`, `mega-ls`, ...) on PATH.

mod cli;

use clap::Parser;
use cli::{fail, init_tracing, Connection};
use megafm::{format_size, BackendKind, Operation};

#[derive(Parser, Debug)]
#[command(about = "List remote files with MEGAcmd")]
struct Opts {
    #[command(flatten)]
    conn: Connection,

    /// Remote folder to list
    #[arg(long, default_value = "/")]
    root: String,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = Opts::parse();

    let mut config = opts
        .conn
        .load_config()
        .unwrap_or_else(|e| fail(&e, Operation::Login));
    config.backend = BackendKind::Megacmd;
    config.megacmd_root = opts.root.clone();

    let manager = opts.conn.login_with(&config).await;
    let files = manager
        .list_files()
        .await
        .unwrap_or_else(|e| fail(&e, Operation::ListFiles));

    println!("Files in {}:", opts.root);
    for file in &files {
        println!("  {} {}", file.name, format_size(file.size));
    }

    manager.logout().await;
}
