//! Example: List the files in a MEGA account
//!
//! Usage:
//!   cargo run --example ls -- --email YOUR_EMAIL --password YOUR_PASSWORD

mod cli;

use clap::Parser;
use cli::{fail, init_tracing, Connection};
use megafm::Operation;

#[derive(Parser, Debug)]
#[command(about = "List remote files")]
struct Opts {
    #[command(flatten)]
    conn: Connection,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = Opts::parse();
    let manager = opts.conn.login().await;

    let table = manager
        .file_table()
        .await
        .unwrap_or_else(|e| fail(&e, Operation::ListFiles));

    if let Some(placeholder) = table.placeholder() {
        println!("  {}", placeholder);
    }
    for row in table.rows() {
        println!(
            "  {:<40} {:>12}  {}  [{}]",
            row.name, row.size, row.modified, row.handle
        );
    }

    manager.logout().await;
}
