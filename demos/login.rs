//! Example: Login and show the session
//!
//! Usage:
//!   cargo run --example login -- --email YOUR_EMAIL --password YOUR_PASSWORD [--config megafm.toml]

mod cli;

use clap::Parser;
use cli::{init_tracing, Connection};

#[derive(Parser, Debug)]
#[command(about = "Log in and print the session token")]
struct Opts {
    #[command(flatten)]
    conn: Connection,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let opts = Opts::parse();

    let manager = opts.conn.login().await;
    let session = manager.session();
    let token = session.token().unwrap_or_default();

    println!("Login successful!");
    println!();
    println!("Backend: {}", manager.backend_name());
    println!("Email: {}", opts.conn.email);
    println!(
        "Session: {}...",
        token.chars().take(20).collect::<String>()
    );

    manager.logout().await;
}
