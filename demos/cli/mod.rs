use std::path::PathBuf;
use std::process;

use clap::Args;
use megafm::{ClientConfig, FileManager, Operation, StatusBanner};
use tracing_subscriber::{fmt, EnvFilter};

/// Options shared by every demo.
#[derive(Args, Debug)]
pub struct Connection {
    /// Account email
    #[arg(short, long, env = "MEGAFM_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "MEGAFM_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Proxy for all requests (overrides the config file)
    #[arg(long)]
    pub proxy: Option<String>,
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("megafm=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

/// Print the banner for a failed operation and exit.
pub fn fail(err: &megafm::ClientError, op: Operation) -> ! {
    let banner = StatusBanner::from_error(err, op);
    eprintln!("[{}] {} ({})", banner.severity.css_class(), banner.message, err);
    process::exit(1);
}

impl Connection {
    pub fn load_config(&self) -> megafm::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::from_env()?,
        };
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
        Ok(config)
    }

    /// Build a manager from the config and log in, exiting on failure.
    #[allow(dead_code)]
    pub async fn login(&self) -> FileManager {
        let config = self.load_config().unwrap_or_else(|e| fail(&e, Operation::Login));
        self.login_with(&config).await
    }

    pub async fn login_with(&self, config: &ClientConfig) -> FileManager {
        let manager =
            FileManager::from_config(config).unwrap_or_else(|e| fail(&e, Operation::Login));

        println!("{}", StatusBanner::in_progress(Operation::Login).message);
        if let Err(e) = manager.login(&self.email, &self.password).await {
            fail(&e, Operation::Login);
        }
        manager
    }
}
