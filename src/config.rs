use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_STORE: &str = ".jobscout/current_job.json";
pub const DEFAULT_USER_AGENT: &str = concat!("jobscout/", env!("CARGO_PKG_VERSION"));

/// Runtime settings. Read from the environment (after `.env` is loaded);
/// CLI flags override individual values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let store_path = env::var("JOBSCOUT_STORE").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE));
        let fetch_timeout = match env::var("JOBSCOUT_FETCH_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.trim().parse::<u64>().with_context(|| format!("JOBSCOUT_FETCH_TIMEOUT_SECS={v:?} is not a number of seconds"))?),
            Err(_) => Duration::from_secs(20),
        };
        let user_agent = env::var("JOBSCOUT_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        Ok(AppConfig { store_path, fetch_timeout, user_agent })
    }

    pub fn with_store(mut self, store: Option<PathBuf>) -> Self {
        if let Some(p) = store { self.store_path = p; }
        self
    }
}
