use anyhow::{bail, Context, Result};
use reqwest::Client;

use crate::config::AppConfig;

pub fn client(cfg: &AppConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(cfg.fetch_timeout)
        .user_agent(cfg.user_agent.clone())
        .build()
        .context("build HTTP client")?;
    Ok(client)
}

pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().await.with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if !status.is_success() { bail!("GET {} returned {}", url, status); }
    let text = resp.text().await.with_context(|| format!("read body of {url}"))?;
    Ok(text)
}
