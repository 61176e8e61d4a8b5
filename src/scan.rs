use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use url::Url;

use crate::config::AppConfig;
use crate::fetch;
use crate::job::JobInfo;
use crate::page::Page;
use crate::parser::SiteParser;
use crate::sites::{self, PageType};
use crate::store::JobStore;
use crate::telemetry::{self};
use crate::telemetry::ops::scan::Phase as ScanPhase;

/// jobscout scan <url>: extract job info (plan-only by default; use --apply to persist)
#[derive(Args)]
pub struct ScanCmd {
    pub url: String,
    /// Read the document from a saved HTML file instead of fetching the URL
    #[arg(long)]
    pub html: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    pub apply: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub url: String,
    pub site: Option<&'static str>,
    pub page_type: PageType,
    pub job: Option<Arc<JobInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

pub async fn run(cfg: &AppConfig, args: ScanCmd) -> Result<()> {
    let log = telemetry::scan();
    let _g = log.root_span_kv([
        ("mode", if args.apply { "apply".to_string() } else { "plan".to_string() }),
        ("url", args.url.clone()),
        ("html", format!("{:?}", args.html)),
    ]).entered();

    if Url::parse(&args.url).is_err() { bail!("Invalid URL: {}", args.url); }

    let html = {
        let _s = log.span(&ScanPhase::Load).entered();
        match &args.html {
            Some(path) => std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?,
            None => {
                let client = fetch::client(cfg)?;
                fetch::fetch_page(&client, &args.url).await?
            }
        }
    };
    let page = Page::parse(args.url.clone(), &html);

    let mut outcome = scan_page(&page);
    match (&outcome.site, &outcome.job) {
        (None, _) => log.info(format!("🔎 {} is not a supported job site", outcome.url)),
        (Some(site), Some(job)) => log.info(format!(
            "📄 {} {} — title={:?} company={:?} location={:?} sections={}",
            site,
            outcome.page_type.as_str(),
            job.title,
            job.company,
            job.location,
            job.description.as_ref().map(|d| d.len()).unwrap_or(0),
        )),
        (Some(site), None) => log.warn(format!("⚠️ {} page but no job info could be extracted", site)),
    }

    if !args.apply {
        let _s = log.span(&ScanPhase::Persist).entered();
        log.info("   Use --apply to persist the job.");
        log.plan(&outcome)?;
        return Ok(());
    }

    let _s = log.span(&ScanPhase::Persist).entered();
    match &outcome.job {
        Some(job) => {
            let store = JobStore::new(cfg.store_path.clone());
            store.save(job)?;
            log.info(format!("💾 Job saved to {}", store.path().display()));
            outcome.saved_to = Some(store.path().display().to_string());
        }
        None => log.info("↩️ Nothing to save"),
    }
    log.result(&outcome)?;
    Ok(())
}

pub fn scan_page(page: &Page) -> ScanOutcome {
    let log = telemetry::scan();
    let site = { let _s = log.span(&ScanPhase::Identify).entered(); sites::identify(page.url()) };
    let Some(site) = site else {
        return ScanOutcome { url: page.url().to_string(), site: None, page_type: PageType::Unknown, job: None, saved_to: None };
    };
    let page_type = { let _s = log.span(&ScanPhase::Classify).entered(); sites::classify(page.url(), site) };
    let job = {
        let _s = log.span(&ScanPhase::Extract).entered();
        SiteParser::new(site).parse_job_info(page)
    };
    ScanOutcome { url: page.url().to_string(), site: Some(site.name), page_type, job, saved_to: None }
}
