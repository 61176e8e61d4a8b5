use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::store::{JobStore, StoredJob};
use crate::telemetry::{self};
use crate::telemetry::ops::current::Phase as CurrentPhase;

/// jobscout current show/clear
#[derive(Args)]
pub struct CurrentCmd {
    #[command(subcommand)]
    pub cmd: CurrentSub,
}

#[derive(Subcommand)]
pub enum CurrentSub {
    /// Show the persisted job
    Show,
    /// Remove the persisted job (plan-only by default; use --apply to delete)
    Clear {
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentView {
    pub path: String,
    pub stored: Option<StoredJob>,
}

#[derive(Serialize)]
pub struct ClearPlan {
    pub action: &'static str,
    pub path: String,
    pub present: bool,
}

#[derive(Serialize)]
pub struct ClearResult {
    pub removed: bool,
    pub path: String,
}

pub fn run(cfg: &AppConfig, args: CurrentCmd) -> Result<()> {
    let store = JobStore::new(cfg.store_path.clone());
    match args.cmd {
        CurrentSub::Show => show(&store),
        CurrentSub::Clear { apply } => clear(&store, apply),
    }
}

fn show(store: &JobStore) -> Result<()> {
    let log = telemetry::current();
    let _g = log.root_span_kv([("path", store.path().display().to_string())]).entered();
    let _s = log.span(&CurrentPhase::Load).entered();
    let stored = store.load()?;
    match &stored {
        Some(rec) => log.info(format!(
            "📌 {} at {} (saved {})",
            rec.current_job.title.as_deref().unwrap_or("untitled job"),
            rec.current_job.company.as_deref().unwrap_or("unknown company"),
            rec.saved_at.to_rfc3339(),
        )),
        None => log.info("ℹ️  No job information found. Open a supported job page first."),
    }
    log.result(&CurrentView { path: store.path().display().to_string(), stored })?;
    Ok(())
}

fn clear(store: &JobStore, apply: bool) -> Result<()> {
    let log = telemetry::current();
    let _g = log.root_span_kv([
        ("mode", if apply { "apply".to_string() } else { "plan".to_string() }),
        ("path", store.path().display().to_string()),
    ]).entered();
    let path = store.path().display().to_string();

    if !apply {
        let _s = log.span(&CurrentPhase::Plan).entered();
        let present = store.load()?.is_some();
        log.info(format!("📝 Clear plan — path={} present={}", path, present));
        log.info("   Use --apply to execute.");
        log.plan(&ClearPlan { action: "clear", path, present })?;
        return Ok(());
    }
    let _s = log.span(&CurrentPhase::Clear).entered();
    let removed = store.clear()?;
    if removed { log.info("🗑️ Stored job removed"); } else { log.info("↩️ Nothing stored"); }
    log.result(&ClearResult { removed, path })?;
    Ok(())
}
