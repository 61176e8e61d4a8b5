use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::sites::{self, PageType};
use crate::telemetry::{self};
use crate::telemetry::ops::sites::Phase as SitesPhase;

/// jobscout sites: list supported career sites
#[derive(Args)]
pub struct SitesCmd {}

#[derive(Serialize)]
pub struct SiteRow {
    pub name: &'static str,
    pub domain: &'static str,
    pub match_pattern: String,
    pub patterns: Vec<PatternRow>,
}

#[derive(Serialize)]
pub struct PatternRow {
    pub page_type: PageType,
    pub pattern: String,
}

#[derive(Serialize)]
pub struct SiteList {
    pub sites: Vec<SiteRow>,
}

pub fn run(_args: SitesCmd) -> Result<()> {
    let log = telemetry::sites();
    let _g = log.root_span().entered();
    let _s = log.span(&SitesPhase::List).entered();

    let list = site_list();
    // Always log listing
    log.info("🌐 Sites:");
    for row in &list.sites {
        log.info(format!("[{}] {} match={}", row.name, row.domain, row.match_pattern));
    }
    log.result(&list)?;
    Ok(())
}

pub fn site_list() -> SiteList {
    let sites = sites::SITES
        .iter()
        .map(|s| SiteRow {
            name: s.name,
            domain: s.domain,
            match_pattern: s.match_pattern.as_str().to_string(),
            patterns: s
                .pattern_table()
                .iter()
                .map(|(page_type, src)| PatternRow { page_type: *page_type, pattern: src.to_string() })
                .collect(),
        })
        .collect();
    SiteList { sites }
}
