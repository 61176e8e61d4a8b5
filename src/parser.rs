use std::sync::Arc;

use anyhow::Result;

use crate::job::{FormFields, JobInfo};
use crate::page::Page;
use crate::sites::SiteDescriptor;
use crate::telemetry::{self};
use crate::telemetry::ops::extract::Phase as ExtractPhase;

/// Memoized result with an explicit invalidation call. Failures are never stored.
#[derive(Debug)]
pub struct Memo<T> {
    value: Option<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self { Memo { value: None } }
}

impl<T: Clone> Memo<T> {
    pub fn get_or_try_init(&mut self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(v) = &self.value { return Ok(v.clone()); }
        let v = f()?;
        self.value = Some(v.clone());
        Ok(v)
    }

    pub fn clear(&mut self) { self.value = None; }

    pub fn is_cached(&self) -> bool { self.value.is_some() }
}

/// Per-site extraction with a small cache. One instance belongs to one
/// controller session; call [`SiteParser::clear_cache`] on navigation.
pub struct SiteParser {
    site: &'static SiteDescriptor,
    job_info: Memo<Arc<JobInfo>>,
    form_fields: Memo<FormFields>,
}

impl SiteParser {
    pub fn new(site: &'static SiteDescriptor) -> Self {
        SiteParser { site, job_info: Memo::default(), form_fields: Memo::default() }
    }

    pub fn site(&self) -> &'static SiteDescriptor { self.site }

    /// Cached job info, extracting from `page` on a miss. Extraction errors
    /// are logged and reported as `None`.
    pub fn parse_job_info(&mut self, page: &Page) -> Option<Arc<JobInfo>> {
        let site = self.site;
        match self.job_info.get_or_try_init(|| extract_job_info(site, page).map(Arc::new)) {
            Ok(job) => Some(job),
            Err(e) => {
                telemetry::extract().error_kv("❌ job info extraction failed", [
                    ("site", site.name.to_string()),
                    ("url", page.url().to_string()),
                    ("error", format!("{e:#}")),
                ]);
                None
            }
        }
    }

    pub fn parse_form_fields(&mut self, page: &Page) -> Option<FormFields> {
        let site = self.site;
        let log = telemetry::extract();
        let _s = log.span(&ExtractPhase::FormFields).entered();
        match self.form_fields.get_or_try_init(|| (site.extractors.form_fields)(page)) {
            Ok(fields) => Some(fields),
            Err(e) => {
                log.error_kv("❌ form field extraction failed", [
                    ("site", site.name.to_string()),
                    ("error", format!("{e:#}")),
                ]);
                None
            }
        }
    }

    // Autofill semantics are undefined; nothing is filled.
    pub fn fill_form(&self, _data: &serde_json::Value) -> FormFields {
        FormFields::default()
    }

    pub fn clear_cache(&mut self) {
        self.job_info.clear();
        self.form_fields.clear();
    }

    pub fn is_cached(&self) -> bool { self.job_info.is_cached() }
}

fn extract_job_info(site: &SiteDescriptor, page: &Page) -> Result<JobInfo> {
    let log = telemetry::extract();
    let _g = log.root_span_kv([("site", site.name.to_string()), ("url", page.url().to_string())]).entered();
    let ex = &site.extractors;

    let title = { let _s = log.span(&ExtractPhase::Title).entered(); (ex.title)(page)? };
    let company = { let _s = log.span(&ExtractPhase::Company).entered(); (ex.company)(page)? };
    let description = { let _s = log.span(&ExtractPhase::Description).entered(); (ex.description)(page)? };
    let location = { let _s = log.span(&ExtractPhase::Location).entered(); (ex.location)(page)? };

    let missing: Vec<&str> = [
        ("title", title.is_none()),
        ("company", company.is_none()),
        ("description", description.is_none()),
        ("location", location.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, miss)| miss.then_some(name))
    .collect();
    if !missing.is_empty() {
        log.debug_kv("partial job info", [("missing", missing.join(","))]);
    }

    Ok(JobInfo { title, company, description, location, source_url: page.url().to_string() })
}
