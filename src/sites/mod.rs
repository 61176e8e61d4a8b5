//! Site registry and URL classification.
//!
//! A site is a plain record: a domain, a URL pattern per page type and a set
//! of extractor functions. Supporting another career site means writing one
//! module that exposes a `SiteDescriptor` and listing it in [`SITES`].

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::job::{FormFields, Sections};
use crate::page::Page;

pub mod lever;
pub mod text;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageType {
    JobView,
    ApplyForm,
    PostApply,
    Unknown,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::JobView => "JOB_VIEW",
            PageType::ApplyForm => "APPLY_FORM",
            PageType::PostApply => "POST_APPLY",
            PageType::Unknown => "UNKNOWN",
        }
    }
}

/// Page-type patterns of one site. Must be mutually exclusive.
pub struct PagePatterns {
    pub apply_form: LazyLock<Regex>,
    pub job_view: LazyLock<Regex>,
    pub post_apply: LazyLock<Regex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlParts {
    pub company: String,
    pub job_id: String,
}

pub type FieldFn = fn(&Page) -> Result<Option<String>>;

/// Extraction capabilities of a site. Each function runs its own fallback
/// chain and reports a selector miss as `Ok(None)`.
pub struct Extractors {
    pub title: FieldFn,
    pub company: FieldFn,
    pub location: FieldFn,
    pub description: fn(&Page) -> Result<Option<Sections>>,
    pub form_fields: fn(&Page) -> Result<FormFields>,
}

pub struct SiteDescriptor {
    pub name: &'static str,
    pub domain: &'static str,
    /// Whole-site pattern used by [`identify`].
    pub match_pattern: LazyLock<Regex>,
    pub patterns: PagePatterns,
    pub parse_url: fn(&str) -> Option<UrlParts>,
    pub extractors: Extractors,
}

impl SiteDescriptor {
    pub fn is_match(&self, url: &str) -> bool {
        self.match_pattern.is_match(url)
    }

    /// Pattern source per page type, in classification priority order.
    pub fn pattern_table(&self) -> [(PageType, &str); 3] {
        [
            (PageType::ApplyForm, self.patterns.apply_form.as_str()),
            (PageType::JobView, self.patterns.job_view.as_str()),
            (PageType::PostApply, self.patterns.post_apply.as_str()),
        ]
    }
}

pub static SITES: [&SiteDescriptor; 1] = [&lever::LEVER];

/// First registered site whose match pattern accepts `url`.
pub fn identify(url: &str) -> Option<&'static SiteDescriptor> {
    SITES.iter().copied().find(|site| site.is_match(url))
}

/// Page type of `url` on `site`; apply-form wins over job-view wins over post-apply.
pub fn classify(url: &str, site: &SiteDescriptor) -> PageType {
    let p = &site.patterns;
    if p.apply_form.is_match(url) { return PageType::ApplyForm; }
    if p.job_view.is_match(url) { return PageType::JobView; }
    if p.post_apply.is_match(url) { return PageType::PostApply; }
    PageType::Unknown
}

pub fn is_job_site(url: &str) -> bool {
    identify(url).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identify_lever_urls() {
        let site = identify("https://jobs.lever.co/acme/1234-abcd").expect("lever");
        assert_eq!(site.name, "Lever");
        assert!(identify("https://boards.greenhouse.io/acme/jobs/1").is_none());
        assert!(identify("https://jobs.lever.co/acme").is_none());
        assert!(is_job_site("https://jobs.lever.co/acme/1234/apply"));
        assert!(!is_job_site("http://jobs.lever.co/acme/1234"));
    }

    #[test]
    fn classify_priority_and_unknown() {
        let site = &lever::LEVER;
        assert_eq!(classify("https://jobs.lever.co/acme/1234", site), PageType::JobView);
        assert_eq!(classify("https://jobs.lever.co/acme/1234/", site), PageType::JobView);
        assert_eq!(classify("https://jobs.lever.co/acme/1234/apply", site), PageType::ApplyForm);
        assert_eq!(classify("https://jobs.lever.co/acme/1234/thanks/", site), PageType::PostApply);
        assert_eq!(classify("https://jobs.lever.co/acme/1234/other", site), PageType::Unknown);
        // a query string is part of the last path segment for the job pattern only
        assert_eq!(classify("https://jobs.lever.co/acme/1234?lever-source=x", site), PageType::JobView);
        assert_eq!(classify("https://jobs.lever.co/acme/1234/apply?lever-source=x", site), PageType::Unknown);
    }

    #[test]
    fn page_patterns_are_mutually_exclusive() {
        let urls = [
            "https://jobs.lever.co/acme/1234",
            "https://jobs.lever.co/acme/1234/",
            "https://jobs.lever.co/acme/apply",
            "https://jobs.lever.co/acme/1234/apply",
            "https://jobs.lever.co/acme/thanks/apply",
            "https://jobs.lever.co/acme/1234/thanks",
            "https://jobs.lever.co/apply/thanks",
        ];
        for site in SITES.iter() {
            for url in urls {
                let hits = site.pattern_table().iter().filter(|(_, src)| Regex::new(src).unwrap().is_match(url)).count();
                assert!(hits <= 1, "{url} matched {hits} page types on {}", site.name);
            }
        }
    }

    #[test]
    fn page_type_serializes_screaming() {
        assert_eq!(serde_json::to_string(&PageType::ApplyForm).unwrap(), "\"APPLY_FORM\"");
        assert_eq!(PageType::PostApply.as_str(), "POST_APPLY");
    }
}
