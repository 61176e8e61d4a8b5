use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use super::text::{non_empty, normalize_block, normalize_header, strip_postal_code, strip_trailing_parenthetical};
use super::{Extractors, PagePatterns, SiteDescriptor, UrlParts};
use crate::job::{FormFields, Sections};
use crate::page::{element_raw_text, element_text, Page};

pub static LEVER: SiteDescriptor = SiteDescriptor {
    name: "Lever",
    domain: "jobs.lever.co",
    match_pattern: LazyLock::new(|| Regex::new(r"^https://jobs\.lever\.co/([^/]+)/([^/]+)").expect("lever site regex")),
    patterns: PagePatterns {
        apply_form: LazyLock::new(|| Regex::new(r"^https://jobs\.lever\.co/([^/]+)/([^/]+)/apply/?$").expect("lever apply regex")),
        job_view: LazyLock::new(|| Regex::new(r"^https://jobs\.lever\.co/([^/]+)/([^/]+)/?$").expect("lever job regex")),
        post_apply: LazyLock::new(|| Regex::new(r"^https://jobs\.lever\.co/([^/]+)/([^/]+)/thanks/?$").expect("lever thanks regex")),
    },
    parse_url,
    extractors: Extractors {
        title: job_title,
        company: company_name,
        location,
        description,
        form_fields,
    },
};

static COMPANY_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"jobs\.lever\.co/([^/?#]+)").expect("lever slug regex"));
// "Company - Job Title (W)": prefix before the first dash, suffix after it
static TITLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^-]+)-").expect("title prefix regex"));
static TITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^-]+-(.+)$").expect("title suffix regex"));

pub fn parse_url(url: &str) -> Option<UrlParts> {
    let caps = LEVER.match_pattern.captures(url)?;
    Some(UrlParts { company: caps[1].to_string(), job_id: caps[2].to_string() })
}

fn job_title(page: &Page) -> Result<Option<String>> {
    // 1) Preferred: posting headline
    if let Some(t) = page.text_of(".posting-headline h2")? { return Ok(Some(t)); }

    // 2) Fallback: <title> suffix with trailing "(...)" removed
    let Some(doc_title) = page.title()? else { return Ok(None) };
    Ok(TITLE_SUFFIX
        .captures(&doc_title)
        .map(|c| strip_trailing_parenthetical(&c[1]))
        .and_then(non_empty))
}

fn company_name(page: &Page) -> Result<Option<String>> {
    // 1) Preferred: header logo alt text
    if let Some(alt) = page.attr_of(".main-header-logo img", "alt")? {
        if let Some(name) = non_empty(alt.replacen(" logo", "", 1).trim().to_string()) { return Ok(Some(name)); }
    }

    // 2) Fallback: <title> prefix
    if let Some(doc_title) = page.title()? {
        if let Some(name) = TITLE_PREFIX.captures(&doc_title).and_then(|c| non_empty(c[1].trim().to_string())) {
            return Ok(Some(name));
        }
    }

    // 3) Fallback: company slug in the URL
    Ok(COMPANY_SLUG.captures(page.url()).map(|c| c[1].to_string()))
}

fn location(page: &Page) -> Result<Option<String>> {
    let raw = match page.text_of(".posting-categories .location")? {
        Some(l) => Some(l),
        None => page.attr_of(r#"meta[name="twitter:data1"]"#, "value")?,
    };
    Ok(raw.map(|l| strip_postal_code(&l)).and_then(non_empty))
}

fn description(page: &Page) -> Result<Option<Sections>> {
    let h3 = crate::page::selector("h3")?;
    let requirements = crate::page::selector(".posting-requirements")?;
    let lead = crate::page::selector("b, strong")?;

    let mut sections = Sections::new();
    for section in page.select_all(".section.page-centered")? {
        let body = normalize_block(&element_raw_text(&section));
        match section.value().attr("data-qa") {
            Some("job-description") => {
                if !body.is_empty() { sections.insert("introduction", body); }
            }
            Some("closing-description") => {
                if !body.is_empty() { sections.insert("closing", body); }
            }
            _ => {
                if let Some(heading) = section.select(&h3).next() {
                    let key = normalize_header(&element_text(&heading));
                    let content = section
                        .select(&requirements)
                        .next()
                        .map(|el| normalize_block(&element_raw_text(&el)))
                        .unwrap_or_default();
                    if !key.is_empty() && !content.is_empty() { sections.insert(key, content); }
                } else if let Some(first) = section.select(&lead).next() {
                    let key = normalize_header(&element_text(&first));
                    if !key.is_empty() && !body.is_empty() { sections.insert(key, body); }
                }
            }
        }
    }
    Ok(if sections.is_empty() { None } else { Some(sections) })
}

fn form_fields(_page: &Page) -> Result<FormFields> {
    Ok(FormFields::default())
}
