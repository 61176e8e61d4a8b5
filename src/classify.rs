use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use url::Url;

use crate::sites::{self, PageType, UrlParts};
use crate::telemetry::{self};
use crate::telemetry::ops::classify::Phase as ClassifyPhase;

/// jobscout classify <url>
#[derive(Args)]
pub struct ClassifyCmd {
    pub url: String,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub url: String,
    pub site: Option<&'static str>,
    pub domain: Option<&'static str>,
    pub page_type: PageType,
    pub parts: Option<UrlParts>,
}

pub fn run(args: ClassifyCmd) -> Result<()> {
    let log = telemetry::classify();
    let _g = log.root_span_kv([("url", args.url.clone())]).entered();

    // URL validation (friendly error before matching)
    if Url::parse(&args.url).is_err() { bail!("Invalid URL: {}", args.url); }

    let c = classify_url(&args.url);
    match c.site {
        Some(site) => log.info(format!("🔎 {} — site={} page_type={}", c.url, site, c.page_type.as_str())),
        None => log.info(format!("🔎 {} — not a supported job site", c.url)),
    }
    log.result(&c)?;
    Ok(())
}

pub fn classify_url(url: &str) -> Classification {
    let log = telemetry::classify();
    let site = { let _s = log.span(&ClassifyPhase::Identify).entered(); sites::identify(url) };
    let _s = log.span(&ClassifyPhase::Classify).entered();
    Classification {
        url: url.to_string(),
        site: site.map(|s| s.name),
        domain: site.map(|s| s.domain),
        page_type: site.map(|s| sites::classify(url, s)).unwrap_or(PageType::Unknown),
        parts: site.and_then(|s| (s.parse_url)(url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_lever_apply() {
        let c = classify_url("https://jobs.lever.co/acme/abc-123/apply");
        assert_eq!(c.site, Some("Lever"));
        assert_eq!(c.domain, Some("jobs.lever.co"));
        assert_eq!(c.page_type, PageType::ApplyForm);
        assert_eq!(c.parts.unwrap().job_id, "abc-123");
    }

    #[test]
    fn classify_unsupported() {
        let c = classify_url("https://example.com/jobs/1");
        assert_eq!(c, Classification {
            url: "https://example.com/jobs/1".into(),
            site: None,
            domain: None,
            page_type: PageType::Unknown,
            parts: None,
        });
    }
}
