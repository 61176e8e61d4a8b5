//! Content controller: tracks the page the host is looking at, runs the
//! matching site parser on navigation and answers runtime messages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::job::{FormFields, JobInfo};
use crate::page::Page;
use crate::parser::SiteParser;
use crate::sites::{self, PageType};
use crate::store::JobStore;
use crate::telemetry::{self};
use crate::telemetry::ops::controller::Phase as ControllerPhase;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum Message {
    UrlChanged(Navigation),
    GetJobInfo,
    GetFormFields,
    Autofill(serde_json::Value),
    IsJobSite(UrlQuery),
}

impl Message {
    pub fn action(&self) -> &'static str {
        match self {
            Message::UrlChanged(_) => "urlChanged",
            Message::GetJobInfo => "getJobInfo",
            Message::GetFormFields => "getFormFields",
            Message::Autofill(_) => "autofill",
            Message::IsJobSite(_) => "isJobSite",
        }
    }
}

/// New location of the tab. `html` is the serialized document when the
/// sender has it; otherwise the host fetches `url`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Navigation {
    pub url: String,
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Ok,
    Handled,
    Started,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_info: Option<Option<Arc<JobInfo>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<Option<FormFields>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_job_site: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    fn status(status: Status) -> Self {
        Response { status, page_type: None, site: None, job_info: None, form_fields: None, is_job_site: None, message: None }
    }

    pub fn handled(page_type: PageType, site: Option<&'static str>) -> Self {
        Response { page_type: Some(page_type), site, ..Response::status(Status::Handled) }
    }

    pub fn job_info(job: Option<Arc<JobInfo>>) -> Self {
        Response { job_info: Some(job), ..Response::status(Status::Ok) }
    }

    pub fn form_fields(fields: Option<FormFields>) -> Self {
        Response { form_fields: Some(fields), ..Response::status(Status::Ok) }
    }

    pub fn is_job_site(yes: bool) -> Self {
        Response { is_job_site: Some(yes), ..Response::status(Status::Ok) }
    }

    pub fn started() -> Self { Response::status(Status::Started) }

    pub fn error(message: impl Into<String>) -> Self {
        Response { message: Some(message.into()), ..Response::status(Status::Error) }
    }

    pub fn status_str(&self) -> &'static str {
        match self.status {
            Status::Ok => "ok",
            Status::Handled => "handled",
            Status::Started => "started",
            Status::Error => "error",
        }
    }
}

/// Parser and page of the site currently shown.
struct Session {
    parser: SiteParser,
    page: Page,
    page_type: PageType,
}

pub struct Controller {
    store: JobStore,
    session: Option<Session>,
}

impl Controller {
    pub fn new(store: JobStore) -> Self {
        Controller { store, session: None }
    }

    pub fn page_type(&self) -> PageType {
        self.session.as_ref().map(|s| s.page_type).unwrap_or(PageType::Unknown)
    }

    pub fn site_name(&self) -> Option<&'static str> {
        self.session.as_ref().map(|s| s.parser.site().name)
    }

    pub fn handle(&mut self, msg: Message) -> Response {
        let log = telemetry::controller();
        let _s = log.span_kv(&ControllerPhase::Message, [("action", msg.action().to_string())]).entered();
        match msg {
            Message::UrlChanged(nav) => {
                let page = Page::parse(nav.url, nav.html.as_deref().unwrap_or_default());
                self.navigate(page)
            }
            Message::GetJobInfo => {
                let job = self.session.as_mut().and_then(|s| s.parser.parse_job_info(&s.page));
                Response::job_info(job)
            }
            Message::GetFormFields => {
                let fields = self.session.as_mut().and_then(|s| s.parser.parse_form_fields(&s.page));
                Response::form_fields(fields)
            }
            Message::Autofill(data) => match &self.session {
                Some(s) if s.page_type == PageType::ApplyForm => {
                    let _ = s.parser.fill_form(&data);
                    Response::started()
                }
                _ => Response::error("Not on application form"),
            },
            Message::IsJobSite(q) => Response::is_job_site(sites::is_job_site(&q.url)),
        }
    }

    /// React to a new document: pick the site, reset or rebuild its parser,
    /// classify the URL and run the page-type handler.
    pub fn navigate(&mut self, page: Page) -> Response {
        let log = telemetry::controller();
        let _g = log.root_span_kv([("url", page.url().to_string())]).entered();

        let site = { let _s = log.span(&ControllerPhase::Detect).entered(); sites::identify(page.url()) };
        let Some(site) = site else {
            log.debug_kv("no supported site", [("url", page.url().to_string())]);
            self.session = None;
            return Response::handled(PageType::Unknown, None);
        };

        let parser = match self.session.take() {
            Some(mut prev) if std::ptr::eq(prev.parser.site(), site) => {
                prev.parser.clear_cache();
                prev.parser
            }
            _ => {
                log.info_kv("🔎 Detected site", [("site", site.name.to_string())]);
                SiteParser::new(site)
            }
        };

        let page_type = { let _s = log.span(&ControllerPhase::Classify).entered(); sites::classify(page.url(), site) };
        log.info_kv("📄 Page type", [("site", site.name.to_string()), ("page_type", page_type.as_str().to_string())]);
        self.session = Some(Session { parser, page, page_type });

        match page_type {
            PageType::JobView => self.on_job_view(),
            PageType::ApplyForm => {
                self.on_job_view();
                let fields = self.session.as_mut().and_then(|s| s.parser.parse_form_fields(&s.page));
                log.debug_kv("form fields", [("present", fields.is_some().to_string())]);
            }
            PageType::PostApply => {
                self.on_job_view();
                log.info_kv("✅ Application submitted", [("site", site.name.to_string())]);
            }
            PageType::Unknown => {}
        }
        Response::handled(page_type, Some(site.name))
    }

    fn on_job_view(&mut self) {
        let log = telemetry::controller();
        let job = {
            let _s = log.span(&ControllerPhase::Parse).entered();
            self.session.as_mut().and_then(|s| s.parser.parse_job_info(&s.page))
        };
        if let Some(job) = job {
            if job.is_blank() { log.warn_kv("⚠️ no job fields found", [("url", job.source_url.clone())]); }
            self.persist(&job);
        }
    }

    /// Write the job to the store. Failures are logged, never propagated.
    pub fn persist(&self, job: &JobInfo) {
        let log = telemetry::controller();
        let _s = log.span(&ControllerPhase::Persist).entered();
        match self.store.save(job) {
            Ok(_) => log.info_kv("💾 Job info saved", [("path", self.store.path().display().to_string())]),
            Err(e) => log.error_kv("❌ could not save job info", [("error", format!("{e:#}"))]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POSTING: &str = r#"<html><head><title>Acme - Engineer</title></head><body>
        <div class="main-header-logo"><img alt="Acme logo"></div>
        <div class="posting-headline"><h2>Engineer</h2></div></body></html>"#;

    fn controller() -> (tempfile::TempDir, Controller) {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::new(dir.path().join("current_job.json"));
        (dir, Controller::new(store))
    }

    fn url_changed(url: &str, html: &str) -> Message {
        Message::UrlChanged(Navigation { url: url.into(), html: Some(html.into()) })
    }

    #[test]
    fn messages_decode_from_json() {
        let m: Message = serde_json::from_value(json!({"action": "getJobInfo"})).unwrap();
        assert_eq!(m, Message::GetJobInfo);
        let m: Message = serde_json::from_value(json!({"action": "urlChanged", "data": {"url": "https://jobs.lever.co/a/1"}})).unwrap();
        assert_eq!(m, Message::UrlChanged(Navigation { url: "https://jobs.lever.co/a/1".into(), html: None }));
        let m: Message = serde_json::from_value(json!({"action": "autofill", "data": {"name": "Ada"}})).unwrap();
        assert_eq!(m.action(), "autofill");
        assert!(serde_json::from_value::<Message>(json!({"action": "launchRockets"})).is_err());
    }

    #[test]
    fn job_view_parses_and_persists() {
        let (dir, mut c) = controller();
        let resp = c.handle(url_changed("https://jobs.lever.co/acme/1", POSTING));
        assert_eq!(resp, Response::handled(PageType::JobView, Some("Lever")));

        let stored = JobStore::new(dir.path().join("current_job.json")).load().unwrap().expect("persisted");
        assert_eq!(stored.current_job.title.as_deref(), Some("Engineer"));
        assert_eq!(stored.current_job.company.as_deref(), Some("Acme"));

        let v = serde_json::to_value(c.handle(Message::GetJobInfo)).unwrap();
        assert_eq!(v["status"], "ok");
        assert_eq!(v["jobInfo"]["title"], "Engineer");
        assert!(v.get("message").is_none());
    }

    #[test]
    fn navigation_within_site_clears_cache() {
        let (_dir, mut c) = controller();
        c.handle(url_changed("https://jobs.lever.co/acme/1", POSTING));
        let revised = POSTING.replace("<h2>Engineer</h2>", "<h2>Staff Engineer</h2>");
        c.handle(url_changed("https://jobs.lever.co/acme/1/apply", &revised));
        assert_eq!(c.page_type(), PageType::ApplyForm);

        let resp = c.handle(Message::GetJobInfo);
        let job = resp.job_info.flatten().expect("job");
        assert_eq!(job.title.as_deref(), Some("Staff Engineer"));
    }

    #[test]
    fn autofill_only_on_apply_form() {
        let (_dir, mut c) = controller();
        c.handle(url_changed("https://jobs.lever.co/acme/1", POSTING));
        let resp = c.handle(Message::Autofill(json!({})));
        assert_eq!(resp, Response::error("Not on application form"));

        c.handle(url_changed("https://jobs.lever.co/acme/1/apply", POSTING));
        assert_eq!(c.handle(Message::Autofill(json!({}))), Response::started());

        let v = serde_json::to_value(c.handle(Message::GetFormFields)).unwrap();
        assert_eq!(v, json!({"status": "ok", "formFields": {}}));
    }

    #[test]
    fn unsupported_site_drops_session() {
        let (dir, mut c) = controller();
        c.handle(url_changed("https://jobs.lever.co/acme/1", POSTING));
        let resp = c.handle(url_changed("https://example.com/careers", POSTING));
        assert_eq!(resp, Response::handled(PageType::Unknown, None));
        assert_eq!(c.site_name(), None);

        let v = serde_json::to_value(c.handle(Message::GetJobInfo)).unwrap();
        assert_eq!(v, json!({"status": "ok", "jobInfo": null}));
        // the last good job stays persisted
        assert!(JobStore::new(dir.path().join("current_job.json")).load().unwrap().is_some());
    }

    #[test]
    fn post_apply_and_unknown_pages() {
        let (dir, mut c) = controller();
        let resp = c.handle(url_changed("https://jobs.lever.co/acme/1/thanks", POSTING));
        assert_eq!(resp.page_type, Some(PageType::PostApply));
        assert!(JobStore::new(dir.path().join("current_job.json")).load().unwrap().is_some());

        let (dir, mut c) = controller();
        let resp = c.handle(url_changed("https://jobs.lever.co/acme/1/unknown", POSTING));
        assert_eq!(resp.page_type, Some(PageType::Unknown));
        assert!(JobStore::new(dir.path().join("current_job.json")).load().unwrap().is_none());
    }

    #[test]
    fn is_job_site_query() {
        let (_dir, mut c) = controller();
        let resp = c.handle(Message::IsJobSite(UrlQuery { url: "https://jobs.lever.co/acme/1".into() }));
        assert_eq!(resp.is_job_site, Some(true));
        assert_eq!(resp.status_str(), "ok");
    }
}
