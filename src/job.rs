use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured job posting as extracted from a page. Every field except the
/// source URL is optional; a missing selector blanks only its own field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<Sections>,
    pub location: Option<String>,
    pub source_url: String,
}

impl JobInfo {
    pub fn is_blank(&self) -> bool {
        self.title.is_none() && self.company.is_none() && self.description.is_none() && self.location.is_none()
    }
}

/// Description sections keyed by normalized heading, in document order.
/// Backed by an insertion-ordered JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections(Map<String, Value>);

impl Sections {
    pub fn new() -> Self { Sections(Map::new()) }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0.insert(key.into(), Value::String(text.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// Apply-form field mapping. Autofill is not implemented, so this is always
/// empty and serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_keep_insertion_order() {
        let mut s = Sections::new();
        s.insert("introduction", "intro");
        s.insert("requirements", "reqs");
        s.insert("closing", "bye");
        s.insert("introduction", "intro v2");
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["introduction", "requirements", "closing"]);
        assert_eq!(s.get("introduction"), Some("intro v2"));

        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"introduction":"intro v2","requirements":"reqs","closing":"bye"}"#);
        let back: Sections = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn job_info_uses_camel_case() {
        let job = JobInfo {
            title: Some("Engineer".into()),
            company: None,
            description: None,
            location: Some("Remote".into()),
            source_url: "https://jobs.lever.co/acme/1".into(),
        };
        let v = serde_json::to_value(&job).unwrap();
        assert_eq!(v["sourceUrl"], "https://jobs.lever.co/acme/1");
        assert!(v["company"].is_null());
        assert!(!job.is_blank());
        assert_eq!(serde_json::to_string(&FormFields::default()).unwrap(), "{}");
    }
}
