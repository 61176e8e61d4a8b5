use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

use crate::sites::text::{collapse_whitespace, non_empty};

/// A loaded document together with the URL it was loaded from.
pub struct Page {
    url: String,
    doc: Html,
}

impl Page {
    pub fn parse(url: impl Into<String>, html: &str) -> Self {
        Page { url: url.into(), doc: Html::parse_document(html) }
    }

    pub fn url(&self) -> &str { &self.url }

    pub fn select_first(&self, sel: &str) -> Result<Option<ElementRef<'_>>> {
        let sel = selector(sel)?;
        Ok(self.doc.select(&sel).next())
    }

    pub fn select_all(&self, sel: &str) -> Result<Vec<ElementRef<'_>>> {
        let sel = selector(sel)?;
        Ok(self.doc.select(&sel).collect())
    }

    /// Whitespace-collapsed text of the first match; `None` when missing or blank.
    pub fn text_of(&self, sel: &str) -> Result<Option<String>> {
        Ok(self.select_first(sel)?.and_then(|el| non_empty(element_text(&el))))
    }

    /// Trimmed attribute of the first match; `None` when missing or blank.
    pub fn attr_of(&self, sel: &str, attr: &str) -> Result<Option<String>> {
        let Some(el) = self.select_first(sel)? else { return Ok(None) };
        Ok(el.value().attr(attr).map(|v| v.trim().to_string()).and_then(non_empty))
    }

    /// Document `<title>`, whitespace-collapsed the way browsers report it.
    pub fn title(&self) -> Result<Option<String>> {
        self.text_of("title")
    }
}

pub fn selector(sel: &str) -> Result<Selector> {
    Selector::parse(sel).map_err(|e| anyhow!("invalid selector {sel:?}: {e:?}"))
}

pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

pub fn element_raw_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
}
