// src/models/selectors.rs

//! CSS selectors for scraping the notice board.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping a notice board listing page.
///
/// Each field selector is evaluated inside a row; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSelectors {
    /// Selector for each notice row in the listing
    #[serde(default = "defaults::row")]
    pub row: String,

    /// Selector for the row number element
    #[serde(default = "defaults::code")]
    pub code: String,

    /// Selector for the classification tag element
    #[serde(default = "defaults::tag")]
    pub tag: String,

    /// Selector for the title element
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Attribute on the title element holding the click handler
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Selector for the writer element
    #[serde(default = "defaults::writer")]
    pub writer: String,

    /// Selector for the miscellaneous annotation container
    #[serde(default = "defaults::etc_list")]
    pub etc_list: String,

    /// Selector for an item inside the annotation container
    #[serde(default = "defaults::etc_item")]
    pub etc_item: String,
}

impl Default for BoardSelectors {
    fn default() -> Self {
        Self {
            row: defaults::row(),
            code: defaults::code(),
            tag: defaults::tag(),
            title: defaults::title(),
            link_attr: defaults::link_attr(),
            writer: defaults::writer(),
            etc_list: defaults::etc_list(),
            etc_item: defaults::etc_item(),
        }
    }
}

impl BoardSelectors {
    /// All selector strings with their field names, for validation.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("row", &self.row),
            ("code", &self.code),
            ("tag", &self.tag),
            ("title", &self.title),
            ("writer", &self.writer),
            ("etc_list", &self.etc_list),
            ("etc_item", &self.etc_item),
        ]
    }
}

mod defaults {
    pub fn row() -> String {
        ".tr-normal".into()
    }
    pub fn code() -> String {
        ".brd-num".into()
    }
    pub fn tag() -> String {
        ".tag-type-01".into()
    }
    pub fn title() -> String {
        ".title".into()
    }
    pub fn link_attr() -> String {
        "onclick".into()
    }
    pub fn writer() -> String {
        ".brd-writer".into()
    }
    pub fn etc_list() -> String {
        ".etc-list".into()
    }
    pub fn etc_item() -> String {
        "li".into()
    }
}
