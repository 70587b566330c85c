//! Notice data structure.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Archive key used for notices whose number could not be parsed.
pub const MALFORMED_CODE_KEY: &str = "NaN";

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+").expect("static regex is valid"));

/// A notice scraped from the board.
///
/// Every field is always present. Missing markup shows up as an empty
/// string, or as `code == None` when the row number was not an integer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    /// Row number as rendered on the board (`null` on the wire when malformed)
    pub code: Option<i64>,

    /// Short classification label
    #[serde(default)]
    pub tag: String,

    /// Notice headline
    #[serde(default)]
    pub title: String,

    /// Full URL to the detail page
    #[serde(default)]
    pub link: String,

    /// Posting author or department
    #[serde(default)]
    pub writer: String,

    /// First miscellaneous annotation (e.g. an attachment marker)
    #[serde(default)]
    pub etc: String,
}

impl Notice {
    /// Parse the leading integer of a row-number cell.
    ///
    /// Surrounding whitespace is ignored and trailing garbage is dropped,
    /// so `"12 "` and `"12번"` both give `Some(12)` while `""` or `"공지"` give `None`.
    pub fn parse_code(text: &str) -> Option<i64> {
        LEADING_INT
            .find(text.trim())
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Key under which this notice is stored locally.
    pub fn key(&self) -> String {
        match self.code {
            Some(code) => code.to_string(),
            None => MALFORMED_CODE_KEY.to_string(),
        }
    }

    /// Newest-first ordering by code; malformed codes sort last.
    pub fn cmp_newest_first(a: &Notice, b: &Notice) -> Ordering {
        match (a.code, b.code) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Format notice for display using a template.
    ///
    /// Supported placeholders: `{code}`, `{tag}`, `{title}`, `{link}`, `{writer}`, `{etc}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{code}", &self.key())
            .replace("{tag}", &self.tag)
            .replace("{title}", &self.title)
            .replace("{link}", &self.link)
            .replace("{writer}", &self.writer)
            .replace("{etc}", &self.etc)
    }
}
