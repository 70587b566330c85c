// src/services/extractor.rs

//! Row extraction from listing page markup.
//!
//! The board publishes no machine-readable schema, so rows and fields are
//! located purely by CSS class. A missing field never fails the row: it
//! falls back to an empty string (or an unparsed `code`), which keeps one
//! malformed row from dropping the rest of the page.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{BoardConfig, Notice};
use crate::utils::parse_selector;
use crate::utils::url::{fill_template, quoted_segment};

/// Turns one page of markup into notices.
pub trait NoticeExtractor: Send + Sync {
    /// Extract every notice row on the page, in document order.
    fn extract(&self, html: &str) -> Result<Vec<Notice>>;
}

/// Extractor driven by the configured class selectors.
#[derive(Debug, Clone)]
pub struct ClassSelectorExtractor {
    row: Selector,
    code: Selector,
    tag: Selector,
    title: Selector,
    writer: Selector,
    etc_list: Selector,
    etc_item: Selector,
    link_attr: String,
    detail_url: String,
}

impl ClassSelectorExtractor {
    /// Compile the board's selectors.
    pub fn new(board: &BoardConfig) -> Result<Self> {
        let selectors = &board.selectors;
        Ok(Self {
            row: parse_selector(&selectors.row)?,
            code: parse_selector(&selectors.code)?,
            tag: parse_selector(&selectors.tag)?,
            title: parse_selector(&selectors.title)?,
            writer: parse_selector(&selectors.writer)?,
            etc_list: parse_selector(&selectors.etc_list)?,
            etc_item: parse_selector(&selectors.etc_item)?,
            link_attr: selectors.link_attr.clone(),
            detail_url: board.detail_url.clone(),
        })
    }

    /// Parse markup into a document.
    ///
    /// Blank input is the only structural failure; html5ever recovers from
    /// everything else.
    pub fn parse_document(html: &str) -> Result<Html> {
        if html.trim().is_empty() {
            return Err(AppError::parse("listing page", "empty document"));
        }
        Ok(Html::parse_document(html))
    }

    /// Lazily map every row of an already parsed document to a notice.
    pub fn rows<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = Notice> + 'a {
        document.select(&self.row).map(move |row| self.parse_row(row))
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Notice {
        let code_text = first_text(row, &self.code);
        let title_elem = row.select(&self.title).next();

        let link = title_elem
            .and_then(|el| el.value().attr(&self.link_attr))
            .map(|attr| derive_link(attr, &self.detail_url))
            .unwrap_or_default();

        let etc = row
            .select(&self.etc_list)
            .next()
            .and_then(|list| list.select(&self.etc_item).next())
            .map(element_text)
            .unwrap_or_default();

        let notice = Notice {
            code: Notice::parse_code(&code_text),
            tag: first_text(row, &self.tag),
            title: title_elem.map(element_text).unwrap_or_default(),
            link,
            writer: first_text(row, &self.writer),
            etc,
        };

        if notice.code.is_none() {
            log::debug!("Row without numeric code: {:?}", code_text);
        }
        notice
    }
}

impl NoticeExtractor for ClassSelectorExtractor {
    fn extract(&self, html: &str) -> Result<Vec<Notice>> {
        let document = Self::parse_document(html)?;
        Ok(self.rows(&document).collect())
    }
}

/// Build the detail URL from a click-handler attribute.
///
/// The id is whatever sits between the first two `'` characters; with fewer
/// than two quotes the link is empty.
pub fn derive_link(attr: &str, template: &str) -> String {
    quoted_segment(attr)
        .map(|id| fill_template(template, "id", id))
        .unwrap_or_default()
}

fn first_text(row: ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://www.jbnu.ac.kr/web/Board/{id}/detailView.do?pageIndex=1&menu=2377";

    fn extractor() -> ClassSelectorExtractor {
        ClassSelectorExtractor::new(&BoardConfig::default()).unwrap()
    }

    fn row(inner: &str) -> String {
        format!(r#"<html><body><table><tbody><tr class="tr-normal">{inner}</tr></tbody></table></body></html>"#)
    }

    const FULL_ROW: &str = r##"
        <td class="brd-num"> 102 </td>
        <td><span class="tag-type-01">Notice</span></td>
        <td><a class="title" href="#" onclick="javascript:viewDetail('55');"> Exam Schedule </a></td>
        <td class="brd-writer">Registrar</td>
        <td><ul class="etc-list"><li>PDF attached</li><li>2024-03-01</li></ul></td>
    "##;

    #[test]
    fn test_full_row() {
        let notices = extractor().extract(&row(FULL_ROW)).unwrap();
        assert_eq!(
            notices,
            vec![Notice {
                code: Some(102),
                tag: "Notice".to_string(),
                title: "Exam Schedule".to_string(),
                link: "https://www.jbnu.ac.kr/web/Board/55/detailView.do?pageIndex=1&menu=2377"
                    .to_string(),
                writer: "Registrar".to_string(),
                etc: "PDF attached".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_fields_default_independently() {
        let html = row(r#"
            <td><a class="title" onclick="viewDetail('9')">Only title</a></td>
            <td class="brd-writer">Office</td>
        "#);
        let notices = extractor().extract(&html).unwrap();
        assert_eq!(notices.len(), 1);
        let notice = &notices[0];
        assert_eq!(notice.code, None);
        assert_eq!(notice.tag, "");
        assert_eq!(notice.etc, "");
        assert_eq!(notice.title, "Only title");
        assert_eq!(notice.writer, "Office");
        assert!(notice.link.contains("/9/"));
    }

    #[test]
    fn test_missing_title_empties_link() {
        let html = row(r#"<td class="brd-num">3</td><td class="brd-writer">W</td>"#);
        let notice = &extractor().extract(&html).unwrap()[0];
        assert_eq!(notice.title, "");
        assert_eq!(notice.link, "");
        assert_eq!(notice.code, Some(3));
    }

    #[test]
    fn test_empty_etc_list() {
        let html = row(r#"<td class="brd-num">4</td><td><ul class="etc-list"></ul></td>"#);
        let notice = &extractor().extract(&html).unwrap()[0];
        assert_eq!(notice.etc, "");
    }

    #[test]
    fn test_non_normal_rows_ignored() {
        let html = r#"<table>
            <tr class="tr-notice"><td class="brd-num">공지</td></tr>
            <tr class="tr-normal"><td class="brd-num">2</td></tr>
            <tr class="tr-normal"><td class="brd-num">1</td></tr>
        </table>"#;
        let codes: Vec<_> = extractor()
            .extract(html)
            .unwrap()
            .into_iter()
            .map(|n| n.code)
            .collect();
        assert_eq!(codes, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_page_without_rows() {
        let notices = extractor().extract("<html><body><p>maintenance</p></body></html>").unwrap();
        assert!(notices.is_empty());
    }

    #[test]
    fn test_blank_page_is_parse_error() {
        assert!(matches!(
            extractor().extract("  \n"),
            Err(AppError::Parse { .. })
        ));
    }

    #[test]
    fn test_reparse_is_identical() {
        let html = row(FULL_ROW);
        let ex = extractor();
        assert_eq!(ex.extract(&html).unwrap(), ex.extract(&html).unwrap());

        let document = ClassSelectorExtractor::parse_document(&html).unwrap();
        let first: Vec<_> = ex.rows(&document).collect();
        let second: Vec<_> = ex.rows(&document).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_link() {
        assert_eq!(
            derive_link("javascript:viewDetail('ABC123');", TEMPLATE),
            "https://www.jbnu.ac.kr/web/Board/ABC123/detailView.do?pageIndex=1&menu=2377"
        );
        assert_eq!(derive_link("javascript:viewDetail(55);", TEMPLATE), "");
        assert_eq!(derive_link("viewDetail('55", TEMPLATE), "");
        assert_eq!(derive_link("", TEMPLATE), "");
    }
}
