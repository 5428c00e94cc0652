//! Table of contents (`Toc` service) parsing.
//!
//! The service answers in one of two shapes:
//!
//! - TEI (`<TEI.2>`): one `<row>` per entry, with a `<seg>` label and an
//!   `<xref from="FOREIGN(9754046/000059.jp2)">` pointing at the page image.
//! - HTML (`<html>`): `<div class="Texte">` blocks whose anchors call
//!   `javascript:allerA('0083037', '152')`.
//!
//! The shape is chosen from the root tag alone. TEI goes through the XML
//! parser after reference repair; HTML through a forgiving HTML parser.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::GallicaConfig;
use crate::error::{GallicaError, Result};
use crate::http::bytes_to_string;
use crate::types::{TableOfContents, TocEntry};
use crate::xml::{
    collect_text, element_children, find_children, get_tag_name, has_tag, parse_document,
    prepare_markup,
};

/// Name of the first element in a document.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROOT_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z_][\w.:-]*)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Image number in an xref target, `59` in `FOREIGN(9754046/000059.jp2)`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TEI_PAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)\.").expect("valid regex"));

/// Page argument of an anchor, `152` in `javascript:allerA('0083037', '152')`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HTML_PAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(\d+)'\)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.Texte").expect("valid selector"));

#[allow(clippy::expect_used)] // Static selector that is guaranteed to be valid
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// The two document shapes served by the `Toc` service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocShape {
    Tei,
    Html,
}

/// Select the shape of a table of contents from its root tag.
///
/// # Examples
/// ```
/// use gallica_client::toc::{sniff_shape, TocShape};
///
/// let tei = r#"<?xml version="1.0"?><!DOCTYPE TEI.2 SYSTEM "tei.dtd"><TEI.2><text/></TEI.2>"#;
/// assert_eq!(sniff_shape(tei).unwrap(), TocShape::Tei);
/// assert_eq!(sniff_shape("<!DOCTYPE html><HTML><body/></HTML>").unwrap(), TocShape::Html);
/// assert!(sniff_shape("<rss/>").is_err());
/// ```
pub fn sniff_shape(text: &str) -> Result<TocShape> {
    let body = COMMENT_PATTERN.replace_all(text, "");
    let tag = ROOT_TAG_PATTERN
        .captures(&body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();

    match tag {
        "TEI.2" | "TEI" => Ok(TocShape::Tei),
        t if t.eq_ignore_ascii_case("html") => Ok(TocShape::Html),
        other => Err(GallicaError::UnknownTocFormat(other.to_string())),
    }
}

/// Parse a `Toc` payload for the document `ark`.
///
/// Page links are built with [`GallicaConfig::page_url`].
pub fn parse_table_of_contents(
    bytes: &[u8],
    ark: &str,
    config: &GallicaConfig,
) -> Result<TableOfContents> {
    let text = bytes_to_string(bytes, "table of contents");
    let toc = match sniff_shape(&text)? {
        TocShape::Tei => parse_tei(&text, ark, config)?,
        TocShape::Html => parse_html(&text, ark, config),
    };
    tracing::debug!(ark, entries = toc.len(), "Parsed table of contents");
    Ok(toc)
}

/// Parse the TEI shape. Zero rows is an error.
pub fn parse_tei(text: &str, ark: &str, config: &GallicaConfig) -> Result<TableOfContents> {
    let markup = prepare_markup(text);
    let doc = parse_document(&markup)?;

    let mut entries = Vec::new();
    for row in doc.descendants().filter(|n| has_tag(*n, "row")) {
        let mut entry = TocEntry::default();

        for cell in find_children(row, "cell") {
            for child in element_children(cell) {
                match get_tag_name(child) {
                    "seg" => append_text(&mut entry.text, &collect_text(child)),
                    "xref" if !entry.has_link() => {
                        let from = child.attribute("from").unwrap_or_default();
                        match tei_page(from) {
                            Some(page) => {
                                entry.page_number = collect_text(child);
                                entry.url = config.page_url(ark, &page);
                            }
                            None => tracing::debug!(from, "Unresolvable xref in table of contents"),
                        }
                    }
                    _ => {}
                }
            }
        }

        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(GallicaError::EmptyToc(ark.to_string()));
    }
    Ok(TableOfContents { entries })
}

/// Parse the HTML shape. An empty result is accepted.
pub fn parse_html(text: &str, ark: &str, config: &GallicaConfig) -> TableOfContents {
    let document = Html::parse_document(text);

    let entries = document
        .select(&CONTAINER_SELECTOR)
        .map(|container| {
            let mut entry = TocEntry::new(element_text(container));
            let link = container.select(&ANCHOR_SELECTOR).find_map(|anchor| {
                let href = anchor.value().attr("href").unwrap_or_default();
                html_page(href).map(|page| (element_text(anchor), page))
            });
            if let Some((page_number, page)) = link {
                entry.page_number = page_number;
                entry.url = config.page_url(ark, &page);
            }
            entry
        })
        .collect();

    TableOfContents { entries }
}

/// Extract the page image number from an xref `from` attribute.
///
/// # Examples
/// ```
/// use gallica_client::toc::tei_page;
///
/// assert_eq!(tei_page("FOREIGN(9754046/000059.jp2)").as_deref(), Some("59"));
/// assert_eq!(tei_page("FOREIGN(9754046)"), None);
/// ```
#[must_use]
pub fn tei_page(from: &str) -> Option<String> {
    capture_page(&TEI_PAGE_PATTERN, from)
}

/// Extract the page number from an anchor `href`.
#[must_use]
pub fn html_page(href: &str) -> Option<String> {
    capture_page(&HTML_PAGE_PATTERN, href)
}

fn capture_page(pattern: &Regex, text: &str) -> Option<String> {
    let digits = pattern.captures(text)?.get(1)?.as_str();
    let trimmed = digits.trim_start_matches('0');
    let page = if trimmed.is_empty() { "0" } else { trimmed };
    Some(page.to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn append_text(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    const ARK: &str = "bpt6k61076295";

    fn config() -> GallicaConfig {
        GallicaConfig::default()
    }

    fn tei(rows: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE TEI.2 SYSTEM "http://gallica.bnf.fr/ark:/12148/tei2.dtd">
<TEI.2><teiHeader/><text><body><div0><table>{rows}</table></div0></body></text></TEI.2>"#
        )
    }

    #[test]
    fn test_tei_rows_in_order() {
        let text = tei(
            r#"<row><cell><seg>I. - Le Festin</seg></cell><cell><xref from="FOREIGN(6107629/000008.jp2)" to="1">1</xref></cell></row>
               <row><cell><seg>II. - A Sicca</seg></cell><cell><xref from="FOREIGN(6107629/000029.jp2)">22</xref></cell></row>"#,
        );
        let toc = parse_tei(&text, ARK, &config()).unwrap();

        assert_eq!(
            toc.entries,
            vec![
                TocEntry {
                    text: "I. - Le Festin".to_string(),
                    page_number: "1".to_string(),
                    url: "https://gallica.bnf.fr/ark:/12148/bpt6k61076295/f8".to_string(),
                },
                TocEntry {
                    text: "II. - A Sicca".to_string(),
                    page_number: "22".to_string(),
                    url: "https://gallica.bnf.fr/ark:/12148/bpt6k61076295/f29".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_tei_leading_zeros_stripped() {
        let text = tei(
            r#"<row><cell><seg>Chapitre</seg></cell><cell><xref from="FOREIGN(9754046/000059.jp2)">51</xref></cell></row>"#,
        );
        let toc = parse_tei(&text, "bpt6k9754046", &config()).unwrap();
        assert!(toc.entries[0].url.ends_with("/f59"));
    }

    #[test]
    fn test_tei_unresolvable_xref_keeps_row() {
        let text = tei(
            r#"<row><cell><seg>Table des gravures</seg></cell><cell><xref from="FOREIGN(9754046)">?</xref></cell></row>"#,
        );
        let toc = parse_tei(&text, ARK, &config()).unwrap();
        assert_eq!(toc.entries, vec![TocEntry::new("Table des gravures")]);
    }

    #[test]
    fn test_tei_no_rows_is_empty_result() {
        let err = parse_tei(&tei(""), ARK, &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn test_tei_malformed_references_and_latin1() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><TEI.2><table><row><cell><seg>Salammb"#.to_vec();
        bytes.push(0xF4);
        bytes.extend_from_slice(
            br#" &eacute; Cie & fils</seg></cell><cell><xref from="FOREIGN(1/000054.jp2)">47</xref></cell></row></table></TEI.2>"#,
        );

        let toc = parse_table_of_contents(&bytes, ARK, &config()).unwrap();
        assert_eq!(toc.entries[0].text, "Salammbô &eacute; Cie & fils");
        assert_eq!(toc.entries[0].page_number, "47");
        assert!(toc.entries[0].url.ends_with("/f54"));
    }

    #[test]
    fn test_html_entries() {
        let text = r#"<!DOCTYPE html>
<html><head><title>Table</title></head><body>
<div class="Texte">Préface <a href="javascript:allerA('0083037', '0007')">vii</a></div>
<div class="Texte">Chapitre premier<br> <a href="javascript:allerA('0083037', '152')">1</a></div>
<div class="Texte">Planches</div>
<div class="Autre"><a href="javascript:allerA('0083037', '9')">9</a></div>
</body></html>"#;

        let toc = parse_table_of_contents(text.as_bytes(), ARK, &config()).unwrap();
        assert_eq!(toc.len(), 3);
        assert_eq!(toc.entries[0].text, "Préface vii");
        assert_eq!(toc.entries[0].page_number, "vii");
        assert!(toc.entries[0].url.ends_with("/f7"));
        assert_eq!(toc.entries[1].page_number, "1");
        assert!(toc.entries[1].url.ends_with("/f152"));
        assert_eq!(toc.entries[2], TocEntry::new("Planches"));
    }

    #[test]
    fn test_html_without_containers_is_empty_ok() {
        let toc = parse_table_of_contents(b"<html><body></body></html>", ARK, &config()).unwrap();
        assert!(toc.is_empty());
    }

    #[test]
    fn test_unknown_shape() {
        let err = parse_table_of_contents(b"<rss><channel/></rss>", ARK, &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(
            err.to_string(),
            "Unknown table of contents format <rss>, expected TEI or HTML"
        );

        let err = parse_table_of_contents(b"", ARK, &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_sniff_skips_comments() {
        let text = "<!-- <html> --><TEI.2/>";
        assert_eq!(sniff_shape(text).unwrap(), TocShape::Tei);
    }

    #[test]
    fn test_page_patterns() {
        assert_eq!(html_page("javascript:allerA('0083037', '152')").as_deref(), Some("152"));
        assert_eq!(html_page("#top"), None);
        assert_eq!(tei_page("FOREIGN(1/000000.jp2)").as_deref(), Some("0"));
    }
}
