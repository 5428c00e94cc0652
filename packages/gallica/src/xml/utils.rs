//! XML utility functions for navigating and extracting data from DOM trees.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::Result;

/// A character reference, an entity reference, or a bare ampersand.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;|#[xX][0-9a-fA-F]+;|[A-Za-z][A-Za-z0-9]*;)?").expect("valid regex")
});

/// XML declaration at the start of a document, optionally after a BOM.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DECLARATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\u{FEFF}?\s*<\?xml.*?\?>").expect("valid regex"));

/// Parse an XML document, accepting a `<!DOCTYPE>` declaration.
///
/// Gallica payloads reference external DTDs; those are not fetched.
pub fn parse_document(text: &str) -> Result<Document<'_>> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Ok(Document::parse_with_options(text, options)?)
}

/// Make loosely produced markup acceptable to a strict XML parser.
///
/// Drops the XML declaration (its `encoding` no longer applies once the
/// bytes are decoded) and repairs references the parser would reject.
///
/// # Examples
/// ```
/// use gallica_client::xml::prepare_markup;
///
/// let text = r#"<?xml version="1.0" encoding="ISO-8859-1"?><seg>A &eacute; B & C</seg>"#;
/// assert_eq!(prepare_markup(text), "<seg>A &amp;eacute; B &amp; C</seg>");
/// ```
pub fn prepare_markup(text: &str) -> String {
    let body = DECLARATION_PATTERN.replace(text, "");
    repair_references(&body).into_owned()
}

/// Escape every reference that is not valid XML.
///
/// Predefined entities and well-formed character references are kept,
/// `&nbsp;` becomes `&#160;`, and anything else has its `&` escaped so the
/// original characters survive as text.
pub fn repair_references(text: &str) -> Cow<'_, str> {
    REFERENCE_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        let Some(reference) = caps.get(1).map(|m| m.as_str()) else {
            return "&amp;".to_string();
        };

        if let Some(number) = reference.strip_prefix('#') {
            let number = number.trim_end_matches(';');
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => number.parse::<u32>().ok(),
            };
            return if code.and_then(char::from_u32).is_some_and(is_xml_char) {
                format!("&{reference}")
            } else {
                format!("&amp;{reference}")
            };
        }

        match reference.trim_end_matches(';') {
            "amp" | "lt" | "gt" | "quot" | "apos" => format!("&{reference}"),
            "nbsp" => "&#160;".to_string(),
            _ => format!("&amp;{reference}"),
        }
    })
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gallica_client::xml::get_tag_name;
///
/// let xml = r#"<oai_dc:dc xmlns:oai_dc="http://www.openarchives.org/OAI/2.0/oai_dc/"/>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "dc");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check if a node is an element with a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| has_tag(*child, tag))
}

/// Find all child elements with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gallica_client::xml::find_children;
///
/// let xml = r#"<sounds><page num="0"/><other/><page num="1"/></sounds>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(find_children(doc.root_element(), "page").count(), 2);
/// ```
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| has_tag(*child, tag))
}

/// Find a descendant element matching a path of tag names.
///
/// # Arguments
/// * `node` - Starting node
/// * `path` - Slash-separated path of tag names (e.g., "header/identifier")
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gallica_client::xml::find_by_path;
///
/// let xml = r#"<notice><record><header><identifier>oai:x</identifier></header></record></notice>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let id = find_by_path(doc.root_element(), "record/header/identifier");
/// assert_eq!(id.unwrap().text(), Some("oai:x"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, part| find_child(current, part))
}

/// Get the direct text content of a node, trimmed.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get the trimmed text of the element at `path` below `node`, or an empty string.
pub fn text_at(node: Node<'_, '_>, path: &str) -> String {
    find_by_path(node, path).map(get_text).unwrap_or_default()
}

/// Get all text below a node, with runs of whitespace collapsed.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gallica_client::xml::collect_text;
///
/// let doc = Document::parse("<seg>I. -\n  Le <hi>Festin</hi></seg>").unwrap();
/// assert_eq!(collect_text(doc.root_element()), "I. - Le Festin");
/// ```
pub fn collect_text(node: Node<'_, '_>) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Get an attribute by local name, ignoring its namespace.
///
/// Needed for `xml:lang`, which roxmltree files under the XML namespace.
pub fn get_attribute_local<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name() == name)
        .map(|attr| attr.value())
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_find_child() {
        let xml = r#"<root><a/><b/><c/></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(find_child(root, "a").is_some());
        assert!(find_child(root, "d").is_none());
    }

    #[test]
    fn test_find_by_path_missing() {
        let xml = r#"<root><level1><target>found</target></level1></root>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(text_at(root, "level1/target"), "found");
        assert!(find_by_path(root, "level1/missing").is_none());
        assert_eq!(text_at(root, "missing/path"), "");
    }

    #[test]
    fn test_get_text_trims() {
        let doc = Document::parse("<root>  trimmed text  </root>").unwrap();
        assert_eq!(get_text(doc.root_element()), "trimmed text");
    }

    #[test]
    fn test_get_attribute_local_xml_lang() {
        let xml = r#"<dc:type xmlns:dc="http://purl.org/dc/elements/1.1/" xml:lang="eng">sound</dc:type>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(get_attribute_local(root, "lang"), Some("eng"));
        assert_eq!(get_attribute_local(root, "missing"), None);
    }

    #[test]
    fn test_element_children_skip_text() {
        let doc = Document::parse("<row>text<cell/>more<cell/></row>").unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_parse_document_allows_doctype() {
        let xml = r#"<!DOCTYPE TEI.2 SYSTEM "tei2.dtd"><TEI.2><text/></TEI.2>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "TEI.2");
    }

    #[test]
    fn test_repair_references_keeps_valid() {
        let text = "a &amp; b &lt; c &#233; d &#xE9; e &quot;";
        assert_eq!(repair_references(text), text);
    }

    #[test]
    fn test_repair_references_fixes_invalid() {
        assert_eq!(repair_references("R&D"), "R&amp;D");
        assert_eq!(repair_references("caf&eacute;"), "caf&amp;eacute;");
        assert_eq!(repair_references("a&nbsp;b"), "a&#160;b");
        assert_eq!(repair_references("x &#0; y"), "x &amp;#0; y");
        assert_eq!(repair_references("x &#12 y"), "x &amp;#12 y");
    }

    #[test]
    fn test_prepared_markup_parses() {
        let text = "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<seg>Tom &amp Jerry &eacute;t&eacute;</seg>";
        let prepared = prepare_markup(text);
        let doc = Document::parse(&prepared).unwrap();
        assert_eq!(
            collect_text(doc.root_element()),
            "Tom &amp Jerry &eacute;t&eacute;"
        );
    }
}
