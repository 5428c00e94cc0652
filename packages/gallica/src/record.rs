//! Bibliographic record (`OAIRecord` service) parsing.
//!
//! The payload wraps an OAI-PMH record in a `<results>` element, next to a
//! few Gallica-specific fields:
//!
//! ```text
//! results
//! ├── notice/record/header/identifier
//! ├── notice/record/metadata/dc/{title, creator, ..., type*, rights*}
//! ├── dewey, sdewey, typedoc, nqamoyen
//! ├── sounds/page[@num]/media/{title, file}
//! └── video/file
//! ```
//!
//! Every field maps from a fixed path; absent elements give empty values.

use roxmltree::Node;

use crate::error::{GallicaError, Result};
use crate::http::bytes_to_string;
use crate::types::{BibliographicRecord, DublinCoreRecord, LocalizedText, SoundTrack};
use crate::xml::{
    find_by_path, find_child, find_children, get_attribute_local, get_text, parse_document,
    text_at,
};

/// Parse an `OAIRecord` payload into a [`BibliographicRecord`].
pub fn parse_record(bytes: &[u8]) -> Result<BibliographicRecord> {
    let xml = bytes_to_string(bytes, "bibliographic record");
    let doc = parse_document(&xml)?;
    let root = doc.root_element();

    let dublin_core = find_by_path(root, "notice/record/metadata/dc")
        .map(parse_dublin_core)
        .unwrap_or_default();

    let sound_tracks: Vec<SoundTrack> = find_child(root, "sounds")
        .map(|sounds| find_children(sounds, "page").map(parse_sound_track).collect())
        .unwrap_or_default();

    let video_file = Some(text_at(root, "video/file")).filter(|s| !s.is_empty());

    Ok(BibliographicRecord {
        identifier: text_at(root, "notice/record/header/identifier"),
        dewey: text_at(root, "dewey"),
        sdewey: text_at(root, "sdewey"),
        typedoc: text_at(root, "typedoc"),
        quality: parse_quality(&text_at(root, "nqamoyen"))?,
        dublin_core,
        sound_tracks,
        video_file,
    })
}

fn parse_dublin_core(dc: Node<'_, '_>) -> DublinCoreRecord {
    DublinCoreRecord {
        title: text_at(dc, "title"),
        creator: text_at(dc, "creator"),
        contributor: text_at(dc, "contributor"),
        description: text_at(dc, "description"),
        subject: text_at(dc, "subject"),
        publisher: text_at(dc, "publisher"),
        date: text_at(dc, "date"),
        format: text_at(dc, "format"),
        language: text_at(dc, "language"),
        relation: text_at(dc, "relation"),
        source: text_at(dc, "source"),
        types: localized(dc, "type"),
        rights: localized(dc, "rights"),
    }
}

/// Every `<tag xml:lang="...">` child of `dc`, in document order.
fn localized(dc: Node<'_, '_>, tag: &'static str) -> Vec<LocalizedText> {
    find_children(dc, tag)
        .map(|node| {
            LocalizedText::new(
                get_attribute_local(node, "lang").unwrap_or_default(),
                get_text(node),
            )
        })
        .collect()
}

fn parse_sound_track(page: Node<'_, '_>) -> SoundTrack {
    SoundTrack {
        page_number: page.attribute("num").unwrap_or_default().to_string(),
        title: text_at(page, "media/title"),
        file_url: text_at(page, "media/file"),
    }
}

fn parse_quality(text: &str) -> Result<Option<f64>> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|e| GallicaError::InvalidValue {
            path: "results/nqamoyen".to_string(),
            message: format!("'{text}' is not a number: {e}"),
        })
}
