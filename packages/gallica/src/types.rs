//! Core data types returned by the Gallica client.
//!
//! All of these are plain values: built once by a parser and never mutated
//! afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A digital object described by a IIIF manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Manifest URI (`@id`).
    pub id: String,

    /// Short label, usually the shelfmark.
    pub label: String,

    pub attribution: String,

    /// License URI.
    pub license: String,

    /// URI of the document in the Gallica viewer.
    pub related: String,

    /// Free-text description, empty when the manifest has none.
    pub description: String,

    /// Descriptive metadata from the manifest's label/value list.
    pub metadata: Metadata,

    /// One image per canvas, in manifest order.
    pub images: Vec<Image>,

    /// Cover thumbnail URI.
    pub thumbnail: String,
}

impl Document {
    /// Thumbnail URIs of all images, in order.
    #[must_use]
    pub fn thumbnails(&self) -> Vec<&str> {
        self.images.iter().map(|img| img.thumbnail.as_str()).collect()
    }

    /// Thumbnail URI of the document cover.
    #[must_use]
    pub fn cover_thumbnail(&self) -> &str {
        &self.thumbnail
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Serialize the image list as JSON.
    pub fn images_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.images)?)
    }

    /// Serialize the metadata block as JSON.
    pub fn metadata_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.metadata)?)
    }
}

/// Descriptive metadata of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub repository: String,
    pub provider: String,
    pub disseminator: String,
    /// URI of the source images.
    pub source_images: String,
    /// URI of the OAI record the metadata was taken from.
    pub metadata_source: String,
    pub shelfmark: String,
    pub title: String,
    pub date: String,
    pub creator: String,
    pub relation: String,
    /// Language codes and names, in manifest order, duplicates kept.
    pub language: Vec<String>,
    /// Physical and digital format descriptions, in manifest order.
    pub format: Vec<String>,
    /// Document types keyed by language code (`eng`, `fre`, ...).
    #[serde(rename = "type")]
    pub types: BTreeMap<String, Vec<String>>,
}

/// One page image of a document, taken from a manifest canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Canvas URI.
    pub id: String,
    pub label: String,
    /// Height in canvas units, 0 when the canvas does not say.
    pub height: f64,
    /// Width in canvas units, 0 when the canvas does not say.
    pub width: f64,
    /// MIME type of the image resource, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub thumbnail: String,
}

/// Bibliographic record from the `OAIRecord` service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    /// OAI identifier (`oai:bnf.fr:gallica/ark:/12148/...`).
    pub identifier: String,

    /// Dewey classification.
    pub dewey: String,

    /// Secondary Dewey classification.
    pub sdewey: String,

    /// Document type flag (`monographie`, `sonore`, ...).
    pub typedoc: String,

    /// Average OCR quality score, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,

    /// Dublin Core description.
    pub dublin_core: DublinCoreRecord,

    /// Tracks of a sound document, empty for other document types.
    pub sound_tracks: Vec<SoundTrack>,

    /// Video file URI of a video document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_file: Option<String>,
}

/// The OAI-DC part of a bibliographic record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DublinCoreRecord {
    pub title: String,
    pub creator: String,
    pub contributor: String,
    pub description: String,
    pub subject: String,
    pub publisher: String,
    pub date: String,
    pub format: String,
    pub language: String,
    pub relation: String,
    pub source: String,
    /// Document types, one per language.
    pub types: Vec<LocalizedText>,
    /// Rights statements, one per language.
    pub rights: Vec<LocalizedText>,
}

/// A text value tagged with its `xml:lang`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub lang: String,
    pub text: String,
}

impl LocalizedText {
    #[must_use]
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            text: text.into(),
        }
    }
}

/// One track of a sound document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundTrack {
    pub page_number: String,
    pub title: String,
    pub file_url: String,
}

/// Table of contents of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOfContents {
    /// Entries in document order.
    pub entries: Vec<TocEntry>,
}

impl TableOfContents {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the table of contents as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// One line of a table of contents.
///
/// Entries without a resolvable page reference keep their text and have an
/// empty `page_number` and `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub text: String,
    /// Printed page number as shown in the table.
    pub page_number: String,
    /// Viewer URL of the referenced page.
    pub url: String,
}

impl TocEntry {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Whether a page reference was resolved for this entry.
    #[must_use]
    pub fn has_link(&self) -> bool {
        !self.url.is_empty()
    }
}
