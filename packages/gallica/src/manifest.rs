//! IIIF manifest parsing.
//!
//! Gallica manifests follow IIIF Presentation 2.0. The top level is read
//! field by field; the `metadata` list is a sequence of `{label, value}`
//! pairs whose value shape depends on the label, so each entry is
//! dispatched through [`MetadataLabel`].

use serde_json::Value;

use crate::error::Result;
use crate::json::JsonNode;
use crate::types::{Document, Image, Metadata};

/// Metadata labels Gallica uses in its manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataLabel {
    Repository,
    Provider,
    Disseminator,
    SourceImages,
    MetadataSource,
    Shelfmark,
    Title,
    Date,
    Creator,
    Relation,
    Language,
    Format,
    Type,
}

impl MetadataLabel {
    /// Match a manifest label exactly (case-sensitive).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let kind = match label {
            "Repository" => Self::Repository,
            "Provider" => Self::Provider,
            "Disseminator" => Self::Disseminator,
            "Source Images" => Self::SourceImages,
            "Metadata Source" => Self::MetadataSource,
            "Shelfmark" => Self::Shelfmark,
            "Title" => Self::Title,
            "Date" => Self::Date,
            "Creator" => Self::Creator,
            "Relation" => Self::Relation,
            "Language" => Self::Language,
            "Format" => Self::Format,
            "Type" => Self::Type,
            _ => return None,
        };
        Some(kind)
    }
}

/// Parse a manifest payload into a [`Document`].
///
/// Fails with a decode-kind error when the payload is not JSON, when one of
/// `@id`, `label`, `attribution`, `license`, `related`, `thumbnail`,
/// `metadata` or `sequences` is missing, or when a field has the wrong type.
pub fn parse_manifest(bytes: &[u8]) -> Result<Document> {
    let value: Value = serde_json::from_slice(bytes)?;
    let root = JsonNode::root(&value);

    let id = root.non_empty_str("@id")?.to_string();
    let label = root.field("label")?.as_str()?.to_string();
    let attribution = root.field("attribution")?.as_str()?.to_string();
    let license = root.field("license")?.as_str()?.to_string();
    let related = root.field("related")?.as_str()?.to_string();
    let thumbnail = root.field("thumbnail")?.field("@id")?.as_str()?.to_string();
    let description = match root.opt_field("description")? {
        Some(node) => node.as_str()?.to_string(),
        None => String::new(),
    };

    let metadata = parse_metadata(&root.field("metadata")?)?;
    let images = parse_images(&root.field("sequences")?)?;

    tracing::debug!(id = %id, images = images.len(), "Parsed manifest");

    Ok(Document {
        id,
        label,
        attribution,
        license,
        related,
        description,
        metadata,
        images,
        thumbnail,
    })
}

/// Fold the `metadata` array into a [`Metadata`] value.
fn parse_metadata(entries: &JsonNode<'_>) -> Result<Metadata> {
    let mut metadata = Metadata::default();
    for entry in entries.elements()? {
        apply_metadata_entry(&mut metadata, &entry)?;
    }
    Ok(metadata)
}

fn apply_metadata_entry(metadata: &mut Metadata, entry: &JsonNode<'_>) -> Result<()> {
    let label_node = entry.field("label")?;
    let Some(label) = label_node.value().as_str() else {
        tracing::warn!(path = label_node.path(), "Skipping metadata entry without a text label");
        return Ok(());
    };
    let Some(kind) = MetadataLabel::from_label(label) else {
        tracing::warn!(label, "Skipping unknown manifest metadata label");
        return Ok(());
    };

    let value = entry.field("value")?;
    match kind {
        MetadataLabel::Repository => metadata.repository = value.as_str()?.to_string(),
        MetadataLabel::Provider => metadata.provider = value.as_str()?.to_string(),
        MetadataLabel::Disseminator => metadata.disseminator = value.as_str()?.to_string(),
        MetadataLabel::SourceImages => metadata.source_images = value.as_str()?.to_string(),
        MetadataLabel::MetadataSource => metadata.metadata_source = value.as_str()?.to_string(),
        MetadataLabel::Shelfmark => metadata.shelfmark = value.as_str()?.to_string(),
        MetadataLabel::Title => metadata.title = value.as_str()?.to_string(),
        MetadataLabel::Date => metadata.date = value.as_str()?.to_string(),
        MetadataLabel::Creator => metadata.creator = value.as_str()?.to_string(),
        MetadataLabel::Relation => metadata.relation = value.as_str()?.to_string(),
        MetadataLabel::Language => flatten_values(&value, &mut metadata.language)?,
        MetadataLabel::Format => flatten_values(&value, &mut metadata.format)?,
        MetadataLabel::Type => {
            for pair in value.elements()? {
                let lang = pair.field("@language")?.as_str()?;
                let text = pair.field("@value")?.as_str()?;
                metadata
                    .types
                    .entry(lang.to_string())
                    .or_default()
                    .push(text.to_string());
            }
        }
    }
    Ok(())
}

/// Append every string of a list of single-key objects, in encounter order.
///
/// `[{"@value": "fre"}, {"@value": "français"}]` yields `fre`, `français`.
/// A bare string value is taken as a one-element list.
fn flatten_values(value: &JsonNode<'_>, out: &mut Vec<String>) -> Result<()> {
    if let Some(text) = value.value().as_str() {
        out.push(text.to_string());
        return Ok(());
    }
    for object in value.elements()? {
        for (_, member) in object.members()? {
            out.push(member.as_str()?.to_string());
        }
    }
    Ok(())
}

/// Collect one [`Image`] per canvas over all sequences.
fn parse_images(sequences: &JsonNode<'_>) -> Result<Vec<Image>> {
    let mut images = Vec::new();
    for sequence in sequences.elements()? {
        for canvas in sequence.field("canvases")?.elements()? {
            images.push(parse_canvas(&canvas)?);
        }
    }
    Ok(images)
}

fn parse_canvas(canvas: &JsonNode<'_>) -> Result<Image> {
    let id = canvas.non_empty_str("@id")?.to_string();
    let label = match canvas.opt_field("label")? {
        Some(node) => node.as_str()?.to_string(),
        None => String::new(),
    };
    let height = dimension(canvas, "height")?;
    let width = dimension(canvas, "width")?;
    let thumbnail = match canvas.opt_field("thumbnail")? {
        Some(node) => node.field("@id")?.as_str()?.to_string(),
        None => String::new(),
    };
    let format = canvas
        .value()
        .pointer("/images/0/resource/format")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Image {
        id,
        label,
        height,
        width,
        format,
        thumbnail,
    })
}

/// Read a canvas dimension; absent means 0, anything but a number is an error.
fn dimension(canvas: &JsonNode<'_>, key: &str) -> Result<f64> {
    match canvas.opt_field(key)? {
        Some(node) => node.as_f64(),
        None => Ok(0.0),
    }
}
