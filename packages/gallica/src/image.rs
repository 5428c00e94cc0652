//! IIIF Image API URL construction.
//!
//! Builds `{base}/{region}/{size}/{rotation}/{quality}.{format}` for a page
//! of a document. Every parameter except the ark and page id has a default,
//! and out-of-range values fall back to it instead of failing.

use crate::config::{validate_segment, GallicaConfig};
use crate::error::Result;

/// Image quality keywords of the IIIF Image API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quality {
    #[default]
    Native,
    Color,
    Gray,
    Bitonal,
}

impl Quality {
    /// Parse a requested quality. `native` is the fallback, not a choice.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "color" => Some(Self::Color),
            "gray" => Some(Self::Gray),
            "bitonal" => Some(Self::Bitonal),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Color => "color",
            Self::Gray => "gray",
            Self::Bitonal => "bitonal",
        }
    }
}

/// Output formats served by the Gallica image server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Jpg,
    Tif,
    Png,
    Gif,
    Jp2,
    Pdf,
    Webp,
}

impl ImageFormat {
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "jpg" => Some(Self::Jpg),
            "tif" => Some(Self::Tif),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "jp2" => Some(Self::Jp2),
            "pdf" => Some(Self::Pdf),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Tif => "tif",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jp2 => "jp2",
            Self::Pdf => "pdf",
            Self::Webp => "webp",
        }
    }
}

/// Parameters of an image request.
///
/// Zero means "unset" for the numeric fields; empty means "unset" for
/// `quality` and `format`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageParams {
    /// Document ark (required).
    pub ark: String,
    /// Page id such as `f1` (required).
    pub page_id: String,
    pub region_x: i64,
    pub region_y: i64,
    pub width: i64,
    pub height: i64,
    /// Requested width in pixels.
    pub size: i64,
    /// Rotation in degrees.
    pub rotation: i64,
    pub quality: String,
    pub format: String,
}

impl ImageParams {
    #[must_use]
    pub fn new(ark: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            ark: ark.into(),
            page_id: page_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_region(mut self, x: i64, y: i64, width: i64, height: i64) -> Self {
        self.region_x = x;
        self.region_y = y;
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: i64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// `x,y,w,h` when all four bounds are positive, `full` otherwise.
    #[must_use]
    pub fn region(&self) -> String {
        let bounds = [self.region_x, self.region_y, self.width, self.height];
        if bounds.iter().all(|&b| b > 0) {
            format!(
                "{},{},{},{}",
                self.region_x, self.region_y, self.width, self.height
            )
        } else {
            "full".to_string()
        }
    }

    /// Requested size when positive, `full` otherwise.
    #[must_use]
    pub fn size_segment(&self) -> String {
        if self.size > 0 {
            self.size.to_string()
        } else {
            "full".to_string()
        }
    }

    /// Rotation when strictly between 0 and 360, 0 otherwise.
    #[must_use]
    pub fn rotation_degrees(&self) -> i64 {
        if self.rotation > 0 && self.rotation < 360 {
            self.rotation
        } else {
            0
        }
    }

    #[must_use]
    pub fn resolved_quality(&self) -> Quality {
        Quality::parse(&self.quality).unwrap_or_default()
    }

    #[must_use]
    pub fn resolved_format(&self) -> ImageFormat {
        ImageFormat::parse(&self.format).unwrap_or_default()
    }
}

/// Build the image URL for `params` against the IIIF base of `config`.
///
/// # Examples
/// ```
/// use gallica_client::config::GallicaConfig;
/// use gallica_client::image::{build_image_url, ImageParams};
///
/// let url = build_image_url(&GallicaConfig::default(), &ImageParams::new("btv1b531610266", "f1")).unwrap();
/// assert_eq!(
///     url,
///     "https://gallica.bnf.fr/iiif/ark:/12148/btv1b531610266/f1/full/full/0/native.jpg"
/// );
/// ```
pub fn build_image_url(config: &GallicaConfig, params: &ImageParams) -> Result<String> {
    validate_segment("ark", &params.ark)?;
    validate_segment("page id", &params.page_id)?;

    Ok(format!(
        "{}/{}/{}/{}/{}.{}",
        config.image_base_url(&params.ark, &params.page_id),
        params.region(),
        params.size_segment(),
        params.rotation_degrees(),
        params.resolved_quality().as_str(),
        params.resolved_format().as_str(),
    ))
}
