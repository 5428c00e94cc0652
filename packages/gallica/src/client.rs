//! Gallica client service tying configuration, transport and parsers together.

use crate::config::{validate_ark, GallicaConfig};
use crate::error::Result;
use crate::http::{check_status, Endpoint, ReqwestTransport, Transport};
use crate::image::{build_image_url, ImageParams};
use crate::manifest::parse_manifest;
use crate::record::parse_record;
use crate::toc::parse_table_of_contents;
use crate::types::{BibliographicRecord, Document, TableOfContents};

/// Client for the Gallica manifest, record and table of contents services.
///
/// Each operation validates its identifier, performs exactly one GET and
/// decodes the answer. Nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct GallicaClient<T = ReqwestTransport> {
    config: GallicaConfig,
    transport: T,
}

impl GallicaClient<ReqwestTransport> {
    /// Create a client backed by a blocking `reqwest` transport.
    pub fn new(config: GallicaConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> GallicaClient<T> {
    /// Create a client with a caller-supplied transport.
    #[must_use]
    pub fn with_transport(config: GallicaConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &GallicaConfig {
        &self.config
    }

    /// Download and parse the IIIF manifest of a document.
    ///
    /// # Arguments
    /// * `ark` - Document identifier (e.g., "btv1b531610266")
    pub fn get_document(&self, ark: &str) -> Result<Document> {
        validate_ark(ark)?;
        let url = self.config.manifest_url(ark);
        let body = self.fetch(Endpoint::Manifest, &url)?;
        parse_manifest(&body)
    }

    /// Download a manifest and return only its metadata block, as JSON.
    pub fn get_document_metadata(&self, ark: &str) -> Result<Vec<u8>> {
        self.get_document(ark)?.metadata_json()
    }

    /// Download and parse the bibliographic record of a document.
    pub fn get_bibliographic_record(&self, ark: &str) -> Result<BibliographicRecord> {
        validate_ark(ark)?;
        let url = self.config.record_url(ark);
        let body = self.fetch(Endpoint::Record, &url)?;
        parse_record(&body)
    }

    /// Download and parse the table of contents of a document.
    pub fn get_table_of_contents(&self, ark: &str) -> Result<TableOfContents> {
        validate_ark(ark)?;
        let url = self.config.toc_url(ark);
        let body = self.fetch(Endpoint::Toc, &url)?;
        parse_table_of_contents(&body, ark, &self.config)
    }

    /// Build an IIIF image URL. No request is made.
    pub fn image_url(&self, params: &ImageParams) -> Result<String> {
        build_image_url(&self.config, params)
    }

    fn fetch(&self, endpoint: Endpoint, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(endpoint = endpoint.as_str(), url, "Fetching");
        let response = self.transport.get(url)?;
        check_status(endpoint, url, response.status)?;
        tracing::debug!(
            endpoint = endpoint.as_str(),
            bytes = response.body.len(),
            "Fetched"
        );
        Ok(response.body)
    }
}
