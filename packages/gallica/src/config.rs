//! Configuration values and validation functions for the Gallica client.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{GallicaError, Result};

/// Default base URL of the IIIF manifest and image delivery service.
pub const DEFAULT_IIIF_URL: &str = "https://gallica.bnf.fr/iiif";

/// Default base URL of the bibliographic record and table of contents services.
pub const DEFAULT_SERVICES_URL: &str = "https://gallica.bnf.fr/services";

/// Default base URL of the public document viewer.
pub const DEFAULT_SITE_URL: &str = "https://gallica.bnf.fr";

/// Name Assigning Authority Number of the BnF, the `12148` in `ark:/12148/...`.
pub const ARK_NAAN: &str = "12148";

/// HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string identifying this client.
pub const DEFAULT_USER_AGENT: &str = concat!("gallica-client/", env!("CARGO_PKG_VERSION"));

/// Ark identifiers and page ids end up as URL path segments and query values.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid regex"));

/// Base URLs and transport settings shared by every operation.
///
/// Built once and handed to [`crate::client::GallicaClient`]; nothing in the
/// crate reads process-wide constants at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallicaConfig {
    /// IIIF service base (manifests, images).
    pub iiif_url: String,
    /// Services base (`OAIRecord`, `Toc`).
    pub services_url: String,
    /// Viewer base used to build table of contents page links.
    pub site_url: String,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for GallicaConfig {
    fn default() -> Self {
        Self {
            iiif_url: DEFAULT_IIIF_URL.to_string(),
            services_url: DEFAULT_SERVICES_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GallicaConfig {
    #[must_use]
    pub fn with_iiif_url(mut self, url: impl Into<String>) -> Self {
        self.iiif_url = trim_base(url.into());
        self
    }

    #[must_use]
    pub fn with_services_url(mut self, url: impl Into<String>) -> Self {
        self.services_url = trim_base(url.into());
        self
    }

    #[must_use]
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = trim_base(url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the IIIF manifest URL for a document.
    ///
    /// # Examples
    /// ```
    /// use gallica_client::config::GallicaConfig;
    ///
    /// let config = GallicaConfig::default();
    /// assert_eq!(
    ///     config.manifest_url("btv1b531610266"),
    ///     "https://gallica.bnf.fr/iiif/ark:/12148/btv1b531610266/manifest.json"
    /// );
    /// ```
    #[must_use]
    pub fn manifest_url(&self, ark: &str) -> String {
        format!("{}/ark:/{ARK_NAAN}/{ark}/manifest.json", self.iiif_url)
    }

    /// Build the IIIF image API prefix for one page of a document.
    #[must_use]
    pub fn image_base_url(&self, ark: &str, page_id: &str) -> String {
        format!("{}/ark:/{ARK_NAAN}/{ark}/{page_id}", self.iiif_url)
    }

    /// Build the bibliographic record URL for a document.
    #[must_use]
    pub fn record_url(&self, ark: &str) -> String {
        format!("{}/OAIRecord?ark={ark}", self.services_url)
    }

    /// Build the table of contents URL for a document.
    ///
    /// Unlike `OAIRecord`, the `Toc` service wants the full ark path.
    #[must_use]
    pub fn toc_url(&self, ark: &str) -> String {
        format!("{}/Toc?ark=ark:/{ARK_NAAN}/{ark}", self.services_url)
    }

    /// Build the viewer URL for a page (`f<n>`) of a document.
    ///
    /// # Examples
    /// ```
    /// use gallica_client::config::GallicaConfig;
    ///
    /// let config = GallicaConfig::default();
    /// assert_eq!(
    ///     config.page_url("bpt6k61076295", "8"),
    ///     "https://gallica.bnf.fr/ark:/12148/bpt6k61076295/f8"
    /// );
    /// ```
    #[must_use]
    pub fn page_url(&self, ark: &str, page: &str) -> String {
        format!("{}/ark:/{ARK_NAAN}/{ark}/f{page}", self.site_url)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Validate a Gallica ark identifier (the part after `ark:/12148/`).
///
/// # Returns
/// * `Ok(())` if the identifier is non-empty and URL-safe
/// * `Err(GallicaError::InvalidArgument)` otherwise
///
/// # Examples
/// ```
/// use gallica_client::config::validate_ark;
///
/// assert!(validate_ark("btv1b531610266").is_ok());
/// assert!(validate_ark("").is_err());
/// assert!(validate_ark("btv1b53/../x").is_err());
/// ```
pub fn validate_ark(ark: &str) -> Result<()> {
    validate_segment("ark", ark)
}

/// Validate a value that will be embedded in a request URL.
pub(crate) fn validate_segment(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GallicaError::InvalidArgument(format!(
            "missing required parameter {name}"
        )));
    }
    if !ARK_PATTERN.is_match(value) {
        return Err(GallicaError::InvalidArgument(format!(
            "{name} '{value}' contains characters outside [A-Za-z0-9._-]"
        )));
    }
    Ok(())
}
