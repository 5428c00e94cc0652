//! HTTP transport for talking to the Gallica services.
//!
//! Every operation performs a single GET through a [`Transport`]. The default
//! implementation wraps a blocking `reqwest` client; callers can plug in their
//! own (proxies, caches, test doubles) through
//! [`crate::client::GallicaClient::with_transport`].

use reqwest::blocking::Client;

use crate::config::GallicaConfig;
use crate::error::{GallicaError, Result};

/// Status and body of a completed GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A capability to perform one HTTP GET.
///
/// Implementations must not retry; timeouts and cancellation are their own
/// concern. Network-level failures should surface as
/// [`GallicaError::Http`] or another transport-kind error.
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the timeout and user agent from `config`.
    pub fn new(config: &GallicaConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
        })
    }

    /// Wrap an already configured client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?;
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with the timeout and user agent of `config`.
pub fn create_client(config: &GallicaConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// The service a request is addressed to.
///
/// Status codes are interpreted per endpoint: only the services endpoints
/// use 400 to flag a malformed ark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Manifest,
    Record,
    Toc,
}

impl Endpoint {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Record => "record",
            Self::Toc => "toc",
        }
    }
}

/// Map a response status to an error, or `Ok(())` for 2xx.
///
/// # Examples
/// ```
/// use gallica_client::error::ErrorKind;
/// use gallica_client::http::{check_status, Endpoint};
///
/// assert!(check_status(Endpoint::Toc, "u", 200).is_ok());
/// let err = check_status(Endpoint::Toc, "u", 404).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// ```
pub fn check_status(endpoint: Endpoint, url: &str, status: u16) -> Result<()> {
    match (status, endpoint) {
        (200..=299, _) => Ok(()),
        (404, _) => Err(GallicaError::NotFound {
            url: url.to_string(),
        }),
        (400, Endpoint::Record | Endpoint::Toc) => Err(GallicaError::BadRequest {
            url: url.to_string(),
        }),
        _ => Err(GallicaError::UnexpectedStatus {
            status,
            url: url.to_string(),
        }),
    }
}

/// Convert a response body to a string without charset translation.
///
/// Valid UTF-8 is used as-is. Anything else is read byte by byte, each byte
/// becoming the code point of the same value, so Latin-1 payloads survive
/// intact and no byte is dropped.
///
/// # Arguments
/// * `bytes` - Raw response body
/// * `context` - Description of the payload for the warning log
pub fn bytes_to_string(bytes: &[u8], context: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(
                context,
                valid_up_to = e.valid_up_to(),
                "Payload is not valid UTF-8, reading raw bytes"
            );
            bytes.iter().map(|&b| char::from(b)).collect()
        }
    }
}
