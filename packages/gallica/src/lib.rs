//! Gallica client - Access the Gallica digital library of the BnF.
//!
//! This crate fetches IIIF manifests, OAI bibliographic records and tables
//! of contents from Gallica and maps them into typed documents.
//!
//! # Example
//!
//! ```
//! use gallica_client::config::{validate_ark, GallicaConfig};
//! use gallica_client::image::{build_image_url, ImageParams};
//!
//! assert!(validate_ark("btv1b531610266").is_ok());
//!
//! let params = ImageParams::new("btv1b531610266", "f1").with_size(400);
//! let url = build_image_url(&GallicaConfig::default(), &params).unwrap();
//! assert!(url.ends_with("/f1/full/400/0/native.jpg"));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Base URLs, URL builders and identifier validation
//! - [`types`]: Returned documents (Document, BibliographicRecord, TableOfContents)
//! - [`error`]: Error types, kinds and Result alias
//! - [`http`]: Transport trait and the blocking reqwest transport
//! - [`json`]: Path-aware access into untyped JSON
//! - [`xml`]: XML utilities
//! - [`manifest`]: IIIF manifest parsing
//! - [`record`]: Bibliographic record parsing
//! - [`toc`]: Table of contents parsing (TEI and HTML)
//! - [`image`]: IIIF image URL construction
//! - [`client`]: Main client service
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod image;
pub mod json;
pub mod manifest;
pub mod record;
pub mod toc;
pub mod types;
pub mod xml;

pub use client::GallicaClient;

pub use config::{validate_ark, GallicaConfig};
pub use error::{ErrorKind, GallicaError, Result};
pub use image::{build_image_url, ImageParams};
pub use types::{
    BibliographicRecord, Document, Image, Metadata, TableOfContents, TocEntry,
};
