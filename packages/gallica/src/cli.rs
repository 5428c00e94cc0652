//! Command-line interface for the Gallica client.

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::client::GallicaClient;
use crate::config::{GallicaConfig, DEFAULT_IIIF_URL, DEFAULT_SERVICES_URL, DEFAULT_SITE_URL};
use crate::error::{GallicaError, Result};
use crate::image::{build_image_url, ImageParams};

/// Gallica client - Fetch manifests, records and tables of contents from Gallica.
#[derive(Parser)]
#[command(name = "gallica")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub endpoints: EndpointArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Base URLs of the services.
#[derive(Args)]
pub struct EndpointArgs {
    /// IIIF manifest and image service base URL
    #[arg(long, env = "GALLICA_IIIF_URL", default_value = DEFAULT_IIIF_URL, global = true)]
    pub iiif_url: String,

    /// Record and table of contents service base URL
    #[arg(long, env = "GALLICA_SERVICES_URL", default_value = DEFAULT_SERVICES_URL, global = true)]
    pub services_url: String,

    /// Document viewer base URL used for page links
    #[arg(long, env = "GALLICA_SITE_URL", default_value = DEFAULT_SITE_URL, global = true)]
    pub site_url: String,
}

impl EndpointArgs {
    fn to_config(&self) -> GallicaConfig {
        GallicaConfig::default()
            .with_iiif_url(&self.iiif_url)
            .with_services_url(&self.services_url)
            .with_site_url(&self.site_url)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a IIIF manifest and print it as a document.
    Manifest {
        /// Document ark (e.g., btv1b531610266)
        ark: String,
    },

    /// Print only the descriptive metadata of a manifest.
    Metadata {
        /// Document ark
        ark: String,
    },

    /// Download the bibliographic record of a document.
    Record {
        /// Document ark (e.g., bpt6k1279113)
        ark: String,
    },

    /// Download the table of contents of a document.
    Toc {
        /// Document ark (e.g., bpt6k61076295)
        ark: String,
    },

    /// Print the IIIF image URL for a page. No request is made.
    ImageUrl {
        /// Document ark
        ark: String,

        /// Page id (e.g., f1)
        page_id: String,

        /// Region as x,y,width,height
        #[arg(long, value_delimiter = ',')]
        region: Option<Vec<i64>>,

        /// Width in pixels
        #[arg(long, default_value_t = 0)]
        size: i64,

        /// Rotation in degrees
        #[arg(long, default_value_t = 0)]
        rotation: i64,

        /// color, gray or bitonal (default: native)
        #[arg(long, default_value = "")]
        quality: String,

        /// jpg, tif, png, gif, jp2, pdf or webp (default: jpg)
        #[arg(long, default_value = "")]
        format: String,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.endpoints.to_config();

    match cli.command {
        Commands::ImageUrl {
            ark,
            page_id,
            region,
            size,
            rotation,
            quality,
            format,
        } => {
            let mut params = ImageParams::new(ark, page_id)
                .with_size(size)
                .with_rotation(rotation)
                .with_quality(quality)
                .with_format(format);
            match region.as_deref() {
                None => {}
                Some(&[x, y, w, h]) => params = params.with_region(x, y, w, h),
                Some(_) => {
                    return Err(GallicaError::InvalidArgument(
                        "--region expects x,y,width,height".to_string(),
                    ))
                }
            }
            println!("{}", build_image_url(&config, &params)?);
            Ok(())
        }
        Commands::Manifest { ark } => {
            let client = GallicaClient::new(config)?;
            let doc = with_spinner("Downloading manifest...", || client.get_document(&ark))?;
            eprintln!("  Label: {}", style(&doc.label).green());
            eprintln!("  Images: {}", doc.image_count());
            print_json(&doc)
        }
        Commands::Metadata { ark } => {
            let client = GallicaClient::new(config)?;
            let bytes = with_spinner("Downloading manifest...", || {
                client.get_document_metadata(&ark)
            })?;
            println!("{}", String::from_utf8_lossy(&bytes));
            Ok(())
        }
        Commands::Record { ark } => {
            let client = GallicaClient::new(config)?;
            let record = with_spinner("Downloading record...", || {
                client.get_bibliographic_record(&ark)
            })?;
            eprintln!("  Title: {}", style(&record.dublin_core.title).green());
            eprintln!("  Type: {}", record.typedoc);
            print_json(&record)
        }
        Commands::Toc { ark } => {
            let client = GallicaClient::new(config)?;
            let toc = with_spinner("Downloading table of contents...", || {
                client.get_table_of_contents(&ark)
            })?;
            eprintln!("  Entries: {}", style(toc.len()).green());
            print_json(&toc)
        }
    }
}

/// Run `task` behind a spinner on stderr.
fn with_spinner<T>(message: &'static str, task: impl FnOnce() -> Result<T>) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = task();
    pb.finish_and_clear();
    result
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_manifest() {
        let cli = Cli::parse_from(["gallica", "manifest", "btv1b531610266"]);
        let Commands::Manifest { ark } = cli.command else {
            panic!("expected manifest command");
        };
        assert_eq!(ark, "btv1b531610266");
        assert_eq!(cli.endpoints.iiif_url, DEFAULT_IIIF_URL);
    }

    #[test]
    fn test_cli_parse_image_url() {
        let cli = Cli::parse_from([
            "gallica",
            "image-url",
            "btv1b531610266",
            "f1",
            "--region",
            "10,20,30,40",
            "--rotation",
            "90",
            "--format",
            "png",
        ]);
        let Commands::ImageUrl {
            region,
            rotation,
            format,
            size,
            ..
        } = cli.command
        else {
            panic!("expected image-url command");
        };
        assert_eq!(region, Some(vec![10, 20, 30, 40]));
        assert_eq!(rotation, 90);
        assert_eq!(format, "png");
        assert_eq!(size, 0);
    }

    #[test]
    fn test_cli_endpoint_override() {
        let cli = Cli::parse_from([
            "gallica",
            "toc",
            "bpt6k61076295",
            "--services-url",
            "http://localhost:9000/services/",
        ]);
        let config = cli.endpoints.to_config();
        assert_eq!(
            config.toc_url("bpt6k61076295"),
            "http://localhost:9000/services/Toc?ark=ark:/12148/bpt6k61076295"
        );
    }
}
