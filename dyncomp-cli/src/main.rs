//! Dyncomp CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dyncomp_compression::{NegotiationPolicy, StreamEncoder};
use dyncomp_config::{load_config, CompressionSettings};
use dyncomp_core::{joined_header, HeaderMap, ResponseContext};
use http::header::{HeaderValue, ACCEPT_ENCODING, CONTENT_ENCODING};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dyncomp")]
#[command(about = "Dynamic response compression tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a settings file and print the effective strategy
    Validate {
        /// Path to settings file (yaml, toml, or json)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Negotiate and encode a file as a response body
    Encode {
        /// Path to settings file; legacy gzip defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Accept-Encoding value sent by the client
        #[arg(short, long, env = "DYNCOMP_ACCEPT_ENCODING")]
        accept_encoding: Option<String>,

        /// Body to encode
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the encoded body
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

/// A file on disk standing in for a pending response body
struct FileResponse {
    path: PathBuf,
    request_headers: HeaderMap,
}

impl ResponseContext for FileResponse {
    fn body_available_bytes(&self) -> io::Result<u64> {
        fs::metadata(&self.path).map(|m| m.len())
    }

    fn header(&self, name: &str) -> Option<String> {
        joined_header(&self.request_headers, name)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Validate { config } => {
            tracing::info!("Validating settings: {}", config.display());

            match load_config(&config) {
                Ok(settings) => {
                    tracing::info!("✓ Settings are valid");
                    let resolved = settings.resolve(None);
                    println!("{}", serde_json::to_string_pretty(&resolved)?);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Settings validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Encode {
            config,
            accept_encoding,
            input,
            output,
        } => {
            let settings = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => CompressionSettings::default(),
            };

            let content_encoding =
                encode_file(settings, accept_encoding.as_deref(), &input, &output)?;
            println!("{}", content_encoding.as_deref().unwrap_or("identity"));
            Ok(())
        }

        Commands::Version => {
            println!("dyncomp");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

/// Encode `input` into `output`, returning the Content-Encoding applied
fn encode_file(
    settings: CompressionSettings,
    accept_encoding: Option<&str>,
    input: &Path,
    output: &Path,
) -> Result<Option<String>> {
    let mut request_headers = HeaderMap::new();
    if let Some(value) = accept_encoding {
        request_headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_str(value).context("invalid Accept-Encoding value")?,
        );
    }

    let ctx = FileResponse {
        path: input.to_path_buf(),
        request_headers,
    };
    let decision = NegotiationPolicy::new(settings).decide(&ctx);
    tracing::info!(decision = %decision, input = %input.display(), "Encoding file");

    let mut source = BufReader::new(
        File::open(input).with_context(|| format!("opening {}", input.display()))?,
    );
    let mut destination = BufWriter::new(
        File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    let mut response_headers = HeaderMap::new();

    StreamEncoder::new().apply(decision, &mut source, &mut destination, &mut response_headers)?;
    destination.flush()?;

    Ok(response_headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned))
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(filter.into()))
        .init();

    Ok(())
}
