use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use mavcodec_schema::{Catalog, CatalogConfig};
use tracing::debug;

use crate::exit::{catalog_error, CliResult};
use crate::output::OutputFormat;

pub mod catalog;
pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode frames from a file or stdin.
    Decode(DecodeArgs),
    /// Encode one message into a frame.
    Encode(EncodeArgs),
    /// List catalog messages or describe one.
    Catalog(CatalogArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Catalog(args) => catalog::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Catalog location shared by every command that needs one.
#[derive(Args, Debug)]
pub struct CatalogSource {
    /// Catalog JSON file, or a directory of catalog files.
    #[arg(long, value_name = "PATH", env = "MAVCODEC_CATALOG")]
    pub catalog: PathBuf,
    /// Reject definitions with unknown field types at load time.
    #[arg(long)]
    pub strict: bool,
}

impl CatalogSource {
    pub fn load(&self) -> CliResult<Catalog> {
        let config = CatalogConfig {
            strict_types: self.strict,
            ..CatalogConfig::default()
        };
        let catalog = Catalog::from_path_with_config(&self.catalog, config)
            .map_err(|err| catalog_error(&context(&self.catalog), err))?;
        debug!(
            path = %self.catalog.display(),
            messages = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}

fn context(path: &Path) -> String {
    format!("failed loading catalog {}", path.display())
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub source: CatalogSource,
    /// Input file. Reads stdin when omitted.
    pub input: Option<PathBuf>,
    /// Treat input as hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
    /// Retained bytes allowed before the scanner resynchronizes.
    #[arg(long, value_name = "BYTES")]
    pub resync_limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub source: CatalogSource,
    /// Message name or numeric id.
    pub message: String,
    /// Field values as a JSON object.
    #[arg(long, conflicts_with = "fields_file")]
    pub fields: Option<String>,
    /// Read field values from a JSON file.
    #[arg(long, value_name = "PATH", conflicts_with = "fields")]
    pub fields_file: Option<PathBuf>,
    /// Sender system id.
    #[arg(long, default_value = "1")]
    pub system_id: u8,
    /// Sender component id.
    #[arg(long, default_value = "1")]
    pub component_id: u8,
    /// Frame sequence number.
    #[arg(long, default_value = "0")]
    pub sequence: u8,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub source: CatalogSource,
    /// Message name or numeric id to describe. Lists all when omitted.
    pub message: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
