//! Command-line argument definitions
//!
//! One flat command: a directory plus flags selecting the mode and the
//! field operations, or a `--copy-frontmatter SRC DST` pair.

use clap::error::ErrorKind;
use clap::{ArgGroup, Parser, ValueEnum};
use fmbatch::OutputFormat;
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "fmbatch",
    version,
    about = "Batch-edit YAML/JSON front matter across trees of markdown files",
    long_about = "fmbatch walks a directory of markdown files and converts, adds, removes or \
                  renames front matter fields in every match. It can also analyze which \
                  fields are in use, check that required fields exist, and copy front matter \
                  between two parallel trees."
)]
#[command(group(
    ArgGroup::new("mode")
        .args(["to_array", "to_string", "analyze", "validate"])
        .multiple(false)
))]
pub struct Cli {
    /// Directory to process
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Split delimited string fields into arrays
    #[arg(long)]
    pub to_array: bool,

    /// Join array fields into delimited strings
    #[arg(long)]
    pub to_string: bool,

    /// Report which fields each file defines
    #[arg(long)]
    pub analyze: bool,

    /// Report files missing any of --fields
    #[arg(long)]
    pub validate: bool,

    /// Fields the mode applies to (comma separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Delimiter used to split and join values
    #[arg(long, default_value = ",")]
    pub delimiter: String,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only process files directly inside DIRECTORY
    #[arg(long)]
    pub no_recursive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// File extensions to process (comma separated)
    #[arg(
        long,
        value_name = "LIST",
        value_delimiter = ',',
        default_values = [".md", ".markdown"]
    )]
    pub extension: Vec<String>,

    /// Only process files whose name matches this regex
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Add a field where it is absent; VALUE is type-detected
    #[arg(long, num_args = 1..=2, value_names = ["NAME", "VALUE"])]
    pub add_field: Option<Vec<String>>,

    /// Remove a field
    #[arg(long, value_name = "NAME")]
    pub remove_field: Option<String>,

    /// Rename a field, overwriting NEW if it exists
    #[arg(long, num_args = 2, value_names = ["OLD", "NEW"])]
    pub rename_field: Option<Vec<String>>,

    /// Sort array values after conversion
    #[arg(long)]
    pub sort_arrays: bool,

    /// Drop duplicate array values after conversion
    #[arg(long)]
    pub unique_values: bool,

    /// Format used when writing front matter back
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Yaml)]
    pub output_format: OutputFormatArg,

    /// Print run statistics when done
    #[arg(long)]
    pub stats: bool,

    /// Copy front matter from files under SRC into their counterparts under DST
    #[arg(long, num_args = 2, value_names = ["SRC", "DST"])]
    pub copy_frontmatter: Option<Vec<PathBuf>>,

    /// Only copy these fields (comma separated)
    #[arg(long, value_name = "LIST", value_delimiter = ',', requires = "copy_frontmatter")]
    pub frontmatter_fields: Option<Vec<String>>,
}

/// Front matter output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Yaml,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Help and version requests come back from clap as errors but are not failures
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}
