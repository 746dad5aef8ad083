//! Extract command arguments

use clap::Args;
use std::path::PathBuf;

use c2data::{EntityKind, Source};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source directory, optionally suffixed with its locale (DIR:ko).
    /// The first one is the primary source.
    #[arg(short, long = "source", value_name = "DIR[:LOCALE]")]
    pub sources: Vec<Source>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only parse these entity types (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<EntityKind>,

    /// Check cross-collection references
    #[arg(long)]
    pub validate: bool,

    /// Abort a table on its first bad row instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Treat 0 in required fields as missing, like older exports did
    #[arg(long)]
    pub legacy_zero_defaults: bool,

    /// Directory with the <prefix>-sheetN.webp atlases; enables portrait extraction
    #[arg(long)]
    pub atlas: Option<PathBuf>,

    /// Atlas name prefix of hero portrait sheets
    #[arg(long)]
    pub sheet_prefix: Option<String>,

    /// Animation frame to take portraits from
    #[arg(long)]
    pub preferred_frame: Option<i64>,
}
