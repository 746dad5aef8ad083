//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use c2data::Locale;

use super::extract::ExtractArgs;

#[derive(Parser)]
#[command(name = "c2data")]
#[command(about = "Typed game data from Construct 2 c2array exports", long_about = None)]
pub struct Cli {
    /// Debug logging for the extraction library
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to <config dir>/c2data/config.toml)
    #[arg(long, global = true, env = "C2DATA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse source directories into record documents
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Show dimensions and raw cells of one c2array container
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to a c2array .json file
        input: PathBuf,

        /// Print the cells of this row (0 is the header)
        #[arg(short, long)]
        row: Option<usize>,
    },

    /// Query a source directory's translation table
    #[command(visible_alias = "l")]
    Lang {
        /// Source directory containing lau.json
        dir: PathBuf,

        /// Locale the table translates into
        #[arg(short, long, default_value = "en")]
        locale: Locale,

        /// Look up the translation of this canonical text
        #[arg(short, long, conflicts_with = "id")]
        text: Option<String>,

        /// Find the entry with this row id
        #[arg(long)]
        id: Option<i64>,
    },

    /// Show or create the config file
    #[command(visible_alias = "c")]
    Configure {
        /// Print the effective configuration
        #[arg(long)]
        show: bool,

        /// Write a default config file if none exists
        #[arg(long, conflicts_with = "show")]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use c2data::EntityKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "c2data",
            "extract",
            "-s",
            "package",
            "-s",
            "package_kor:ko",
            "--only",
            "hero,stage",
            "--strict",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.sources[1].locale, Locale::Ko);
        assert_eq!(args.only, vec![EntityKind::Hero, EntityKind::Stage]);
        assert!(args.strict);
    }

    #[test]
    fn test_parse_lang() {
        let cli = Cli::try_parse_from(["c2data", "lang", "pkg", "--locale", "ko", "--id", "7"]).unwrap();
        match cli.command {
            Commands::Lang { locale, id, text, .. } => {
                assert_eq!(locale, Locale::Ko);
                assert_eq!(id, Some(7));
                assert!(text.is_none());
            }
            _ => panic!("expected lang"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["c2data", "extract", "--only", "dragon"]).is_err());
    }
}
