//! Extract command handler
//!
//! Merges command-line flags over the config file, runs the pipeline and
//! prints a per-type report.

use crate::cli::ExtractArgs;
use crate::config::Config;
use anyhow::{bail, Context, Result};
use c2data::pipeline::RunSummary;
use c2data::{Pipeline, PipelineOptions, SpriteOptions, ZeroPolicy};
use std::path::PathBuf;

/// Used when neither `--output` nor the config names an output directory
pub const DEFAULT_OUTPUT: &str = "data";

/// Effective pipeline options and output directory.
///
/// Flags win over config values, which win over built-in defaults.
pub fn resolve(args: &ExtractArgs, config: &Config) -> Result<(PipelineOptions, PathBuf)> {
    let sources = if args.sources.is_empty() {
        config.sources()
    } else {
        args.sources.clone()
    };
    if sources.is_empty() {
        bail!("No source directories given (use --source or set `sources` in the config file)");
    }

    let defaults = SpriteOptions::default();
    let sprite = SpriteOptions {
        sheet_prefix: args
            .sheet_prefix
            .clone()
            .or_else(|| config.sprite.sheet_prefix.clone())
            .unwrap_or(defaults.sheet_prefix),
        preferred_frame: args
            .preferred_frame
            .or(config.sprite.preferred_frame)
            .unwrap_or(defaults.preferred_frame),
        atlas_dir: args.atlas.clone().or_else(|| config.sprite.atlas_dir.clone()),
    };

    let zero_policy = if args.legacy_zero_defaults || config.legacy_zero_defaults {
        ZeroPolicy::LegacyZeroIsAbsent
    } else {
        ZeroPolicy::Preserve
    };

    let options = PipelineOptions {
        sources,
        only: (!args.only.is_empty()).then(|| args.only.clone()),
        skip_errors: !args.strict && config.skip_errors.unwrap_or(true),
        zero_policy,
        validate: args.validate || config.validate.unwrap_or(false),
        sprite,
    };

    let output = args
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    Ok((options, output))
}

/// Run the extraction. Returns `false` when any record failed to parse.
pub fn handle(args: &ExtractArgs, config: &Config) -> Result<bool> {
    let (options, output) = resolve(args, config)?;

    println!("Sources:");
    for (i, source) in options.sources.iter().enumerate() {
        let role = if i == 0 { "primary" } else { "localization" };
        println!("  {} ({}, {})", source.dir.display(), source.locale, role);
    }
    println!("Output: {}", output.display());
    println!();

    let mut pipeline = Pipeline::new(options);
    pipeline.run().context("Extraction failed")?;
    let summary = pipeline
        .export(&output)
        .with_context(|| format!("Failed to write output to {}", output.display()))?;

    print_report(&summary);
    Ok(!summary.any_failed())
}

fn print_report(summary: &RunSummary) {
    println!("{:<12} {:>7} {:>7} {:>7} {:>9}", "type", "total", "parsed", "failed", "warnings");
    for (kind, stats) in &summary.types {
        println!(
            "{:<12} {:>7} {:>7} {:>7} {:>9}",
            kind.as_str(),
            stats.total,
            stats.parsed,
            stats.failed,
            stats.warnings
        );
    }
    let t = &summary.totals;
    println!("{:<12} {:>7} {:>7} {:>7} {:>9}", "total", t.total, t.parsed, t.failed, t.warnings);

    for warning in &summary.warnings {
        println!("warning: {}", warning);
    }

    if let Some(errors) = &summary.reference_errors {
        println!();
        if errors.is_empty() {
            println!("All references valid");
        } else {
            println!("{} invalid references:", errors.len());
            for error in errors {
                println!("  {}", error);
            }
        }
    }

    if let Some(images) = &summary.images {
        println!();
        println!(
            "Hero portraits: {} written, {} failed, {} skipped",
            images.succeeded, images.failed, images.skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceEntry, SpriteConfig};
    use c2data::{EntityKind, Locale, Source};

    fn args() -> ExtractArgs {
        ExtractArgs {
            sources: Vec::new(),
            output: None,
            only: Vec::new(),
            validate: false,
            strict: false,
            legacy_zero_defaults: false,
            atlas: None,
            sheet_prefix: None,
            preferred_frame: None,
        }
    }

    fn config() -> Config {
        Config {
            sources: vec![SourceEntry {
                path: "cfg_pkg".into(),
                locale: Locale::Zh,
            }],
            output: Some("cfg_out".into()),
            validate: Some(true),
            sprite: SpriteConfig {
                preferred_frame: Some(3),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_config_fills_gaps() {
        let (options, output) = resolve(&args(), &config()).unwrap();
        assert_eq!(options.sources, vec![Source::new("cfg_pkg", Locale::Zh)]);
        assert_eq!(output, PathBuf::from("cfg_out"));
        assert!(options.validate);
        assert!(options.skip_errors);
        assert!(options.only.is_none());
        assert_eq!(options.sprite.preferred_frame, 3);
        assert_eq!(options.sprite.sheet_prefix, SpriteOptions::default().sheet_prefix);
        assert_eq!(options.zero_policy, ZeroPolicy::Preserve);
    }

    #[test]
    fn test_flags_override_config() {
        let mut a = args();
        a.sources = vec![Source::new("flag_pkg", Locale::En)];
        a.output = Some("flag_out".into());
        a.only = vec![EntityKind::Hero];
        a.strict = true;
        a.legacy_zero_defaults = true;
        a.preferred_frame = Some(1);

        let (options, output) = resolve(&a, &config()).unwrap();
        assert_eq!(options.sources[0].dir, PathBuf::from("flag_pkg"));
        assert_eq!(output, PathBuf::from("flag_out"));
        assert_eq!(options.only, Some(vec![EntityKind::Hero]));
        assert!(!options.skip_errors);
        assert_eq!(options.zero_policy, ZeroPolicy::LegacyZeroIsAbsent);
        assert_eq!(options.sprite.preferred_frame, 1);
    }

    #[test]
    fn test_sources_required() {
        assert!(resolve(&args(), &Config::default()).is_err());
    }

    #[test]
    fn test_handle_reports_failed_tables() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut a = args();
        a.sources = vec![Source::new(src.path(), Locale::En)];
        a.output = Some(out.path().to_path_buf());
        a.only = vec![EntityKind::Hero];

        // js.json is missing, so the hero table fails to load
        assert!(!handle(&a, &Config::default()).unwrap());
        assert!(out.path().join("parse-summary.json").exists());
        assert!(out.path().join("hero.json").exists());
    }
}
