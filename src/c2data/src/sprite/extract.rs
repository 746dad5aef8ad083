//! Per-hero portrait extraction from atlas sheets
//!
//! Runs one hero at a time. A failing hero is logged and recorded, then
//! the loop moves on.

use super::Placement;
use crate::parsers::hero::Hero;
use crate::{Error, Result};
use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Heroes without an authoritative placement
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// `<atlas_dir>/<prefix>-sheet<N>.webp`
pub fn sheet_path(atlas_dir: &Path, prefix: &str, sheet: i64) -> PathBuf {
    atlas_dir.join(format!("{}-sheet{}.webp", prefix, sheet))
}

/// Crop a placement's region, undoing the atlas rotation
fn crop(sheet: &DynamicImage, placement: &Placement) -> Result<DynamicImage> {
    // Rotated regions occupy height × width on the sheet
    let (w, h) = if placement.rotated {
        (placement.height, placement.width)
    } else {
        (placement.width, placement.height)
    };

    let (sheet_w, sheet_h) = sheet.dimensions();
    let fits = placement.x.checked_add(w).is_some_and(|r| r <= sheet_w)
        && placement.y.checked_add(h).is_some_and(|b| b <= sheet_h);
    if w == 0 || h == 0 || !fits {
        return Err(Error::format(
            format!("sheet {}", placement.sheet_index),
            format!(
                "region {}x{} at ({}, {}) outside {}x{} sheet",
                w, h, placement.x, placement.y, sheet_w, sheet_h
            ),
        ));
    }

    let region = sheet.crop_imm(placement.x, placement.y, w, h);
    Ok(if placement.rotated {
        region.rotate270()
    } else {
        region
    })
}

/// Write `<out_dir>/heroes/<id>.png` for every hero with a table placement
pub fn extract_hero_images(
    heroes: &[Hero],
    atlas_dir: &Path,
    prefix: &str,
    out_dir: &Path,
) -> Result<ExtractReport> {
    let heroes_dir = out_dir.join("heroes");
    std::fs::create_dir_all(&heroes_dir)?;

    let mut report = ExtractReport::default();
    let mut sheets: HashMap<i64, DynamicImage> = HashMap::new();

    for hero in heroes {
        let Some(placement) = hero.sprite.as_ref().filter(|p| !p.is_fallback()) else {
            report.skipped += 1;
            continue;
        };

        let outcome = (|| -> Result<()> {
            if !sheets.contains_key(&placement.sheet_index) {
                let path = sheet_path(atlas_dir, prefix, placement.sheet_index);
                let sheet = image::ImageReader::open(&path)?.with_guessed_format()?.decode()?;
                sheets.insert(placement.sheet_index, sheet);
            }
            let sheet = &sheets[&placement.sheet_index];
            let portrait = crop(sheet, placement)?;
            portrait.save_with_format(heroes_dir.join(format!("{}.png", hero.id)), ImageFormat::Png)?;
            Ok(())
        })();

        match outcome {
            Ok(()) => report.succeeded += 1,
            Err(err) => {
                tracing::warn!("Failed to extract sprite for hero {}: {}", hero.id, err);
                report.failed += 1;
                report.errors.push(format!("Hero {} ({}): {}", hero.id, hero.name_cn, err));
            }
        }
    }

    tracing::info!(
        "Extracted {} hero sprites ({} failed, {} skipped)",
        report.succeeded,
        report.failed,
        report.skipped
    );
    Ok(report)
}
