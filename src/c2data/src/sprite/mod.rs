//! Sprite atlas placement for heroes
//!
//! A [`Placement`] locates one hero's portrait inside one of the large
//! `<prefix>-sheetN.webp` atlases. Authoritative placements come from the
//! coordinate table scanned out of the engine export; heroes missing from
//! it get an estimated placement flagged [`PlacementSource::Fallback`].

mod extract;
mod table;

pub use extract::{extract_hero_images, sheet_path, ExtractReport};
pub use table::{scan, select_frames, SpriteEntry, SpriteTable};

use crate::parsers::hero::Hero;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Atlas name prefix of hero portrait sheets
pub const DEFAULT_SHEET_PREFIX: &str = "角色形象";

/// Frame 1 is the idle pose
pub const DEFAULT_PREFERRED_FRAME: i64 = 1;

/// Size estimate for fallback placements
pub const FALLBACK_SIZE: u32 = 350;

/// Sprites per sheet assumed for fallback placements
pub const FALLBACK_SPRITES_PER_SHEET: i64 = 10;

/// Face anchor used when nothing better is known
pub const DEFAULT_FACE_ANCHOR: FaceAnchor = FaceAnchor { x: 0.5, y: 0.35 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceAnchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementSource {
    /// Found in the coordinate table
    Table,
    /// Estimated from the sprite id
    Fallback,
}

/// A hero's region within an atlas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub sheet_index: i64,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Stored turned 90° clockwise on the sheet, with width and height
    /// swapped
    pub rotated: bool,
    pub frame: i64,
    /// Fractional (0..1) offset within the region
    pub face_anchor: FaceAnchor,
    pub source: PlacementSource,
}

impl Placement {
    pub fn from_entry(entry: &SpriteEntry) -> Self {
        let (x, y) = entry.face_anchor();
        Self {
            sheet_index: entry.sheet,
            x: entry.x,
            y: entry.y,
            width: entry.width,
            height: entry.height,
            rotated: entry.rotated,
            frame: entry.frame,
            face_anchor: FaceAnchor { x, y },
            source: PlacementSource::Table,
        }
    }

    /// Placeholder for a sprite id with no table entry
    pub fn fallback(sprite_id: i64) -> Self {
        Self {
            sheet_index: sprite_id.div_euclid(FALLBACK_SPRITES_PER_SHEET),
            x: 0,
            y: 0,
            width: FALLBACK_SIZE,
            height: FALLBACK_SIZE,
            rotated: false,
            frame: sprite_id,
            face_anchor: DEFAULT_FACE_ANCHOR,
            source: PlacementSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == PlacementSource::Fallback
    }
}

/// Sprite phase settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteOptions {
    pub sheet_prefix: String,
    pub preferred_frame: i64,
    /// Directory holding the atlas images; extraction is skipped without one
    pub atlas_dir: Option<PathBuf>,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            sheet_prefix: DEFAULT_SHEET_PREFIX.to_string(),
            preferred_frame: DEFAULT_PREFERRED_FRAME,
            atlas_dir: None,
        }
    }
}

/// Hands out placements from a coordinate table
#[derive(Debug, Clone, Default)]
pub struct SpriteResolver {
    table: SpriteTable,
}

impl SpriteResolver {
    pub fn new(table: SpriteTable) -> Self {
        Self { table }
    }

    /// Authoritative placement for the hero's sprite id, or a fallback
    pub fn placement(&self, hero: &Hero) -> Placement {
        match self.table.get(hero.sprite_id) {
            Some(entry) => Placement::from_entry(entry),
            None => {
                tracing::warn!(
                    "No sprite entry for hero {} ({}), using fallback for spriteId {}",
                    hero.id,
                    hero.name_cn,
                    hero.sprite_id
                );
                Placement::fallback(hero.sprite_id)
            }
        }
    }

    pub fn table(&self) -> &SpriteTable {
        &self.table
    }
}
