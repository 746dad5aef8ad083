//! Sprite coordinate table, scanned out of the raw engine export
//!
//! `data.json` is one huge project file. Each animation frame of a sprite
//! object is serialized as
//!
//! ```text
//! "Name",5,false,1,0,false,7,[["images/<prefix>-sheet3.webp",1234,x,y,w,h,rotated,frame,pivotX,pivotY,...
//! ```
//!
//! The pivot is followed by the frame's own image point list, e.g.
//! `[["Image Point 1",0.48,0.31]]` or `[]`.

use crate::parsers::hero::Hero;
use crate::schema::SPRITE_EXPORT_FILE;
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// One frame definition found in the export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteEntry {
    pub name: String,
    pub sheet: i64,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rotated: bool,
    pub frame: i64,
    pub pivot_x: Option<f64>,
    pub pivot_y: Option<f64>,
    /// `Image Point 1`, the authored face position
    pub image_point: Option<(f64, f64)>,
}

impl SpriteEntry {
    /// Fractional face position within the region.
    ///
    /// The authored image point when there is one, otherwise the pivot
    /// moved up to 70% of its height.
    pub fn face_anchor(&self) -> (f64, f64) {
        if let Some(point) = self.image_point {
            return point;
        }
        let pivot = |v: Option<f64>| v.filter(|p| *p != 0.0).unwrap_or(0.5);
        (pivot(self.pivot_x), pivot(self.pivot_y) * 0.7)
    }
}

fn frame_pattern(prefix: &str) -> Result<Regex> {
    let pattern = format!(
        r#""([\x{{4e00}}-\x{{9fa5}}\x{{3040}}-\x{{309f}}\x{{30a0}}-\x{{30ff}}a-zA-Z0-9\s]+)",\d+,false,\d+,\d+,false,\d+,\[\["images/{}-sheet(\d+)\.webp",\d+,(\d+),(\d+),(\d+),(\d+),(true|false),(\d+),([^,]+),([^,]+),"#,
        regex::escape(prefix)
    );
    Ok(Regex::new(&pattern)?)
}

fn image_point_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\["Image Point 1",(-?[\d.]+),(-?[\d.]+)\]"#).unwrap()
    })
}

/// The balanced `[...]` image point list at the start of `rest`, which
/// begins right after the frame's pivot
fn point_list(rest: &str) -> Option<&str> {
    if !rest.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'"' => in_string = !in_string,
            b'[' if !in_string => depth += 1,
            b']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&rest[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Every frame definition on `<prefix>-sheetN` atlases, in file order
pub fn scan(content: &str, prefix: &str) -> Result<Vec<SpriteEntry>> {
    let pattern = frame_pattern(prefix)?;
    let matches: Vec<_> = pattern.captures_iter(content).collect();
    let mut entries = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let next_start = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let points = point_list(&content[whole.end..next_start]).unwrap_or("");

        let int = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<i64>().ok());
        let px = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u32>().ok());
        let float = |idx: usize| {
            caps.get(idx)
                .and_then(|m| m.as_str().trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        let (Some(sheet), Some(x), Some(y), Some(width), Some(height), Some(frame)) =
            (int(2), px(3), px(4), px(5), px(6), int(8))
        else {
            continue;
        };

        let image_point = image_point_pattern().captures(points).and_then(|p| {
            let x = p.get(1)?.as_str().parse::<f64>().ok()?;
            let y = p.get(2)?.as_str().parse::<f64>().ok()?;
            Some((x, y))
        });

        entries.push(SpriteEntry {
            name: caps.get(1).map_or("", |m| m.as_str()).to_string(),
            sheet,
            x,
            y,
            width,
            height,
            rotated: caps.get(7).is_some_and(|m| m.as_str() == "true"),
            frame,
            pivot_x: float(9),
            pivot_y: float(10),
            image_point,
        });
    }

    Ok(entries)
}

/// Pick one frame per sprite name: `preferred_frame` if present, else the lowest
pub fn select_frames(entries: Vec<SpriteEntry>, preferred_frame: i64) -> BTreeMap<String, SpriteEntry> {
    let mut by_name: BTreeMap<String, Vec<SpriteEntry>> = BTreeMap::new();
    for entry in entries {
        by_name.entry(entry.name.clone()).or_default().push(entry);
    }

    by_name
        .into_iter()
        .filter_map(|(name, mut frames)| {
            frames.sort_by_key(|f| f.frame);
            let idx = frames
                .iter()
                .position(|f| f.frame == preferred_frame)
                .unwrap_or(0);
            if frames.len() > 1 {
                tracing::debug!(
                    "{}: frames {:?}, selected {}",
                    name,
                    frames.iter().map(|f| f.frame).collect::<Vec<_>>(),
                    frames[idx].frame
                );
            }
            (idx < frames.len()).then(|| (name, frames.swap_remove(idx)))
        })
        .collect()
}

/// Coordinate table keyed by hero sprite id
#[derive(Debug, Clone, Default)]
pub struct SpriteTable {
    entries: BTreeMap<i64, SpriteEntry>,
    unmatched: Vec<i64>,
}

impl SpriteTable {
    /// Match selected frames to heroes by `nameCN`, `displayName`,
    /// `nameEN`, then `nameKO`.
    pub fn for_heroes(frames: &BTreeMap<String, SpriteEntry>, heroes: &[Hero]) -> Self {
        let mut table = Self::default();
        for hero in heroes {
            let candidates = [
                Some(hero.name_cn.as_str()),
                Some(hero.display_name.as_str()),
                hero.localized.name_en.as_deref(),
                hero.localized.name_ko.as_deref(),
            ];
            let found = candidates
                .into_iter()
                .flatten()
                .filter(|n| !n.is_empty())
                .find_map(|n| frames.get(n));

            match found {
                Some(entry) => {
                    table.entries.insert(hero.sprite_id, entry.clone());
                }
                None => table.unmatched.push(hero.id),
            }
        }
        tracing::info!(
            "Matched sprites for {}/{} heroes",
            table.entries.len(),
            heroes.len()
        );
        table
    }

    /// Scan `data.json` in `dir` and match it against `heroes`
    pub fn load<P: AsRef<Path>>(
        dir: P,
        prefix: &str,
        preferred_frame: i64,
        heroes: &[Hero],
    ) -> Result<Self> {
        let path = dir.as_ref().join(SPRITE_EXPORT_FILE);
        let content = std::fs::read_to_string(&path)?;
        let entries = scan(&content, prefix)?;
        let frames = select_frames(entries, preferred_frame);
        tracing::debug!("Found {} distinct sprites in {}", frames.len(), path.display());
        Ok(Self::for_heroes(&frames, heroes))
    }

    pub fn get(&self, sprite_id: i64) -> Option<&SpriteEntry> {
        self.entries.get(&sprite_id)
    }

    /// Hero ids no sprite name matched
    pub fn unmatched(&self) -> &[i64] {
        &self.unmatched
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
