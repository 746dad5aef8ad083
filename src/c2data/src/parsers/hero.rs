//! Heroes (`js.json`)

use crate::c2array::Row;
use crate::coerce::{integer_slots, to_bool, to_integer, to_number, to_string};
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::parse::{ParseContext, TableParser};
use crate::schema::hero as col;
use crate::sprite::Placement;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub magic: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub race: String,
    pub display_name: String,
    /// Always equal to `id`; the sprite table is keyed on it
    pub sprite_id: i64,
    pub universe: i64,
    pub stage: i64,
    pub stats: HeroStats,
    pub job_levels: [i64; col::JOB_LEVEL_SLOTS],
    /// 1-based basic job class, see [`initial_job_id`]
    pub initial_job_id: Option<i64>,
    /// Talent ids, 0 = empty slot
    pub talents: [i64; col::TALENT_SLOTS],
    pub description: String,
    pub gender: String,
    pub rarity: i64,
    pub recruit_cost: f64,
    pub title: String,
    pub unlocked: bool,
    #[serde(flatten)]
    pub localized: Localized,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<Placement>,
}

impl_entity!(Hero, EntityKind::Hero);

impl Hero {
    /// Non-empty talent slots
    pub fn talent_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.talents.iter().copied().filter(|id| *id != 0)
    }
}

/// The basic job class a hero starts in.
///
/// Slot `i` of the first six job levels is job class `i + 1`; the first
/// non-zero slot wins. `None` when all six are zero.
pub fn initial_job_id(job_levels: &[i64]) -> Option<i64> {
    job_levels
        .iter()
        .take(col::BASIC_JOB_SLOTS)
        .position(|level| *level != 0)
        .map(|i| i as i64 + 1)
}

pub struct HeroParser<'a> {
    ctx: ParseContext<'a>,
}

impl<'a> HeroParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        Self { ctx }
    }
}

impl TableParser for HeroParser<'_> {
    type Record = Hero;

    fn parse_row(&self, row: &Row<'_>) -> Result<Hero> {
        let id = to_integer(row.get(col::ID), 0);
        let stat = |offset: usize| to_number(row.get(col::STATS + offset), 0.0);
        let job_levels = integer_slots::<{ col::JOB_LEVEL_SLOTS }>(row, col::JOB_LEVELS);

        let mut hero = Hero {
            id,
            name_cn: to_string(row.get(col::NAME_CN), ""),
            race: to_string(row.get(col::RACE), ""),
            display_name: to_string(row.get(col::DISPLAY_NAME), ""),
            sprite_id: id,
            universe: to_integer(row.get(col::UNIVERSE), 0),
            stage: to_integer(row.get(col::STAGE), 0),
            stats: HeroStats {
                hp: stat(0),
                atk: stat(1),
                def: stat(2),
                spd: stat(3),
                magic: stat(4),
            },
            initial_job_id: initial_job_id(&job_levels),
            job_levels,
            talents: integer_slots::<{ col::TALENT_SLOTS }>(row, col::TALENTS),
            description: to_string(row.get(col::DESCRIPTION), ""),
            gender: to_string(row.get(col::GENDER), ""),
            rarity: to_integer(row.get(col::RARITY), 0),
            recruit_cost: to_number(row.get(col::RECRUIT_COST), 0.0),
            title: to_string(row.get(col::TITLE), ""),
            unlocked: to_bool(row.get(col::UNLOCKED)),
            localized: Localized::default(),
            sprite: None,
        };

        super::translate_name(&self.ctx, &mut hero.localized, &hero.name_cn);
        super::localized_description(
            &self.ctx,
            &mut hero.localized,
            to_string(row.get(col::LOCALIZED_DESCRIPTION), ""),
        );

        Ok(hero)
    }
}
