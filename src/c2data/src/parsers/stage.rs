//! Stages (`tz.json`)

use crate::c2array::Row;
use crate::coerce::{integer_slots, to_integer, to_string};
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::parse::{ParseContext, TableParser};
use crate::schema::stage as col;
use crate::Result;
use serde::{Deserialize, Serialize};

/// `stageType` of secret stages
pub const SECRET_STAGE: i64 = 2;
/// `stageType` of major battles
pub const MAJOR_BATTLE: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub universe: i64,
    pub stage_number: i64,
    /// Enemy ids, empty slots dropped
    pub enemies: Vec<i64>,
    pub boss: i64,
    /// Equipment ids, empty slots dropped
    pub item_drops: Vec<i64>,
    pub weapon_type: i64,
    pub item_set: i64,
    pub item_level: i64,
    pub difficulty: i64,
    pub unlock_condition: i64,
    pub stage_type: i64,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Stage, EntityKind::Stage);

impl Stage {
    pub fn is_secret(&self) -> bool {
        self.stage_type == SECRET_STAGE
    }

    pub fn is_major_battle(&self) -> bool {
        self.stage_type == MAJOR_BATTLE
    }
}

fn occupied<const N: usize>(slots: [i64; N]) -> Vec<i64> {
    slots.into_iter().filter(|id| *id > 0).collect()
}

pub struct StageParser<'a> {
    ctx: ParseContext<'a>,
}

impl<'a> StageParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        Self { ctx }
    }
}

impl TableParser for StageParser<'_> {
    type Record = Stage;

    fn parse_row(&self, row: &Row<'_>) -> Result<Stage> {
        let int = |c: usize| to_integer(row.get(c), 0);

        let mut stage = Stage {
            id: int(col::ID),
            name_cn: to_string(row.get(col::NAME_CN), ""),
            universe: int(col::UNIVERSE),
            stage_number: int(col::STAGE_NUMBER),
            enemies: occupied(integer_slots::<{ col::ENEMY_SLOTS }>(row, col::ENEMIES)),
            boss: int(col::BOSS),
            item_drops: occupied(integer_slots::<{ col::DROP_SLOTS }>(row, col::ITEM_DROPS)),
            weapon_type: int(col::WEAPON_TYPE),
            item_set: int(col::ITEM_SET),
            item_level: int(col::ITEM_LEVEL),
            difficulty: int(col::DIFFICULTY),
            unlock_condition: int(col::UNLOCK_CONDITION),
            stage_type: int(col::STAGE_TYPE),
            localized: Localized::default(),
        };
        super::translate_name(&self.ctx, &mut stage.localized, &stage.name_cn);
        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c2array::tests::table;
    use crate::locale::Locale;
    use crate::parse::parse_table;
    use crate::parsers::tests::{options, with_lang};
    use serde_json::json;

    #[test]
    fn test_parse_stage_drops_empty_slots() {
        let mut row = vec![json!(0); 23];
        row[col::ID] = json!(4);
        row[col::NAME_CN] = json!("虎牢关");
        for (i, id) in [101, 0, 102, 0, 0, 103].into_iter().enumerate() {
            row[col::ENEMIES + i] = json!(id);
        }
        for (i, id) in [0, 0, 501, 0, 0, 0].into_iter().enumerate() {
            row[col::ITEM_DROPS + i] = json!(id);
        }
        row[col::BOSS] = json!(103);
        row[col::STAGE_TYPE] = json!(3);

        let arr = table(vec![row]);
        with_lang(Locale::Ko, &[("虎牢关", "호뢰관")], |ctx| {
            let result = parse_table(&StageParser::new(ctx), &arr, &options(Locale::Ko)).unwrap();
            let stage = &result.data[0];
            assert_eq!(stage.enemies, vec![101, 102, 103]);
            assert_eq!(stage.item_drops, vec![501]);
            assert_eq!(stage.boss, 103);
            assert!(stage.is_major_battle());
            assert!(!stage.is_secret());
            assert_eq!(stage.localized.name_ko.as_deref(), Some("호뢰관"));
        });
    }
}
