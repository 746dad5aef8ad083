//! Equipment (`wp.json`)

use crate::c2array::Row;
use crate::coerce::{extract_nonzero, to_integer, to_number, to_string};
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::parse::{ParseContext, TableParser};
use crate::schema::equipment as col;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub item_type: i64,
    pub category: i64,
    pub slot: String,
    pub level: i64,
    /// 4 purple, 5 orange
    pub rarity: i64,
    pub value: f64,
    pub sell_price: f64,
    pub description: String,
    /// Non-zero stat bonuses in column order
    pub stats: Vec<f64>,
    pub set_id: i64,
    pub weapon_type: i64,
    pub gem_slots: i64,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Equipment, EntityKind::Equipment);

pub struct EquipmentParser<'a> {
    ctx: ParseContext<'a>,
}

impl<'a> EquipmentParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        Self { ctx }
    }
}

impl TableParser for EquipmentParser<'_> {
    type Record = Equipment;

    fn parse_row(&self, row: &Row<'_>) -> Result<Equipment> {
        let int = |c: usize| to_integer(row.get(c), 0);

        let mut item = Equipment {
            id: int(col::ID),
            name_cn: to_string(row.get(col::NAME_CN), ""),
            display_name: to_string(row.get(col::DISPLAY_NAME), ""),
            item_type: int(col::TYPE),
            category: int(col::CATEGORY),
            slot: to_string(row.get(col::SLOT), ""),
            level: int(col::LEVEL),
            rarity: int(col::RARITY),
            value: to_number(row.get(col::VALUE), 0.0),
            sell_price: to_number(row.get(col::SELL_PRICE), 0.0),
            description: to_string(row.get(col::DESCRIPTION), ""),
            stats: extract_nonzero(row, col::STATS, col::STAT_SLOTS),
            set_id: int(col::SET_ID),
            weapon_type: int(col::WEAPON_TYPE),
            gem_slots: int(col::GEM_SLOTS),
            localized: Localized::default(),
        };

        // Some items are only translated under their display name
        let name = self
            .ctx
            .translate(&item.name_cn)
            .or_else(|| self.ctx.translate(&item.display_name));
        item.localized.set_name(self.ctx.locale(), name);

        Ok(item)
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

    fn item_row(id: i64, name: &str, display: &str) -> Vec<serde_json::Value> {
        let mut row = vec![json!(0); 39];
        row[col::ID] = json!(id);
        row[col::NAME_CN] = json!(name);
        row[col::DISPLAY_NAME] = json!(display);
        row[col::RARITY] = json!(5);
        row[col::STATS] = json!(12);
        row[col::STATS + 4] = json!(-3);
        row[col::STATS + 19] = json!(0.5);
        row[col::SET_ID] = json!(8);
        row
    }

    #[test]
    fn test_parse_equipment() {
        let arr = table(vec![
            item_row(1, "青釭剑", "青釭剑"),
            item_row(2, "古锭刀#2", "古锭刀"),
        ]);

        with_lang(Locale::En, &[("青釭剑", "Qinggang Sword"), ("古锭刀", "Ancient Blade")], |ctx| {
            let result = parse_table(&EquipmentParser::new(ctx), &arr, &options(Locale::En)).unwrap();

            let sword = &result.data[0];
            assert_eq!(sword.stats, vec![12.0, -3.0, 0.5]);
            assert_eq!(sword.rarity, 5);
            assert_eq!(sword.set_id, 8);
            assert_eq!(sword.localized.name_en.as_deref(), Some("Qinggang Sword"));

            assert_eq!(result.data[1].localized.name_en.as_deref(), Some("Ancient Blade"));
        });
    }
}
