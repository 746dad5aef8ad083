//! Enemies (`dr.json`)

use crate::c2array::Row;
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::mapper::FieldMapper;
use crate::parse::{ParseContext, TableParser};
use crate::schema::enemy as layout;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub level: i64,
    #[serde(rename = "type")]
    pub enemy_type: i64,
    pub rank: i64,
    /// `Boss`, 精英 (elite) or 小怪 (minion)
    pub enemy_class: String,
    pub field6: f64,
    pub field7: f64,
    pub field8: f64,
    pub field9: f64,
    pub field10: f64,
    pub field11: f64,
    pub field12: f64,
    pub field13: f64,
    pub field14: f64,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Enemy, EntityKind::Enemy);

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.enemy_class == "Boss"
    }
}

pub struct EnemyParser<'a> {
    ctx: ParseContext<'a>,
    mapper: FieldMapper,
}

impl<'a> EnemyParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        let mapper = FieldMapper::from_layout(layout::LAYOUT, ctx.options.zero_policy);
        Self { ctx, mapper }
    }
}

impl TableParser for EnemyParser<'_> {
    type Record = Enemy;

    fn parse_row(&self, row: &Row<'_>) -> Result<Enemy> {
        let m = self.mapper.map(row)?;
        let mut enemy = Enemy {
            id: m.integer("id"),
            name_cn: m.text("nameCN"),
            level: m.integer("level"),
            enemy_type: m.integer("type"),
            rank: m.integer("rank"),
            enemy_class: m.text("enemyClass"),
            field6: m.number("field6"),
            field7: m.number("field7"),
            field8: m.number("field8"),
            field9: m.number("field9"),
            field10: m.number("field10"),
            field11: m.number("field11"),
            field12: m.number("field12"),
            field13: m.number("field13"),
            field14: m.number("field14"),
            localized: Localized::default(),
        };
        super::translate_name(&self.ctx, &mut enemy.localized, &enemy.name_cn);
        Ok(enemy)
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
    fn test_parse_enemy_keeps_opaque_slots() {
        let mut row: Vec<_> = (0..15).map(|i| json!(i)).collect();
        row[0] = json!(101);
        row[1] = json!("吕布");
        row[5] = json!("Boss");
        row[14] = json!("2.5");

        let arr = table(vec![row]);
        with_lang(Locale::En, &[("吕布", "Lu Bu")], |ctx| {
            let result = parse_table(&EnemyParser::new(ctx), &arr, &options(Locale::En)).unwrap();
            let lubu = &result.data[0];
            assert_eq!(lubu.level, 2);
            assert_eq!(lubu.enemy_type, 3);
            assert!(lubu.is_boss());
            assert_eq!(lubu.field6, 6.0);
            assert_eq!(lubu.field14, 2.5);
            assert_eq!(lubu.localized.name_en.as_deref(), Some("Lu Bu"));

            let json = serde_json::to_value(lubu).unwrap();
            assert_eq!(json["type"], 3);
            assert_eq!(json["enemyClass"], "Boss");
            assert_eq!(json["field10"], 10.0);
        });
    }

    #[test]
    fn test_zero_level_is_not_defaulted() {
        let mut row: Vec<_> = (0..15).map(|_| json!(0)).collect();
        row[0] = json!(7);
        row[1] = json!("黄巾兵");
        let arr = table(vec![row]);

        let lang = crate::LanguageTable::empty(Locale::Zh);
        let opts = crate::parse::ParseOptions {
            zero_policy: crate::mapper::ZeroPolicy::LegacyZeroIsAbsent,
            ..options(Locale::Zh)
        };
        let parser = EnemyParser::new(crate::parse::ParseContext::new(opts, &lang));
        let result = parse_table(&parser, &arr, &opts).unwrap();
        assert_eq!(result.data[0].level, 0);
    }
}
