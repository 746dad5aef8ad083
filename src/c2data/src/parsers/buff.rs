//! Buffs (`buff.json`)

use crate::c2array::Row;
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::mapper::FieldMapper;
use crate::parse::{ParseContext, TableParser};
use crate::schema::buff as layout;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buff {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub display_name: String,
    pub icon: i64,
    pub effect_value: f64,
    pub duration: f64,
    pub max_stacks: i64,
    pub duration_type: String,
    pub buff_type: String,
    pub description: String,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Buff, EntityKind::Buff);

pub struct BuffParser<'a> {
    ctx: ParseContext<'a>,
    mapper: FieldMapper,
}

impl<'a> BuffParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        let mapper = FieldMapper::from_layout(layout::LAYOUT, ctx.options.zero_policy);
        Self { ctx, mapper }
    }
}

impl TableParser for BuffParser<'_> {
    type Record = Buff;

    fn parse_row(&self, row: &Row<'_>) -> Result<Buff> {
        let m = self.mapper.map(row)?;
        let mut buff = Buff {
            id: m.integer("id"),
            name_cn: m.text("nameCN"),
            display_name: m.text("displayName"),
            icon: m.integer("icon"),
            effect_value: m.number("effectValue"),
            duration: m.number("duration"),
            max_stacks: m.integer("maxStacks"),
            duration_type: m.text("durationType"),
            buff_type: m.text("buffType"),
            description: m.text("description"),
            localized: Localized::default(),
        };

        // Buff names are translated under their display name
        super::translate_name(&self.ctx, &mut buff.localized, &buff.display_name);
        super::localized_description(&self.ctx, &mut buff.localized, m.text("localizedDescription"));

        Ok(buff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c2array::tests::table;
    use crate::locale::Locale;
    use crate::mapper::ZeroPolicy;
    use crate::parse::{parse_table, ParseContext, ParseOptions};
    use crate::parsers::tests::{options, with_lang};
    use crate::LanguageTable;
    use serde_json::json;

    fn buff_row(id: i64, max_stacks: serde_json::Value) -> Vec<serde_json::Value> {
        vec![
            json!(id),
            json!("中毒"),
            json!("毒"),
            json!(14),
            json!(0),
            json!(0),
            json!(5),
            json!(0),
            json!(0),
            json!(3),
            max_stacks,
            json!("回合"),
            json!("减益"),
            json!("每回合损失生命"),
            json!("Lose HP every turn"),
        ]
    }

    #[test]
    fn test_parse_buff() {
        let arr = table(vec![buff_row(1, json!(3)), buff_row(2, json!(null))]);

        with_lang(Locale::En, &[("毒", "Poison")], |ctx| {
            let result = parse_table(&BuffParser::new(ctx), &arr, &options(Locale::En)).unwrap();
            let poison = &result.data[0];
            assert_eq!(poison.icon, 14);
            assert_eq!(poison.effect_value, 5.0);
            assert_eq!(poison.duration, 3.0);
            assert_eq!(poison.max_stacks, 3);
            assert_eq!(poison.buff_type, "减益");
            assert_eq!(poison.localized.name_en.as_deref(), Some("Poison"));
            assert_eq!(poison.localized.description_en.as_deref(), Some("Lose HP every turn"));

            assert_eq!(result.data[1].max_stacks, 0);
        });
    }

    #[test]
    fn test_zero_max_stacks_kept_under_either_policy() {
        let arr = table(vec![buff_row(1, json!(0))]);
        let lang = LanguageTable::empty(Locale::Zh);

        let parse = |zero_policy| {
            let opts = ParseOptions {
                zero_policy,
                ..options(Locale::Zh)
            };
            let parser = BuffParser::new(ParseContext::new(opts, &lang));
            parse_table(&parser, &arr, &opts).unwrap().data[0].max_stacks
        };

        assert_eq!(parse(ZeroPolicy::Preserve), 0);
        assert_eq!(parse(ZeroPolicy::LegacyZeroIsAbsent), 0);
    }
}
