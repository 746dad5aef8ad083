//! Shops and counters (`ss.json`)

use crate::c2array::Row;
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::locale::Locale;
use crate::mapper::FieldMapper;
use crate::parse::{ParseContext, TableParser};
use crate::schema::shop as layout;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub display_name: String,
    pub icon: i64,
    pub capacity: f64,
    pub item_slots: i64,
    pub upgrade_cost: f64,
    pub level: i64,
    pub effect_description: String,
    pub upgrade_bonus: f64,
    pub unknown10: f64,
    /// The English column when parsing an English source, otherwise `effect_description`
    pub description: String,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Shop, EntityKind::Shop);

pub struct ShopParser<'a> {
    ctx: ParseContext<'a>,
    mapper: FieldMapper,
}

impl<'a> ShopParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        let mapper = FieldMapper::from_layout(layout::LAYOUT, ctx.options.zero_policy);
        Self { ctx, mapper }
    }
}

impl TableParser for ShopParser<'_> {
    type Record = Shop;

    fn parse_row(&self, row: &Row<'_>) -> Result<Shop> {
        let m = self.mapper.map(row)?;
        let effect_description = m.text("effectDescription");
        let english = m.text("descriptionEN");

        let description = if self.ctx.locale() == Locale::En && !english.is_empty() {
            english.clone()
        } else {
            effect_description.clone()
        };

        let mut shop = Shop {
            id: m.integer("id"),
            name_cn: m.text("nameCN"),
            display_name: m.text("displayName"),
            icon: m.integer("icon"),
            capacity: m.number("capacity"),
            item_slots: m.integer("itemSlots"),
            upgrade_cost: m.number("upgradeCost"),
            level: m.integer("level"),
            effect_description,
            upgrade_bonus: m.number("upgradeBonus"),
            unknown10: m.number("unknown10"),
            description,
            localized: Localized::default(),
        };

        // The English column exists in every export, whatever its locale
        shop.localized.description_en = Some(english).filter(|s| !s.is_empty());
        super::translate_name(&self.ctx, &mut shop.localized, &shop.name_cn);

        Ok(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c2array::tests::table;
    use crate::parse::parse_table;
    use crate::parsers::tests::{options, with_lang};
    use serde_json::json;

    fn shop_row(english: &str) -> Vec<serde_json::Value> {
        vec![
            json!(3),
            json!("铁匠铺"),
            json!("铁匠铺"),
            json!(40),
            json!(10),
            json!(4),
            json!(500),
            json!(2),
            json!("锻造速度+10%"),
            json!(0.1),
            json!(7),
            json!(english),
        ]
    }

    #[test]
    fn test_description_follows_locale() {
        let arr = table(vec![shop_row("Forge speed +10%")]);

        let en = with_lang(Locale::En, &[("铁匠铺", "Smithy")], |ctx| {
            parse_table(&ShopParser::new(ctx), &arr, &options(Locale::En)).unwrap().data
        });
        assert_eq!(en[0].description, "Forge speed +10%");
        assert_eq!(en[0].level, 2);
        assert_eq!(en[0].unknown10, 7.0);
        assert_eq!(en[0].localized.name_en.as_deref(), Some("Smithy"));

        let ko = with_lang(Locale::Ko, &[], |ctx| {
            parse_table(&ShopParser::new(ctx), &arr, &options(Locale::Ko)).unwrap().data
        });
        assert_eq!(ko[0].description, "锻造速度+10%");
        assert_eq!(ko[0].localized.description_en.as_deref(), Some("Forge speed +10%"));
    }

    #[test]
    fn test_missing_english_falls_back() {
        let arr = table(vec![shop_row("")]);
        let en = with_lang(Locale::En, &[], |ctx| {
            parse_table(&ShopParser::new(ctx), &arr, &options(Locale::En)).unwrap().data
        });
        assert_eq!(en[0].description, "锻造速度+10%");
        assert!(en[0].localized.description_en.is_none());
    }
}
