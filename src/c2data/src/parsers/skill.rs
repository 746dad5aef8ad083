//! Skills (`jn.json`) and the skill class table (`mc.json`)

use crate::c2array::{C2Array, Row};
use crate::coerce::{parse_formatted_text, to_integer, to_number, to_string};
use crate::entity::{Entity, EntityKind, Localized};
use crate::lang::LanguageTable;
use crate::locale::Locale;
use crate::parse::{ParseContext, TableParser};
use crate::schema::skill as col;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Class id → canonical class name, from `mc.json`
#[derive(Debug, Clone, Default)]
pub struct ClassTable {
    names: HashMap<i64, String>,
}

impl ClassTable {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let arr = C2Array::load(dir.as_ref().join(col::class::FILE))?;
        Ok(Self::from_c2array(&arr))
    }

    /// The first row with a given id wins
    pub fn from_c2array(arr: &C2Array) -> Self {
        let mut names = HashMap::new();
        for row in arr.rows() {
            let id = to_integer(row.get(col::class::ID), 0);
            let name = to_string(row.get(col::class::NAME_CN), "");
            if id != 0 && !name.is_empty() {
                names.entry(id).or_insert(name);
            }
        }
        Self { names }
    }

    pub fn name(&self, class_id: i64) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A class resolved through the class table and the language table
#[derive(Debug, Clone, PartialEq)]
pub struct SkillClass {
    /// Language row id, which is also the class label's sprite id
    pub label_sprite_id: i64,
    pub name_cn: String,
    pub name_translated: Option<String>,
}

/// classId → class table → language table.
///
/// Takes the first language row for the class name, even when a later row
/// replaced it for ordinary lookups. This path ignores the context locale: the label sprite id comes from
/// the language row whatever language the table is in.
pub fn resolve_class(class_id: i64, classes: &ClassTable, lang: &LanguageTable) -> Option<SkillClass> {
    let name_cn = classes.name(class_id)?;
    let entry = lang.first_entry(name_cn)?;
    Some(SkillClass {
        label_sprite_id: entry.id,
        name_cn: name_cn.to_string(),
        name_translated: Some(entry.translated.clone()).filter(|t| !t.is_empty()),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub sprite_id: i64,
    pub class_id: i64,
    /// Same as `class_id`; kept for consumers keyed on `class`
    pub class: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_label_sprite_id: Option<i64>,
    #[serde(rename = "classNameCN", default, skip_serializing_if = "Option::is_none")]
    pub class_name_cn: Option<String>,
    #[serde(rename = "classNameEN", default, skip_serializing_if = "Option::is_none")]
    pub class_name_en: Option<String>,
    #[serde(rename = "classNameKO", default, skip_serializing_if = "Option::is_none")]
    pub class_name_ko: Option<String>,
    #[serde(rename = "type")]
    pub skill_type: String,
    pub rarity: i64,
    pub mana_cost: f64,
    pub universe: i64,
    pub place: i64,
    /// 131 health, 132 speed, 133 attack, 134 defense, 135 magic attack, 136 magic defense
    pub passive_id1: i64,
    pub passive_value1: f64,
    pub passive_id2: i64,
    pub passive_value2: f64,
    pub effect_description: String,
    pub effect_description_plain: String,
    pub skill_category: String,
    pub buff_type: i64,
    pub damage_type: String,
    /// Main damage percentage
    pub base_power: f64,
    /// Secondary damage percentage for multi-hit skills
    pub base_power2: f64,
    pub buff_chance: f64,
    pub target_type: i64,
    #[serde(flatten)]
    pub localized: Localized,
}

impl Entity for Skill {
    const KIND: EntityKind = EntityKind::Skill;

    fn id(&self) -> i64 {
        self.id
    }

    fn name_cn(&self) -> &str {
        &self.name_cn
    }

    fn localized(&self) -> &Localized {
        &self.localized
    }

    fn localized_mut(&mut self) -> &mut Localized {
        &mut self.localized
    }

    fn merge_locale(&mut self, other: &Self) {
        self.localized.merge(&other.localized);
        if other.class_name_en.is_some() {
            self.class_name_en.clone_from(&other.class_name_en);
        }
        if other.class_name_ko.is_some() {
            self.class_name_ko.clone_from(&other.class_name_ko);
        }
    }
}

pub struct SkillParser<'a> {
    ctx: ParseContext<'a>,
    classes: Option<&'a ClassTable>,
}

impl<'a> SkillParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        Self { ctx, classes: None }
    }

    pub fn with_classes(mut self, classes: &'a ClassTable) -> Self {
        self.classes = Some(classes);
        self
    }

    fn attach_class(&self, skill: &mut Skill) {
        let Some(class) = self
            .classes
            .and_then(|classes| resolve_class(skill.class_id, classes, self.ctx.lang))
        else {
            return;
        };

        skill.class_label_sprite_id = Some(class.label_sprite_id);
        skill.class_name_cn = Some(class.name_cn);
        match self.ctx.locale() {
            Locale::En => skill.class_name_en = class.name_translated,
            Locale::Ko => skill.class_name_ko = class.name_translated,
            Locale::Zh => {}
        }
    }
}

impl TableParser for SkillParser<'_> {
    type Record = Skill;

    fn parse_row(&self, row: &Row<'_>) -> Result<Skill> {
        let effect = parse_formatted_text(&to_string(row.get(col::EFFECT_DESCRIPTION), ""));
        let class_id = to_integer(row.get(col::CLASS_ID), 0);

        let mut skill = Skill {
            id: to_integer(row.get(col::ID), 0),
            name_cn: to_string(row.get(col::NAME_CN), ""),
            sprite_id: to_integer(row.get(col::SPRITE_ID), 0),
            class_id,
            class: class_id,
            skill_type: to_string(row.get(col::TYPE), ""),
            rarity: to_integer(row.get(col::RARITY), 0),
            mana_cost: to_number(row.get(col::MANA_COST), 0.0),
            universe: to_integer(row.get(col::UNIVERSE), 0),
            place: to_integer(row.get(col::PLACE), 0),
            passive_id1: to_integer(row.get(col::PASSIVE_ID_1), 0),
            passive_value1: to_number(row.get(col::PASSIVE_VALUE_1), 0.0),
            passive_id2: to_integer(row.get(col::PASSIVE_ID_2), 0),
            passive_value2: to_number(row.get(col::PASSIVE_VALUE_2), 0.0),
            effect_description: effect.raw,
            effect_description_plain: effect.plain,
            skill_category: to_string(row.get(col::SKILL_CATEGORY), ""),
            buff_type: to_integer(row.get(col::BUFF_TYPE), 0),
            damage_type: to_string(row.get(col::DAMAGE_TYPE), ""),
            base_power: to_number(row.get(col::BASE_POWER), 0.0),
            base_power2: to_number(row.get(col::BASE_POWER_2), 0.0),
            buff_chance: to_number(row.get(col::BUFF_CHANCE), 0.0),
            target_type: to_integer(row.get(col::TARGET_TYPE), 0),
            ..Default::default()
        };

        self.attach_class(&mut skill);
        super::translate_name(&self.ctx, &mut skill.localized, &skill.name_cn);

        Ok(skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::c2array::tests::table;
    use crate::parse::parse_table;
    use crate::parsers::tests::{options, with_lang};
    use serde_json::json;

    fn classes() -> ClassTable {
        ClassTable::from_c2array(&table(vec![
            vec![json!(1), json!("x"), json!("通用")],
            vec![json!(2), json!("x"), json!("剑术")],
            vec![json!(1), json!("x"), json!("重复")],
        ]))
    }

    fn skill_row(id: i64, class_id: i64) -> Vec<serde_json::Value> {
        let mut row = vec![json!(0); 50];
        row[col::ID] = json!(id);
        row[col::NAME_CN] = json!("横扫");
        row[col::SPRITE_ID] = json!(300 + id);
        row[col::CLASS_ID] = json!(class_id);
        row[col::PASSIVE_ID_1] = json!(133);
        row[col::PASSIVE_VALUE_1] = json!(12);
        row[col::EFFECT_DESCRIPTION] = json!("造成[b]120%[/b]伤害");
        row[col::BASE_POWER] = json!(120);
        row[col::TARGET_TYPE] = json!(17);
        row[col::UNIVERSE] = json!(3);
        row
    }

    #[test]
    fn test_class_table_first_row_wins() {
        let classes = classes();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes.name(1), Some("通用"));
        assert_eq!(classes.name(9), None);
    }

    #[test]
    fn test_two_hop_class_lookup() {
        let classes = classes();
        let arr = table(vec![skill_row(1, 2), skill_row(2, 1), skill_row(3, 9)]);

        with_lang(
            Locale::En,
            &[("通用", "Common"), ("剑术", "[size=20]Swordplay[/size]"), ("横扫", "Sweep")],
            |ctx| {
                let parser = SkillParser::new(ctx).with_classes(&classes);
                let result = parse_table(&parser, &arr, &options(Locale::En)).unwrap();

                let sword = &result.data[0];
                assert_eq!(sword.class, 2);
                assert_eq!(sword.class_label_sprite_id, Some(2));
                assert_eq!(sword.class_name_cn.as_deref(), Some("剑术"));
                assert_eq!(sword.class_name_en.as_deref(), Some("Swordplay"));
                assert_eq!(sword.localized.name_en.as_deref(), Some("Sweep"));
                assert_eq!(sword.effect_description_plain, "造成120%伤害");
                assert_eq!(sword.passive_id1, 133);
                assert_eq!(sword.target_type, 17);

                assert_eq!(result.data[1].class_label_sprite_id, Some(1));

                let unknown = &result.data[2];
                assert_eq!(unknown.class, 9);
                assert!(unknown.class_label_sprite_id.is_none());
                assert!(unknown.class_name_cn.is_none());
            },
        );
    }

    #[test]
    fn test_class_uses_first_language_row() {
        let classes = classes();
        let lang = LanguageTable::from_c2array(
            &table(vec![
                vec![json!(10), json!("通用"), json!("Common")],
                vec![json!(99), json!("通用"), json!("General")],
            ]),
            Locale::En,
        );

        let class = resolve_class(1, &classes, &lang).unwrap();
        assert_eq!(class.label_sprite_id, 10);
        assert_eq!(class.name_translated.as_deref(), Some("Common"));
        assert_eq!(lang.lookup("通用"), Some("General"));
    }

    #[test]
    fn test_korean_class_name_and_merge() {
        let classes = classes();
        let arr = table(vec![skill_row(1, 1)]);

        let korean = with_lang(Locale::Ko, &[("通用", "공통")], |ctx| {
            let parser = SkillParser::new(ctx).with_classes(&classes);
            parse_table(&parser, &arr, &options(Locale::Ko)).unwrap().data
        });
        assert_eq!(korean[0].class_name_ko.as_deref(), Some("공통"));
        assert!(korean[0].class_name_en.is_none());

        let mut primary = with_lang(Locale::En, &[("通用", "Common")], |ctx| {
            let parser = SkillParser::new(ctx).with_classes(&classes);
            parse_table(&parser, &arr, &options(Locale::En)).unwrap().data
        });
        primary[0].merge_locale(&korean[0]);
        assert_eq!(primary[0].class_name_en.as_deref(), Some("Common"));
        assert_eq!(primary[0].class_name_ko.as_deref(), Some("공통"));
    }
}
