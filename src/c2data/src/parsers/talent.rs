//! Talents (`mg.json`)

use crate::c2array::Row;
use crate::coerce::{integer_slots, parse_formatted_text, to_integer, to_number, to_string};
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::formula::{LookupTableFormula, PercentPerLevel};
use crate::parse::{ParseContext, TableParser};
use crate::parsers::effect_type::EffectType;
use crate::schema::talent as col;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hexagon category a talent may be slotted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionTag {
    Attack,
    Defense,
    Special,
    Common,
}

impl ConditionTag {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Attack),
            2 => Some(Self::Defense),
            3 => Some(Self::Special),
            4 => Some(Self::Common),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talent {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub tree: i64,
    /// Also the id of this talent's [`EffectType`]
    pub effect_category: i64,
    /// Opaque column 4; an input to the percent-per-level formula
    pub unknown: f64,
    pub description: String,
    pub description_plain: String,
    /// Tree coordinates, not talent ids
    pub prerequisites: [i64; col::PREREQUISITE_SLOTS],
    pub tier: i64,
    pub position: i64,
    pub grade: i64,
    pub cost: f64,
    /// Raw condition codes, zeros kept
    pub conditions: [i64; col::CONDITION_SLOTS],
    pub condition_tags: Vec<ConditionTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_per_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_percent: Option<f64>,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Talent, EntityKind::Talent);

/// Map condition codes to tags, dropping empty and unknown codes
pub fn condition_tags(conditions: &[i64]) -> Vec<ConditionTag> {
    conditions
        .iter()
        .filter_map(|code| ConditionTag::from_code(*code))
        .collect()
}

pub struct TalentParser<'a> {
    ctx: ParseContext<'a>,
    effect_types: HashMap<i64, &'a EffectType>,
    formula: Box<dyn PercentPerLevel + 'a>,
}

impl<'a> TalentParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        Self {
            ctx,
            effect_types: HashMap::new(),
            formula: Box::new(LookupTableFormula),
        }
    }

    /// Effect types the derived effect fields are computed from
    pub fn with_effect_types(mut self, effect_types: &'a [EffectType]) -> Self {
        self.effect_types = effect_types.iter().map(|e| (e.id, e)).collect();
        self
    }

    pub fn with_formula(mut self, formula: impl PercentPerLevel + 'a) -> Self {
        self.formula = Box::new(formula);
        self
    }

    fn attach_effect(&self, talent: &mut Talent) {
        let effect = self.effect_types.get(&talent.effect_category).copied();

        if let Some(effect) = effect {
            let max_value = effect.resolved_max_value;
            if talent.cost != 0.0
                && talent.grade != 0
                && talent.unknown != 0.0
                && effect.scale != 0.0
                && max_value != 0.0
            {
                talent.effect_scale = Some(effect.scale);
                talent.effect_max_value = Some(max_value);
            }
        }

        talent.percent_per_level = self.formula.percent_per_level(talent, effect);
        talent.max_percent = self.formula.max_percent(talent, effect);
    }
}

impl TableParser for TalentParser<'_> {
    type Record = Talent;

    fn parse_row(&self, row: &Row<'_>) -> Result<Talent> {
        let description = parse_formatted_text(&to_string(row.get(col::DESCRIPTION), ""));
        let conditions = integer_slots::<{ col::CONDITION_SLOTS }>(row, col::CONDITIONS);

        let mut talent = Talent {
            id: to_integer(row.get(col::ID), 0),
            name_cn: to_string(row.get(col::NAME_CN), ""),
            tree: to_integer(row.get(col::TREE), 0),
            effect_category: to_integer(row.get(col::EFFECT_CATEGORY), 0),
            unknown: to_number(row.get(col::UNKNOWN), 0.0),
            description: description.raw,
            description_plain: description.plain,
            prerequisites: integer_slots::<{ col::PREREQUISITE_SLOTS }>(row, col::PREREQUISITES),
            tier: to_integer(row.get(col::TIER), 0),
            position: to_integer(row.get(col::POSITION), 0),
            grade: to_integer(row.get(col::GRADE), 0),
            cost: to_number(row.get(col::COST), 0.0),
            condition_tags: condition_tags(&conditions),
            conditions,
            localized: Localized::default(),
            ..Default::default()
        };

        self.attach_effect(&mut talent);
        super::translate_name(&self.ctx, &mut talent.localized, &talent.name_cn);

        Ok(talent)
    }
}
