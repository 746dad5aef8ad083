//! Effect types (`sx.json`)

use crate::c2array::Row;
use crate::coerce;
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::mapper::{FieldMapper, FieldSpec, FieldType, Value};
use crate::parse::{ParseContext, TableParser};
use crate::schema::effect_type as layout;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectType {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    /// 资质, 特殊, 技能效果, ...
    pub category: String,
    pub scale: f64,
    /// 小数 or 百分比
    pub value_type: String,
    pub field5: f64,
    /// 乘法, 加法, ...
    pub calculation_type: String,
    pub description: String,
    pub max_value: f64,
    /// `max_value`, or the column 9 value when column 8 is empty
    pub resolved_max_value: f64,
    pub field9: f64,
    pub field10: f64,
    pub field11: f64,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(EffectType, EntityKind::EffectType);

fn max_value_or_fallback(value: Value, row: &Row<'_>) -> Value {
    match value.as_f64() {
        Some(v) if v != 0.0 => value,
        _ => Value::Number(coerce::to_number(row.get(layout::MAX_VALUE_FALLBACK), 0.0)),
    }
}

pub struct EffectTypeParser<'a> {
    ctx: ParseContext<'a>,
    mapper: FieldMapper,
}

impl<'a> EffectTypeParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        let mapper = FieldMapper::from_layout(layout::LAYOUT, ctx.options.zero_policy).field(
            "resolvedMaxValue",
            FieldSpec::new(layout::MAX_VALUE, FieldType::Number).with_transform(max_value_or_fallback),
        );
        Self { ctx, mapper }
    }
}

impl TableParser for EffectTypeParser<'_> {
    type Record = EffectType;

    fn parse_row(&self, row: &Row<'_>) -> Result<EffectType> {
        let m = self.mapper.map(row)?;
        let mut effect = EffectType {
            id: m.integer("id"),
            name_cn: m.text("nameCN"),
            category: m.text("category"),
            scale: m.number("scale"),
            value_type: m.text("valueType"),
            field5: m.number("field5"),
            calculation_type: m.text("calculationType"),
            description: m.text("description"),
            max_value: m.number("maxValue"),
            resolved_max_value: m.number("resolvedMaxValue"),
            field9: m.number("field9"),
            field10: m.number("field10"),
            field11: m.number("field11"),
            localized: Localized::default(),
        };
        super::translate_name(&self.ctx, &mut effect.localized, &effect.name_cn);
        Ok(effect)
    }
}
