//! Job classes (`zy.json`)
//!
//! Ids 1 to 6 are the basic classes a hero can start in, see
//! [`initial_job_id`](crate::parsers::hero::initial_job_id).

use crate::c2array::Row;
use crate::entity::{impl_entity, EntityKind, Localized};
use crate::mapper::FieldMapper;
use crate::parse::{ParseContext, TableParser};
use crate::schema::job as layout;
use crate::Result;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

const STAT_SLOTS: usize = 12;

/// `stat1` .. `stat12` in column order, semantics unknown.
///
/// Serialized as an object whose keys keep slot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatModifiers(pub Vec<String>);

impl StatModifiers {
    /// One-based slot, matching the `statN` key
    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot.checked_sub(1)?).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for StatModifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, value) in self.0.iter().enumerate() {
            map.serialize_entry(&format!("stat{}", i + 1), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatModifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut slots: Vec<(usize, String)> = raw
            .into_iter()
            .filter_map(|(key, value)| Some((key.strip_prefix("stat")?.parse().ok()?, value)))
            .collect();
        slots.sort_by_key(|(slot, _)| *slot);
        Ok(Self(slots.into_iter().map(|(_, value)| value).collect()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    #[serde(rename = "nameCN")]
    pub name_cn: String,
    pub tier: i64,
    pub category: i64,
    #[serde(rename = "type")]
    pub job_type: i64,
    pub description: String,
    pub icon: i64,
    pub stat_modifiers: StatModifiers,
    pub rank: i64,
    pub sub_rank: i64,
    pub flag1: i64,
    pub flag2: i64,
    pub related_id1: i64,
    pub related_id2: i64,
    pub unknown1: f64,
    pub unknown2: f64,
    pub reference: String,
    #[serde(flatten)]
    pub localized: Localized,
}

impl_entity!(Job, EntityKind::Job);

pub struct JobParser<'a> {
    ctx: ParseContext<'a>,
    mapper: FieldMapper,
}

impl<'a> JobParser<'a> {
    pub fn new(ctx: ParseContext<'a>) -> Self {
        let mapper = FieldMapper::from_layout(layout::LAYOUT, ctx.options.zero_policy);
        Self { ctx, mapper }
    }
}

impl TableParser for JobParser<'_> {
    type Record = Job;

    fn parse_row(&self, row: &Row<'_>) -> Result<Job> {
        let m = self.mapper.map(row)?;
        let mut job = Job {
            id: m.integer("id"),
            name_cn: m.text("nameCN"),
            tier: m.integer("tier"),
            category: m.integer("category"),
            job_type: m.integer("type"),
            description: m.text("description"),
            icon: m.integer("icon"),
            stat_modifiers: StatModifiers(
                (1..=STAT_SLOTS).map(|n| m.text(&format!("stat{n}"))).collect(),
            ),
            rank: m.integer("rank"),
            sub_rank: m.integer("subRank"),
            flag1: m.integer("flag1"),
            flag2: m.integer("flag2"),
            related_id1: m.integer("relatedId1"),
            related_id2: m.integer("relatedId2"),
            unknown1: m.number("unknown1"),
            unknown2: m.number("unknown2"),
            reference: m.text("reference"),
            localized: Localized::default(),
        };
        super::translate_name(&self.ctx, &mut job.localized, &job.name_cn);
        Ok(job)
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
    fn test_parse_job() {
        let mut row = vec![json!(0); 33];
        row[0] = json!(2);
        row[1] = json!("护卫");
        row[2] = json!(1);
        row[5] = json!("守护队友");
        row[12] = json!("hp+10");
        row[23] = json!(5);
        row[24] = json!(3);
        row[32] = json!("guard");

        let arr = table(vec![row]);
        with_lang(Locale::Ko, &[("护卫", "호위")], |ctx| {
            let result = parse_table(&JobParser::new(ctx), &arr, &options(Locale::Ko)).unwrap();
            let job = &result.data[0];
            assert_eq!(job.tier, 1);
            assert_eq!(job.rank, 3);
            assert_eq!(job.reference, "guard");
            assert_eq!(job.stat_modifiers.len(), 12);
            assert_eq!(job.stat_modifiers.get(1), Some("hp+10"));
            assert_eq!(job.stat_modifiers.get(12), Some("5"));
            assert_eq!(job.stat_modifiers.get(2), Some("0"));
            assert_eq!(job.stat_modifiers.get(0), None);
            assert_eq!(job.localized.name_ko.as_deref(), Some("호위"));
        });
    }

    #[test]
    fn test_stat_keys_keep_slot_order() {
        let stats = StatModifiers((1..=12).map(|n| n.to_string()).collect());
        let text = serde_json::to_string(&stats).unwrap();
        let keys: Vec<&str> = text
            .split('"')
            .filter(|part| part.starts_with("stat"))
            .collect();
        assert_eq!(keys[..3], ["stat1", "stat2", "stat3"]);
        assert_eq!(keys[9..], ["stat10", "stat11", "stat12"]);

        let back: StatModifiers = serde_json::from_str(&text).unwrap();
        assert_eq!(back, stats);
    }
}
