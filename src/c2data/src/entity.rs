//! Entity kinds and the shared record contract

use crate::locale::Locale;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The ten record types recovered from a source directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Hero,
    Stage,
    Equipment,
    Talent,
    Skill,
    Buff,
    Shop,
    Enemy,
    Job,
    EffectType,
}

impl EntityKind {
    /// Every kind, in output order
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Hero,
        EntityKind::Stage,
        EntityKind::Equipment,
        EntityKind::Talent,
        EntityKind::Skill,
        EntityKind::Buff,
        EntityKind::Shop,
        EntityKind::Enemy,
        EntityKind::Job,
        EntityKind::EffectType,
    ];

    /// Dependency order. A kind is parsed only after every kind it
    /// references, so the resolver already holds the targets when
    /// references are checked.
    pub const PARSE_ORDER: [EntityKind; 10] = [
        EntityKind::EffectType,
        EntityKind::Buff,
        EntityKind::Skill,
        EntityKind::Talent,
        EntityKind::Equipment,
        EntityKind::Enemy,
        EntityKind::Job,
        EntityKind::Hero,
        EntityKind::Stage,
        EntityKind::Shop,
    ];

    /// Key used in output file names and summaries
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Hero => "hero",
            EntityKind::Stage => "stage",
            EntityKind::Equipment => "equipment",
            EntityKind::Talent => "talent",
            EntityKind::Skill => "skill",
            EntityKind::Buff => "buff",
            EntityKind::Shop => "shop",
            EntityKind::Enemy => "enemy",
            EntityKind::Job => "job",
            EntityKind::EffectType => "effectType",
        }
    }

    /// Source table this kind is parsed from
    pub fn source_file(self) -> &'static str {
        use crate::schema;
        match self {
            EntityKind::Hero => schema::hero::FILE,
            EntityKind::Stage => schema::stage::FILE,
            EntityKind::Equipment => schema::equipment::FILE,
            EntityKind::Talent => schema::talent::FILE,
            EntityKind::Skill => schema::skill::FILE,
            EntityKind::Buff => schema::buff::FILE,
            EntityKind::Shop => schema::shop::FILE,
            EntityKind::Enemy => schema::enemy::FILE,
            EntityKind::Job => schema::job::FILE,
            EntityKind::EffectType => schema::effect_type::FILE,
        }
    }

    /// Output document name, e.g. `hero.json`
    pub fn output_file(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "effect_type" | "effect-type" => Some(EntityKind::EffectType),
                "heroes" => Some(EntityKind::Hero),
                "stages" => Some(EntityKind::Stage),
                "items" | "item" => Some(EntityKind::Equipment),
                "talents" => Some(EntityKind::Talent),
                "skills" => Some(EntityKind::Skill),
                "buffs" => Some(EntityKind::Buff),
                "shops" => Some(EntityKind::Shop),
                "enemies" => Some(EntityKind::Enemy),
                "jobs" => Some(EntityKind::Job),
                _ => None,
            })
            .ok_or_else(|| format!("unknown entity type '{}'", s))
    }
}

/// Translated fields attached after parsing.
///
/// Only locales other than the canonical one land here. Each field is
/// omitted from output when no translation was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    #[serde(rename = "nameEN", default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(rename = "nameKO", default, skip_serializing_if = "Option::is_none")]
    pub name_ko: Option<String>,
    #[serde(rename = "descriptionEN", default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(rename = "descriptionKO", default, skip_serializing_if = "Option::is_none")]
    pub description_ko: Option<String>,
}

impl Localized {
    fn slot(value: Option<String>) -> Option<String> {
        value.filter(|s| !s.is_empty())
    }

    pub fn set_name(&mut self, locale: Locale, value: Option<String>) {
        match locale {
            Locale::Zh => {}
            Locale::En => self.name_en = Self::slot(value),
            Locale::Ko => self.name_ko = Self::slot(value),
        }
    }

    pub fn set_description(&mut self, locale: Locale, value: Option<String>) {
        match locale {
            Locale::Zh => {}
            Locale::En => self.description_en = Self::slot(value),
            Locale::Ko => self.description_ko = Self::slot(value),
        }
    }

    pub fn name(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::Zh => None,
            Locale::En => self.name_en.as_deref(),
            Locale::Ko => self.name_ko.as_deref(),
        }
    }

    /// Take every field `other` carries, keeping ours where it has none
    pub fn merge(&mut self, other: &Localized) {
        fn take(dst: &mut Option<String>, src: &Option<String>) {
            if src.is_some() {
                dst.clone_from(src);
            }
        }
        take(&mut self.name_en, &other.name_en);
        take(&mut self.name_ko, &other.name_ko);
        take(&mut self.description_en, &other.description_en);
        take(&mut self.description_ko, &other.description_ko);
    }
}

/// A parsed record with a stable integer identity
pub trait Entity: Serialize + DeserializeOwned + Clone + std::fmt::Debug {
    const KIND: EntityKind;

    fn id(&self) -> i64;

    /// Canonical-language name, the key for translation lookups
    fn name_cn(&self) -> &str;

    fn localized(&self) -> &Localized;

    fn localized_mut(&mut self) -> &mut Localized;

    /// Merge localized fields from the same record parsed out of a
    /// secondary source directory.
    fn merge_locale(&mut self, other: &Self) {
        self.localized_mut().merge(other.localized());
    }
}

/// Implement [`Entity`] for a record with `id`, `name_cn` and a
/// flattened `localized` field.
macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl $crate::entity::Entity for $ty {
            const KIND: $crate::entity::EntityKind = $kind;

            fn id(&self) -> i64 {
                self.id
            }

            fn name_cn(&self) -> &str {
                &self.name_cn
            }

            fn localized(&self) -> &$crate::entity::Localized {
                &self.localized
            }

            fn localized_mut(&mut self) -> &mut $crate::entity::Localized {
                &mut self.localized
            }
        }
    };
}

pub(crate) use impl_entity;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(EntityKind::EffectType.to_string(), "effectType");
        assert_eq!(EntityKind::Hero.output_file(), "hero.json");
        assert_eq!(EntityKind::Skill.source_file(), "jn.json");
        assert_eq!("EffectType".parse::<EntityKind>(), Ok(EntityKind::EffectType));
        assert_eq!("enemies".parse::<EntityKind>(), Ok(EntityKind::Enemy));
        assert!("dragon".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_parse_order_dependencies() {
        let pos = |k: EntityKind| EntityKind::PARSE_ORDER.iter().position(|x| *x == k).unwrap();
        assert!(pos(EntityKind::EffectType) < pos(EntityKind::Talent));
        assert!(pos(EntityKind::Talent) < pos(EntityKind::Hero));
        assert!(pos(EntityKind::Job) < pos(EntityKind::Hero));
        assert!(pos(EntityKind::Enemy) < pos(EntityKind::Stage));
        assert!(pos(EntityKind::Equipment) < pos(EntityKind::Stage));
        assert!(pos(EntityKind::Stage) < pos(EntityKind::Shop));

        let mut sorted = EntityKind::PARSE_ORDER;
        sorted.sort();
        let mut all = EntityKind::ALL;
        all.sort();
        assert_eq!(sorted, all);
    }

    #[test]
    fn test_localized_merge_and_serialize() {
        let mut base = Localized::default();
        base.set_name(Locale::En, Some("Cao Cao".into()));
        base.set_name(Locale::Zh, Some("ignored".into()));
        base.set_description(Locale::En, Some(String::new()));

        let mut korean = Localized::default();
        korean.set_name(Locale::Ko, Some("조조".into()));
        base.merge(&korean);

        assert_eq!(base.name(Locale::En), Some("Cao Cao"));
        assert_eq!(base.name(Locale::Ko), Some("조조"));
        assert!(base.description_en.is_none());

        let json = serde_json::to_value(&base).unwrap();
        assert_eq!(json["nameEN"], "Cao Cao");
        assert_eq!(json["nameKO"], "조조");
        assert!(json.get("descriptionEN").is_none());
    }
}
