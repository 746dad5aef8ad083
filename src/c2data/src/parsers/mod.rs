//! Domain record parsers, one per source table
//!
//! Hero, Talent, Skill, Stage and Equipment read their typed columns
//! directly through the [`schema`](crate::schema) constants. The flatter
//! tables (Buff, Shop, Enemy, Job, EffectType) go through a
//! [`FieldMapper`](crate::mapper::FieldMapper) built from their layouts.

pub mod buff;
pub mod effect_type;
pub mod enemy;
pub mod equipment;
pub mod hero;
pub mod job;
pub mod shop;
pub mod skill;
pub mod stage;
pub mod talent;

pub use buff::{Buff, BuffParser};
pub use effect_type::{EffectType, EffectTypeParser};
pub use enemy::{Enemy, EnemyParser};
pub use equipment::{Equipment, EquipmentParser};
pub use hero::{Hero, HeroParser, HeroStats};
pub use job::{Job, JobParser, StatModifiers};
pub use shop::{Shop, ShopParser};
pub use skill::{ClassTable, Skill, SkillParser};
pub use stage::{Stage, StageParser};
pub use talent::{ConditionTag, Talent, TalentParser};

use crate::entity::Localized;
use crate::parse::ParseContext;

/// Attach the name translated from `name_cn` under the context's locale
pub(crate) fn translate_name(ctx: &ParseContext<'_>, localized: &mut Localized, name_cn: &str) {
    localized.set_name(ctx.locale(), ctx.translate(name_cn));
}

/// Attach a description the source table already carries in its own locale
pub(crate) fn localized_description(ctx: &ParseContext<'_>, localized: &mut Localized, text: String) {
    localized.set_description(ctx.locale(), Some(text));
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::lang::LanguageTable;
    use crate::locale::Locale;
    use crate::parse::{ParseContext, ParseOptions};

    /// Lenient options for `locale`
    pub(crate) fn options(locale: Locale) -> ParseOptions {
        ParseOptions {
            locale,
            skip_errors: true,
            ..Default::default()
        }
    }

    /// Context over a translation table of `(source, translated)` pairs
    pub(crate) fn with_lang<R>(
        locale: Locale,
        pairs: &[(&str, &str)],
        f: impl FnOnce(ParseContext<'_>) -> R,
    ) -> R {
        let rows = pairs
            .iter()
            .enumerate()
            .map(|(i, (cn, tr))| vec![serde_json::json!(i + 1), serde_json::json!(cn), serde_json::json!(tr)])
            .collect();
        let arr = crate::c2array::tests::table(rows);
        let lang = LanguageTable::from_c2array(&arr, locale);
        f(ParseContext::new(options(locale), &lang))
    }
}
