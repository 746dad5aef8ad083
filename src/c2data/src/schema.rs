//! Column layouts for every source table.
//!
//! The exporter writes no field names, so these positions were recovered by
//! inspecting the data. They are declared once here; parsers never index
//! cells with bare numbers.
//!
//! # Important
//!
//! Column semantics may shift between game exports. When a new export is
//! dropped in, re-check these layouts before trusting the output.
//!
//! Tables parsed through the [`FieldMapper`](crate::mapper::FieldMapper)
//! expose a `LAYOUT` table of `(field, column, type)` entries. Fields named
//! `fieldN`, `statN` or `unknownN` are opaque slots whose meaning has not
//! been established; they are carried through untouched.

use crate::mapper::FieldType;

// ============================================================================
// HERO (js.json)
// ============================================================================

pub mod hero {
    pub const FILE: &str = "js.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const RACE: usize = 2;
    pub const DISPLAY_NAME: usize = 3;
    pub const UNIVERSE: usize = 5;
    pub const STAGE: usize = 6;

    /// hp, atk, def, spd, magic
    pub const STATS: usize = 7;

    /// 10 job level slots; the first 6 are the basic job classes
    pub const JOB_LEVELS: usize = 12;
    pub const JOB_LEVEL_SLOTS: usize = 10;
    pub const BASIC_JOB_SLOTS: usize = 6;

    pub const DESCRIPTION: usize = 23;
    pub const GENDER: usize = 24;
    pub const RARITY: usize = 25;
    pub const RECRUIT_COST: usize = 26;
    pub const TITLE: usize = 27;

    /// 4 talent slots, 0 = empty
    pub const TALENTS: usize = 28;
    pub const TALENT_SLOTS: usize = 4;

    pub const UNLOCKED: usize = 33;

    /// Description in the source directory's locale
    pub const LOCALIZED_DESCRIPTION: usize = 34;
}

// ============================================================================
// TALENT (mg.json)
// ============================================================================

pub mod talent {
    pub const FILE: &str = "mg.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const TREE: usize = 2;

    /// Doubles as the effect type id in sx.json
    pub const EFFECT_CATEGORY: usize = 3;

    /// Opaque; feeds the unverified percent-per-level formula
    pub const UNKNOWN: usize = 4;
    pub const DESCRIPTION: usize = 5;

    /// Tree coordinates, overlapping the condition columns
    pub const PREREQUISITES: usize = 6;
    pub const PREREQUISITE_SLOTS: usize = 3;

    /// 6 condition slots: 1 Attack, 2 Defense, 3 Special, 4 Common
    pub const CONDITIONS: usize = 6;
    pub const CONDITION_SLOTS: usize = 6;

    pub const TIER: usize = 9;
    pub const POSITION: usize = 10;
    pub const GRADE: usize = 12;
    pub const COST: usize = 13;
}

// ============================================================================
// SKILL (jn.json, mc.json)
// ============================================================================

pub mod skill {
    pub const FILE: &str = "jn.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const SPRITE_ID: usize = 2;
    pub const CLASS_ID: usize = 4;
    pub const TYPE: usize = 5;
    pub const RARITY: usize = 6;

    /// Passive stat id/value pairs (131 health .. 136 magic defense)
    pub const PASSIVE_ID_1: usize = 8;
    pub const PASSIVE_VALUE_1: usize = 9;
    pub const PASSIVE_ID_2: usize = 10;
    pub const PASSIVE_VALUE_2: usize = 11;

    pub const EFFECT_DESCRIPTION: usize = 14;
    pub const SKILL_CATEGORY: usize = 15;
    pub const BUFF_TYPE: usize = 18;
    pub const MANA_COST: usize = 19;
    pub const BUFF_CHANCE: usize = 22;
    pub const DAMAGE_TYPE: usize = 26;
    pub const BASE_POWER: usize = 29;
    pub const BASE_POWER_2: usize = 33;

    /// 1 single, 17 around 4, 25 around 9, 33 all
    pub const TARGET_TYPE: usize = 37;
    pub const UNIVERSE: usize = 47;
    pub const PLACE: usize = 49;

    /// Auxiliary class table
    pub mod class {
        pub const FILE: &str = "mc.json";

        pub const ID: usize = 0;
        pub const NAME_CN: usize = 2;
    }
}

// ============================================================================
// STAGE (tz.json)
// ============================================================================

pub mod stage {
    pub const FILE: &str = "tz.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const UNIVERSE: usize = 2;
    pub const STAGE_NUMBER: usize = 3;

    /// 6 enemy slots
    pub const ENEMIES: usize = 4;
    pub const ENEMY_SLOTS: usize = 6;
    pub const BOSS: usize = 10;

    /// 6 equipment drop slots
    pub const ITEM_DROPS: usize = 11;
    pub const DROP_SLOTS: usize = 6;

    pub const WEAPON_TYPE: usize = 17;
    pub const ITEM_SET: usize = 18;
    pub const ITEM_LEVEL: usize = 19;
    pub const DIFFICULTY: usize = 20;
    pub const UNLOCK_CONDITION: usize = 21;

    /// 2 secret, 3 major battle
    pub const STAGE_TYPE: usize = 22;
}

// ============================================================================
// EQUIPMENT (wp.json)
// ============================================================================

pub mod equipment {
    pub const FILE: &str = "wp.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const DISPLAY_NAME: usize = 2;
    pub const TYPE: usize = 3;
    pub const CATEGORY: usize = 4;
    pub const SLOT: usize = 5;
    pub const LEVEL: usize = 6;
    pub const RARITY: usize = 7;
    pub const VALUE: usize = 8;
    pub const SELL_PRICE: usize = 9;
    pub const DESCRIPTION: usize = 10;

    /// Stat bonus run; only non-zero values are kept
    pub const STATS: usize = 11;
    pub const STAT_SLOTS: usize = 20;

    pub const SET_ID: usize = 36;
    pub const WEAPON_TYPE: usize = 37;
    pub const GEM_SLOTS: usize = 38;
}

// ============================================================================
// BUFF (buff.json)
// ============================================================================

pub mod buff {
    use super::FieldType;

    pub const FILE: &str = "buff.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;

    pub const MAX_STACKS: usize = 10;

    /// Description in the source directory's locale
    pub const LOCALIZED_DESCRIPTION: usize = 14;

    pub const LAYOUT: &[(&str, usize, FieldType)] = &[
        ("id", ID, FieldType::Integer),
        ("nameCN", NAME_CN, FieldType::Text),
        ("displayName", 2, FieldType::Text),
        ("icon", 3, FieldType::Integer),
        ("effectValue", 6, FieldType::Number),
        ("duration", 9, FieldType::Number),
        ("maxStacks", MAX_STACKS, FieldType::Integer),
        ("durationType", 11, FieldType::Text),
        ("buffType", 12, FieldType::Text),
        ("description", 13, FieldType::Text),
        ("localizedDescription", LOCALIZED_DESCRIPTION, FieldType::Text),
    ];
}

// ============================================================================
// SHOP (ss.json)
// ============================================================================

pub mod shop {
    use super::FieldType;

    pub const FILE: &str = "ss.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const LEVEL: usize = 7;

    /// English description, present in every export
    pub const DESCRIPTION_EN: usize = 11;

    pub const LAYOUT: &[(&str, usize, FieldType)] = &[
        ("id", ID, FieldType::Integer),
        ("nameCN", NAME_CN, FieldType::Text),
        ("displayName", 2, FieldType::Text),
        ("icon", 3, FieldType::Integer),
        ("capacity", 4, FieldType::Number),
        ("itemSlots", 5, FieldType::Integer),
        ("upgradeCost", 6, FieldType::Number),
        ("level", LEVEL, FieldType::Integer),
        ("effectDescription", 8, FieldType::Text),
        ("upgradeBonus", 9, FieldType::Number),
        ("unknown10", 10, FieldType::Number),
        ("descriptionEN", DESCRIPTION_EN, FieldType::Text),
    ];
}

// ============================================================================
// ENEMY (dr.json)
// ============================================================================

pub mod enemy {
    use super::FieldType;

    pub const FILE: &str = "dr.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const LEVEL: usize = 2;

    pub const LAYOUT: &[(&str, usize, FieldType)] = &[
        ("id", ID, FieldType::Integer),
        ("nameCN", NAME_CN, FieldType::Text),
        ("level", LEVEL, FieldType::Integer),
        ("type", 3, FieldType::Integer),
        ("rank", 4, FieldType::Integer),
        ("enemyClass", 5, FieldType::Text),
        ("field6", 6, FieldType::Number),
        ("field7", 7, FieldType::Number),
        ("field8", 8, FieldType::Number),
        ("field9", 9, FieldType::Number),
        ("field10", 10, FieldType::Number),
        ("field11", 11, FieldType::Number),
        ("field12", 12, FieldType::Number),
        ("field13", 13, FieldType::Number),
        ("field14", 14, FieldType::Number),
    ];
}

// ============================================================================
// JOB (zy.json)
// ============================================================================

pub mod job {
    use super::FieldType;

    pub const FILE: &str = "zy.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;

    pub const LAYOUT: &[(&str, usize, FieldType)] = &[
        ("id", ID, FieldType::Integer),
        ("nameCN", NAME_CN, FieldType::Text),
        ("tier", 2, FieldType::Integer),
        ("category", 3, FieldType::Integer),
        ("type", 4, FieldType::Integer),
        ("description", 5, FieldType::Text),
        ("icon", 6, FieldType::Integer),
        ("stat1", 12, FieldType::Text),
        ("stat2", 13, FieldType::Text),
        ("stat3", 14, FieldType::Text),
        ("stat4", 15, FieldType::Text),
        ("stat5", 16, FieldType::Text),
        ("stat6", 17, FieldType::Text),
        ("stat7", 18, FieldType::Text),
        ("stat8", 19, FieldType::Text),
        ("stat9", 20, FieldType::Text),
        ("stat10", 21, FieldType::Text),
        ("stat11", 22, FieldType::Text),
        ("stat12", 23, FieldType::Text),
        ("rank", 24, FieldType::Integer),
        ("subRank", 25, FieldType::Integer),
        ("flag1", 26, FieldType::Integer),
        ("flag2", 27, FieldType::Integer),
        ("relatedId1", 28, FieldType::Integer),
        ("relatedId2", 29, FieldType::Integer),
        ("unknown1", 30, FieldType::Number),
        ("unknown2", 31, FieldType::Number),
        ("reference", 32, FieldType::Text),
    ];
}

// ============================================================================
// EFFECT TYPE (sx.json)
// ============================================================================

pub mod effect_type {
    use super::FieldType;

    pub const FILE: &str = "sx.json";

    pub const ID: usize = 0;
    pub const NAME_CN: usize = 1;
    pub const MAX_VALUE: usize = 8;

    /// Second max value column, used when [`MAX_VALUE`] is empty
    pub const MAX_VALUE_FALLBACK: usize = 9;

    pub const LAYOUT: &[(&str, usize, FieldType)] = &[
        ("id", ID, FieldType::Integer),
        ("nameCN", NAME_CN, FieldType::Text),
        ("category", 2, FieldType::Text),
        ("scale", 3, FieldType::Number),
        ("valueType", 4, FieldType::Text),
        ("field5", 5, FieldType::Number),
        ("calculationType", 6, FieldType::Text),
        ("description", 7, FieldType::Text),
        ("maxValue", MAX_VALUE, FieldType::Number),
        ("field9", MAX_VALUE_FALLBACK, FieldType::Number),
        ("field10", 10, FieldType::Number),
        ("field11", 11, FieldType::Number),
    ];
}

// ============================================================================
// LANGUAGE (lau.json)
// ============================================================================

pub mod language {
    pub const FILE: &str = "lau.json";

    pub const ID: usize = 0;
    pub const SOURCE_TEXT: usize = 1;
    pub const TRANSLATED_TEXT: usize = 2;
}

/// Raw engine export holding sprite atlas definitions
pub const SPRITE_EXPORT_FILE: &str = "data.json";
