//! Run orchestration: sources in, record documents out
//!
//! Tables are parsed in [`EntityKind::PARSE_ORDER`] so every kind's
//! reference targets exist before it is checked. The first source is
//! authoritative; later sources only contribute localized fields, merged
//! by id.

use crate::entity::{Entity, EntityKind};
use crate::lang::LanguageTable;
use crate::locale::Locale;
use crate::mapper::ZeroPolicy;
use crate::parse::{parse_file, ParseContext, ParseOptions, ParseResult, TableParser};
use crate::parsers::{
    Buff, BuffParser, ClassTable, EffectType, EffectTypeParser, Enemy, EnemyParser, Equipment,
    EquipmentParser, Hero, HeroParser, Job, JobParser, Shop, ShopParser, Skill, SkillParser, Stage,
    StageParser, Talent, TalentParser,
};
use crate::resolver::Resolver;
use crate::sprite::{extract_hero_images, ExtractReport, SpriteOptions, SpriteResolver, SpriteTable};
use crate::Result;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "parse-summary.json";
pub const SPRITE_MAP_FILE: &str = "sprite-map.json";

/// One exported source directory and the locale it was exported for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub dir: PathBuf,
    pub locale: Locale,
}

impl Source {
    pub fn new(dir: impl Into<PathBuf>, locale: Locale) -> Self {
        Self {
            dir: dir.into(),
            locale,
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    /// `DIR` or `DIR:LOCALE`; a bare directory uses the default locale
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty source directory".to_string());
        }
        if let Some((dir, locale)) = s.rsplit_once(':') {
            if let Ok(locale) = locale.parse::<Locale>() {
                if dir.is_empty() {
                    return Err(format!("missing directory in '{}'", s));
                }
                return Ok(Self::new(dir, locale));
            }
        }
        Ok(Self::new(s, Locale::default()))
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Primary source first
    pub sources: Vec<Source>,
    /// Kinds to parse; `None` parses all of them
    pub only: Option<Vec<EntityKind>>,
    pub skip_errors: bool,
    pub zero_policy: ZeroPolicy,
    /// Check cross-collection references after parsing
    pub validate: bool,
    pub sprite: SpriteOptions,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            only: None,
            skip_errors: true,
            zero_policy: ZeroPolicy::default(),
            validate: true,
            sprite: SpriteOptions::default(),
        }
    }
}

impl PipelineOptions {
    fn wants(&self, kind: EntityKind) -> bool {
        self.only.as_ref().map_or(true, |only| only.contains(&kind))
    }
}

/// Parse results by kind; `None` for kinds that were not run
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub hero: Option<ParseResult<Hero>>,
    pub stage: Option<ParseResult<Stage>>,
    pub equipment: Option<ParseResult<Equipment>>,
    pub talent: Option<ParseResult<Talent>>,
    pub skill: Option<ParseResult<Skill>>,
    pub buff: Option<ParseResult<Buff>>,
    pub shop: Option<ParseResult<Shop>>,
    pub enemy: Option<ParseResult<Enemy>>,
    pub job: Option<ParseResult<Job>>,
    pub effect_type: Option<ParseResult<EffectType>>,
}

impl Collections {
    pub fn heroes(&self) -> &[Hero] {
        self.hero.as_ref().map(|r| r.data.as_slice()).unwrap_or_default()
    }

    pub fn talents(&self) -> &[Talent] {
        self.talent.as_ref().map(|r| r.data.as_slice()).unwrap_or_default()
    }

    pub fn stages(&self) -> &[Stage] {
        self.stage.as_ref().map(|r| r.data.as_slice()).unwrap_or_default()
    }

    pub fn effect_types(&self) -> &[EffectType] {
        self.effect_type.as_ref().map(|r| r.data.as_slice()).unwrap_or_default()
    }

    /// Counts and errors of every collection that was run, in output order
    fn results(&self) -> Vec<(EntityKind, TypeSummary, &[String])> {
        fn entry<T: Entity>(result: &Option<ParseResult<T>>) -> Option<(EntityKind, TypeSummary, &[String])> {
            result
                .as_ref()
                .map(|r| (T::KIND, TypeSummary::of(r), r.errors.as_slice()))
        }
        [
            entry(&self.hero),
            entry(&self.stage),
            entry(&self.equipment),
            entry(&self.talent),
            entry(&self.skill),
            entry(&self.buff),
            entry(&self.shop),
            entry(&self.enemy),
            entry(&self.job),
            entry(&self.effect_type),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Per-kind counts, keyed in output order
    pub fn stats(&self) -> BTreeMap<EntityKind, TypeSummary> {
        self.results()
            .into_iter()
            .map(|(kind, stats, _)| (kind, stats))
            .collect()
    }

    /// Counts summed over every kind
    pub fn totals(&self) -> TypeSummary {
        let mut totals = TypeSummary::default();
        for (_, stats, _) in self.results() {
            totals.add(&stats);
        }
        totals
    }

    /// Every record-level error across all kinds, prefixed with the kind
    pub fn errors(&self) -> Vec<String> {
        self.results()
            .into_iter()
            .flat_map(|(kind, _, errors)| errors.iter().map(move |e| format!("{}: {}", kind, e)))
            .collect()
    }
}

/// Counts for one kind in the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub total: usize,
    pub parsed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl TypeSummary {
    fn of<T>(result: &ParseResult<T>) -> Self {
        Self {
            total: result.stats.total,
            parsed: result.stats.parsed,
            failed: result.stats.failed,
            errors: result.errors.len(),
            warnings: result.warnings.len(),
        }
    }

    fn add(&mut self, other: &TypeSummary) {
        self.total += other.total;
        self.parsed += other.parsed;
        self.failed += other.failed;
        self.errors += other.errors;
        self.warnings += other.warnings;
    }
}

/// Contents of `parse-summary.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub sources: Vec<Source>,
    pub types: BTreeMap<EntityKind, TypeSummary>,
    pub totals: TypeSummary,
    /// Present when reference validation ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_errors: Option<Vec<String>>,
    /// Source-level problems such as a missing translation table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ExtractReport>,
}

impl RunSummary {
    /// Whether any record or table failed to parse
    pub fn any_failed(&self) -> bool {
        self.totals.failed > 0
    }
}

/// Parse `parser`'s table, turning a strict-mode abort into a failed table
fn run_table<P: TableParser>(parser: &P, dir: &Path, options: &ParseOptions) -> ParseResult<P::Record> {
    match parse_file(parser, dir, options) {
        Ok(result) => result,
        Err(err) => {
            tracing::error!("{}", err);
            ParseResult::failed(err.to_string())
        }
    }
}

/// Copy localized fields from `secondary` into matching `primary` records
fn merge_locale<T: Entity>(primary: &mut Option<ParseResult<T>>, secondary: Option<ParseResult<T>>, label: &str) {
    let (Some(primary), Some(secondary)) = (primary.as_mut(), secondary) else {
        return;
    };

    primary
        .warnings
        .extend(secondary.errors.iter().map(|e| format!("{}: {}", label, e)));
    primary.stats.warnings = primary.warnings.len();

    let by_id: HashMap<i64, &T> = secondary.data.iter().map(|r| (r.id(), r)).collect();
    let mut merged = 0;
    for record in &mut primary.data {
        if let Some(other) = by_id.get(&record.id()) {
            record.merge_locale(other);
            merged += 1;
        }
    }
    tracing::debug!("Merged {} {} records from {}", merged, T::KIND, label);
}

pub struct Pipeline {
    options: PipelineOptions,
    collections: Collections,
    resolver: Resolver,
    warnings: Vec<String>,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            collections: Collections::default(),
            resolver: Resolver::new(),
            warnings: Vec::new(),
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn parse_options(&self, locale: Locale) -> ParseOptions {
        ParseOptions {
            locale,
            skip_errors: self.options.skip_errors,
            zero_policy: self.options.zero_policy,
        }
    }

    /// Translation table of `source`, empty (with a warning) if it has none
    fn language_table(&mut self, source: &Source) -> LanguageTable {
        match LanguageTable::load(&source.dir, source.locale) {
            Ok(lang) => {
                tracing::debug!("Loaded {} translations from {}", lang.len(), source.dir.display());
                lang
            }
            Err(err) => {
                let message = format!("{}: no translation table ({})", source.dir.display(), err);
                tracing::warn!("{}", message);
                self.warnings.push(message);
                LanguageTable::empty(source.locale)
            }
        }
    }

    /// Parse every wanted table of one source directory
    fn parse_source(&mut self, source: &Source) -> Collections {
        let options = self.parse_options(source.locale);
        let lang = self.language_table(source);
        let classes = ClassTable::load(&source.dir).unwrap_or_else(|err| {
            tracing::debug!("No skill class table in {}: {}", source.dir.display(), err);
            ClassTable::default()
        });
        let ctx = ParseContext::new(options, &lang);
        let dir = source.dir.as_path();

        tracing::info!("Parsing {} ({})", dir.display(), source.locale);
        let mut out = Collections::default();
        for kind in EntityKind::PARSE_ORDER {
            if !self.options.wants(kind) {
                continue;
            }
            match kind {
                EntityKind::EffectType => {
                    out.effect_type = Some(run_table(&EffectTypeParser::new(ctx), dir, &options));
                }
                EntityKind::Buff => out.buff = Some(run_table(&BuffParser::new(ctx), dir, &options)),
                EntityKind::Skill => {
                    let parser = SkillParser::new(ctx).with_classes(&classes);
                    out.skill = Some(run_table(&parser, dir, &options));
                }
                EntityKind::Talent => {
                    let talents = {
                        let parser = TalentParser::new(ctx).with_effect_types(out.effect_types());
                        run_table(&parser, dir, &options)
                    };
                    out.talent = Some(talents);
                }
                EntityKind::Equipment => {
                    out.equipment = Some(run_table(&EquipmentParser::new(ctx), dir, &options));
                }
                EntityKind::Enemy => out.enemy = Some(run_table(&EnemyParser::new(ctx), dir, &options)),
                EntityKind::Job => out.job = Some(run_table(&JobParser::new(ctx), dir, &options)),
                EntityKind::Hero => out.hero = Some(run_table(&HeroParser::new(ctx), dir, &options)),
                EntityKind::Stage => out.stage = Some(run_table(&StageParser::new(ctx), dir, &options)),
                EntityKind::Shop => out.shop = Some(run_table(&ShopParser::new(ctx), dir, &options)),
            }
        }
        out
    }

    /// Fold a secondary source's localized fields into the primary records
    fn merge_source(&mut self, secondary: Collections, label: &str) {
        let c = &mut self.collections;
        merge_locale(&mut c.hero, secondary.hero, label);
        merge_locale(&mut c.stage, secondary.stage, label);
        merge_locale(&mut c.equipment, secondary.equipment, label);
        merge_locale(&mut c.talent, secondary.talent, label);
        merge_locale(&mut c.skill, secondary.skill, label);
        merge_locale(&mut c.buff, secondary.buff, label);
        merge_locale(&mut c.shop, secondary.shop, label);
        merge_locale(&mut c.enemy, secondary.enemy, label);
        merge_locale(&mut c.job, secondary.job, label);
        merge_locale(&mut c.effect_type, secondary.effect_type, label);
    }

    /// Give every hero a placement; misses get a fallback and a warning
    fn attach_sprites(&mut self, dir: &Path) {
        let Some(heroes) = self.collections.hero.as_mut() else {
            return;
        };
        if heroes.data.is_empty() {
            return;
        }

        let sprite = &self.options.sprite;
        let table = SpriteTable::load(dir, &sprite.sheet_prefix, sprite.preferred_frame, &heroes.data)
            .unwrap_or_else(|err| {
                tracing::warn!("No sprite definitions in {}: {}", dir.display(), err);
                SpriteTable::default()
            });
        let sprites = SpriteResolver::new(table);

        for hero in &mut heroes.data {
            let placement = sprites.placement(hero);
            if placement.is_fallback() {
                heroes.warnings.push(format!(
                    "Hero {} ({}): no sprite entry for spriteId {}, using fallback placement",
                    hero.id, hero.name_cn, hero.sprite_id
                ));
            }
            hero.sprite = Some(placement);
        }
        heroes.stats.warnings = heroes.warnings.len();
    }

    fn register_all(&mut self) -> Result<()> {
        let c = &self.collections;
        macro_rules! register {
            ($($field:ident),*) => {
                $(if let Some(result) = &c.$field {
                    self.resolver.register(&result.data)?;
                })*
            };
        }
        register!(effect_type, buff, skill, talent, equipment, enemy, job, hero, stage, shop);
        Ok(())
    }

    /// Parse all sources, merge localizations, attach sprites and
    /// register everything for reference lookups.
    ///
    /// Table-level failures end up in the collections; `Err` is reserved
    /// for problems serializing records into the resolver.
    pub fn run(&mut self) -> Result<&Collections> {
        let sources = self.options.sources.clone();
        let Some((primary, secondaries)) = sources.split_first() else {
            tracing::warn!("No source directories given");
            return Ok(&self.collections);
        };

        self.collections = self.parse_source(primary);
        for source in secondaries {
            let secondary = self.parse_source(source);
            let label = format!("{} ({})", source.dir.display(), source.locale);
            self.merge_source(secondary, &label);
        }

        self.attach_sprites(&primary.dir);
        self.register_all()?;

        let totals = self.collections.totals();
        tracing::info!(
            "Parsed {} of {} records ({} failed, {} warnings)",
            totals.parsed,
            totals.total,
            totals.failed,
            totals.warnings
        );
        Ok(&self.collections)
    }

    /// Dangling references between collections, each reported once.
    ///
    /// A check only runs when both sides were parsed.
    pub fn validate_references(&self) -> Vec<String> {
        let c = &self.collections;
        let r = &self.resolver;
        let parsed = |kind: EntityKind| match kind {
            EntityKind::Talent => c.talent.is_some(),
            EntityKind::Job => c.job.is_some(),
            EntityKind::Enemy => c.enemy.is_some(),
            EntityKind::Equipment => c.equipment.is_some(),
            EntityKind::EffectType => c.effect_type.is_some(),
            _ => false,
        };
        let dangling = |id: i64, kind: EntityKind, field: &str| {
            parsed(kind) && r.validate_reference(Some(id), kind, field).is_err()
        };

        let mut errors = Vec::new();
        for hero in c.heroes() {
            for id in hero.talent_ids() {
                if dangling(id, EntityKind::Talent, "talents") {
                    errors.push(format!("Hero {} ({}) references invalid talent {}", hero.id, hero.name_cn, id));
                }
            }
            if let Some(id) = hero.initial_job_id {
                if dangling(id, EntityKind::Job, "initialJobId") {
                    errors.push(format!("Hero {} ({}) references invalid job {}", hero.id, hero.name_cn, id));
                }
            }
        }
        for stage in c.stages() {
            for &id in &stage.enemies {
                if dangling(id, EntityKind::Enemy, "enemies") {
                    errors.push(format!("Stage {} ({}) references invalid enemy {}", stage.id, stage.name_cn, id));
                }
            }
            for &id in &stage.item_drops {
                if dangling(id, EntityKind::Equipment, "itemDrops") {
                    errors.push(format!("Stage {} ({}) references invalid item {}", stage.id, stage.name_cn, id));
                }
            }
        }
        for talent in c.talents() {
            let id = talent.effect_category;
            if dangling(id, EntityKind::EffectType, "effectCategory") {
                errors.push(format!(
                    "Talent {} ({}) references invalid effect type {}",
                    talent.id, talent.name_cn, id
                ));
            }
        }

        let mut seen = HashSet::new();
        errors.retain(|e| seen.insert(e.clone()));
        for error in &errors {
            tracing::warn!("{}", error);
        }
        errors
    }

    /// Counts and findings for the last run
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            sources: self.options.sources.clone(),
            types: self.collections.stats(),
            totals: self.collections.totals(),
            reference_errors: self.options.validate.then(|| self.validate_references()),
            warnings: self.warnings.clone(),
            images: None,
        }
    }

    /// Write record documents, the sprite map and the summary to `out_dir`,
    /// extracting hero portraits first when an atlas directory is set.
    pub fn export(&self, out_dir: &Path) -> Result<RunSummary> {
        std::fs::create_dir_all(out_dir)?;

        let c = &self.collections;
        macro_rules! write_records {
            ($($field:ident),*) => {
                $(if let Some(result) = &c.$field {
                    write_kind(out_dir, &result.data)?;
                })*
            };
        }
        write_records!(hero, stage, equipment, talent, skill, buff, shop, enemy, job, effect_type);

        let heroes = c.heroes();
        if !heroes.is_empty() {
            let sprite_map: BTreeMap<i64, _> = heroes
                .iter()
                .filter_map(|h| h.sprite.as_ref().map(|s| (h.id, s)))
                .collect();
            write_json(&out_dir.join(SPRITE_MAP_FILE), &sprite_map)?;
        }

        let mut summary = self.summary();
        if let Some(atlas_dir) = self.options.sprite.atlas_dir.as_ref().filter(|_| !heroes.is_empty()) {
            summary.images = Some(extract_hero_images(
                heroes,
                atlas_dir,
                &self.options.sprite.sheet_prefix,
                out_dir,
            )?);
        }

        write_json(&out_dir.join(SUMMARY_FILE), &summary)?;
        tracing::info!("Wrote output to {}", out_dir.display());
        Ok(summary)
    }
}

/// `<out_dir>/<kind>.json`
fn write_kind<T: Entity>(out_dir: &Path, records: &[T]) -> Result<()> {
    let path = out_dir.join(T::KIND.output_file());
    write_json(&path, records)?;
    tracing::debug!("Exported {} {} records to {}", records.len(), T::KIND, path.display());
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::fs::write(path, json)?;
    Ok(())
}
