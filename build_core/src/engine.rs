//! Calculation engine - raw character data in, `CalculationResult` out
//!
//! A calculation is a pure function of the character, the passive tree
//! reference data, the options and the engine's databases. Nothing is cached
//! between calls and no randomness is involved, so repeated calls with the
//! same inputs are bit-identical.

use crate::character::{Character, PassiveTree};
use crate::config::{default_skills, CalcOptions, GameConstants, SkillDatabase};
use crate::damage::{calculate_damage, CalculationDetails, CalculationResult, DamageContext, DamageOutcome};
use crate::defense::DefenseSummary;
use crate::dot::{calculate_ailment_dps, AilmentDps, AilmentInput, AilmentModifiers, AilmentRegistry};
use crate::error::{ensure_finite, CalcError};
use crate::minion::{calculate_minion_dps, MinionDps, MinionModifiers, MinionProfile};
use crate::modifier::{Effect, Stat};
use crate::resolve::{reserved_spirit, select_skill, SkillProfile, WeaponProfile};
use crate::source::{collect_effects, BaseStatsSource, BuffSource, GearSource, PassiveTreeSource, StatSource};
use crate::stat_block::{AggregatedStats, CharacterStats};
use tracing::debug;

/// Highest character level the game allows
pub const MAX_LEVEL: u32 = 100;

/// Skill and ailment databases plus default constants
#[derive(Debug, Clone)]
pub struct Engine {
    skills: SkillDatabase,
    ailments: AilmentRegistry,
    constants: GameConstants,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Engine {
    pub fn new(skills: SkillDatabase, ailments: AilmentRegistry, constants: GameConstants) -> Self {
        Engine {
            skills,
            ailments,
            constants,
        }
    }

    /// Engine over the embedded reference data
    pub fn with_defaults() -> Self {
        Self::new(
            default_skills(),
            AilmentRegistry::with_defaults(),
            GameConstants::default(),
        )
    }

    pub fn skills(&self) -> &SkillDatabase {
        &self.skills
    }

    pub fn ailments(&self) -> &AilmentRegistry {
        &self.ailments
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    /// Run one full calculation
    ///
    /// Only caller contract violations fail; missing or unrecognized game data
    /// resolves to canonical defaults.
    pub fn calculate(
        &self,
        character: &Character,
        tree: &PassiveTree,
        options: &CalcOptions,
    ) -> Result<CalculationResult, CalcError> {
        let constants = options.constants.as_ref().unwrap_or(&self.constants);
        validate(character, options, constants)?;
        let enemy_evasion = ensure_finite("enemy_evasion", options.target_evasion(constants))?;
        if enemy_evasion < 0.0 {
            return Err(CalcError::NegativeEvasion(enemy_evasion));
        }

        let setup = select_skill(character, options.selected_skill.as_deref());
        let selected_id = setup
            .as_ref()
            .and_then(|s| self.skills.skill(&s.name))
            .map(|definition| definition.id.clone());

        let effects = self.gather_effects(character, tree, options, selected_id.as_deref());
        let stats = AggregatedStats::fold(&effects);
        let character_stats = CharacterStats::compute(&stats, constants);
        let defense = DefenseSummary::compute(&character_stats, constants)?;

        let weapon = WeaponProfile::resolve(character.main_hand());
        let skill = SkillProfile::resolve(setup.as_ref(), &self.skills, &stats);
        let skill_stats = stats.extended(&skill.effects);

        let accuracy = match options.accuracy_override {
            Some(accuracy) => accuracy,
            None => {
                let mut accuracy = skill_stats.stat(Stat::Accuracy, &skill.tags);
                accuracy.flat += character_stats.dexterity * constants.character.accuracy_per_dexterity
                    + weapon.accuracy;
                accuracy.compute().max(0.0)
            }
        };

        let outcome = calculate_damage(&DamageContext {
            weapon: &weapon,
            skill: &skill,
            stats: &skill_stats,
            constants,
            accuracy,
            enemy_evasion,
            combo_stacks: options.combo_stacks,
            spirit_available: character_stats.spirit,
            spirit_reserved: reserved_spirit(character, &self.skills),
        })?;

        let ailments = self.ailment_dps(&effects, &skill, &outcome, options);
        let ailment_dps = ailments.iter().map(|a| a.dps).sum::<f64>();
        let minion = self.minion_dps(character, &effects, &stats, options, constants);

        debug!(
            character = %character.name,
            skill = %skill.name,
            dps = outcome.dps,
            effective_dps = outcome.effective_dps,
            "calculation complete"
        );

        Ok(CalculationResult {
            character: character.name.clone(),
            class: character.class.clone(),
            level: character.level,
            skill: skill.name.clone(),
            total_dps: outcome.dps,
            combo_dps: outcome.combo_dps,
            effective_dps: outcome.effective_dps,
            dps_by_type: outcome.dps_by_type,
            average_hit: outcome.average_hit,
            uses_per_second: outcome.uses_per_second,
            hit_chance: outcome.hit_chance,
            crit_chance: outcome.crit.chance,
            crit_multiplier: outcome.crit.multiplier,
            combo_multiplier: outcome.combo_multiplier,
            resources: outcome.resources,
            ailments,
            ailment_dps,
            minion,
            defense,
            details: CalculationDetails {
                character_stats,
                channels: outcome.channels,
                hit_damage: outcome.hit_damage,
                crit: outcome.crit,
                accuracy,
                enemy_evasion,
                combo_stacks: outcome.combo_stacks,
                effect_count: effects.len() + skill.effects.len(),
                weapon,
                skill,
            },
        })
    }

    /// Effects from every stat source: base stats, gear, passives, buffs
    ///
    /// Persistent skills (spirit reservations other than the one being
    /// evaluated) contribute their modifiers as buffs.
    fn gather_effects(
        &self,
        character: &Character,
        tree: &PassiveTree,
        options: &CalcOptions,
        selected_id: Option<&str>,
    ) -> Vec<Effect> {
        let constants = options.constants.as_ref().unwrap_or(&self.constants);
        let base = BaseStatsSource::new(character.level, constants.character.clone());
        let passives = PassiveTreeSource::new(&character.passives, tree);
        let gear: Vec<GearSource<'_>> = character.items.iter().map(GearSource::new).collect();

        let mut buffs: Vec<BuffSource> = options
            .buffs
            .iter()
            .map(|buff| BuffSource::new(&buff.name, buff.modifiers.clone()).with_stacks(buff.stacks))
            .collect();
        buffs.extend(character.skills.iter().filter_map(|setup| {
            let definition = self.skills.skill(&setup.name)?;
            let persistent = definition.spirit_cost > 0.0
                && definition.minion.is_none()
                && selected_id != Some(definition.id.as_str());
            persistent.then(|| BuffSource::new(&definition.name, definition.modifiers.clone()))
        }));

        let mut sources: Vec<&dyn StatSource> = vec![&base, &passives];
        sources.extend(gear.iter().map(|source| source as &dyn StatSource));
        sources.extend(buffs.iter().map(|source| source as &dyn StatSource));
        collect_effects(&sources)
    }

    fn ailment_dps(
        &self,
        effects: &[Effect],
        skill: &SkillProfile,
        outcome: &DamageOutcome,
        options: &CalcOptions,
    ) -> Vec<AilmentDps> {
        let modifiers = AilmentModifiers::fold(effects.iter().chain(&skill.effects), &skill.tags);
        let input = AilmentInput {
            hit: &outcome.average_hit_by_type,
            uses_per_second: outcome.uses_per_second,
            hit_chance: outcome.hit_chance,
        };
        self.ailments
            .iter()
            .filter(|config| options.ailments.is_enabled(config.ailment))
            .map(|config| calculate_ailment_dps(config, &modifiers, input))
            .collect()
    }

    /// DPS of the configured minion skill, if the character has one
    fn minion_dps(
        &self,
        character: &Character,
        effects: &[Effect],
        stats: &AggregatedStats,
        options: &CalcOptions,
        constants: &GameConstants,
    ) -> Option<MinionDps> {
        if !options.minion.enabled {
            return None;
        }
        let setup = match options.minion.skill.as_deref() {
            Some(name) => select_skill(character, Some(name)),
            None => character
                .skills
                .iter()
                .find(|s| self.skills.skill(&s.name).is_some_and(|d| d.minion.is_some()))
                .cloned(),
        }?;

        let skill = SkillProfile::resolve(Some(&setup), &self.skills, stats);
        let Some(base) = skill.minion.as_ref() else {
            debug!(skill = %setup.name, "minion skill has no minion data");
            return None;
        };
        let modifiers = MinionModifiers::fold(effects.iter().chain(&skill.effects));
        let profile = MinionProfile::from_base(base, skill.level, &options.minion);
        Some(calculate_minion_dps(&profile, &modifiers, constants))
    }
}

/// Reject inputs that violate the calculation contract
fn validate(character: &Character, options: &CalcOptions, constants: &GameConstants) -> Result<(), CalcError> {
    if !(1..=MAX_LEVEL).contains(&character.level) {
        return Err(CalcError::InvalidLevel(character.level));
    }
    if let Some(evasion) = options.enemy_evasion {
        ensure_finite("enemy_evasion", evasion)?;
        if evasion < 0.0 {
            return Err(CalcError::NegativeEvasion(evasion));
        }
    }
    if let Some(accuracy) = options.accuracy_override {
        ensure_finite("accuracy_override", accuracy)?;
        if accuracy < 0.0 {
            return Err(CalcError::NegativeAccuracy(accuracy));
        }
    }

    let res = &constants.resistances;
    if !(res.default_cap <= res.hard_cap && res.hard_cap < 100.0) {
        return Err(CalcError::InvalidResistanceCap(format!(
            "default cap {} and hard cap {} must satisfy default <= hard < 100",
            res.default_cap, res.hard_cap
        )));
    }
    let reference_hit = ensure_finite("armour.reference_hit", constants.armour.reference_hit)?;
    if reference_hit <= 0.0 {
        return Err(CalcError::InvalidReferenceHit(reference_hit));
    }
    let bonus = ensure_finite("combo.bonus_per_stack", constants.combo.bonus_per_stack)?;
    if bonus < 0.0 {
        return Err(CalcError::InvalidCombo(format!(
            "bonus per stack must be non-negative, got {bonus}"
        )));
    }
    constants.validate().map_err(CalcError::InvalidConstants)
}

/// Calculate with the embedded reference data
pub fn calculate(
    character: &Character,
    tree: &PassiveTree,
    options: &CalcOptions,
) -> Result<CalculationResult, CalcError> {
    Engine::with_defaults().calculate(character, tree, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Item, SkillSetup};
    use crate::types::{EquipmentSlot, SkillTag};

    fn warrior() -> Character {
        Character::new("Tester", "Warrior", 20)
            .with_item(
                Item::new(EquipmentSlot::MainHand, "Club")
                    .with_class("One Hand Maces")
                    .with_property("Physical Damage", "10-20")
                    .with_property("Attacks per Second", "1.5")
                    .with_property("Critical Hit Chance", "5%"),
            )
            .with_skill(SkillSetup::new("Boneshatter").with_support("Brutality"))
    }

    #[test]
    fn test_calculation_runs() {
        let engine = Engine::with_defaults();
        let result = engine
            .calculate(&warrior(), &PassiveTree::new(), &CalcOptions::default())
            .unwrap();
        assert_eq!(result.skill, "Boneshatter");
        assert!(result.total_dps > 0.0);
        assert!(result.is_finite());
        assert!(result.details.skill.has_tag(SkillTag::Attack));
        // boneshatter carries a bleed chance
        assert!(result.ailments.iter().any(|a| a.dps > 0.0));
    }

    #[test]
    fn test_repeatable() {
        let engine = Engine::with_defaults();
        let options = CalcOptions::default().with_enemy_evasion(500.0);
        let first = engine.calculate(&warrior(), &PassiveTree::new(), &options).unwrap();
        let second = engine.calculate(&warrior(), &PassiveTree::new(), &options).unwrap();
        assert_eq!(first.total_dps.to_bits(), second.total_dps.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_validation() {
        let engine = Engine::with_defaults();
        let tree = PassiveTree::new();
        let mut character = warrior();
        character.level = 0;
        assert_eq!(
            engine.calculate(&character, &tree, &CalcOptions::default()),
            Err(CalcError::InvalidLevel(0))
        );

        let options = CalcOptions::default().with_accuracy(-1.0);
        assert_eq!(
            engine.calculate(&warrior(), &tree, &options),
            Err(CalcError::NegativeAccuracy(-1.0))
        );

        let mut constants = GameConstants::default();
        constants.armour.reference_hit = 0.0;
        let options = CalcOptions {
            constants: Some(constants),
            ..Default::default()
        };
        assert_eq!(
            engine.calculate(&warrior(), &tree, &options),
            Err(CalcError::InvalidReferenceHit(0.0))
        );
    }

    fn with_constants(mutate: impl FnOnce(&mut GameConstants)) -> CalcOptions {
        let mut constants = GameConstants::default();
        mutate(&mut constants);
        CalcOptions {
            constants: Some(constants),
            ..Default::default()
        }
    }

    #[test]
    fn test_bad_constants_rejected() {
        let engine = Engine::with_defaults();
        let tree = PassiveTree::new();

        let options = with_constants(|c| {
            c.crit.min_chance = 50.0;
            c.crit.max_chance = 10.0;
        });
        assert_eq!(
            engine.calculate(&warrior(), &tree, &options),
            Err(CalcError::InvalidConstants(
                "crit.min_chance exceeds crit.max_chance".to_string()
            ))
        );

        let options = with_constants(|c| {
            c.hit.min_chance = 80.0;
            c.hit.max_chance = 20.0;
        })
        .with_enemy_evasion(500.0);
        assert!(matches!(
            engine.calculate(&warrior(), &tree, &options),
            Err(CalcError::InvalidConstants(_))
        ));

        let options = with_constants(|c| c.hit.evasion_exponent = f64::NAN).with_enemy_evasion(500.0);
        assert_eq!(
            engine.calculate(&warrior(), &tree, &options),
            Err(CalcError::InvalidConstants(
                "hit.evasion_exponent must be a finite number".to_string()
            ))
        );

        let options = with_constants(|c| c.crit.min_chance = -5.0);
        assert!(matches!(
            engine.calculate(&warrior(), &tree, &options),
            Err(CalcError::InvalidConstants(_))
        ));
    }

    #[test]
    fn test_engine_constants_checked() {
        let mut constants = GameConstants::default();
        constants.hit.max_chance = 150.0;
        let engine = Engine::new(default_skills(), AilmentRegistry::with_defaults(), constants);
        let result = engine.calculate(&warrior(), &PassiveTree::new(), &CalcOptions::default());
        assert!(matches!(result, Err(CalcError::InvalidConstants(_))));
    }

    #[test]
    fn test_persistent_skill_buffs_apply() {
        let engine = Engine::with_defaults();
        let tree = PassiveTree::new();
        let without = engine.calculate(&warrior(), &tree, &CalcOptions::default()).unwrap();
        let with_herald = engine
            .calculate(
                &warrior().with_skill(SkillSetup::new("Herald of Ice")),
                &tree,
                &CalcOptions::default(),
            )
            .unwrap();
        assert_eq!(without.dps_by_type.cold, 0.0);
        assert!(with_herald.dps_by_type.cold > 0.0);
    }

    #[test]
    fn test_options_constants_override() {
        let engine = Engine::with_defaults();
        let tree = PassiveTree::new();
        let mut constants = GameConstants::default();
        constants.crit.base_bonus = 150.0;
        let options = CalcOptions {
            constants: Some(constants),
            ..Default::default()
        };
        let result = engine.calculate(&warrior(), &tree, &options).unwrap();
        assert!((result.crit_multiplier - 250.0).abs() < 1e-9);
    }
}
