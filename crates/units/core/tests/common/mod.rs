//! Shared fixtures for integration tests: a small rule database modelled on
//! a fantasy strategy game, plus helpers to build environments around it.
#![allow(dead_code)]

use units_core::{
    AttackContext, CategoryDefinition, DamageTypeDefinition, DefinitionIndex, DefinitionSet,
    EngineConfig, Env, ExpandError, ExpandedUnit, ExperienceLevelDefinition, MagicRealmDefinition,
    ModifierRule, NegatedBy, PickDefinition, PlayerId, PlayerRecord, RangedAttackTypeDefinition,
    RosterSnapshot, SkillDefinition, SkillId, UnitCategory, UnitDefinition, UnitInstance,
    UpkeepModifier, WeaponGrade, WeaponGradeDefinition, WorldSnapshot, ZoneAffects,
    ZoneEffectDefinition, expand,
};

pub const OWNER: PlayerId = PlayerId(1);
pub const RIVAL: PlayerId = PlayerId(2);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn skill(id: &str) -> SkillId {
    SkillId::from(id)
}

fn plain<'a>(ids: &'a [&'a str]) -> impl Iterator<Item = SkillDefinition> + 'a {
    ids.iter().map(|id| SkillDefinition::new(*id))
}

pub fn definition_set() -> DefinitionSet {
    let mut set = DefinitionSet::new();
    set.skills.extend(plain(&[
        "Experience",
        "HitPoints",
        "Melee",
        "Defence",
        "Resistance",
        "RangedAttack",
        "Ammo",
        "Movement",
        "PlusToHit",
        "PlusToBlock",
        "CasterUnit",
        "CasterHero",
        "Walking",
        "PoisonImmunity",
        "StoningImmunity",
        "TrueSight",
    ]));

    set.skills.extend([
        // +2 Defence against ranged attacks only
        SkillDefinition::new("LargeShield").with_rule(
            ModifierRule::fixed("Defence", 2).when_attacked_with("RangedAttack"),
        ),
        SkillDefinition::new("HolyArmour").with_rule(ModifierRule::fixed("Defence", 1)),
        SkillDefinition::new("Warped").with_rule(ModifierRule::lock("Defence", 1)),
        SkillDefinition::new("Shrunk").with_rule(ModifierRule::divide("Melee", 2)),
        SkillDefinition::new("Enlarged").with_rule(ModifierRule::multiply("Melee", 2)),
        SkillDefinition::new("Blessing")
            .with_rule(ModifierRule::fixed("Defence", 3).combat_only()),
        SkillDefinition::new("Accuracy").with_rule(ModifierRule::fixed("PlusToHit", 1)),
        SkillDefinition::new("Constitution")
            .with_rule(ModifierRule::divisor("HitPoints", Some(2))),
        SkillDefinition::new("Leadership")
            .with_rule(ModifierRule::divisor("Melee", Some(2)).stack_wide())
            .negated_by("TrueSight", NegatedBy::EnemyUnit),
        SkillDefinition::new("Prayer").with_rule(ModifierRule::fixed("Defence", 1).stack_wide()),
        SkillDefinition::new("Crusader").granting("Prayer"),
        SkillDefinition::new("Terror")
            .with_rule(ModifierRule::fixed("Resistance", -1).against_enemies()),
        SkillDefinition::new("Invisibility").negated_by("TrueSight", NegatedBy::EnemyUnit),
        SkillDefinition::new("Undead")
            .overriding_realm("Death")
            .granting("PoisonImmunity"),
        SkillDefinition::new("Possessed").transferring_control(),
        SkillDefinition::new("Heroism").with_rule(ModifierRule::lock("Experience", 120)),
        SkillDefinition::new("Summoned")
            .with_upkeep_modifier(UpkeepModifier::new(25).for_production("Mana")),
    ]);

    set.units.extend([
        UnitDefinition::new("Spearmen", UnitCategory::Normal, "Normal")
            .with_figures(8)
            .with_skill("Experience", Some(0))
            .with_skill("HitPoints", Some(1))
            .with_skill("Melee", Some(1))
            .with_skill("Defence", Some(2))
            .with_skill("Resistance", Some(4))
            .with_skill("Movement", Some(2))
            .with_skill("Walking", None)
            .with_upkeep("Gold", 2),
        UnitDefinition::new("Trireme", UnitCategory::Normal, "Normal")
            .with_transport_capacity(2)
            .with_skill("HitPoints", Some(10))
            .with_skill("Defence", Some(2))
            .with_skill("Movement", Some(2)),
        UnitDefinition::new("Bowmen", UnitCategory::Normal, "Normal")
            .with_figures(6)
            .with_ranged_attack_type("Arrow")
            .with_skill("Experience", Some(0))
            .with_skill("HitPoints", Some(1))
            .with_skill("Melee", Some(1))
            .with_skill("Defence", Some(1))
            .with_skill("RangedAttack", Some(1))
            .with_skill("Ammo", Some(8)),
        UnitDefinition::new("Magicians", UnitCategory::Normal, "Normal")
            .with_figures(4)
            .with_ranged_attack_type("Fireball")
            .with_skill("Experience", Some(0))
            .with_skill("HitPoints", Some(1))
            .with_skill("RangedAttack", Some(5))
            .with_skill("Defence", Some(3)),
        UnitDefinition::new("Swordsman", UnitCategory::Hero, "Normal")
            .with_skill("Experience", Some(0))
            .with_skill("HitPoints", Some(10))
            .with_skill("Melee", Some(5))
            .with_skill("Defence", Some(4))
            .with_skill("Constitution", Some(1)),
        UnitDefinition::new("Captain", UnitCategory::Hero, "Normal")
            .with_skill("Experience", Some(0))
            .with_skill("HitPoints", Some(8))
            .with_skill("Melee", Some(3))
            .with_skill("Leadership", Some(1)),
        UnitDefinition::new("Sorceress", UnitCategory::Hero, "Normal")
            .with_skill("Experience", Some(0))
            .with_skill("HitPoints", Some(6))
            .with_skill("CasterHero", Some(2)),
        UnitDefinition::new("Ghouls", UnitCategory::Summoned, "Death")
            .with_figures(4)
            .with_skill("HitPoints", Some(3))
            .with_skill("Melee", Some(4))
            .with_skill("Summoned", None)
            .with_upkeep("Mana", 4),
    ]);

    set.categories.extend([
        CategoryDefinition::new(UnitCategory::Normal)
            .with_level(ExperienceLevelDefinition::new(0, 0))
            .with_level(
                ExperienceLevelDefinition::new(1, 20).with_bonus(ModifierRule::fixed("Melee", 1)),
            )
            .with_level(
                ExperienceLevelDefinition::new(2, 60)
                    .with_bonus(ModifierRule::fixed("Melee", 1))
                    .with_bonus(ModifierRule::fixed("Resistance", 1)),
            )
            .with_level(ExperienceLevelDefinition::new(3, 120)),
        CategoryDefinition::new(UnitCategory::Hero)
            .with_level(ExperienceLevelDefinition::new(0, 0))
            .with_level(ExperienceLevelDefinition::new(1, 20))
            .with_level(ExperienceLevelDefinition::new(2, 60))
            .with_level(ExperienceLevelDefinition::new(3, 120)),
        CategoryDefinition::new(UnitCategory::Summoned),
    ]);

    set.weapon_grades.extend([
        WeaponGradeDefinition::new(WeaponGrade(0)),
        WeaponGradeDefinition::new(WeaponGrade(1))
            .with_bonus(ModifierRule::fixed("Melee", 1))
            .with_bonus(ModifierRule::fixed("Defence", 2))
            .with_bonus(ModifierRule::fixed("RangedAttack", 1)),
    ]);

    set.ranged_attack_types.extend([
        RangedAttackTypeDefinition {
            id: "Arrow".into(),
            magic_realm: None,
            weapon_grade_applies: true,
        },
        RangedAttackTypeDefinition {
            id: "Fireball".into(),
            magic_realm: Some("Chaos".into()),
            weapon_grade_applies: false,
        },
    ]);

    set.magic_realms.extend([
        MagicRealmDefinition::new("Normal"),
        MagicRealmDefinition::new("Chaos"),
        MagicRealmDefinition {
            living: false,
            ..MagicRealmDefinition::new("Death")
        },
    ]);

    set.zone_effects.extend([
        ZoneEffectDefinition::new("Crusade")
            .affecting(ZoneAffects::CastersUnits)
            .with_extra_levels(1),
        ZoneEffectDefinition::new("TrueLight")
            .in_combat_only()
            .granting("Melee", Some(1))
            .granting("TrueSight", None),
    ]);

    set.picks.extend([
        PickDefinition::new("Warlord").with_extra_levels(1),
        PickDefinition::new("Conjurer")
            .with_upkeep_modifier(UpkeepModifier::new(25).for_category(UnitCategory::Summoned)),
    ]);

    set.damage_types.extend([
        DamageTypeDefinition::new("Poison").with_immunity("PoisonImmunity", None),
        DamageTypeDefinition::new("Stoning").with_immunity("StoningImmunity", Some(1)),
    ]);

    set
}

pub fn definitions() -> DefinitionIndex {
    DefinitionIndex::build(definition_set()).expect("fixture definitions are valid")
}

pub fn roster() -> RosterSnapshot {
    RosterSnapshot::new()
        .with_player(PlayerRecord::new(OWNER))
        .with_player(PlayerRecord::new(RIVAL).with_pick("Warlord", 1).with_pick("Conjurer", 1))
}

/// Definitions, world, roster and config for one test.
pub struct Fixture {
    pub definitions: DefinitionIndex,
    pub world: WorldSnapshot,
    pub roster: RosterSnapshot,
    pub config: EngineConfig,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        Self {
            definitions: definitions(),
            world: WorldSnapshot::new(),
            roster: roster(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_world(mut self, world: WorldSnapshot) -> Self {
        self.world = world;
        self
    }

    pub fn env(&self) -> Env<'_> {
        Env::new(&self.definitions, &self.world, &self.roster, &self.config)
    }

    /// A hypothetical unit of a defined type, owned by [`OWNER`].
    pub fn spawn(&self, unit_type: &str) -> UnitInstance {
        use units_core::DefinitionOracle;
        self.definitions
            .unit(&unit_type.into())
            .expect("unit type is defined")
            .spawn(OWNER)
    }

    pub fn try_expand(
        &self,
        unit: &UnitInstance,
        enemies: &[UnitInstance],
        attack: &AttackContext,
    ) -> Result<ExpandedUnit, ExpandError> {
        expand(unit, enemies, attack, self.env())
    }

    pub fn expand(&self, unit: &UnitInstance) -> ExpandedUnit {
        self.try_expand(unit, &[], &AttackContext::none())
            .expect("expansion succeeds")
    }
}
