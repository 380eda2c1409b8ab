use std::fmt;

/// Declares a string-backed identifier for a static definition.
macro_rules! definition_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

definition_id! {
    /// Identifier of a skill (a trait a unit may possess).
    SkillId
}

definition_id! {
    /// Identifier of a unit definition (the unit "type").
    UnitTypeId
}

definition_id! {
    /// Identifier of a magic realm / lifeform classification.
    MagicRealmId
}

definition_id! {
    /// Identifier of a ranged attack type (bows, rocks, magic bolts...).
    RangedAttackTypeId
}

definition_id! {
    /// Identifier of a zone effect definition.
    ZoneEffectId
}

definition_id! {
    /// Identifier of a spell.
    SpellId
}

definition_id! {
    /// Identifier of a player pick (retorts and spell books).
    PickId
}

definition_id! {
    /// Identifier of a production type (gold, food, mana...).
    ProductionTypeId
}

definition_id! {
    /// Identifier of a damage type.
    DamageTypeId
}

/// Unique identifier of a unit that exists in world knowledge.
///
/// Hypothetical units (e.g. a unit previewed in a build queue) have no id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a player in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Equipment quality tier. Grade 0 is the basic tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct WeaponGrade(pub u8);

impl fmt::Display for WeaponGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grade {}", self.0)
    }
}

/// Overland map cell expressed in tile coordinates on a plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapLocation {
    pub x: i32,
    pub y: i32,
    pub plane: u8,
}

impl MapLocation {
    pub const fn new(x: i32, y: i32, plane: u8) -> Self {
        Self { x, y, plane }
    }
}

impl fmt::Display for MapLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.plane)
    }
}
