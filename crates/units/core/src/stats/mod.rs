//! Unit attribute resolution.
//!
//! ```text
//! [ Rule index (env) ]
//!      ↓
//! [ Baseline builder ]      identity, level, stack maxima
//!      ↓
//! [ Expansion pipeline ]    ordered stages, driving the modifier engine
//!      ↓
//! [ Result view ]           totals, filtered totals, combat metrics
//! ```
//!
//! ## Principles
//!
//! 1. **Additive breakdowns**: every contribution is a signed delta filed
//!    under one component; a total is always the sum of its components
//! 2. **Fixed stage order**: all bonuses land before any penalty
//! 3. **Fresh per call**: results depend on the attack context and are never
//!    cached
//! 4. **Deterministic**: ordered maps only, no randomness

pub mod baseline;
pub mod breakdown;
pub mod engine;
pub mod error;
pub mod expand;
pub mod rule;
pub mod view;

pub use baseline::{BaselineUnit, StackContext, StackSkills, zone_effect_applies};
pub use breakdown::{Breakdown, Component, ComponentFilter, SignFilter, SkillBreakdown};
pub use engine::{AttackContext, RuleContext, RuleOutcome, apply_bonus, apply_penalty};
pub use error::{ExpandError, ViewError};
pub use expand::expand;
pub use rule::{ModifierRule, RuleFlags, ValueKind};
pub use view::ExpandedUnit;
