//! Stat composition
//!
//! A run's combat attributes are always rebuilt from the base character and
//! the unlocked ability ids; nothing here is mutated incrementally.
//!
//! Composition rules:
//! - speed/jump/damage multipliers multiply together
//! - damage reduction, damage reflection and max jumps are last-write in
//!   catalog order
//! - capability flags union

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, CharacterProfile};
use crate::consts::BASE_MAX_JUMPS;

/// Alternate combat behaviors granted by abilities.
///
/// Declaration order is the order the special-power dispatcher fires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    GroundSlam,
    QuantumPhase,
    EnergyWave,
    LightTrail,
    VoltSurge,
    ChainLightning,
    PhoenixFire,
    /// Attack-only: extra beam projectile
    PlasmaBeam,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::GroundSlam,
        Capability::QuantumPhase,
        Capability::EnergyWave,
        Capability::LightTrail,
        Capability::VoltSurge,
        Capability::ChainLightning,
        Capability::PhoenixFire,
        Capability::PlasmaBeam,
    ];

    #[inline]
    fn bit(self) -> u16 {
        1 << self as u16
    }

    /// Whether the flag changes what the special power does
    pub fn is_special(self) -> bool {
        self != Capability::PlasmaBeam
    }
}

/// Bitset of capabilities; serialized as a list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    pub fn contains(&self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    pub fn union(self, other: CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::EMPTY;
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

impl From<Vec<Capability>> for CapabilitySet {
    fn from(caps: Vec<Capability>) -> Self {
        caps.into_iter().collect()
    }
}

impl From<CapabilitySet> for Vec<Capability> {
    fn from(set: CapabilitySet) -> Self {
        set.iter().collect()
    }
}

/// What one ability does to the stat profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierEffect {
    pub speed_mult: f32,
    pub jump_mult: f32,
    pub damage_mult: f32,
    pub damage_reduction: Option<f32>,
    pub damage_reflection: Option<f32>,
    pub max_jumps: Option<u8>,
    pub capabilities: CapabilitySet,
}

impl Default for ModifierEffect {
    fn default() -> Self {
        Self {
            speed_mult: 1.0,
            jump_mult: 1.0,
            damage_mult: 1.0,
            damage_reduction: None,
            damage_reflection: None,
            max_jumps: None,
            capabilities: CapabilitySet::EMPTY,
        }
    }
}

impl ModifierEffect {
    pub fn with_capability(mut self, cap: Capability) -> Self {
        self.capabilities.insert(cap);
        self
    }
}

/// One entry of the ability table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityModifier {
    pub id: String,
    pub target_character: String,
    /// XP price (0 = starter ability)
    pub cost: u32,
    pub effect: ModifierEffect,
}

/// Unlocked ability ids (iteration order never matters)
pub type UnlockedSet = BTreeSet<String>;

/// Derived per-run combat attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatProfile {
    pub speed: f32,
    pub jump_power: f32,
    pub damage: f32,
    /// Fraction of incoming damage ignored, in [0, 1]
    pub damage_reduction: f32,
    /// Fraction of incoming damage returned to a hostile, in [0, 1]
    pub damage_reflection: f32,
    pub max_jumps: u8,
    pub capabilities: CapabilitySet,
}

impl StatProfile {
    /// Unmodified base stats
    pub fn base(character: &CharacterProfile) -> Self {
        Self {
            speed: character.speed,
            jump_power: character.jump_power,
            damage: character.damage,
            damage_reduction: 0.0,
            damage_reflection: 0.0,
            max_jumps: BASE_MAX_JUMPS,
            capabilities: CapabilitySet::EMPTY,
        }
    }

    fn apply(&mut self, effect: &ModifierEffect) {
        self.speed *= effect.speed_mult;
        self.jump_power *= effect.jump_mult;
        self.damage *= effect.damage_mult;
        if let Some(r) = effect.damage_reduction {
            self.damage_reduction = r.clamp(0.0, 1.0);
        }
        if let Some(r) = effect.damage_reflection {
            self.damage_reflection = r.clamp(0.0, 1.0);
        }
        if let Some(j) = effect.max_jumps {
            self.max_jumps = j;
        }
        self.capabilities = self.capabilities.union(effect.capabilities);
    }
}

/// Build the stat profile for `character` with the given unlocked abilities.
///
/// Abilities are applied in catalog order; only those targeting the active
/// character take effect. Unknown ids are ignored.
pub fn compose(character: &CharacterProfile, unlocked: &UnlockedSet, catalog: &Catalog) -> StatProfile {
    let mut profile = StatProfile::base(character);
    for ability in catalog
        .abilities
        .iter()
        .filter(|a| a.target_character == character.id && unlocked.contains(&a.id))
    {
        profile.apply(&ability.effect);
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(ids: &[&str]) -> UnlockedSet {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_set_is_base() {
        let catalog = Catalog::builtin();
        for c in &catalog.characters {
            assert_eq!(compose(c, &UnlockedSet::new(), &catalog), StatProfile::base(c));
        }
    }

    #[test]
    fn test_damage_doubles() {
        let catalog = Catalog::builtin();
        let mut shadow = catalog.character("shadow-blade").unwrap().clone();
        shadow.damage = 10.0;
        let profile = compose(&shadow, &set(&["blade-fury"]), &catalog);
        assert_eq!(profile.damage, 20.0);
    }

    #[test]
    fn test_modifiers_only_hit_their_character() {
        let catalog = Catalog::builtin();
        let nova = catalog.character("nova-prime").unwrap();
        let profile = compose(nova, &set(&["blade-fury", "titan-shield"]), &catalog);
        assert_eq!(profile, StatProfile::base(nova));
    }

    #[test]
    fn test_last_write_reduction() {
        let mut catalog = Catalog::builtin();
        // Give titan both reductions; steel-armor comes later in the table
        for a in catalog.abilities.iter_mut() {
            if a.id == "steel-armor" {
                a.target_character = "titan-core".to_string();
            }
        }
        let titan = catalog.character("titan-core").unwrap().clone();
        let profile = compose(&titan, &set(&["steel-armor", "titan-shield"]), &catalog);
        assert_eq!(profile.damage_reduction, 0.6);
    }

    #[test]
    fn test_flags_and_multipliers_combine() {
        let catalog = Catalog::builtin();
        let volt = catalog.character("volt-reaper").unwrap();
        let profile = compose(volt, &set(&["basic-volt", "volt-surge", "chain-lightning"]), &catalog);
        assert!((profile.damage - 14.0 * 1.5).abs() < 1e-5);
        assert!(profile.capabilities.contains(Capability::VoltSurge));
        assert!(profile.capabilities.contains(Capability::ChainLightning));
        assert_eq!(profile.capabilities.len(), 2);

        let phoenix = catalog.character("cyber-phoenix").unwrap();
        assert_eq!(compose(phoenix, &set(&["air-dash"]), &catalog).max_jumps, 4);
    }

    #[test]
    fn test_capability_set_iterates_in_dispatch_order() {
        let set: CapabilitySet = [Capability::PhoenixFire, Capability::GroundSlam, Capability::VoltSurge]
            .into_iter()
            .collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![Capability::GroundSlam, Capability::VoltSurge, Capability::PhoenixFire]
        );

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["ground-slam","volt-surge","phoenix-fire"]"#);
        let back: CapabilitySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    proptest! {
        #[test]
        // Unlock order never matters: UnlockedSet is ordered, and compose
        // walks the ability table rather than the set
        fn prop_compose_is_pure_and_bounded(
            char_idx in 0usize..10,
            picks in proptest::collection::vec(0usize..30, 0..12),
        ) {
            let catalog = Catalog::builtin();
            let character = &catalog.characters[char_idx];
            let unlocked: UnlockedSet = picks.iter().map(|i| catalog.abilities[*i].id.clone()).collect();

            let a = compose(character, &unlocked, &catalog);
            prop_assert_eq!(&a, &compose(character, &unlocked, &catalog));
            prop_assert!((0.0..=1.0).contains(&a.damage_reduction));
            prop_assert!((0.0..=1.0).contains(&a.damage_reflection));
            prop_assert!(a.damage >= character.damage);
        }
    }
}
