//! Static ability and status-effect catalog.
//!
//! Every ability and status effect is a closed enum variant with one
//! definition record, so there is no way to reference an ability that has
//! no cost, cooldown, or effect entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named, timed modifier attached to a combatant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum StatusEffect {
    /// Raises effective defense while active.
    Defensive,
    /// Raises effective attack while active.
    Berserker,
    /// Raises effective attack while active (consumable buff).
    AttackBuffed,
    /// Inflicts a fixed amount of damage each tick, ignoring defense.
    Poisoned,
    /// Restores a fixed amount of HP each tick.
    Regenerating,
}

impl StatusEffect {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEffect::Defensive => "defensive",
            StatusEffect::Berserker => "berserker",
            StatusEffect::AttackBuffed => "attack_buffed",
            StatusEffect::Poisoned => "poisoned",
            StatusEffect::Regenerating => "regenerating",
        }
    }

    pub fn from_name(name: &str) -> Option<StatusEffect> {
        match name.to_lowercase().as_str() {
            "defensive" => Some(StatusEffect::Defensive),
            "berserker" => Some(StatusEffect::Berserker),
            "attack_buffed" => Some(StatusEffect::AttackBuffed),
            "poisoned" => Some(StatusEffect::Poisoned),
            "regenerating" => Some(StatusEffect::Regenerating),
            _ => None,
        }
    }

    /// Fixed damage inflicted on the holder each tick, if any.
    pub fn tick_damage(&self) -> Option<i32> {
        match self {
            StatusEffect::Poisoned => Some(3),
            _ => None,
        }
    }

    /// Fixed HP restored to the holder each tick, if any.
    pub fn tick_heal(&self) -> Option<i32> {
        match self {
            StatusEffect::Regenerating => Some(5),
            _ => None,
        }
    }

    /// Multiplier applied to the holder's attack while active.
    pub fn attack_multiplier(&self) -> Option<f32> {
        match self {
            StatusEffect::Berserker => Some(1.5),
            StatusEffect::AttackBuffed => Some(1.25),
            _ => None,
        }
    }

    /// Multiplier applied to the holder's defense while active.
    pub fn defense_multiplier(&self) -> Option<f32> {
        match self {
            StatusEffect::Defensive => Some(1.5),
            _ => None,
        }
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named special action with a focus cost, an optional cooldown, and an
/// effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Ability {
    PowerStrike,
    DefensiveStance,
    AetherBlast,
    Heal,
    QuickStrike,
    EnergyDischarge,
    RepairSelf,
    BerserkerRage,
    SteamBlast,
}

/// What an ability does when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Deal `int(attack * multiplier)` damage through the standard formula.
    Strike { multiplier: f32 },
    /// Restore HP to the user, clamped at maximum.
    Restore { amount: i32 },
    /// Apply or refresh a status effect on the user.
    Stance { effect: StatusEffect, duration: u32 },
    /// Apply a status effect on the user and strike in the same action.
    RagingBlow {
        effect: StatusEffect,
        duration: u32,
        multiplier: f32,
    },
}

/// The static definition record for one ability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub focus_cost: i32,
    /// Turns before the ability is usable again (adversaries only; the
    /// protagonist has no cooldowns). Zero means no cooldown.
    pub cooldown: u32,
    pub effect: AbilityEffect,
}

impl Ability {
    pub fn def(&self) -> AbilityDef {
        match self {
            Ability::PowerStrike => AbilityDef {
                focus_cost: 2,
                cooldown: 2,
                effect: AbilityEffect::Strike { multiplier: 1.5 },
            },
            Ability::DefensiveStance => AbilityDef {
                focus_cost: 1,
                cooldown: 3,
                effect: AbilityEffect::Stance {
                    effect: StatusEffect::Defensive,
                    duration: 2,
                },
            },
            Ability::AetherBlast => AbilityDef {
                focus_cost: 3,
                cooldown: 0,
                effect: AbilityEffect::Strike { multiplier: 1.3 },
            },
            Ability::Heal => AbilityDef {
                focus_cost: 2,
                cooldown: 0,
                effect: AbilityEffect::Restore { amount: 25 },
            },
            Ability::QuickStrike => AbilityDef {
                focus_cost: 1,
                cooldown: 1,
                effect: AbilityEffect::Strike { multiplier: 0.8 },
            },
            Ability::EnergyDischarge => AbilityDef {
                focus_cost: 3,
                cooldown: 4,
                effect: AbilityEffect::Strike { multiplier: 1.2 },
            },
            Ability::RepairSelf => AbilityDef {
                focus_cost: 2,
                cooldown: 3,
                effect: AbilityEffect::Restore { amount: 15 },
            },
            Ability::BerserkerRage => AbilityDef {
                focus_cost: 3,
                cooldown: 5,
                effect: AbilityEffect::RagingBlow {
                    effect: StatusEffect::Berserker,
                    duration: 3,
                    multiplier: 2.0,
                },
            },
            // Gated by the pressure-driven variant counter, never by
            // focus or cooldown.
            Ability::SteamBlast => AbilityDef {
                focus_cost: 0,
                cooldown: 0,
                effect: AbilityEffect::Strike { multiplier: 2.0 },
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::PowerStrike => "power_strike",
            Ability::DefensiveStance => "defensive_stance",
            Ability::AetherBlast => "aether_blast",
            Ability::Heal => "heal",
            Ability::QuickStrike => "quick_strike",
            Ability::EnergyDischarge => "energy_discharge",
            Ability::RepairSelf => "repair_self",
            Ability::BerserkerRage => "berserker_rage",
            Ability::SteamBlast => "steam_blast",
        }
    }

    /// Short phrase used when composing log lines.
    pub fn flavor(&self) -> &'static str {
        match self {
            Ability::PowerStrike => "unleashes a devastating power strike",
            Ability::DefensiveStance => "takes a defensive stance",
            Ability::AetherBlast => "releases a blast of aether energy",
            Ability::Heal => "channels restorative energy",
            Ability::QuickStrike => "strikes with lightning speed",
            Ability::EnergyDischarge => "releases a burst of energy",
            Ability::RepairSelf => "performs emergency repairs",
            Ability::BerserkerRage => "enters a berserker rage",
            Ability::SteamBlast => "vents a scalding blast of steam",
        }
    }

    pub fn from_name(name: &str) -> Option<Ability> {
        match name.to_lowercase().as_str() {
            "power_strike" => Some(Ability::PowerStrike),
            "defensive_stance" => Some(Ability::DefensiveStance),
            "aether_blast" => Some(Ability::AetherBlast),
            "heal" => Some(Ability::Heal),
            "quick_strike" => Some(Ability::QuickStrike),
            "energy_discharge" => Some(Ability::EnergyDischarge),
            "repair_self" => Some(Ability::RepairSelf),
            "berserker_rage" => Some(Ability::BerserkerRage),
            "steam_blast" => Some(Ability::SteamBlast),
            _ => None,
        }
    }

    pub fn all() -> &'static [Ability] {
        &[
            Ability::PowerStrike,
            Ability::DefensiveStance,
            Ability::AetherBlast,
            Ability::Heal,
            Ability::QuickStrike,
            Ability::EnergyDischarge,
            Ability::RepairSelf,
            Ability::BerserkerRage,
            Ability::SteamBlast,
        ]
    }
}

impl FromStr for Ability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ability::from_name(s).ok_or(())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The fixed set of abilities the protagonist can invoke.
pub fn protagonist_abilities() -> &'static [Ability] {
    &[
        Ability::PowerStrike,
        Ability::DefensiveStance,
        Ability::AetherBlast,
        Ability::Heal,
    ]
}
