//! Adversary templates, behavior variants, and the decision engine.
//!
//! Variant behavior (armor plating, evasion, pressure build-up) is a closed
//! set of tagged variants dispatched through `resolve_incoming_damage` and
//! `choose_action`, so the behavior table stays exhaustive.

use crate::catalog::{Ability, StatusEffect};
use crate::combatant::{Combatant, StatusTick};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Decision policy, fixed at adversary creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Always prefers the highest-damage ready ability.
    Aggressive,
    /// Heals when hurt, keeps a defensive stance up, otherwise attacks.
    Defensive,
    /// Adapts to the protagonist's HP and focus.
    Tactical,
    /// Always prefers a fast low-cost strike.
    HitAndRun,
    /// 30% chance of a uniformly-chosen ready ability, else attack.
    Basic,
}

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Aggressive => "aggressive",
            Policy::Defensive => "defensive",
            Policy::Tactical => "tactical",
            Policy::HitAndRun => "hit_and_run",
            Policy::Basic => "basic",
        }
    }
}

/// Variant-specific behavior parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    Standard,
    /// Extra defense applied at damage-resolution time.
    ArmorPlated { bonus_defense: i32 },
    /// Independent chance to take zero damage from any incoming hit.
    Evasive { dodge_chance: f64 },
    /// Builds pressure every decision; at the interval it vents a steam
    /// blast regardless of policy.
    PressureDriven { interval: u32 },
}

/// A static adversary description. Resolved and supplied by the caller;
/// pools and stats are copied fresh into every encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryTemplate {
    pub id: String,
    pub name: String,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub focus: i32,
    pub abilities: Vec<Ability>,
    pub policy: Policy,
    pub variant: Variant,
    pub description: String,
    /// Item names granted to the caller on defeat.
    pub loot: Vec<String>,
}

impl AdversaryTemplate {
    /// Check the template is well-formed enough to start an encounter.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("template has no name".to_string());
        }
        if self.max_hp <= 0 {
            return Err(format!("template {} has non-positive max HP", self.id));
        }
        if self.attack <= 0 {
            return Err(format!("template {} has non-positive attack", self.id));
        }
        if self.speed <= 0 {
            return Err(format!("template {} has non-positive speed", self.id));
        }
        if let Variant::Evasive { dodge_chance } = self.variant {
            if !(0.0..=1.0).contains(&dodge_chance) {
                return Err(format!(
                    "template {} has dodge chance outside [0, 1]",
                    self.id
                ));
            }
        }
        if let Variant::PressureDriven { interval } = self.variant {
            if interval == 0 {
                return Err(format!("template {} has a zero pressure interval", self.id));
            }
        }
        Ok(())
    }
}

/// What the adversary decided to do with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdversaryAction {
    Attack,
    UseAbility(Ability),
}

/// Result of routing damage through the adversary's variant behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Dodged,
    Hit { amount: i32 },
}

/// The protagonist state the decision engine is allowed to observe.
#[derive(Debug, Clone, Copy)]
pub struct ObservedProtagonist {
    pub hp: i32,
    pub defense: i32,
    pub focus: i32,
}

/// A live adversary within one encounter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adversary {
    pub combatant: Combatant,
    abilities: Vec<Ability>,
    /// Remaining turns until an ability is usable again. Entries reaching
    /// zero are removed; a missing entry means "ready".
    cooldowns: BTreeMap<Ability, u32>,
    policy: Policy,
    variant: Variant,
    pressure: u32,
    loot: Vec<String>,
}

impl Adversary {
    pub fn from_template(template: &AdversaryTemplate) -> Self {
        let pressure = match template.variant {
            // Primed at creation: the first decision vents immediately.
            Variant::PressureDriven { interval } => interval,
            _ => 0,
        };
        Self {
            combatant: Combatant::new(
                template.name.clone(),
                template.max_hp,
                template.focus,
                template.attack,
                template.defense,
                template.speed,
            ),
            abilities: template.abilities.clone(),
            cooldowns: BTreeMap::new(),
            policy: template.policy,
            variant: template.variant,
            pressure,
            loot: template.loot.clone(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn loot(&self) -> &[String] {
        &self.loot
    }

    pub fn cooldown_remaining(&self, ability: Ability) -> u32 {
        self.cooldowns.get(&ability).copied().unwrap_or(0)
    }

    /// Whether the ability would pass the resource and cooldown checks
    /// right now.
    pub fn can_use(&self, ability: Ability) -> bool {
        let known = self.abilities.contains(&ability)
            || (ability == Ability::SteamBlast
                && matches!(self.variant, Variant::PressureDriven { .. }));
        known
            && self.cooldown_remaining(ability) == 0
            && self.combatant.focus >= ability.def().focus_cost
    }

    /// Start-of-turn upkeep: decrement cooldowns, then tick this side's
    /// own status effects. Runs before the policy is consulted.
    pub fn begin_turn(&mut self) -> Vec<StatusTick> {
        let ready: Vec<Ability> = self
            .cooldowns
            .iter_mut()
            .filter_map(|(ability, remaining)| {
                *remaining -= 1;
                (*remaining == 0).then_some(*ability)
            })
            .collect();
        for ability in ready {
            self.cooldowns.remove(&ability);
        }
        self.combatant.tick_status_effects()
    }

    /// Pick an action for this turn. Total: always returns a valid action,
    /// and never an ability that fails the resource/cooldown checks.
    pub fn choose_action<R: Rng>(
        &mut self,
        observed: &ObservedProtagonist,
        rng: &mut R,
    ) -> AdversaryAction {
        if let Variant::PressureDriven { interval } = self.variant {
            self.pressure += 1;
            if self.pressure >= interval {
                self.pressure = 0;
                debug!(adversary = %self.combatant.name, "pressure released");
                return AdversaryAction::UseAbility(Ability::SteamBlast);
            }
        }

        let action = match self.policy {
            Policy::Aggressive => self.choose_aggressive(),
            Policy::Defensive => self.choose_defensive(),
            Policy::Tactical => self.choose_tactical(observed),
            Policy::HitAndRun => self.choose_hit_and_run(),
            Policy::Basic => self.choose_basic(rng),
        };
        debug!(
            adversary = %self.combatant.name,
            policy = self.policy.name(),
            ?action,
            "action chosen"
        );
        action
    }

    fn choose_aggressive(&self) -> AdversaryAction {
        if self.can_use(Ability::PowerStrike) {
            AdversaryAction::UseAbility(Ability::PowerStrike)
        } else if self.can_use(Ability::BerserkerRage) {
            AdversaryAction::UseAbility(Ability::BerserkerRage)
        } else {
            AdversaryAction::Attack
        }
    }

    fn choose_defensive(&self) -> AdversaryAction {
        if self.combatant.hp_ratio() < 0.3 && self.can_use(Ability::RepairSelf) {
            return AdversaryAction::UseAbility(Ability::RepairSelf);
        }
        if !self.combatant.has_status(StatusEffect::Defensive)
            && self.can_use(Ability::DefensiveStance)
        {
            return AdversaryAction::UseAbility(Ability::DefensiveStance);
        }
        AdversaryAction::Attack
    }

    fn choose_tactical(&self, observed: &ObservedProtagonist) -> AdversaryAction {
        // Finish a wounded protagonist.
        if observed.hp < 30 && self.can_use(Ability::PowerStrike) {
            return AdversaryAction::UseAbility(Ability::PowerStrike);
        }
        // Mirror a protagonist holding enough focus for a big ability.
        if observed.focus >= 3 && self.can_use(Ability::DefensiveStance) {
            return AdversaryAction::UseAbility(Ability::DefensiveStance);
        }
        // Self-preservation: heal, or go all-out.
        if self.combatant.hp_ratio() < 0.4 {
            if self.can_use(Ability::RepairSelf) {
                return AdversaryAction::UseAbility(Ability::RepairSelf);
            }
            if self.can_use(Ability::BerserkerRage) {
                return AdversaryAction::UseAbility(Ability::BerserkerRage);
            }
        }
        AdversaryAction::Attack
    }

    fn choose_hit_and_run(&self) -> AdversaryAction {
        if self.can_use(Ability::QuickStrike) {
            AdversaryAction::UseAbility(Ability::QuickStrike)
        } else {
            AdversaryAction::Attack
        }
    }

    fn choose_basic<R: Rng>(&self, rng: &mut R) -> AdversaryAction {
        if rng.gen::<f64>() < 0.3 {
            let ready: Vec<Ability> = self
                .abilities
                .iter()
                .copied()
                .filter(|a| self.can_use(*a))
                .collect();
            if !ready.is_empty() {
                let pick = ready[rng.gen_range(0..ready.len())];
                return AdversaryAction::UseAbility(pick);
            }
        }
        AdversaryAction::Attack
    }

    /// Debit the focus cost and start the cooldown for an ability this
    /// adversary is committing to use.
    pub fn commit_ability(&mut self, ability: Ability) {
        let def = ability.def();
        self.combatant.spend_focus(def.focus_cost);
        if def.cooldown > 0 {
            self.cooldowns.insert(ability, def.cooldown);
        }
    }

    /// Route incoming damage through the variant behavior: an evasive
    /// adversary may dodge outright, and armor plating adds defense at
    /// resolution time without mutating the stat.
    pub fn resolve_incoming_damage<R: Rng>(&mut self, raw: i32, rng: &mut R) -> DamageOutcome {
        if let Variant::Evasive { dodge_chance } = self.variant {
            if rng.gen_bool(dodge_chance) {
                debug!(adversary = %self.combatant.name, "dodged incoming damage");
                return DamageOutcome::Dodged;
            }
        }
        let bonus = match self.variant {
            Variant::ArmorPlated { bonus_defense } => bonus_defense,
            _ => 0,
        };
        let actual = (raw - (self.combatant.effective_defense() + bonus)).max(1);
        self.combatant.hp = (self.combatant.hp - actual).max(0);
        DamageOutcome::Hit { amount: actual }
    }
}
