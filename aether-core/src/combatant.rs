//! Combatant model shared by the protagonist and adversaries, plus the
//! protagonist's persistent campaign progress counters.

use crate::catalog::StatusEffect;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Either participant of an encounter: resource pools, base stats, and the
/// active status-effect set.
///
/// Base stats are fixed for the life of the combatant; equipment changes
/// happen outside combat by constructing a fresh value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub focus: i32,
    pub max_focus: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    /// Active effects mapped to remaining turns. An entry never holds a
    /// zero counter; expiry removes it in the same tick.
    pub status_effects: BTreeMap<StatusEffect, u32>,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        max_hp: i32,
        max_focus: i32,
        attack: i32,
        defense: i32,
        speed: i32,
    ) -> Self {
        Self {
            name: name.into(),
            hp: max_hp,
            max_hp,
            focus: max_focus,
            max_focus,
            attack,
            defense,
            speed,
            status_effects: BTreeMap::new(),
        }
    }

    /// Apply incoming damage, reduced by effective defense; always at least
    /// 1. Returns the damage actually taken.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        let actual = (damage - self.effective_defense()).max(1);
        self.hp = (self.hp - actual).max(0);
        actual
    }

    /// Restore HP up to maximum. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - old
    }

    /// Restore focus up to maximum. Returns the amount actually restored.
    pub fn restore_focus(&mut self, amount: i32) -> i32 {
        let old = self.focus;
        self.focus = (self.focus + amount).min(self.max_focus);
        self.focus - old
    }

    /// Spend focus if enough is available.
    pub fn spend_focus(&mut self, amount: i32) -> bool {
        if self.focus >= amount {
            self.focus -= amount;
            true
        } else {
            false
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).max(0.0)
    }

    /// Attack with active status modifiers applied.
    pub fn effective_attack(&self) -> i32 {
        let mut attack = self.attack;
        for effect in self.status_effects.keys() {
            if let Some(mult) = effect.attack_multiplier() {
                attack = (attack as f32 * mult) as i32;
            }
        }
        attack
    }

    /// Defense with active status modifiers applied.
    pub fn effective_defense(&self) -> i32 {
        let mut defense = self.defense;
        for effect in self.status_effects.keys() {
            if let Some(mult) = effect.defense_multiplier() {
                defense = (defense as f32 * mult) as i32;
            }
        }
        defense
    }

    pub fn has_status(&self, effect: StatusEffect) -> bool {
        self.status_effects.contains_key(&effect)
    }

    /// Apply or refresh a status effect.
    pub fn add_status(&mut self, effect: StatusEffect, duration: u32) {
        self.status_effects.insert(effect, duration.max(1));
    }

    /// Remove a status effect outright (antidotes and the like).
    pub fn clear_status(&mut self, effect: StatusEffect) -> bool {
        self.status_effects.remove(&effect).is_some()
    }

    /// Advance every active status effect by one turn.
    ///
    /// Periodic effects fire before their counter is decremented; an effect
    /// reaching zero is removed in the same tick. Returns the events that
    /// occurred, in a stable order.
    pub fn tick_status_effects(&mut self) -> Vec<StatusTick> {
        let mut events = Vec::new();
        let active: Vec<(StatusEffect, u32)> =
            self.status_effects.iter().map(|(e, d)| (*e, *d)).collect();

        for (effect, duration) in active {
            if let Some(amount) = effect.tick_damage() {
                self.hp = (self.hp - amount).max(0);
                events.push(StatusTick::Damaged { effect, amount });
            }
            if let Some(amount) = effect.tick_heal() {
                let healed = self.heal(amount);
                events.push(StatusTick::Healed {
                    effect,
                    amount: healed,
                });
            }

            let remaining = duration.saturating_sub(1);
            if remaining == 0 {
                self.status_effects.remove(&effect);
                events.push(StatusTick::Expired { effect });
            } else {
                self.status_effects.insert(effect, remaining);
            }
        }
        events
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HP: {}/{})", self.name, self.hp, self.max_hp)
    }
}

/// One thing that happened to a status effect during an end-of-turn tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTick {
    Damaged { effect: StatusEffect, amount: i32 },
    Healed { effect: StatusEffect, amount: i32 },
    Expired { effect: StatusEffect },
}

/// The protagonist's cumulative counters, carried across the whole
/// campaign, not just one encounter.
///
/// The surrounding application owns this record; encounters report their
/// damage tallies back through [`Progress::record_combat`] and the outcome
/// evaluator reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    pub total_damage_dealt: u32,
    pub total_damage_taken: u32,
    pub enemies_defeated: u32,
    pub visited_rooms: HashSet<String>,
    pub items_held: u32,
    pub aether_crystals: u32,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit_room(&mut self, room_id: impl Into<String>) {
        self.visited_rooms.insert(room_id.into());
    }

    pub fn add_crystal(&mut self) {
        self.aether_crystals += 1;
    }

    /// Fold one concluded encounter's tallies into the campaign record.
    pub fn record_combat(&mut self, dealt: u32, taken: u32, defeated_enemy: bool) {
        self.total_damage_dealt += dealt;
        self.total_damage_taken += taken;
        if defeated_enemy {
            self.enemies_defeated += 1;
        }
    }
}

/// A protagonist with the campaign's default starting stats. Convenient
/// for tests and demos; real callers build their own record.
pub fn sample_warden() -> Combatant {
    Combatant::new("Aether Warden", 100, 5, 10, 5, 6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_damage_formula_and_floor() {
        let mut c = Combatant::new("Target", 50, 5, 8, 5, 4);
        assert_eq!(c.take_damage(20), 15);
        assert_eq!(c.hp, 35);
        // Below-defense hits still land for 1.
        assert_eq!(c.take_damage(3), 1);
        assert_eq!(c.hp, 34);
    }

    #[test]
    fn test_hp_never_goes_negative() {
        let mut c = Combatant::new("Target", 10, 0, 5, 0, 3);
        c.take_damage(500);
        assert_eq!(c.hp, 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_heal_clamps_and_reports_delta() {
        let mut c = Combatant::new("Target", 40, 0, 5, 0, 3);
        c.hp = 30;
        assert_eq!(c.heal(25), 10);
        assert_eq!(c.hp, 40);
        assert_eq!(c.heal(5), 0);
    }

    #[test]
    fn test_focus_spend_and_restore() {
        let mut c = Combatant::new("Caster", 30, 5, 5, 2, 3);
        assert!(c.spend_focus(3));
        assert_eq!(c.focus, 2);
        assert!(!c.spend_focus(3));
        assert_eq!(c.focus, 2);
        assert_eq!(c.restore_focus(10), 3);
        assert_eq!(c.focus, 5);
    }

    #[test]
    fn test_effective_stats_with_statuses() {
        let mut c = Combatant::new("Brute", 60, 4, 10, 6, 4);
        assert_eq!(c.effective_attack(), 10);
        assert_eq!(c.effective_defense(), 6);
        c.add_status(StatusEffect::Berserker, 3);
        assert_eq!(c.effective_attack(), 15);
        c.add_status(StatusEffect::Defensive, 2);
        assert_eq!(c.effective_defense(), 9);
    }

    #[test]
    fn test_attack_buff_stacks_with_rage() {
        let mut c = Combatant::new("Brute", 60, 4, 10, 6, 4);
        c.add_status(StatusEffect::AttackBuffed, 2);
        assert_eq!(c.effective_attack(), 12);
        c.add_status(StatusEffect::Berserker, 3);
        // Multipliers compound in effect-set order.
        assert_eq!(c.effective_attack(), 18);
    }

    #[test]
    fn test_status_with_one_turn_left_expires_on_tick() {
        let mut c = Combatant::new("Target", 50, 0, 5, 2, 3);
        c.add_status(StatusEffect::Defensive, 1);
        let events = c.tick_status_effects();
        assert!(!c.has_status(StatusEffect::Defensive));
        assert_eq!(
            events,
            vec![StatusTick::Expired {
                effect: StatusEffect::Defensive
            }]
        );
    }

    #[test]
    fn test_poison_fires_fixed_amount_before_decrement() {
        let mut c = Combatant::new("Target", 50, 0, 5, 10, 3);
        c.add_status(StatusEffect::Poisoned, 1);
        let events = c.tick_status_effects();
        // Fixed 3, unreduced by the defense of 10, then expiry.
        assert_eq!(c.hp, 47);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            StatusTick::Damaged {
                effect: StatusEffect::Poisoned,
                amount: 3
            }
        );
        assert_eq!(
            events[1],
            StatusTick::Expired {
                effect: StatusEffect::Poisoned
            }
        );
    }

    #[test]
    fn test_regeneration_heals_each_tick() {
        let mut c = Combatant::new("Target", 50, 0, 5, 2, 3);
        c.hp = 20;
        c.add_status(StatusEffect::Regenerating, 3);
        c.tick_status_effects();
        assert_eq!(c.hp, 25);
        assert_eq!(c.status_effects[&StatusEffect::Regenerating], 2);
    }

    #[test]
    fn test_refresh_resets_duration() {
        let mut c = Combatant::new("Target", 50, 0, 5, 2, 3);
        c.add_status(StatusEffect::Defensive, 1);
        c.add_status(StatusEffect::Defensive, 4);
        assert_eq!(c.status_effects[&StatusEffect::Defensive], 4);
    }

    #[test]
    fn test_progress_record_combat() {
        let mut progress = Progress::new();
        progress.record_combat(42, 7, true);
        progress.record_combat(10, 0, false);
        assert_eq!(progress.total_damage_dealt, 52);
        assert_eq!(progress.total_damage_taken, 7);
        assert_eq!(progress.enemies_defeated, 1);
    }

    proptest! {
        #[test]
        fn prop_take_damage_matches_formula(damage in 0i32..10_000, defense in 0i32..1_000) {
            let mut c = Combatant::new("P", 1_000_000, 0, 1, defense, 1);
            let actual = c.take_damage(damage);
            prop_assert_eq!(actual, (damage - defense).max(1));
            prop_assert!(c.hp >= 0);
        }

        #[test]
        fn prop_heal_never_exceeds_max(start in 0i32..100, amount in 0i32..1_000) {
            let mut c = Combatant::new("P", 100, 0, 1, 0, 1);
            c.hp = start;
            let healed = c.heal(amount);
            prop_assert!(c.hp <= c.max_hp);
            prop_assert_eq!(healed, c.hp - start);
        }
    }
}
