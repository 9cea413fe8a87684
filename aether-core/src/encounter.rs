//! The turn-order scheduler and combat state machine.
//!
//! An encounter arbitrates one protagonist against one adversary. Each
//! action resolves synchronously: the action is applied, a log line is
//! appended, both sides' status effects tick, and termination is checked
//! exactly once. Rejected actions mutate nothing and are never logged.

use crate::adversary::{
    Adversary, AdversaryAction, AdversaryTemplate, DamageOutcome, ObservedProtagonist,
};
use crate::catalog::{protagonist_abilities, Ability, AbilityEffect, StatusEffect};
use crate::combatant::{Combatant, StatusTick};
use crate::items::HeldItem;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// The one fatal condition: the encounter cannot be constructed.
#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("invalid adversary template: {reason}")]
    InvalidTemplate { reason: String },
}

/// Recoverable per-action rejections. None of these mutate encounter
/// state or consume a turn; none appear in the message log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("it is the {side}'s turn")]
    NotYourTurn { side: Side },
    #[error("unknown ability: {name}")]
    UnknownAbility { name: String },
    #[error("not enough focus: need {needed}, have {available}")]
    InsufficientFocus { needed: i32, available: i32 },
    #[error("{ability} is on cooldown for {remaining} more turns")]
    OnCooldown { ability: Ability, remaining: u32 },
    #[error("no {name} in inventory")]
    UnknownItem { name: String },
    #[error("{name} cannot be used in combat")]
    NotConsumable { name: String },
    #[error("the encounter has already concluded")]
    EncounterOver,
}

/// Which side of the encounter is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Protagonist,
    Adversary,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Protagonist => write!(f, "protagonist"),
            Side::Adversary => write!(f, "adversary"),
        }
    }
}

/// Terminal classification of a concluded encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    ProtagonistWin,
    AdversaryWin,
    Draw,
    Fled,
}

/// Encounter lifecycle flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterStatus {
    Active,
    Concluded(Outcome),
}

/// Damage totals accumulated within one encounter. The caller folds these
/// into the protagonist's persistent [`crate::combatant::Progress`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageTally {
    pub dealt: u32,
    pub taken: u32,
}

/// One combat session between the protagonist and a single adversary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    protagonist: Combatant,
    adversary: Adversary,
    turn_order: [Side; 2],
    turn: u32,
    status: EncounterStatus,
    log: Vec<String>,
    tally: DamageTally,
    rng: ChaCha8Rng,
}

impl Encounter {
    /// Start an encounter with an entropy-seeded generator.
    pub fn new(
        protagonist: Combatant,
        template: &AdversaryTemplate,
    ) -> Result<Self, EncounterError> {
        Self::with_rng(protagonist, template, ChaCha8Rng::from_entropy())
    }

    /// Start an encounter with a fixed seed, for deterministic replay.
    pub fn with_seed(
        protagonist: Combatant,
        template: &AdversaryTemplate,
        seed: u64,
    ) -> Result<Self, EncounterError> {
        Self::with_rng(protagonist, template, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(
        protagonist: Combatant,
        template: &AdversaryTemplate,
        mut rng: ChaCha8Rng,
    ) -> Result<Self, EncounterError> {
        template
            .validate()
            .map_err(|reason| EncounterError::InvalidTemplate { reason })?;
        let adversary = Adversary::from_template(template);

        // Higher speed acts first; an exact tie is a 50/50 draw, the only
        // randomness outside dodge trials and the basic policy.
        let turn_order = if protagonist.speed > adversary.combatant.speed {
            [Side::Protagonist, Side::Adversary]
        } else if adversary.combatant.speed > protagonist.speed {
            [Side::Adversary, Side::Protagonist]
        } else if rng.gen_bool(0.5) {
            [Side::Protagonist, Side::Adversary]
        } else {
            [Side::Adversary, Side::Protagonist]
        };

        let mut encounter = Self {
            protagonist,
            adversary,
            turn_order,
            turn: 0,
            status: EncounterStatus::Active,
            log: Vec::new(),
            tally: DamageTally::default(),
            rng,
        };
        encounter.log.push(format!(
            "Combat begins! {} vs {}",
            encounter.protagonist.name, encounter.adversary.combatant.name
        ));
        let [first, second] = encounter.turn_order;
        encounter.log.push(format!(
            "Turn order: {}, then {}",
            encounter.side_name(first),
            encounter.side_name(second)
        ));
        debug!(
            protagonist = %encounter.protagonist.name,
            adversary = %encounter.adversary.combatant.name,
            ?turn_order,
            "encounter created"
        );
        Ok(encounter)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn status(&self) -> EncounterStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == EncounterStatus::Active
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            EncounterStatus::Active => None,
            EncounterStatus::Concluded(outcome) => Some(outcome),
        }
    }

    /// The side whose turn it is, or `None` once concluded.
    pub fn active_side(&self) -> Option<Side> {
        self.is_active()
            .then(|| self.turn_order[(self.turn % 2) as usize])
    }

    pub fn is_protagonist_turn(&self) -> bool {
        self.active_side() == Some(Side::Protagonist)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_order(&self) -> [Side; 2] {
        self.turn_order
    }

    /// The append-only message log of resolved actions and tick events.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn protagonist(&self) -> &Combatant {
        &self.protagonist
    }

    pub fn adversary(&self) -> &Adversary {
        &self.adversary
    }

    pub fn tally(&self) -> DamageTally {
        self.tally
    }

    /// Loot identifiers for the caller to grant, available only after a
    /// protagonist win.
    pub fn loot(&self) -> Option<&[String]> {
        (self.status == EncounterStatus::Concluded(Outcome::ProtagonistWin))
            .then(|| self.adversary.loot())
    }

    /// A structured view of both sides for presentation layers.
    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            protagonist: CombatantSnapshot::of(&self.protagonist),
            adversary: CombatantSnapshot::of(&self.adversary.combatant),
            active_side: self.active_side(),
            turn: self.turn,
            concluded: !self.is_active(),
            outcome: self.outcome(),
        }
    }

    // ------------------------------------------------------------------
    // Protagonist actions
    // ------------------------------------------------------------------

    /// Basic attack: always succeeds, no resource cost. Scales base
    /// attack; the protagonist's attack statuses do not stack onto it.
    pub fn attack(&mut self) -> Result<String, ActionError> {
        self.ensure_turn(Side::Protagonist)?;
        let raw = self.protagonist.attack;
        let message = match self.adversary.resolve_incoming_damage(raw, &mut self.rng) {
            DamageOutcome::Dodged => format!(
                "{} attacks, but {} dodges!",
                self.protagonist.name, self.adversary.combatant.name
            ),
            DamageOutcome::Hit { amount } => {
                self.tally.dealt += amount as u32;
                format!(
                    "{} attacks {} for {} damage!",
                    self.protagonist.name, self.adversary.combatant.name, amount
                )
            }
        };
        self.log.push(message.clone());
        self.end_turn();
        Ok(message)
    }

    /// Use a named special ability from the protagonist's fixed set.
    pub fn use_ability(&mut self, name: &str) -> Result<String, ActionError> {
        self.ensure_turn(Side::Protagonist)?;
        let ability = Ability::from_name(name)
            .filter(|a| protagonist_abilities().contains(a))
            .ok_or_else(|| ActionError::UnknownAbility {
                name: name.to_string(),
            })?;
        let def = ability.def();
        // The protagonist has no cooldowns; only the focus gate applies.
        check_gates(def.focus_cost, self.protagonist.focus, ability, 0)?;

        self.protagonist.spend_focus(def.focus_cost);
        let message = self.resolve_protagonist_effect(ability, def.effect);
        self.log.push(message.clone());
        self.end_turn();
        Ok(message)
    }

    /// Use a named consumable from the supplied held-items collection.
    /// Non-stackable items are removed from the collection on success.
    pub fn use_item(
        &mut self,
        name: &str,
        inventory: &mut Vec<HeldItem>,
    ) -> Result<String, ActionError> {
        self.ensure_turn(Side::Protagonist)?;
        let index = inventory
            .iter()
            .position(|i| i.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ActionError::UnknownItem {
                name: name.to_string(),
            })?;
        if !inventory[index].is_consumable() {
            return Err(ActionError::NotConsumable {
                name: inventory[index].name.clone(),
            });
        }

        let item = inventory[index].clone();
        let mut parts = Vec::new();
        if item.heal_amount > 0 {
            let healed = self.protagonist.heal(item.heal_amount);
            parts.push(format!("+{healed} HP"));
        }
        if item.focus_restore > 0 {
            let restored = self.protagonist.restore_focus(item.focus_restore);
            parts.push(format!("+{restored} Focus"));
        }
        if !item.stackable {
            inventory.remove(index);
        }

        let message = if parts.is_empty() {
            format!("Used {}: no effect", item.name)
        } else {
            format!("Used {}: {}", item.name, parts.join(", "))
        };
        self.log.push(message.clone());
        self.end_turn();
        Ok(message)
    }

    /// Abandon the encounter. Available to the protagonist's controller in
    /// any active state, regardless of whose turn it is.
    pub fn flee(&mut self) -> Result<String, ActionError> {
        if !self.is_active() {
            return Err(ActionError::EncounterOver);
        }
        let message = format!("{} flees from the encounter!", self.protagonist.name);
        self.log.push(message.clone());
        self.status = EncounterStatus::Concluded(Outcome::Fled);
        Ok(message)
    }

    // ------------------------------------------------------------------
    // Adversary turn
    // ------------------------------------------------------------------

    /// Run the adversary's turn: upkeep (cooldowns, own status effects),
    /// policy decision, then resolution.
    pub fn advance_adversary(&mut self) -> Result<String, ActionError> {
        self.ensure_turn(Side::Adversary)?;

        let upkeep = self.adversary.begin_turn();
        let adversary_name = self.adversary.combatant.name.clone();
        for line in tick_lines(&adversary_name, &upkeep) {
            self.log.push(line);
        }

        let observed = ObservedProtagonist {
            hp: self.protagonist.hp,
            defense: self.protagonist.effective_defense(),
            focus: self.protagonist.focus,
        };
        let action = self.adversary.choose_action(&observed, &mut self.rng);

        let message = match action {
            AdversaryAction::Attack => {
                let raw = self.adversary.combatant.effective_attack();
                let actual = self.protagonist.take_damage(raw);
                self.tally.taken += actual as u32;
                format!(
                    "{} attacks {} for {} damage!",
                    adversary_name, self.protagonist.name, actual
                )
            }
            AdversaryAction::UseAbility(ability) => {
                // Policies are total; this gate only trips if a template
                // was hand-built to break the invariant.
                let def = ability.def();
                check_gates(
                    def.focus_cost,
                    self.adversary.combatant.focus,
                    ability,
                    self.adversary.cooldown_remaining(ability),
                )?;
                self.adversary.commit_ability(ability);
                self.resolve_adversary_effect(ability, def.effect)
            }
        };

        self.log.push(message.clone());
        self.end_turn();
        Ok(message)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn side_name(&self, side: Side) -> &str {
        match side {
            Side::Protagonist => &self.protagonist.name,
            Side::Adversary => &self.adversary.combatant.name,
        }
    }

    fn ensure_turn(&self, side: Side) -> Result<(), ActionError> {
        match self.active_side() {
            None => Err(ActionError::EncounterOver),
            Some(active) if active != side => Err(ActionError::NotYourTurn { side: active }),
            Some(_) => Ok(()),
        }
    }

    fn resolve_protagonist_effect(&mut self, ability: Ability, effect: AbilityEffect) -> String {
        let name = self.protagonist.name.clone();
        match effect {
            AbilityEffect::Strike { multiplier } => {
                self.protagonist_strike(&name, ability, multiplier)
            }
            AbilityEffect::Restore { amount } => {
                let healed = self.protagonist.heal(amount);
                format!("{} {}: restores {} HP!", name, ability.flavor(), healed)
            }
            AbilityEffect::Stance { effect, duration } => {
                self.protagonist.add_status(effect, duration);
                format!("{} {}!", name, ability.flavor())
            }
            AbilityEffect::RagingBlow {
                effect,
                duration,
                multiplier,
            } => {
                self.protagonist.add_status(effect, duration);
                self.protagonist_strike(&name, ability, multiplier)
            }
        }
    }

    fn protagonist_strike(&mut self, name: &str, ability: Ability, multiplier: f32) -> String {
        let raw = (self.protagonist.attack as f32 * multiplier) as i32;
        match self.adversary.resolve_incoming_damage(raw, &mut self.rng) {
            DamageOutcome::Dodged => format!(
                "{} {}, but {} dodges!",
                name,
                ability.flavor(),
                self.adversary.combatant.name
            ),
            DamageOutcome::Hit { amount } => {
                self.tally.dealt += amount as u32;
                format!(
                    "{} {}: {} damage to {}!",
                    name,
                    ability.flavor(),
                    amount,
                    self.adversary.combatant.name
                )
            }
        }
    }

    fn resolve_adversary_effect(&mut self, ability: Ability, effect: AbilityEffect) -> String {
        let name = self.adversary.combatant.name.clone();
        match effect {
            AbilityEffect::Strike { multiplier } => {
                self.adversary_strike(&name, ability, multiplier)
            }
            AbilityEffect::Restore { amount } => {
                let healed = self.adversary.combatant.heal(amount);
                format!("{} {}: restores {} HP!", name, ability.flavor(), healed)
            }
            AbilityEffect::Stance { effect, duration } => {
                self.adversary.combatant.add_status(effect, duration);
                format!("{} {}!", name, ability.flavor())
            }
            AbilityEffect::RagingBlow {
                effect,
                duration,
                multiplier,
            } => {
                self.adversary.combatant.add_status(effect, duration);
                self.adversary_strike(&name, ability, multiplier)
            }
        }
    }

    fn adversary_strike(&mut self, name: &str, ability: Ability, multiplier: f32) -> String {
        let raw = (self.adversary.combatant.attack as f32 * multiplier) as i32;
        let actual = self.protagonist.take_damage(raw);
        self.tally.taken += actual as u32;
        format!(
            "{} {}: {} damage to {}!",
            name,
            ability.flavor(),
            actual,
            self.protagonist.name
        )
    }

    /// End-of-turn processing: tick both sides' status effects, then check
    /// termination exactly once.
    fn end_turn(&mut self) {
        let protagonist_name = self.protagonist.name.clone();
        let events = self.protagonist.tick_status_effects();
        for event in &events {
            if let StatusTick::Damaged { amount, .. } = event {
                self.tally.taken += *amount as u32;
            }
        }
        for line in tick_lines(&protagonist_name, &events) {
            self.log.push(line);
        }

        let adversary_name = self.adversary.combatant.name.clone();
        let events = self.adversary.combatant.tick_status_effects();
        for line in tick_lines(&adversary_name, &events) {
            self.log.push(line);
        }

        // The first side found at zero decides the outcome; both at zero
        // is a draw.
        match (!self.protagonist.is_alive(), !self.adversary.combatant.is_alive()) {
            (true, true) => {
                self.log
                    .push("Both combatants fall. The encounter ends in a draw.".to_string());
                self.status = EncounterStatus::Concluded(Outcome::Draw);
            }
            (true, false) => {
                self.log
                    .push(format!("{} has been defeated!", self.protagonist.name));
                self.status = EncounterStatus::Concluded(Outcome::AdversaryWin);
            }
            (false, true) => {
                self.log.push(format!("{} defeated!", adversary_name));
                if !self.adversary.loot().is_empty() {
                    self.log.push(format!(
                        "{} dropped: {}",
                        adversary_name,
                        self.adversary.loot().join(", ")
                    ));
                }
                self.status = EncounterStatus::Concluded(Outcome::ProtagonistWin);
            }
            (false, false) => {
                self.turn += 1;
            }
        }
        if let EncounterStatus::Concluded(outcome) = self.status {
            debug!(?outcome, turn = self.turn, "encounter concluded");
        }
    }
}

/// Uniform resource/cooldown gate for ability use.
fn check_gates(
    cost: i32,
    focus: i32,
    ability: Ability,
    cooldown_remaining: u32,
) -> Result<(), ActionError> {
    if cooldown_remaining > 0 {
        return Err(ActionError::OnCooldown {
            ability,
            remaining: cooldown_remaining,
        });
    }
    if focus < cost {
        return Err(ActionError::InsufficientFocus {
            needed: cost,
            available: focus,
        });
    }
    Ok(())
}

fn tick_lines(name: &str, events: &[StatusTick]) -> Vec<String> {
    events
        .iter()
        .map(|event| match event {
            StatusTick::Damaged { effect, amount } => {
                format!("{name} suffers {amount} damage from {effect}!")
            }
            StatusTick::Healed { amount, .. } => {
                format!("{name} regenerates {amount} HP!")
            }
            StatusTick::Expired { effect } => {
                format!("{name}'s {effect} effect expired.")
            }
        })
        .collect()
}

/// A read-only view of one combatant for presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub focus: i32,
    pub max_focus: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub status_effects: Vec<(StatusEffect, u32)>,
}

impl CombatantSnapshot {
    fn of(combatant: &Combatant) -> Self {
        Self {
            name: combatant.name.clone(),
            hp: combatant.hp,
            max_hp: combatant.max_hp,
            focus: combatant.focus,
            max_focus: combatant.max_focus,
            attack: combatant.attack,
            defense: combatant.defense,
            speed: combatant.speed,
            status_effects: combatant
                .status_effects
                .iter()
                .map(|(e, d)| (*e, *d))
                .collect(),
        }
    }
}

/// The full structured state exposed after every action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub protagonist: CombatantSnapshot,
    pub adversary: CombatantSnapshot,
    pub active_side: Option<Side>,
    pub turn: u32,
    pub concluded: bool,
    pub outcome: Option<Outcome>,
}
