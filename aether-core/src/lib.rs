//! Turn-based combat engine for Chronicles of the Aether Gate.
//!
//! This crate provides:
//! - Combatant pools, stats, and timed status effects
//! - A fixed ability and consumable-item catalog
//! - Adversary templates with decision policies and behavior variants
//! - A synchronous turn-order scheduler with a human-readable message log
//! - A pure victory/defeat evaluator over persistent session progress
//!
//! # Quick Start
//!
//! ```
//! use aether_core::{sample_warden, templates, Encounter};
//!
//! let template = templates::get_template("clockwork_sentinel").unwrap();
//! let mut encounter = Encounter::with_seed(sample_warden(), template, 42)?;
//!
//! while encounter.is_active() {
//!     if encounter.is_protagonist_turn() {
//!         encounter.attack()?;
//!     } else {
//!         encounter.advance_adversary()?;
//!     }
//! }
//!
//! for line in encounter.log() {
//!     println!("{line}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adversary;
pub mod catalog;
pub mod combatant;
pub mod encounter;
pub mod items;
pub mod templates;
pub mod victory;

// Primary public API
pub use adversary::{Adversary, AdversaryAction, AdversaryTemplate, Policy, Variant};
pub use catalog::{protagonist_abilities, Ability, AbilityDef, AbilityEffect, StatusEffect};
pub use combatant::{sample_warden, Combatant, Progress, StatusTick};
pub use encounter::{
    ActionError, DamageTally, Encounter, EncounterError, EncounterSnapshot, EncounterStatus,
    Outcome, Side,
};
pub use items::{find_item, HeldItem, ItemKind};
pub use victory::{Achievement, VictoryConditions, VictoryReport, VictoryType};
