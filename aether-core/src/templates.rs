//! Built-in adversary templates.
//!
//! The encounter accepts any externally constructed template; this table is
//! the stock bestiary of the campaign, one entry per decision policy.

use crate::adversary::{AdversaryTemplate, Policy, Variant};
use crate::catalog::Ability;

lazy_static::lazy_static! {
    pub static ref ADVERSARIES: Vec<AdversaryTemplate> = vec![
        AdversaryTemplate {
            id: "clockwork_sentinel".to_string(),
            name: "Clockwork Sentinel".to_string(),
            max_hp: 60,
            attack: 8,
            defense: 4,
            speed: 3,
            focus: 4,
            abilities: vec![
                Ability::DefensiveStance,
                Ability::RepairSelf,
                Ability::PowerStrike,
            ],
            policy: Policy::Defensive,
            variant: Variant::ArmorPlated { bonus_defense: 2 },
            description: "A heavily armored guardian of brass and iron.".to_string(),
            loot: vec!["Repair Kit".to_string()],
        },
        AdversaryTemplate {
            id: "rogue_automaton".to_string(),
            name: "Rogue Automaton".to_string(),
            max_hp: 35,
            attack: 10,
            defense: 2,
            speed: 8,
            focus: 4,
            abilities: vec![Ability::QuickStrike],
            policy: Policy::HitAndRun,
            variant: Variant::Evasive { dodge_chance: 0.2 },
            description: "A darting machine that slips between blows.".to_string(),
            loot: vec!["Mana Potion".to_string()],
        },
        AdversaryTemplate {
            id: "steam_golem".to_string(),
            name: "Steam Golem".to_string(),
            max_hp: 90,
            attack: 12,
            defense: 5,
            speed: 2,
            focus: 6,
            abilities: vec![Ability::PowerStrike, Ability::BerserkerRage],
            policy: Policy::Aggressive,
            variant: Variant::PressureDriven { interval: 3 },
            description: "A lumbering boiler-hearted colossus.".to_string(),
            loot: vec!["Aether Crystal".to_string()],
        },
        AdversaryTemplate {
            id: "aether_wraith".to_string(),
            name: "Aether Wraith".to_string(),
            max_hp: 50,
            attack: 9,
            defense: 3,
            speed: 6,
            focus: 8,
            abilities: vec![
                Ability::PowerStrike,
                Ability::DefensiveStance,
                Ability::RepairSelf,
                Ability::BerserkerRage,
                Ability::EnergyDischarge,
            ],
            policy: Policy::Tactical,
            variant: Variant::Standard,
            description: "A flickering intelligence woven from raw aether.".to_string(),
            loot: vec!["Focus Crystal".to_string()],
        },
        AdversaryTemplate {
            id: "scrap_crawler".to_string(),
            name: "Scrap Crawler".to_string(),
            max_hp: 25,
            attack: 6,
            defense: 1,
            speed: 5,
            focus: 3,
            abilities: vec![Ability::QuickStrike, Ability::EnergyDischarge],
            policy: Policy::Basic,
            variant: Variant::Standard,
            description: "A skittering heap of salvaged parts.".to_string(),
            loot: vec!["Healing Tonic".to_string()],
        },
    ];
}

/// Look up a built-in template by identifier.
pub fn get_template(id: &str) -> Option<&'static AdversaryTemplate> {
    ADVERSARIES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_validate() {
        for template in ADVERSARIES.iter() {
            template
                .validate()
                .unwrap_or_else(|e| panic!("{}: {e}", template.id));
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let golem = get_template("steam_golem").expect("golem should exist");
        assert_eq!(golem.policy, Policy::Aggressive);
        assert!(matches!(
            golem.variant,
            Variant::PressureDriven { interval: 3 }
        ));
        assert!(get_template("gate_dragon").is_none());
    }

    #[test]
    fn test_loot_references_stock_items() {
        for template in ADVERSARIES.iter() {
            for loot in &template.loot {
                assert!(
                    crate::items::find_item(loot).is_some(),
                    "{} drops unknown item {loot}",
                    template.id
                );
            }
        }
    }

    #[test]
    fn test_every_policy_is_represented() {
        for policy in [
            Policy::Aggressive,
            Policy::Defensive,
            Policy::Tactical,
            Policy::HitAndRun,
            Policy::Basic,
        ] {
            assert!(
                ADVERSARIES.iter().any(|t| t.policy == policy),
                "no template uses {policy:?}"
            );
        }
    }
}
