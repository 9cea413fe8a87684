//! The outcome evaluator: a pure predicate layer over persistent progress.
//!
//! The evaluator is invoked after a won encounter and at arbitrary
//! checkpoints by the surrounding application. It only supplies data;
//! narrative text is a presentation concern.

use crate::combatant::{Combatant, Progress};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Thresholds for the global victory check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VictoryConditions {
    /// Crystal count required for the primary condition.
    pub aether_crystals: u32,
    /// Location identifiers that must all be visited for `Explorer`.
    pub required_rooms: Vec<String>,
    /// Defeat count required for `Warrior`.
    pub min_enemies_defeated: u32,
}

impl Default for VictoryConditions {
    fn default() -> Self {
        Self {
            aether_crystals: 3,
            required_rooms: vec![
                "entrance".to_string(),
                "hallway".to_string(),
                "laboratory".to_string(),
                "armory".to_string(),
            ],
            min_enemies_defeated: 2,
        }
    }
}

/// Bonus predicates satisfied by the protagonist's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    CrystalMaster,
    Explorer,
    Warrior,
    Untouchable,
    TacticalGenius,
    ThoroughExplorer,
}

impl Achievement {
    pub fn name(&self) -> &'static str {
        match self {
            Achievement::CrystalMaster => "Crystal Master",
            Achievement::Explorer => "Explorer",
            Achievement::Warrior => "Warrior",
            Achievement::Untouchable => "Untouchable",
            Achievement::TacticalGenius => "Tactical Genius",
            Achievement::ThoroughExplorer => "Thorough Explorer",
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How thoroughly the run was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryType {
    /// Primary condition plus at least three achievements.
    Complete,
    /// Primary condition alone.
    Standard,
    /// Primary condition not yet met.
    None,
}

/// The evaluator's full answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VictoryReport {
    pub won: bool,
    pub victory_type: VictoryType,
    pub achievements: Vec<Achievement>,
}

impl VictoryConditions {
    /// Evaluate the global victory condition. Pure: repeated calls on the
    /// same progress return the same report.
    pub fn evaluate(&self, progress: &Progress) -> VictoryReport {
        let mut achievements = Vec::new();

        if progress.aether_crystals >= self.aether_crystals {
            achievements.push(Achievement::CrystalMaster);
        }

        let required: HashSet<&str> = self.required_rooms.iter().map(String::as_str).collect();
        let visited: HashSet<&str> = progress.visited_rooms.iter().map(String::as_str).collect();
        if required.is_subset(&visited) {
            achievements.push(Achievement::Explorer);
        }

        if progress.enemies_defeated >= self.min_enemies_defeated {
            achievements.push(Achievement::Warrior);
        }

        // A flawless run grants both damage achievements.
        if progress.total_damage_taken == 0 {
            achievements.push(Achievement::Untouchable);
        }
        if progress.total_damage_taken < 20 {
            achievements.push(Achievement::TacticalGenius);
        }

        if progress.visited_rooms.len() >= self.required_rooms.len() {
            achievements.push(Achievement::ThoroughExplorer);
        }

        let won = progress.aether_crystals >= self.aether_crystals;
        let victory_type = if !won {
            VictoryType::None
        } else if achievements.len() >= 3 {
            VictoryType::Complete
        } else {
            VictoryType::Standard
        };
        VictoryReport {
            won,
            victory_type,
            achievements,
        }
    }

    /// Whether the protagonist has lost outright.
    pub fn is_defeated(&self, protagonist: &Combatant) -> bool {
        !protagonist.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::sample_warden;

    fn conditions() -> VictoryConditions {
        VictoryConditions::default()
    }

    #[test]
    fn test_no_progress_is_no_victory() {
        let report = conditions().evaluate(&Progress::new());
        assert!(!report.won);
        assert_eq!(report.victory_type, VictoryType::None);
        // Zero damage taken still satisfies the damage predicates.
        assert!(report.achievements.contains(&Achievement::Untouchable));
        assert!(report.achievements.contains(&Achievement::TacticalGenius));
    }

    #[test]
    fn test_crystals_alone_is_a_standard_victory() {
        let mut progress = Progress::new();
        for _ in 0..3 {
            progress.add_crystal();
        }
        progress.record_combat(40, 50, false);
        let report = conditions().evaluate(&progress);
        assert!(report.won);
        // Crystal Master plus nothing else worth counting.
        assert_eq!(report.victory_type, VictoryType::Standard);
        assert_eq!(report.achievements, vec![Achievement::CrystalMaster]);
    }

    #[test]
    fn test_flawless_full_clear_is_complete() {
        let mut progress = Progress::new();
        for _ in 0..3 {
            progress.add_crystal();
        }
        for room in ["entrance", "hallway", "laboratory", "armory"] {
            progress.visit_room(room);
        }
        progress.record_combat(60, 0, true);
        progress.record_combat(45, 0, true);

        let report = conditions().evaluate(&progress);
        assert!(report.won);
        assert_eq!(report.victory_type, VictoryType::Complete);
        for expected in [
            Achievement::CrystalMaster,
            Achievement::Explorer,
            Achievement::Warrior,
            Achievement::Untouchable,
            Achievement::TacticalGenius,
            Achievement::ThoroughExplorer,
        ] {
            assert!(report.achievements.contains(&expected), "{expected} missing");
        }
    }

    #[test]
    fn test_partial_room_visits_do_not_grant_explorer() {
        let mut progress = Progress::new();
        progress.visit_room("entrance");
        progress.visit_room("hallway");
        let report = conditions().evaluate(&progress);
        assert!(!report.achievements.contains(&Achievement::Explorer));
        assert!(!report.achievements.contains(&Achievement::ThoroughExplorer));
    }

    #[test]
    fn test_thorough_explorer_counts_any_rooms() {
        // Four distinct rooms, not necessarily the required set.
        let mut progress = Progress::new();
        for room in ["vault", "workshop", "greenhouse", "observatory"] {
            progress.visit_room(room);
        }
        let report = conditions().evaluate(&progress);
        assert!(report.achievements.contains(&Achievement::ThoroughExplorer));
        assert!(!report.achievements.contains(&Achievement::Explorer));
    }

    #[test]
    fn test_damage_thresholds() {
        let mut progress = Progress::new();
        progress.record_combat(10, 19, true);
        let report = conditions().evaluate(&progress);
        assert!(!report.achievements.contains(&Achievement::Untouchable));
        assert!(report.achievements.contains(&Achievement::TacticalGenius));

        progress.record_combat(10, 1, false);
        let report = conditions().evaluate(&progress);
        assert!(!report.achievements.contains(&Achievement::TacticalGenius));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut progress = Progress::new();
        for _ in 0..3 {
            progress.add_crystal();
        }
        progress.record_combat(30, 5, true);
        let conditions = conditions();
        let first = conditions.evaluate(&progress);
        let second = conditions.evaluate(&progress);
        assert_eq!(first.won, second.won);
        assert_eq!(first.victory_type, second.victory_type);
        assert_eq!(first.achievements, second.achievements);
    }

    #[test]
    fn test_defeat_is_exactly_zero_hp() {
        let conditions = conditions();
        let mut warden = sample_warden();
        assert!(!conditions.is_defeated(&warden));
        warden.hp = 1;
        assert!(!conditions.is_defeated(&warden));
        warden.hp = 0;
        assert!(conditions.is_defeated(&warden));
    }
}
