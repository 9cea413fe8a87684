//! Item model and the standard item table.
//!
//! The encounter only ever sees the protagonist's held-items collection,
//! supplied by the caller per action; this module provides the shared item
//! shape plus the stock catalog the surrounding application (and the
//! adversary loot tables) draw from.

use serde::{Deserialize, Serialize};

/// Broad item categories. Only consumables are usable mid-combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Consumable,
    Weapon,
    Accessory,
    KeyItem,
    Misc,
}

/// An item as carried in the protagonist's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldItem {
    pub name: String,
    pub kind: ItemKind,
    /// HP restored when consumed.
    pub heal_amount: i32,
    /// Focus restored when consumed.
    pub focus_restore: i32,
    /// Stackable items are not removed from the inventory on use.
    pub stackable: bool,
}

impl HeldItem {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            kind,
            heal_amount: 0,
            focus_restore: 0,
            stackable: false,
        }
    }

    pub fn consumable(name: impl Into<String>) -> Self {
        Self::new(name, ItemKind::Consumable)
    }

    pub fn with_heal(mut self, amount: i32) -> Self {
        self.heal_amount = amount;
        self
    }

    pub fn with_focus_restore(mut self, amount: i32) -> Self {
        self.focus_restore = amount;
        self
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    pub fn is_consumable(&self) -> bool {
        self.kind == ItemKind::Consumable
    }

    /// Whether this item advances the primary victory condition.
    pub fn is_victory_item(&self) -> bool {
        self.kind == ItemKind::KeyItem && self.name.to_lowercase().contains("aether crystal")
    }
}

lazy_static::lazy_static! {
    /// The stock items of the campaign, referenced by loot tables and the
    /// surrounding application.
    pub static ref STANDARD_ITEMS: Vec<HeldItem> = vec![
        HeldItem::consumable("Healing Tonic").with_heal(30),
        HeldItem::consumable("Mana Potion").with_focus_restore(3),
        HeldItem::consumable("Repair Kit").with_heal(25).with_focus_restore(1),
        HeldItem::new("Focus Crystal", ItemKind::Accessory),
        HeldItem::new("Steam Blade", ItemKind::Weapon),
        HeldItem::new("Steam Gauntlets", ItemKind::Weapon),
        HeldItem::new("Aether Crystal", ItemKind::KeyItem),
    ];
}

/// Look up a stock item by name (case-insensitive).
pub fn find_item(name: &str) -> Option<HeldItem> {
    let name_lower = name.to_lowercase();
    STANDARD_ITEMS
        .iter()
        .find(|i| i.name.to_lowercase() == name_lower)
        .cloned()
}
