//! Inventory Module
//!
//! Bounded multiset operations over a character's inventory, plus consumable use.
use chronicle_data::{ItemCatalog, ItemDef, ItemKind};
use log::info;

use crate::character::{Character, MAX_INVENTORY_SIZE};
use crate::error::{GameError, GameResult};

/// Anything that carries items by id.
pub trait ItemHolder {
    /// Add one copy of an item.
    ///
    /// # Errors
    /// - `InventoryFull` if there is no room
    fn add_item(&mut self, item_id: &str) -> GameResult<()>;

    /// Remove one copy of an item.
    ///
    /// # Errors
    /// - `ItemNotFound` if no copy is held
    fn remove_item(&mut self, item_id: &str) -> GameResult<()>;

    fn contains_item(&self, item_id: &str) -> bool;
}

impl ItemHolder for Character {
    fn add_item(&mut self, item_id: &str) -> GameResult<()> {
        if self.inventory.len() >= MAX_INVENTORY_SIZE {
            return Err(GameError::InventoryFull {
                capacity: MAX_INVENTORY_SIZE,
            });
        }
        self.inventory.push(item_id.to_string());
        Ok(())
    }

    fn remove_item(&mut self, item_id: &str) -> GameResult<()> {
        let pos = self
            .inventory
            .iter()
            .position(|held| held == item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
        self.inventory.remove(pos);
        Ok(())
    }

    fn contains_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|held| held == item_id)
    }
}

impl Character {
    /// Number of copies of `item_id` held.
    pub fn count_item(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|held| *held == item_id).count()
    }

    /// Empty the inventory. Equipped items are unaffected.
    pub fn clear_inventory(&mut self) {
        self.inventory.clear();
    }
}

/// Look up an item definition or fail with `UnknownItem`.
pub fn item_def<'a>(items: &'a ItemCatalog, item_id: &str) -> GameResult<&'a ItemDef> {
    items
        .get(item_id)
        .ok_or_else(|| GameError::UnknownItem(item_id.to_string()))
}

/// Consume one copy of a consumable and apply its effect.
///
/// Returns a short description of what happened.
///
/// # Errors
/// - `ItemNotFound` if the item is not held
/// - `UnknownItem` if it is missing from the catalog
/// - `InvalidItemType` if it is not a consumable
pub fn use_item(character: &mut Character, item_id: &str, items: &ItemCatalog) -> GameResult<String> {
    if !character.contains_item(item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = item_def(items, item_id)?;
    if item.kind != ItemKind::Consumable {
        return Err(GameError::InvalidItemType {
            item_id: item_id.to_string(),
            expected: ItemKind::Consumable,
            found: item.kind,
        });
    }
    let stat = item.effect.stat;
    let before = character.stat(stat);
    character.apply_effect(item.effect);
    character.remove_item(item_id)?;
    let after = character.stat(stat);
    info!("{} used '{item_id}' ({stat} {before} -> {after})", character.name);

    let summary = if after >= before {
        format!("{} used {} and gained {} {stat}.", character.name, item.name, after - before)
    } else {
        format!("{} used {} and lost {} {stat}.", character.name, item.name, before - after)
    };
    Ok(summary)
}

/// Discard one copy of an item.
///
/// # Errors
/// - `ItemNotFound` if the item is not held
pub fn drop_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    character.remove_item(item_id)?;
    info!("{} dropped '{item_id}'", character.name);
    Ok(())
}
