use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Item, ItemKind};

/// Owned, in-memory inventory: items keyed by id plus the credit balance.
/// The orchestrator takes this by value; it is never a global.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryStore {
    items: HashMap<Uuid, Item>,
    credits: u64,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn deposit(&mut self, amount: u64) {
        self.credits = self.credits.saturating_add(amount);
    }

    /// Deducts `amount` if the balance covers it. All-or-nothing: returns
    /// false and leaves the balance untouched when it does not.
    pub fn charge(&mut self, amount: u64) -> bool {
        if self.credits < amount {
            return false;
        }
        self.credits -= amount;
        true
    }

    pub fn insert(&mut self, item: Item) -> Uuid {
        let id = item.id;
        self.items.insert(id, item);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Item> {
        self.items.remove(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Total quantity held across all stacks of `kind`.
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items
            .values()
            .filter(|item| item.kind == kind)
            .map(|item| item.quantity)
            .sum()
    }

    fn find_stack(&self, kind: ItemKind) -> Option<Uuid> {
        self.items
            .values()
            .find(|item| item.kind == kind)
            .map(|item| item.id)
    }

    /// Adds `quantity` of a stackable kind, merging into an existing stack
    /// when one is present.
    pub fn add_stack(&mut self, kind: ItemKind, quantity: u32) -> Uuid {
        if let Some(id) = self.find_stack(kind) {
            if let Some(item) = self.items.get_mut(&id) {
                item.quantity = item.quantity.saturating_add(quantity);
            }
            return id;
        }
        let mut item = Item::new(kind);
        item.quantity = quantity;
        self.insert(item)
    }

    /// Removes one unit of `kind`, dropping the stack entry when it hits
    /// zero. Returns false if none is held.
    pub fn consume_stack(&mut self, kind: ItemKind) -> bool {
        let Some(id) = self.find_stack(kind) else {
            return false;
        };
        let Some(item) = self.items.get_mut(&id) else {
            return false;
        };
        if item.quantity == 0 {
            self.items.remove(&id);
            return false;
        }
        item.quantity -= 1;
        if item.quantity == 0 {
            self.items.remove(&id);
        }
        true
    }
}
