//! Item stacks — stacking, splitting, and nearest-item search.
//!
//! A stack is an item type plus a positive quantity, capped at
//! [`MAX_STACK`]. Running out of quantity is the caller's signal to drop
//! the stack from its tile. Merging two different item types is a
//! programming error and is reported as [`StackError::TypeMismatch`]
//! rather than quietly producing a bogus stack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::economy::MAX_STACK;
use crate::grid::{Grid, Position};

/// Item kinds that can lie on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Stone,
    Wood,
    RawFood,
    Meal,
}

impl ItemType {
    pub const COUNT: usize = 4;

    /// All item types in ordinal order.
    pub const ALL: [ItemType; Self::COUNT] = [
        ItemType::Stone,
        ItemType::Wood,
        ItemType::RawFood,
        ItemType::Meal,
    ];

    pub const fn index(self) -> usize {
        match self {
            ItemType::Stone => 0,
            ItemType::Wood => 1,
            ItemType::RawFood => 2,
            ItemType::Meal => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ItemType::Stone => "stone",
            ItemType::Wood => "wood",
            ItemType::RawFood => "raw food",
            ItemType::Meal => "meal",
        }
    }

    pub fn is_food(self) -> bool {
        matches!(self, ItemType::RawFood | ItemType::Meal)
    }
}

/// Contract violation raised by stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Tried to merge stacks of different item types.
    TypeMismatch { left: ItemType, right: ItemType },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::TypeMismatch { left, right } => write!(
                f,
                "cannot merge stacks of different types: {} and {}",
                left.label(),
                right.label()
            ),
        }
    }
}

impl std::error::Error for StackError {}

/// A pile of one item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_type: ItemType,
    pub quantity: u32,
}

impl ItemStack {
    /// Create a stack, capped at the maximum stack size.
    pub fn new(item_type: ItemType, quantity: u32) -> Self {
        Self {
            item_type,
            quantity: quantity.min(MAX_STACK),
        }
    }

    /// A stack of one.
    pub fn single(item_type: ItemType) -> Self {
        Self::new(item_type, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Add to the stack, saturating at the maximum stack size.
    pub fn add(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity).min(MAX_STACK);
    }

    /// Take `quantity` away. Returns false and leaves the stack unchanged
    /// when there isn't enough.
    pub fn remove(&mut self, quantity: u32) -> bool {
        if self.quantity < quantity {
            return false;
        }
        self.quantity -= quantity;
        true
    }

    /// Whether `other` fits on top of this stack without hitting the cap.
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        self.item_type == other.item_type && self.quantity.saturating_add(other.quantity) <= MAX_STACK
    }

    /// Combine two same-type stacks, capped at the maximum stack size.
    pub fn merge(&self, other: &ItemStack) -> Result<ItemStack, StackError> {
        if self.item_type != other.item_type {
            return Err(StackError::TypeMismatch {
                left: self.item_type,
                right: other.item_type,
            });
        }
        Ok(ItemStack::new(
            self.item_type,
            self.quantity.saturating_add(other.quantity),
        ))
    }

    /// Split `quantity` off into a new stack.
    ///
    /// Only a strict sub-quantity may be split: zero, the whole stack, or
    /// more than the stack holds all return `None` without touching it.
    pub fn split(&mut self, quantity: u32) -> Option<ItemStack> {
        if quantity == 0 || quantity >= self.quantity {
            return None;
        }
        self.quantity -= quantity;
        Some(ItemStack::new(self.item_type, quantity))
    }
}

/// Manhattan-nearest tile holding `item_type`. Row-major scan; the first
/// tile found at the minimal distance wins.
pub fn nearest_item(grid: &Grid, from: Position, item_type: ItemType) -> Option<Position> {
    let mut nearest: Option<(Position, u32)> = None;
    for (pos, tile) in grid.iter() {
        let Some(item) = tile.item.as_ref() else {
            continue;
        };
        if item.item_type != item_type {
            continue;
        }
        let dist = from.manhattan(pos);
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((pos, dist));
        }
    }
    nearest.map(|(pos, _)| pos)
}
