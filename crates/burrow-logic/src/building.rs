//! Stockpiles, beds, construction and material accounting.
//!
//! Stockpile zones are fixed tile lists created by area designation.
//! Materials for construction are drawn from whatever lies inside
//! stockpiles, scanned stockpile by stockpile and tile by tile in
//! creation order.
//!
//! Non-stockpile structures can only go on floor: a colony floors an area
//! before it can put up walls, doors or beds.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position, TileType};
use crate::ids::{BedId, ColonistId, StockpileId};
use crate::items::ItemType;

/// Structures a colonist can be asked to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildType {
    Wall,
    Floor,
    Door,
    Bed,
    Stockpile,
}

impl BuildType {
    pub const ALL: [BuildType; 5] = [
        BuildType::Wall,
        BuildType::Floor,
        BuildType::Door,
        BuildType::Bed,
        BuildType::Stockpile,
    ];

    /// Materials consumed by one construction.
    pub fn cost(self) -> MaterialCost {
        match self {
            BuildType::Wall => MaterialCost::of(ItemType::Stone, 2),
            BuildType::Floor => MaterialCost::of(ItemType::Stone, 1),
            BuildType::Door => MaterialCost::of(ItemType::Wood, 1),
            BuildType::Bed => MaterialCost::of(ItemType::Wood, 2),
            BuildType::Stockpile => MaterialCost::NONE,
        }
    }

    /// Work ticks needed to finish the construction.
    pub fn work_time(self) -> f32 {
        match self {
            BuildType::Wall => 50.0,
            BuildType::Floor => 30.0,
            BuildType::Door => 40.0,
            BuildType::Bed => 60.0,
            BuildType::Stockpile => 0.0,
        }
    }

    /// Terrain the tile takes on when built, if any.
    pub fn terrain(self) -> Option<TileType> {
        match self {
            BuildType::Wall => Some(TileType::Wall),
            BuildType::Floor => Some(TileType::Floor),
            BuildType::Door => Some(TileType::Door),
            BuildType::Bed | BuildType::Stockpile => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuildType::Wall => "wall",
            BuildType::Floor => "floor",
            BuildType::Door => "door",
            BuildType::Bed => "bed",
            BuildType::Stockpile => "stockpile",
        }
    }
}

/// Required quantity per item type, indexed by [`ItemType::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCost(pub [u32; ItemType::COUNT]);

impl MaterialCost {
    pub const NONE: MaterialCost = MaterialCost([0; ItemType::COUNT]);

    pub fn of(item_type: ItemType, quantity: u32) -> Self {
        let mut amounts = [0; ItemType::COUNT];
        amounts[item_type.index()] = quantity;
        Self(amounts)
    }

    pub fn get(&self, item_type: ItemType) -> u32 {
        self.0[item_type.index()]
    }

    pub fn is_free(&self) -> bool {
        self.0.iter().all(|&q| q == 0)
    }

    /// Non-zero requirements in item ordinal order.
    pub fn requirements(&self) -> impl Iterator<Item = (ItemType, u32)> + '_ {
        ItemType::ALL
            .iter()
            .map(move |&t| (t, self.get(t)))
            .filter(|&(_, q)| q > 0)
    }
}

/// Materials needed for one construction of `build_type`.
pub fn build_cost(build_type: BuildType) -> MaterialCost {
    build_type.cost()
}

/// A storage zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stockpile {
    pub id: StockpileId,
    pub tiles: Vec<Position>,
}

impl Stockpile {
    pub fn new(id: StockpileId, tiles: Vec<Position>) -> Self {
        Self { id, tiles }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.tiles.contains(&pos)
    }
}

/// A built bed and who, if anyone, is using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: BedId,
    pub pos: Position,
    pub occupied_by: Option<ColonistId>,
}

impl Bed {
    pub fn new(id: BedId, pos: Position) -> Self {
        Self {
            id,
            pos,
            occupied_by: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.occupied_by.is_none()
    }

    pub fn occupy(&mut self, colonist: ColonistId) {
        self.occupied_by = Some(colonist);
    }

    pub fn vacate(&mut self) {
        self.occupied_by = None;
    }
}

/// Whether `build_type` may go on the tile at `pos`.
pub fn can_build(grid: &Grid, pos: Position, build_type: BuildType) -> bool {
    let Some(tile) = grid.tile(pos) else {
        return false;
    };
    match build_type {
        BuildType::Stockpile => matches!(tile.tile_type, TileType::Grass | TileType::Floor),
        BuildType::Wall | BuildType::Floor | BuildType::Door | BuildType::Bed => {
            tile.tile_type == TileType::Floor
        }
    }
}

/// Apply a construction's terrain change.
///
/// Beds and stockpiles leave terrain alone; the caller registers them.
/// Returns false without mutation when [`can_build`] fails.
pub fn build(grid: &mut Grid, pos: Position, build_type: BuildType) -> bool {
    if !can_build(grid, pos, build_type) {
        return false;
    }
    if let Some(terrain) = build_type.terrain() {
        grid.set_tile_type(pos, terrain);
    }
    true
}

pub fn is_in_stockpile(stockpiles: &[Stockpile], pos: Position) -> bool {
    stockpiles.iter().any(|s| s.contains(pos))
}

/// Manhattan-nearest stockpile tile with no item on it. The first tile
/// found at the minimal distance wins.
pub fn find_nearest_stockpile_space(
    grid: &Grid,
    stockpiles: &[Stockpile],
    from: Position,
) -> Option<Position> {
    let mut nearest: Option<(Position, u32)> = None;
    for stockpile in stockpiles {
        for &pos in &stockpile.tiles {
            if grid.item_at(pos).is_some() {
                continue;
            }
            let dist = from.manhattan(pos);
            if nearest.map_or(true, |(_, best)| dist < best) {
                nearest = Some((pos, dist));
            }
        }
    }
    nearest.map(|(pos, _)| pos)
}

/// Every stockpile tile once, in creation order. A tile listed by more
/// than one zone is kept at its first appearance.
pub fn stockpile_tiles(stockpiles: &[Stockpile]) -> Vec<Position> {
    let mut seen = HashSet::new();
    stockpiles
        .iter()
        .flat_map(|s| s.tiles.iter().copied())
        .filter(|&pos| seen.insert(pos))
        .collect()
}

/// Total quantity of `item_type` lying on stockpile tiles.
pub fn count_in_stockpiles(grid: &Grid, stockpiles: &[Stockpile], item_type: ItemType) -> u32 {
    stockpile_tiles(stockpiles)
        .into_iter()
        .filter_map(|pos| grid.item_at(pos))
        .filter(|item| item.item_type == item_type)
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}

pub fn has_materials(grid: &Grid, stockpiles: &[Stockpile], cost: &MaterialCost) -> bool {
    cost.requirements()
        .all(|(item_type, needed)| count_in_stockpiles(grid, stockpiles, item_type) >= needed)
}

/// Debit `cost` from stockpiled stacks. All or nothing: returns false and
/// touches nothing when any requirement can't be met.
pub fn consume_materials(grid: &mut Grid, stockpiles: &[Stockpile], cost: &MaterialCost) -> bool {
    if !has_materials(grid, stockpiles, cost) {
        return false;
    }
    let tiles = stockpile_tiles(stockpiles);
    for (item_type, needed) in cost.requirements() {
        let mut remaining = needed;
        for &pos in &tiles {
            if remaining == 0 {
                break;
            }
            let Some(stack) = grid.item_at_mut(pos) else {
                continue;
            };
            if stack.item_type != item_type {
                continue;
            }
            let taken = remaining.min(stack.quantity);
            stack.quantity -= taken;
            remaining -= taken;
            if stack.is_empty() {
                grid.remove_item(pos);
            }
        }
    }
    true
}

/// Manhattan-nearest unoccupied bed.
pub fn find_nearest_available_bed(beds: &[Bed], from: Position) -> Option<&Bed> {
    let mut nearest: Option<(&Bed, u32)> = None;
    for bed in beds.iter().filter(|b| b.is_available()) {
        let dist = from.manhattan(bed.pos);
        if nearest.map_or(true, |(_, best)| dist < best) {
            nearest = Some((bed, dist));
        }
    }
    nearest.map(|(bed, _)| bed)
}

pub fn bed_at(beds: &[Bed], pos: Position) -> Option<&Bed> {
    beds.iter().find(|b| b.pos == pos)
}
