//! Tile grid — terrain, designations, and the one-stack-per-tile item slot.
//!
//! The grid is the leaf of the whole simulation: pathfinding reads its
//! walkability predicate, the economy reads and writes its item slots, and
//! designations mark tiles that have pending work. Every mutation here is
//! conditional and reported as a `bool`/`Option`; nothing in this module
//! knows about colonists or tasks beyond the designation marker.

use serde::{Deserialize, Serialize};

use crate::items::ItemStack;
use crate::tasks::TaskType;

/// Integer tile coordinate. Signed so callers can probe outside the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan (taxicab) distance.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Terrain kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Grass,
    Rock,
    Tree,
    Water,
    Floor,
    Wall,
    Door,
}

impl TileType {
    /// Grass, floor and doors can be walked on; everything else blocks.
    pub fn is_walkable(self) -> bool {
        match self {
            TileType::Grass | TileType::Floor | TileType::Door => true,
            TileType::Rock | TileType::Tree | TileType::Water | TileType::Wall => false,
        }
    }

    /// Single-character glyph used by text dumps of the map.
    pub fn glyph(self) -> char {
        match self {
            TileType::Grass => '.',
            TileType::Rock => '#',
            TileType::Tree => 'T',
            TileType::Water => '~',
            TileType::Floor => '_',
            TileType::Wall => 'W',
            TileType::Door => '+',
        }
    }
}

/// One cell of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    /// Pending work marker; only meaningful while a task targets the tile.
    pub designation: Option<TaskType>,
    pub item: Option<ItemStack>,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            designation: None,
            item: None,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.tile_type.is_walkable()
    }
}

/// Walkability of a possibly-absent tile. Absent tiles block.
pub fn is_walkable(tile: Option<&Tile>) -> bool {
    tile.is_some_and(Tile::is_walkable)
}

/// Row-major tile matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid filled with a single terrain type.
    pub fn filled(width: i32, height: i32, tile_type: TileType) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            tiles: vec![Tile::new(tile_type); count],
        }
    }

    /// Create an all-grass grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, TileType::Grass)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Half-open bounds check: `0 <= x < width`, `0 <= y < height`.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.in_bounds(pos.x, pos.y)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.tiles.get(i))
    }

    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        match self.index(pos) {
            Some(i) => self.tiles.get_mut(i),
            None => None,
        }
    }

    /// Replace a tile wholesale. No-op out of bounds.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        if let Some(slot) = self.tile_mut(pos) {
            *slot = tile;
        }
    }

    /// Change terrain, keeping designation and item. Returns false out of bounds.
    pub fn set_tile_type(&mut self, pos: Position, tile_type: TileType) -> bool {
        match self.tile_mut(pos) {
            Some(tile) => {
                tile.tile_type = tile_type;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable_at(&self, pos: Position) -> bool {
        is_walkable(self.tile(pos))
    }

    /// Mark a tile for work. Mining needs rock and chopping needs a tree;
    /// a mismatched terrain leaves the tile untouched.
    pub fn designate(&mut self, pos: Position, kind: TaskType) -> bool {
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        let compatible = match kind {
            TaskType::Mine => tile.tile_type == TileType::Rock,
            TaskType::Chop => tile.tile_type == TileType::Tree,
            _ => true,
        };
        if !compatible {
            return false;
        }
        tile.designation = Some(kind);
        true
    }

    /// Idempotent.
    pub fn clear_designation(&mut self, pos: Position) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.designation = None;
        }
    }

    /// Put a stack on a tile.
    ///
    /// Fails on unwalkable or out-of-bounds tiles and when the tile already
    /// holds a different item type. A same-type stack absorbs the new one,
    /// capped at the maximum stack size.
    pub fn place_item(&mut self, pos: Position, stack: ItemStack) -> bool {
        let Some(tile) = self.tile_mut(pos) else {
            return false;
        };
        if !tile.is_walkable() || stack.quantity == 0 {
            return false;
        }
        match tile.item.as_mut() {
            None => {
                tile.item = Some(stack);
                true
            }
            Some(existing) => match existing.merge(&stack) {
                Ok(merged) => {
                    *existing = merged;
                    true
                }
                Err(_) => false,
            },
        }
    }

    /// Detach and return the stack on a tile.
    pub fn remove_item(&mut self, pos: Position) -> Option<ItemStack> {
        self.tile_mut(pos).and_then(|tile| tile.item.take())
    }

    pub fn item_at(&self, pos: Position) -> Option<&ItemStack> {
        self.tile(pos).and_then(|tile| tile.item.as_ref())
    }

    pub fn item_at_mut(&mut self, pos: Position) -> Option<&mut ItemStack> {
        self.tile_mut(pos).and_then(|tile| tile.item.as_mut())
    }

    /// All positions carrying the given designation, row-major.
    pub fn designated_tiles(&self, kind: TaskType) -> Vec<Position> {
        self.iter()
            .filter(|(_, tile)| tile.designation == Some(kind))
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count_tiles(&self, tile_type: TileType) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.tile_type == tile_type)
            .count()
    }

    /// Row-major iteration over `(position, tile)`.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(i, tile)| {
            let i = i as i32;
            (Position::new(i % width, i / width), tile)
        })
    }

    /// Text dump, one row per line.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let glyph = match self.tile(Position::new(x, y)) {
                    Some(tile) if tile.item.is_some() => 'o',
                    Some(tile) => tile.tile_type.glyph(),
                    None => ' ',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::economy::MAX_STACK;
    use crate::items::ItemType;

    #[test]
    fn test_walkability_table() {
        assert!(TileType::Grass.is_walkable());
        assert!(TileType::Floor.is_walkable());
        assert!(TileType::Door.is_walkable());
        assert!(!TileType::Rock.is_walkable());
        assert!(!TileType::Wall.is_walkable());
        assert!(!TileType::Water.is_walkable());
        assert!(!TileType::Tree.is_walkable());
        assert!(!is_walkable(None));
    }

    #[test]
    fn test_bounds_are_half_open() {
        let grid = Grid::new(10, 8);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(9, 7));
        assert!(!grid.in_bounds(10, 7));
        assert!(!grid.in_bounds(9, 8));
        assert!(!grid.in_bounds(-1, 0));
        assert!(grid.tile(Position::new(10, 0)).is_none());
    }

    #[test]
    fn test_designate_requires_matching_terrain() {
        let mut grid = Grid::new(5, 5);
        let rock = Position::new(1, 1);
        let tree = Position::new(2, 2);
        grid.set_tile_type(rock, TileType::Rock);
        grid.set_tile_type(tree, TileType::Tree);

        assert!(grid.designate(rock, TaskType::Mine));
        assert!(!grid.designate(rock, TaskType::Chop));
        assert!(grid.designate(tree, TaskType::Chop));
        assert!(!grid.designate(Position::new(3, 3), TaskType::Mine));
        assert_eq!(grid.tile(Position::new(3, 3)).unwrap().designation, None);
        assert!(!grid.designate(Position::new(-1, 3), TaskType::Mine));

        assert_eq!(grid.designated_tiles(TaskType::Mine), vec![rock]);
        grid.clear_designation(rock);
        grid.clear_designation(rock);
        assert!(grid.designated_tiles(TaskType::Mine).is_empty());
    }

    #[test]
    fn test_place_item_merges_same_type() {
        let mut grid = Grid::new(5, 5);
        let pos = Position::new(2, 2);
        assert!(grid.place_item(pos, ItemStack::new(ItemType::Stone, 5)));
        assert!(grid.place_item(pos, ItemStack::new(ItemType::Stone, 3)));
        assert_eq!(grid.item_at(pos).unwrap().quantity, 8);

        assert!(grid.place_item(pos, ItemStack::new(ItemType::Stone, 95)));
        assert_eq!(grid.item_at(pos).unwrap().quantity, MAX_STACK);
    }

    #[test]
    fn test_place_item_rejects_other_type_and_blocked_tiles() {
        let mut grid = Grid::new(5, 5);
        let pos = Position::new(2, 2);
        grid.place_item(pos, ItemStack::new(ItemType::Stone, 5));
        assert!(!grid.place_item(pos, ItemStack::new(ItemType::Wood, 3)));
        assert_eq!(grid.item_at(pos).unwrap().item_type, ItemType::Stone);
        assert_eq!(grid.item_at(pos).unwrap().quantity, 5);

        let rock = Position::new(0, 0);
        grid.set_tile_type(rock, TileType::Rock);
        assert!(!grid.place_item(rock, ItemStack::new(ItemType::Stone, 1)));
        assert!(!grid.place_item(Position::new(9, 9), ItemStack::single(ItemType::Stone)));
    }

    #[test]
    fn test_remove_item_clears_slot() {
        let mut grid = Grid::new(5, 5);
        let pos = Position::new(1, 3);
        grid.place_item(pos, ItemStack::new(ItemType::Wood, 4));
        let taken = grid.remove_item(pos).unwrap();
        assert_eq!(taken.quantity, 4);
        assert!(grid.item_at(pos).is_none());
        assert!(grid.remove_item(pos).is_none());
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = Grid::new(3, 2);
        let positions: Vec<Position> = grid.iter().map(|(p, _)| p).collect();
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[2], Position::new(2, 0));
        assert_eq!(positions[3], Position::new(0, 1));
        assert_eq!(positions.len(), 6);
    }

    #[test]
    fn test_count_tiles() {
        let mut grid = Grid::new(4, 4);
        grid.set_tile_type(Position::new(0, 0), TileType::Rock);
        grid.set_tile_type(Position::new(1, 0), TileType::Rock);
        assert_eq!(grid.count_tiles(TileType::Rock), 2);
        assert_eq!(grid.count_tiles(TileType::Grass), 14);
    }
}
