//! Tile pathfinding over the grid's walkability predicate.
//!
//! `find_path` is an A* search with unit edge cost and a Manhattan
//! heuristic over 4-directional neighbours. `adjacent_tiles` is a separate
//! 8-directional query; movement never steps diagonally.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::grid::{Grid, Position};

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

const SURROUNDING: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Manhattan distance between two positions.
pub fn manhattan(a: Position, b: Position) -> u32 {
    a.manhattan(b)
}

fn heuristic(a: Position, b: Position) -> u32 {
    manhattan(a, b)
}

/// Walkable orthogonal neighbours in the order up, down, left, right.
pub fn neighbors(grid: &Grid, pos: Position) -> Vec<Position> {
    ORTHOGONAL
        .iter()
        .map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|&p| grid.is_walkable_at(p))
        .collect()
}

/// Walkable neighbours including diagonals, row by row from the top-left.
pub fn adjacent_tiles(grid: &Grid, pos: Position) -> Vec<Position> {
    SURROUNDING
        .iter()
        .map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|&p| grid.is_walkable_at(p))
        .collect()
}

/// Shortest 4-directional path from `start` to `goal`, both inclusive.
///
/// Returns an empty vec when the goal is unwalkable or unreachable, and
/// `[start]` when start and goal coincide. Ties on `f` go to the lower
/// heuristic, then to whichever node entered the frontier first.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Vec<Position> {
    if !grid.is_walkable_at(goal) {
        return Vec::new();
    }
    if start == goal {
        return vec![start];
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut cost_so_far: HashMap<Position, u32> = HashMap::new();
    let mut seq = 0u64;

    let h = heuristic(start, goal);
    frontier.push(Reverse((h, h, seq, start.x, start.y)));
    cost_so_far.insert(start, 0);

    while let Some(Reverse((f, _, _, x, y))) = frontier.pop() {
        let current = Position::new(x, y);
        let g = cost_so_far.get(&current).copied().unwrap_or(u32::MAX);
        // Stale entry: a cheaper route to this node was queued later.
        if f > g.saturating_add(heuristic(current, goal)) {
            continue;
        }
        if current == goal {
            return reconstruct(&came_from, start, goal);
        }

        for next in neighbors(grid, current) {
            let new_cost = g.saturating_add(1);
            let better = cost_so_far
                .get(&next)
                .map_or(true, |&known| new_cost < known);
            if better {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                let h = heuristic(next, goal);
                seq += 1;
                frontier.push(Reverse((new_cost + h, h, seq, next.x, next.y)));
            }
        }
    }

    Vec::new()
}

fn reconstruct(
    came_from: &HashMap<Position, Position>,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut node = goal;
    while node != start {
        match came_from.get(&node) {
            Some(&prev) => {
                path.push(prev);
                node = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Whether any 4-directional route connects the two positions.
pub fn has_path(grid: &Grid, a: Position, b: Position) -> bool {
    !find_path(grid, a, b).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileType;

    fn assert_orthogonal_steps(path: &[Position]) {
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1, "step {:?}", pair);
        }
    }

    #[test]
    fn test_open_field_path_is_manhattan_plus_one() {
        let grid = Grid::new(20, 20);
        let start = Position::new(2, 3);
        let goal = Position::new(11, 15);
        let path = find_path(&grid, start, goal);
        assert_eq!(path.len() as u32, manhattan(start, goal) + 1);
        assert_eq!(path[0], start);
        assert_eq!(*path.last().unwrap(), goal);
        assert_orthogonal_steps(&path);
    }

    #[test]
    fn test_path_goes_around_wall() {
        let mut grid = Grid::new(10, 10);
        for y in 0..9 {
            grid.set_tile_type(Position::new(5, y), TileType::Wall);
        }
        let start = Position::new(2, 2);
        let goal = Position::new(8, 2);
        let path = find_path(&grid, start, goal);
        assert!(!path.is_empty());
        assert!(path.contains(&Position::new(5, 9)));
        // Down to row 9 and back up: 6 across + 7 down + 7 up.
        assert_eq!(path.len(), 6 + 7 + 7 + 1);
        assert_orthogonal_steps(&path);
        assert!(path.iter().all(|&p| grid.is_walkable_at(p)));
    }

    #[test]
    fn test_same_position() {
        let grid = Grid::new(5, 5);
        let p = Position::new(2, 2);
        assert_eq!(find_path(&grid, p, p), vec![p]);
    }

    #[test]
    fn test_unwalkable_goal_yields_empty() {
        let mut grid = Grid::new(5, 5);
        let goal = Position::new(3, 3);
        grid.set_tile_type(goal, TileType::Rock);
        assert!(find_path(&grid, Position::new(0, 0), goal).is_empty());
        assert!(find_path(&grid, goal, goal).is_empty());
        assert!(find_path(&grid, Position::new(0, 0), Position::new(9, 9)).is_empty());
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut grid = Grid::new(7, 7);
        let goal = Position::new(3, 3);
        for (dx, dy) in ORTHOGONAL {
            grid.set_tile_type(goal.offset(dx, dy), TileType::Water);
        }
        // Diagonal gaps don't help: movement is orthogonal only.
        assert!(find_path(&grid, Position::new(0, 0), goal).is_empty());
        assert!(!has_path(&grid, Position::new(0, 0), goal));
        assert!(has_path(&grid, Position::new(0, 0), Position::new(6, 6)));
    }

    #[test]
    fn test_neighbors_are_orthogonal_and_walkable() {
        let mut grid = Grid::new(5, 5);
        let center = Position::new(2, 2);
        assert_eq!(
            neighbors(&grid, center),
            vec![
                Position::new(2, 1),
                Position::new(2, 3),
                Position::new(1, 2),
                Position::new(3, 2)
            ]
        );
        grid.set_tile_type(Position::new(2, 1), TileType::Tree);
        assert_eq!(neighbors(&grid, center).len(), 3);
        assert_eq!(neighbors(&grid, Position::new(0, 0)).len(), 2);
    }

    #[test]
    fn test_adjacent_tiles_include_diagonals() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(adjacent_tiles(&grid, Position::new(2, 2)).len(), 8);
        assert_eq!(adjacent_tiles(&grid, Position::new(0, 2)).len(), 5);
        assert_eq!(adjacent_tiles(&grid, Position::new(0, 0)).len(), 3);

        grid.set_tile_type(Position::new(1, 1), TileType::Rock);
        grid.set_tile_type(Position::new(3, 3), TileType::Rock);
        assert_eq!(adjacent_tiles(&grid, Position::new(2, 2)).len(), 6);

        let walled = Grid::filled(3, 3, TileType::Wall);
        assert!(adjacent_tiles(&walled, Position::new(1, 1)).is_empty());
    }
}
