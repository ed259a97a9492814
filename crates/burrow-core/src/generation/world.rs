//! Terrain generation
//!
//! Maps are built in four passes over an all-grass grid:
//!
//! 1. A rock border [`BORDER`] tiles thick.
//! 2. Trees scattered over the interior at [`TREE_DENSITY`].
//! 3. Two or three small water pools, each grown breadth-first from a
//!    random seed tile and kept away from the edges.
//! 4. A grass clearing around the centre where colonists start.
//!
//! Everything is drawn from the caller's RNG, so a seed fully determines
//! the map.

use std::collections::VecDeque;

use rand::Rng;

use burrow_logic::constants::world::{BORDER, CLEARING_HALF, TREE_DENSITY};
use burrow_logic::grid::{Grid, Position, TileType};

/// Pool seeds are placed at least this far in from the edge.
const POOL_SEED_INSET: i32 = 10;
/// Water never spreads within this many tiles of the edge.
const POOL_MARGIN: i32 = 5;
/// Chance that a new water tile spreads to each orthogonal neighbour.
const POOL_SPREAD_CHANCE: f64 = 0.7;

/// Generate a fresh map of the given size.
pub fn generate_terrain(width: i32, height: i32, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::filled(width, height, TileType::Grass);

    for (x, y) in cells(width, height) {
        let edge = x < BORDER || x >= width - BORDER || y < BORDER || y >= height - BORDER;
        if edge {
            grid.set_tile_type(Position::new(x, y), TileType::Rock);
        }
    }

    for y in BORDER..height - BORDER {
        for x in BORDER..width - BORDER {
            if rng.gen::<f64>() < TREE_DENSITY {
                grid.set_tile_type(Position::new(x, y), TileType::Tree);
            }
        }
    }

    let pools = 2 + rng.gen_range(0..2);
    for _ in 0..pools {
        let (span_x, span_y) = (width - 2 * POOL_SEED_INSET, height - 2 * POOL_SEED_INSET);
        if span_x <= 0 || span_y <= 0 {
            break;
        }
        let seed = Position::new(
            POOL_SEED_INSET + rng.gen_range(0..span_x),
            POOL_SEED_INSET + rng.gen_range(0..span_y),
        );
        let size = 5 + rng.gen_range(0..4);
        grow_pool(&mut grid, seed, size, rng);
    }

    let center = map_center(width, height);
    for y in center.y - CLEARING_HALF..center.y + CLEARING_HALF {
        for x in center.x - CLEARING_HALF..center.x + CLEARING_HALF {
            grid.set_tile_type(Position::new(x, y), TileType::Grass);
        }
    }

    log::debug!(
        "generated {}x{} terrain: {} trees, {} water",
        width,
        height,
        grid.count_tiles(TileType::Tree),
        grid.count_tiles(TileType::Water)
    );
    grid
}

/// Centre tile of a map; colonists spawn around it.
pub fn map_center(width: i32, height: i32) -> Position {
    Position::new(width / 2, height / 2)
}

fn grow_pool(grid: &mut Grid, seed: Position, size: u32, rng: &mut impl Rng) {
    let (width, height) = (grid.width(), grid.height());
    let mut queue = VecDeque::from([seed]);
    let mut placed = 0;

    while placed < size {
        let Some(pos) = queue.pop_front() else {
            break;
        };
        let inside = pos.x >= POOL_MARGIN
            && pos.x < width - POOL_MARGIN
            && pos.y >= POOL_MARGIN
            && pos.y < height - POOL_MARGIN;
        if !inside {
            continue;
        }
        let floodable = grid
            .tile(pos)
            .is_some_and(|t| matches!(t.tile_type, TileType::Grass | TileType::Tree));
        if !floodable {
            continue;
        }
        grid.set_tile_type(pos, TileType::Water);
        placed += 1;
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            if rng.gen::<f64>() < POOL_SPREAD_CHANCE {
                queue.push_back(pos.offset(dx, dy));
            }
        }
    }
}

fn cells(width: i32, height: i32) -> impl Iterator<Item = (i32, i32)> {
    (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
}
