//! Forage system - scatters raw food on open grass now and then

use rand::Rng;

use burrow_logic::config::ColonyConfig;
use burrow_logic::grid::{Grid, Position, TileType};
use burrow_logic::items::{ItemStack, ItemType};

/// One forage roll. With probability `forage_chance`, tries up to
/// `forage_attempts` random tiles inside the margin band and drops one raw
/// food on the first empty grass tile found.
pub fn forage_system(grid: &mut Grid, config: &ColonyConfig, rng: &mut impl Rng) -> Option<Position> {
    if rng.gen::<f64>() > config.forage_chance {
        return None;
    }

    let margin = config.forage_margin.max(0);
    let (x_end, y_end) = (grid.width() - margin, grid.height() - margin);
    if margin >= x_end || margin >= y_end {
        return None;
    }

    for _ in 0..config.forage_attempts {
        let pos = Position::new(rng.gen_range(margin..x_end), rng.gen_range(margin..y_end));
        let open = grid
            .tile(pos)
            .is_some_and(|tile| tile.tile_type == TileType::Grass && tile.item.is_none());
        if open {
            grid.place_item(pos, ItemStack::single(ItemType::RawFood));
            log::debug!("forage spawned at ({}, {})", pos.x, pos.y);
            return Some(pos);
        }
    }
    None
}
