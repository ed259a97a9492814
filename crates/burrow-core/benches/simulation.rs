//! Performance benchmarks for the colony simulation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use burrow_core::generation::generate_terrain;
use burrow_core::prelude::*;
use burrow_logic::grid::{Grid, TileType};
use burrow_logic::pathfinding::find_path;

fn benchmark_pathfinding(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path");

    let open = Grid::new(64, 48);
    group.bench_function("open_corner_to_corner", |b| {
        b.iter(|| {
            find_path(
                black_box(&open),
                Position::new(0, 0),
                Position::new(63, 47),
            )
        });
    });

    let mut terrain = generate_terrain(64, 48, &mut StdRng::seed_from_u64(12345));
    let from = Position::new(32, 24);
    let to = Position::new(4, 4);
    terrain.set_tile_type(to, TileType::Grass);
    group.bench_function("generated_center_to_corner", |b| {
        b.iter(|| find_path(black_box(&terrain), from, to));
    });

    group.finish();
}

fn benchmark_engine_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");

    for colonists in [3u32, 9, 18].iter() {
        let config = ColonyConfig::default().with_colonists(*colonists);
        let mut engine = SimulationEngine::new(config);
        engine.start_game();

        engine.set_design_mode(DesignMode::Chop);
        engine.designate_area(Position::new(3, 3), Position::new(60, 44));
        engine.set_design_mode(DesignMode::Stockpile);
        engine.designate_area(Position::new(28, 20), Position::new(30, 22));

        // Warm up
        for _ in 0..100 {
            engine.update(0.1);
        }

        group.bench_with_input(
            BenchmarkId::new("colonists", colonists),
            colonists,
            |b, _| {
                b.iter(|| {
                    engine.update(black_box(0.1));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_pathfinding, benchmark_engine_tick);
criterion_main!(benches);
