use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use tileworld_assets::ResourceRegistry;
use tileworld_common::{PhysicsConfig, TickerConfig, seeded_rng};
use tileworld_kernel::World;
use tileworld_stream::WorldTicker;
use tileworld_worldgen::generate;

fn make_world(width: i32, height: i32) -> World {
    let level = match generate(width, height, &mut seeded_rng(42)) {
        Ok(level) => level,
        Err(err) => panic!("generation failed: {err}"),
    };
    World::new(level.grid, PhysicsConfig::default(), ResourceRegistry::builtin(), 42)
}

fn bench_pass(half_extent: Vec2, iterations: usize) {
    let mut world = make_world(1024, 128);
    let mut ticker = WorldTicker::new(TickerConfig {
        cadence: 1,
        half_extent,
    });
    let focus = Vec2::new(512.0 * 48.0, 64.0 * 48.0);

    let start = Instant::now();
    let mut visited = 0;
    for _ in 0..iterations {
        visited += black_box(ticker.run_pass(black_box(&mut world), focus)).visited;
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  pass ({} x {} px, {visited} tiles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        half_extent.x, half_extent.y
    );
}

fn bench_step_with_ticker(entity_count: usize, iterations: usize) {
    let mut world = make_world(1024, 128);
    let dirt = world.registry().resolve(tileworld_assets::ids::DIRT);
    for i in 0..entity_count {
        let position = Vec2::new((i % 1024) as f32 * 48.0 + 24.0, 24.0);
        world.spawn_drop(position, Vec2::ZERO, dirt.clone());
    }
    let mut ticker = WorldTicker::new(TickerConfig::default());
    let focus = Vec2::new(512.0 * 48.0, 64.0 * 48.0);

    let start = Instant::now();
    for _ in 0..iterations {
        world.step(&Default::default());
        let _ = black_box(ticker.advance(&mut world, focus));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  step + ticker ({entity_count} drops, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Windowed Tick Benchmarks ===\n");

    println!("Single pass:");
    bench_pass(Vec2::new(320.0, 192.0), 10000);
    bench_pass(Vec2::new(960.0, 576.0), 1000);
    bench_pass(Vec2::new(4800.0, 3072.0), 100);

    println!("\nStep + cadence-gated ticker:");
    bench_step_with_ticker(0, 10000);
    bench_step_with_ticker(100, 1000);
    bench_step_with_ticker(1000, 100);

    println!("\n=== Done ===");
}
