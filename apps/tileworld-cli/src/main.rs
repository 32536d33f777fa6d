use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tileworld_assets::ResourceRegistry;
use tileworld_common::{ResourceStack, SimConfig, TILE_HEIGHT, TILE_WIDTH, TileRect, tile_of};
use tileworld_input::{Controls, InputScript};
use tileworld_kernel::{TileGrid, World, WorldEvent};
use tileworld_stream::{PassTimer, WorldTicker};
use tileworld_tools::{WorldInspector, render_window};
use tileworld_worldgen::{GeneratedLevel, start_generation};

/// Items a hand holds before it is thrown back into the world.
const HAND_CAPACITY: usize = 10;

#[derive(Parser)]
#[command(name = "tileworld-cli", about = "Headless driver for the tile world simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, default configuration and the built-in resources
    Info,
    /// Generate terrain and print a map around the spawn column
    Generate {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Map rows to print above and below the surface
        #[arg(long, default_value = "8")]
        rows: i32,
    },
    /// Run a fixed number of simulation steps with the ticker following the player
    Simulate {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// JSON resource registry (defaults to the built-in catalogue)
        #[arg(long)]
        registry: Option<PathBuf>,
        /// Override the configured seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of steps to simulate
        #[arg(short = 'n', long, default_value = "600")]
        steps: usize,
        /// Held actions per step, e.g. "R,R,RJ,,L"; repeats when exhausted
        #[arg(long, default_value = "")]
        script: String,
        /// Dig out the tile under the player every N steps (0 disables)
        #[arg(long, default_value = "0")]
        dig_every: usize,
        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => info()?,
        Commands::Generate { config, seed, rows } => generate(config.as_deref(), seed, rows)?,
        Commands::Simulate {
            config,
            registry,
            seed,
            steps,
            script,
            dig_every,
            json,
        } => {
            let script: InputScript = script.parse().context("invalid input script")?;
            simulate(SimulateArgs {
                config: config.as_deref(),
                registry: registry.as_deref(),
                seed,
                steps,
                script,
                dig_every,
                json,
            })?
        }
    }

    Ok(())
}

fn info() -> anyhow::Result<()> {
    println!("tileworld-cli v{}", env!("CARGO_PKG_VERSION"));
    println!("tile size: {TILE_WIDTH}x{TILE_HEIGHT}");
    println!("\ndefault configuration:");
    print!("{}", SimConfig::default().to_yaml_string()?);
    println!("\nbuilt-in resources:");
    for r in ResourceRegistry::builtin().iter() {
        println!(
            "  {:>3} {:<12} attack={} placeable={} stackable={}",
            r.id.0, r.name, r.attack, r.placeable, r.stackable
        );
    }
    Ok(())
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<SimConfig> {
    let mut config = match path {
        Some(p) => SimConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = seed {
        config.world.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Generate on the background worker, logging while it runs.
fn generate_level(config: &SimConfig) -> anyhow::Result<GeneratedLevel> {
    let mut handle = start_generation(config.world.width, config.world.height, config.world.seed)?;
    while !handle.is_complete() {
        tracing::debug!("waiting for terrain");
        std::thread::sleep(Duration::from_millis(5));
    }
    Ok(handle.take()?)
}

fn generate(path: Option<&Path>, seed: Option<u64>, rows: i32) -> anyhow::Result<()> {
    let config = load_config(path, seed)?;
    let level = generate_level(&config)?;

    let lowest = level.surface.iter().copied().max().unwrap_or(0);
    let highest = level.surface.iter().copied().min().unwrap_or(0);
    println!(
        "generated {}x{} (seed {}): surface rows {highest}..={lowest}, {} solid tiles",
        level.grid.width(),
        level.grid.height(),
        config.world.seed,
        level.grid.solid_count()
    );

    let mid = level.grid.width() / 2;
    let surface = level.surface.get(mid as usize).copied().unwrap_or(0);
    let view = TileRect::from_bounds(mid - 40, surface - rows, mid + 40, surface + rows);
    let world = World::new(
        level.grid,
        config.physics,
        ResourceRegistry::builtin(),
        config.world.seed,
    );
    print!("{}", render_window(&world, view));
    Ok(())
}

struct SimulateArgs<'a> {
    config: Option<&'a Path>,
    registry: Option<&'a Path>,
    seed: Option<u64>,
    steps: usize,
    script: InputScript,
    dig_every: usize,
    json: bool,
}

fn simulate(args: SimulateArgs<'_>) -> anyhow::Result<()> {
    let config = load_config(args.config, args.seed)?;
    let registry = match args.registry {
        Some(p) => ResourceRegistry::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => ResourceRegistry::builtin(),
    };
    let level = generate_level(&config)?;
    let spawn = spawn_point(&level, config.player.size);

    let mut world = World::new(level.grid, config.physics.clone(), registry, config.world.seed);
    world.spawn_player(spawn, config.player.size);
    let mut ticker = WorldTicker::new(config.ticker.clone());
    let mut timer = PassTimer::new(64);
    let mut controls = Controls::new();
    let mut hand = ResourceStack::new(HAND_CAPACITY);
    let mut tally = EventTally::default();

    tracing::info!(steps = args.steps, x = spawn.x, y = spawn.y, "simulation started");
    for step in 0..args.steps {
        controls.hold_only(args.script.frame(step));
        world.step(&controls.intent());

        let focus = world
            .player()
            .map(|p| p.center())
            .unwrap_or_else(|| grid_center(world.grid()));
        if let Some(stats) = ticker.advance(&mut world, focus) {
            timer.record(stats.elapsed);
        }

        if args.dig_every > 0 && (step + 1) % args.dig_every == 0 {
            dig_under_player(&mut world, &mut hand);
        }
        tally.absorb(world.drain_events());

        if (step + 1) % 100 == 0 {
            tracing::info!(
                step = step + 1,
                entities = world.entity_count(),
                tile_changes = tally.tile_changes,
                avg_pass = ?timer.average(),
                "progress"
            );
        }
    }

    let summary = WorldInspector::summary(&world);
    if args.json {
        println!("{}", summary.to_json()?);
    } else {
        println!("{summary}");
        println!(
            "ticker: {} passes, last {} timed: min {:?}, avg {:?}, max {:?}; hand holds {}",
            ticker.passes(),
            timer.count(),
            timer.min(),
            timer.average(),
            timer.max(),
            hand.len()
        );
        println!(
            "events: {} tile changes, {} spawns, {} despawns",
            tally.tile_changes, tally.spawned, tally.despawned
        );
        if let Some(id) = world.player_id() {
            if let Some(info) = WorldInspector::inspect_entity(&world, id) {
                println!("{info}");
            }
            if let Some(p) = world.player() {
                let (px, py) = tile_of(p.position);
                print!("{}", render_window(&world, TileRect::spanning((px, py), (20, 6))));
            }
        }
    }
    Ok(())
}

/// Running counts of drained world events.
#[derive(Debug, Default)]
struct EventTally {
    tile_changes: u64,
    spawned: u64,
    despawned: u64,
}

impl EventTally {
    fn absorb(&mut self, events: Vec<WorldEvent>) {
        for event in events {
            match event {
                WorldEvent::TileChanged { .. } => self.tile_changes += 1,
                WorldEvent::EntitySpawned { .. } => self.spawned += 1,
                WorldEvent::EntityDespawned { .. } => self.despawned += 1,
            }
        }
    }
}

/// Top-left corner for a player standing just above the middle column's surface.
fn spawn_point(level: &GeneratedLevel, size: Vec2) -> Vec2 {
    let mid = level.grid.width() / 2;
    let surface = level.surface.get(mid as usize).copied().unwrap_or(0);
    Vec2::new(
        (mid * TILE_WIDTH) as f32,
        (surface * TILE_HEIGHT) as f32 - size.y - 1.0,
    )
}

fn grid_center(grid: &TileGrid) -> Vec2 {
    Vec2::new(
        (grid.width() * TILE_WIDTH) as f32 / 2.0,
        (grid.height() * TILE_HEIGHT) as f32 / 2.0,
    )
}

/// Remove the tile below the player's feet, collect nearby drops into the
/// hand, and throw the hand's contents down once it is full.
fn dig_under_player(world: &mut World, hand: &mut ResourceStack) {
    let Some((center, feet)) = world
        .player()
        .map(|p| (p.center(), Vec2::new(p.center().x, p.position.y + p.size.y + 1.0)))
    else {
        return;
    };
    let (tx, ty) = tile_of(feet);
    world.remove_tile(tx, ty);

    for item in world.pick_up_near(center, TILE_WIDTH as f32 * 2.0) {
        if hand.is_full() {
            let thrown = world.throw_stack(center, hand);
            tracing::debug!(count = thrown.len(), "hand full, threw stack");
        }
        hand.push(item);
    }
}
