//! Runs the four built-in scenes headlessly and reports frame rates.
//!
//! ```text
//! cargo run --release --example presets -- 3
//! ```
//! Without an argument every preset runs in turn. A second argument seeds the
//! random placements so a scene can be replayed.

use std::{error::Error, f64::consts::TAU, time::Instant};

use glam::DVec2;
use impulse2d::{
    BodyOptions, Friction, InputState, Result, SimulationConfig, Simulator, SimulatorBuilder,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const WIDTH: f64 = 1920.0;
const HEIGHT: f64 = 1080.0;
const FRAMES: usize = 600;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let presets: Vec<u32> = match args.next() {
        Some(arg) => vec![arg.parse()?],
        None => vec![1, 2, 3, 4],
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => rand::random(),
    };
    info!(seed, "placements");

    let mut sim = SimulatorBuilder::new().build();
    let mut rng = StdRng::seed_from_u64(seed);
    for preset in presets {
        load(&mut sim, preset, &mut rng)?;
        info!(preset, bodies = sim.world().len(), springs = sim.world().springs().len(), "loaded");
        run(&mut sim);
    }
    Ok(())
}

fn load(sim: &mut Simulator, preset: u32, rng: &mut StdRng) -> Result<()> {
    sim.reset_world();
    match preset {
        1 => tumbling_pile(sim, rng),
        2 => billiards(sim, rng),
        3 => jelly(sim, rng),
        _ => double_pendulum(sim, rng),
    }
}

fn run(sim: &mut Simulator) {
    let input = InputState::default();
    let mut window = Instant::now();
    for frame in 1..=FRAMES {
        sim.frame(&input);
        if frame % 60 == 0 {
            let fps = 60.0 / window.elapsed().as_secs_f64();
            info!(
                frame,
                fps = (fps * 10.0).round() / 10.0,
                collisions = sim.collisions().len(),
                "rendered"
            );
            window = Instant::now();
        }
    }
}

/// Boxes and balls thrown around a walled room with a ramp.
fn tumbling_pile(sim: &mut Simulator, rng: &mut StdRng) -> Result<()> {
    sim.set_config(SimulationConfig {
        air_resistance: 0.0,
        ..SimulationConfig::default()
    });
    let world = sim.world_mut();
    for _ in 0..20 {
        let velocity = DVec2::new(rng.gen_range(-285.0..285.0), rng.gen_range(-285.0..285.0));
        world.create_box(
            DVec2::new(
                rng.gen_range(37.5..WIDTH - 37.5),
                rng.gen_range(-20.0..HEIGHT - 300.0),
            ),
            rng.gen_range(75.0..180.0),
            rng.gen_range(75.0..180.0),
            BodyOptions::new()
                .angle(rng.gen_range(0.0..TAU))
                .velocity(velocity),
        )?;
        let velocity = DVec2::new(rng.gen_range(-285.0..285.0), rng.gen_range(-285.0..285.0));
        world.create_circle(
            DVec2::new(
                rng.gen_range(37.5..WIDTH - 37.5),
                rng.gen_range(-20.0..HEIGHT - 300.0),
            ),
            rng.gen_range(37.5..90.0),
            BodyOptions::new().velocity(velocity),
        )?;
    }

    let wall = BodyOptions::new();
    world.create_segment(DVec2::new(WIDTH, -1200.0), DVec2::new(WIDTH, HEIGHT), wall.clone())?;
    world.create_segment(DVec2::new(0.0, HEIGHT), DVec2::new(0.0, -1200.0), wall.clone())?;
    world.create_segment(DVec2::new(0.0, -1170.0), DVec2::new(WIDTH, -1170.0), wall.clone())?;
    world.create_segment(DVec2::new(600.0, 600.0), DVec2::new(1500.0, 750.0), wall)?;
    world.create_box(
        DVec2::new(WIDTH / 2.0, HEIGHT),
        50.0,
        WIDTH,
        BodyOptions::new().fixed(true),
    )?;
    Ok(())
}

/// Weightless, frictionless, perfectly elastic bodies in a closed box.
fn billiards(sim: &mut Simulator, rng: &mut StdRng) -> Result<()> {
    sim.set_config(SimulationConfig {
        gravity: DVec2::ZERO,
        air_resistance: 0.0,
        friction: Friction {
            static_coefficient: 0.0,
            dynamic_coefficient: 0.0,
        },
        ..SimulationConfig::default()
    });
    let world = sim.world_mut();
    let corners = [
        DVec2::new(WIDTH, 0.0),
        DVec2::new(WIDTH, HEIGHT),
        DVec2::new(0.0, HEIGHT),
        DVec2::ZERO,
    ];
    for (i, start) in corners.iter().enumerate() {
        world.create_segment(*start, corners[(i + 1) % 4], BodyOptions::new())?;
    }

    for _ in 0..10 {
        let position = |rng: &mut StdRng| {
            DVec2::new(
                rng.gen_range(37.5..WIDTH - 37.5),
                rng.gen_range(37.5..HEIGHT - 37.5),
            )
        };
        let velocity = DVec2::new(rng.gen_range(-165.0..165.0), rng.gen_range(-165.0..165.0));
        let at = position(rng);
        world.create_box(
            at,
            rng.gen_range(90.0..225.0),
            rng.gen_range(90.0..225.0),
            BodyOptions::new().restitution(1.0).velocity(velocity),
        )?;
        let velocity = DVec2::new(rng.gen_range(-165.0..165.0), rng.gen_range(-165.0..165.0));
        let at = position(rng);
        world.create_circle(
            at,
            rng.gen_range(45.0..112.5),
            BodyOptions::new().restitution(1.0).velocity(velocity),
        )?;
    }
    Ok(())
}

/// A soft lattice dropped onto a floor studded with static balls.
fn jelly(sim: &mut Simulator, rng: &mut StdRng) -> Result<()> {
    sim.set_config(SimulationConfig::default());
    let world = sim.world_mut();
    let cols = rng.gen_range(3..9);
    let rows = rng.gen_range(4..18);
    let grid = world.create_soft_grid(DVec2::new(1500.0, -750.0), cols, rows, 90.0)?;
    let drift = DVec2::new(rng.gen_range(-45.0..45.0), 0.0);
    for point in grid.points() {
        world.set_velocity(*point, drift, 0.0)?;
    }

    let fixed = BodyOptions::new().fixed(true);
    world.create_box(DVec2::new(WIDTH / 2.0, HEIGHT + 25.0), 100.0, WIDTH, fixed.clone())?;
    world.create_box(DVec2::new(WIDTH + 10.0, HEIGHT / 2.0), HEIGHT, 50.0, fixed.clone())?;
    world.create_box(DVec2::new(-10.0, HEIGHT / 2.0), HEIGHT, 50.0, fixed.clone())?;
    for _ in 0..5 {
        world.create_circle(
            DVec2::new(rng.gen_range(17.5..WIDTH - 17.5), HEIGHT + 20.0),
            rng.gen_range(105.0..300.0),
            fixed.clone(),
        )?;
    }
    Ok(())
}

/// Two small balls hanging from a fixed anchor on springs.
fn double_pendulum(sim: &mut Simulator, rng: &mut StdRng) -> Result<()> {
    sim.set_config(SimulationConfig {
        air_resistance: 0.0,
        ..SimulationConfig::default()
    });
    let world = sim.world_mut();
    let length = 450.0;
    let anchor_at = DVec2::new(WIDTH / 2.0, HEIGHT / 2.0 - 225.0);
    let anchor = world.create_point_mass(anchor_at, BodyOptions::new().fixed(true))?;

    let mut swing = || {
        DVec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)).normalize_or(DVec2::X)
            * length
    };
    let first_at = anchor_at + swing();
    let second_at = first_at + swing();
    let first = world.create_circle(first_at, 2.0, BodyOptions::new())?;
    let second = world.create_circle(second_at, 2.0, BodyOptions::new())?;
    world.attach_spring(anchor, first, length)?;
    world.attach_spring(first, second, length)?;
    Ok(())
}
