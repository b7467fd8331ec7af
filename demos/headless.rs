//! Drives a box across a floor with scripted key presses and logs where it
//! ends up.

use std::{error::Error, time::Instant};

use glam::DVec2;
use impulse2d::{BodyOptions, InputState, SimulatorBuilder};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut sim = SimulatorBuilder::new().substeps(16).build();
    let world = sim.world_mut();
    world.create_box(
        DVec2::new(0.0, 200.0),
        50.0,
        2000.0,
        BodyOptions::new().fixed(true),
    )?;
    let player = world.create_box(DVec2::new(0.0, 100.0), 40.0, 40.0, BodyOptions::new())?;
    world.create_circle(DVec2::new(150.0, 100.0), 20.0, BodyOptions::new().restitution(0.8))?;
    sim.track(Some(player));

    let script = [
        (60, InputState::default()),
        (
            120,
            InputState {
                right: true,
                ..Default::default()
            },
        ),
        (
            60,
            InputState {
                rotate_cw: true,
                ..Default::default()
            },
        ),
        (60, InputState::default()),
    ];

    let start = Instant::now();
    let mut frames = 0;
    for (duration, input) in script {
        debug!(?input, duration, "input");
        for _ in 0..duration {
            sim.frame(&input);
            frames += 1;
        }
        let body = sim.world().body(player)?;
        info!(
            x = body.position().x,
            y = body.position().y,
            angle = body.angle(),
            "player"
        );
    }

    for collision in sim.collisions() {
        debug!(a = ?collision.a, b = ?collision.b, depth = collision.depth, "contact");
    }
    let fps = frames as f64 / start.elapsed().as_secs_f64();
    info!(frames, fps, "done");
    Ok(())
}
