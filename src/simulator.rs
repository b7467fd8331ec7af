use glam::DVec2;
use tracing::{trace, warn};

use crate::{
    broadphase::SweepAndPrune,
    contact::contact_point,
    input::InputState,
    resolver::{resolve, Collision, Friction},
    sat::separating_axis_test,
    world::{BodyHandle, World},
};

/// Tunable constants of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub gravity: DVec2,
    pub air_resistance: f64,
    pub friction: Friction,
    pub spring_stiffness: f64,
    pub spring_damping: f64,
    pub delta_time: f64,
    pub substeps: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: DVec2::new(0.0, 21.0 * 2.75),
            air_resistance: 0.0000025,
            friction: Friction::default(),
            spring_stiffness: 350.0,
            spring_damping: 2.75,
            delta_time: 0.5 / 60.0,
            substeps: 16,
        }
    }
}

/// Owns the [`World`] and advances it in fixed substeps.
///
/// Each substep applies springs, integrates every dynamic body, runs the
/// broad and narrow phase and resolves the resulting collisions in the order
/// they were found.
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    world: World,
    broad_phase: SweepAndPrune,
    collisions: Vec<Collision>,
    tracked: Option<BodyHandle>,
}

impl Simulator {
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::default()
    }

    /// Runs one frame: applies `input` to the tracked body, then performs the
    /// configured number of substeps.
    pub fn frame(&mut self, input: &InputState) {
        if let Some(handle) = self.tracked {
            let driven =
                self.world
                    .set_velocity(handle, input.velocity(), input.angular_velocity());
            if let Err(err) = driven {
                warn!(%err, "dropping tracked body");
                self.tracked = None;
            }
        }

        for _ in 0..self.config.substeps {
            self.step();
        }
    }

    /// Advances the simulation by a single substep of `delta_time`.
    pub fn step(&mut self) {
        let SimulationConfig {
            gravity,
            air_resistance,
            friction,
            spring_stiffness,
            spring_damping,
            delta_time,
            ..
        } = self.config;

        self.world
            .apply_spring_forces(spring_stiffness, spring_damping);

        for body in self.world.bodies_mut() {
            if !body.is_static() {
                body.accelerate(gravity);
                body.integrate(delta_time, air_resistance);
            }
            body.clear_accelerations();
        }

        let bodies = self.world.body_slice();
        self.broad_phase.update(bodies);
        let candidates = self.broad_phase.candidate_pairs();

        self.collisions.clear();
        for &(i, j) in &candidates {
            let (a, b) = (&bodies[i], &bodies[j]);
            if let Some(penetration) = separating_axis_test(a, b) {
                let point = contact_point(a, b);
                self.collisions.push(Collision::new(
                    self.world.handle(i),
                    self.world.handle(j),
                    penetration,
                    point,
                ));
            }
        }
        trace!(
            candidates = candidates.len(),
            collisions = self.collisions.len(),
            "substep"
        );

        let bodies = self.world.bodies_mut();
        for collision in &self.collisions {
            resolve(bodies, collision, &friction);
        }
    }

    /// Clears every body and spring and forgets the tracked body.
    pub fn reset_world(&mut self) {
        self.world.reset();
        self.collisions.clear();
        self.tracked = None;
    }

    /// Selects the body driven by [`InputState`] in [`frame`](Self::frame).
    pub fn track(&mut self, handle: Option<BodyHandle>) {
        self.tracked = handle;
    }

    pub fn tracked(&self) -> Option<BodyHandle> {
        self.tracked
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Collisions found in the most recent substep.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SimulationConfig) {
        self.config = config;
    }
}

/// Builder for `Simulator`
#[derive(Default)]
pub struct SimulatorBuilder {
    config: SimulationConfig,
}

impl SimulatorBuilder {
    /// Get a Instance of `SimulatorBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant acceleration added to every dynamic body.
    /// Screen coordinates are assumed, so positive y points down.
    pub fn gravity(mut self, gravity: DVec2) -> Self {
        self.config.gravity = gravity;
        self
    }

    /// Fraction of linear and angular velocity lost per substep.
    /// `0.0` -> No drag
    pub fn air_resistance(mut self, air_resistance: f64) -> Self {
        self.config.air_resistance = air_resistance;
        self
    }

    /// Largest friction impulse, relative to the normal impulse, that can
    /// stop sliding completely.
    pub fn static_friction(mut self, coefficient: f64) -> Self {
        self.config.friction.static_coefficient = coefficient;
        self
    }

    /// Friction impulse, relative to the normal impulse, applied while sliding.
    pub fn dynamic_friction(mut self, coefficient: f64) -> Self {
        self.config.friction.dynamic_coefficient = coefficient;
        self
    }

    /// How strongly springs pull back towards their resting length.
    pub fn spring_stiffness(mut self, stiffness: f64) -> Self {
        self.config.spring_stiffness = stiffness;
        self
    }

    /// How strongly springs resist their ends moving apart or together.
    /// `0.0` -> Undamped oscillation
    pub fn spring_damping(mut self, damping: f64) -> Self {
        self.config.spring_damping = damping;
        self
    }

    /// How much time a substep simulates, in seconds.
    /// Smaller steps are more stable but make every frame cover less time.
    pub fn delta_time(mut self, delta_time: f64) -> Self {
        self.config.delta_time = delta_time;
        self
    }

    /// Number of substeps run by a single `frame` call.
    pub fn substeps(mut self, substeps: usize) -> Self {
        self.config.substeps = substeps;
        self
    }

    /// Constructs a instance of `Simulator` with an empty world
    pub fn build(self) -> Simulator {
        Simulator {
            config: self.config,
            world: World::new(),
            broad_phase: SweepAndPrune::new(),
            collisions: Vec::new(),
            tracked: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::body::BodyOptions;
    use approx::assert_relative_eq;

    fn weightless() -> Simulator {
        Simulator::builder()
            .gravity(DVec2::ZERO)
            .air_resistance(0.0)
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let sim = SimulatorBuilder::new().build();
        assert_eq!(sim.config(), &SimulationConfig::default());
        assert_eq!(sim.config().substeps, 16);
        assert_relative_eq!(sim.config().gravity.y, 57.75);
    }

    #[test]
    fn test_static_bodies_never_move() {
        let mut sim = Simulator::builder().build();
        let floor = sim
            .world_mut()
            .create_box(DVec2::ZERO, 10.0, 10.0, BodyOptions::new().fixed(true))
            .unwrap();
        sim.frame(&InputState::default());
        assert_eq!(sim.world().body(floor).unwrap().position(), DVec2::ZERO);
    }

    #[test]
    fn test_gravity_accelerates_dynamic_bodies() {
        let mut sim = Simulator::builder().air_resistance(0.0).build();
        let ball = sim
            .world_mut()
            .create_circle(DVec2::ZERO, 1.0, BodyOptions::new())
            .unwrap();
        sim.step();
        let body = sim.world().body(ball).unwrap();
        let dt = sim.config().delta_time;
        assert_relative_eq!(body.velocity().y, 57.75 * dt);
        assert_relative_eq!(body.position().y, 57.75 * dt * dt);
        assert_eq!(body.acceleration(), DVec2::ZERO);
    }

    #[test]
    fn test_overlapping_circles_are_pushed_apart() {
        let mut sim = weightless();
        let a = sim
            .world_mut()
            .create_circle(DVec2::ZERO, 1.0, BodyOptions::new())
            .unwrap();
        let b = sim
            .world_mut()
            .create_circle(DVec2::new(1.5, 0.0), 1.0, BodyOptions::new())
            .unwrap();
        sim.step();

        assert_eq!(sim.collisions().len(), 1);
        let collision = sim.collisions()[0];
        assert_eq!((collision.a, collision.b), (a, b));
        assert_relative_eq!(collision.depth, 0.5);

        let distance = sim
            .world()
            .body(a)
            .unwrap()
            .position()
            .distance(sim.world().body(b).unwrap().position());
        assert_relative_eq!(distance, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_runs_all_substeps_and_drives_tracked_body() {
        let mut sim = weightless();
        let player = sim
            .world_mut()
            .create_box(DVec2::ZERO, 1.0, 1.0, BodyOptions::new())
            .unwrap();
        sim.track(Some(player));
        let input = InputState {
            right: true,
            ..Default::default()
        };
        sim.frame(&input);

        let body = sim.world().body(player).unwrap();
        let elapsed = sim.config().delta_time * sim.config().substeps as f64;
        assert_eq!(body.velocity(), DVec2::new(20.0, 0.0));
        assert_relative_eq!(body.position().x, 20.0 * elapsed, epsilon = 1e-9);
    }

    #[test]
    fn test_stale_tracked_body_is_dropped() {
        let mut sim = weightless();
        let player = sim
            .world_mut()
            .create_circle(DVec2::ZERO, 1.0, BodyOptions::new())
            .unwrap();
        sim.track(Some(player));
        sim.world_mut().reset();
        sim.frame(&InputState::default());
        assert_eq!(sim.tracked(), None);
    }

    #[test]
    fn test_reset_world_clears_everything() {
        let mut sim = Simulator::builder().build();
        sim.world_mut()
            .create_soft_grid(DVec2::ZERO, 2, 2, 5.0)
            .unwrap();
        sim.frame(&InputState::default());
        sim.reset_world();
        assert!(sim.world().is_empty());
        assert!(sim.world().springs().is_empty());
        assert!(sim.collisions().is_empty());
        sim.step();
    }
}
