//! Real-time 2D physics for circles, boxes, line segments and
//! mass-spring soft bodies.
//!
//! # Example
//! ```rust
//! use glam::DVec2;
//! use impulse2d::{BodyOptions, InputState, SimulatorBuilder};
//!
//! let mut simulator = SimulatorBuilder::new().build();
//! let world = simulator.world_mut();
//! world
//!     .create_box(DVec2::new(0.0, 500.0), 50.0, 1000.0, BodyOptions::new().fixed(true))
//!     .unwrap();
//! let ball = world
//!     .create_circle(DVec2::new(0.0, 0.0), 20.0, BodyOptions::new().restitution(0.5))
//!     .unwrap();
//!
//! simulator.frame(&InputState::default());
//! assert!(simulator.world().body(ball).unwrap().position().y > 0.0);
//! ```

pub mod body;
pub mod broadphase;
pub mod contact;
pub mod error;
pub mod input;
pub mod resolver;
pub mod sat;
pub mod simulator;
pub mod spring;
pub mod vectors;
pub mod world;

pub use body::{Body, BodyOptions, Shape};
pub use error::{PhysicsError, Result};
pub use input::InputState;
pub use resolver::{Collision, Friction};
pub use simulator::{SimulationConfig, Simulator, SimulatorBuilder};
pub use spring::Spring;
pub use world::{BodyHandle, SoftGrid, World};
