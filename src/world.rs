use std::f64::consts::SQRT_2;

use glam::DVec2;
use tracing::{debug, trace};

use crate::{
    body::{Body, BodyOptions},
    error::{PhysicsError, Result},
    spring::Spring,
};

/// Stable reference to a body in a [`World`].
///
/// Handles carry the generation of the world they were issued in, so a
/// handle kept across [`World::reset`] is rejected instead of silently
/// pointing at whatever body now occupies its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self {
            index: index as u32,
            generation,
        }
    }

    /// Slot of the body in the world's arena.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Point masses of a soft body lattice, stored row by row.
#[derive(Clone, Debug)]
pub struct SoftGrid {
    cols: usize,
    rows: usize,
    points: Vec<BodyHandle>,
}

impl SoftGrid {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<BodyHandle> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.points.get(row * self.cols + col).copied()
    }

    pub fn points(&self) -> &[BodyHandle] {
        &self.points
    }
}

/// Registry of live bodies and springs.
///
/// Bodies are only ever appended; the sole way to remove them is a full
/// [`reset`](World::reset), which also drops every spring.
#[derive(Debug, Default)]
pub struct World {
    bodies: Vec<Body>,
    springs: Vec<Spring>,
    generation: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_circle(
        &mut self,
        position: DVec2,
        radius: f64,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        Ok(self.insert(Body::circle(position, radius, &options)?))
    }

    pub fn create_box(
        &mut self,
        position: DVec2,
        height: f64,
        width: f64,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        Ok(self.insert(Body::rectangle(position, height, width, &options)?))
    }

    pub fn create_segment(
        &mut self,
        start: DVec2,
        end: DVec2,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        Ok(self.insert(Body::segment(start, end, &options)?))
    }

    pub fn create_point_mass(
        &mut self,
        position: DVec2,
        options: BodyOptions,
    ) -> Result<BodyHandle> {
        Ok(self.insert(Body::point_mass(position, &options)?))
    }

    /// Builds a `cols` x `rows` lattice of point masses starting at `origin`.
    ///
    /// Neighbours along rows and columns get structural springs resting at
    /// `spacing`; every cell gets both diagonals as shear springs resting at
    /// `spacing·√2`.
    pub fn create_soft_grid(
        &mut self,
        origin: DVec2,
        cols: usize,
        rows: usize,
        spacing: f64,
    ) -> Result<SoftGrid> {
        if cols == 0 || rows == 0 || !(spacing.is_finite() && spacing > 0.0) {
            return Err(PhysicsError::InvalidGrid {
                cols,
                rows,
                spacing,
            });
        }
        if !origin.is_finite() {
            return Err(PhysicsError::NonFinite("position"));
        }

        let mut points = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let offset = DVec2::new(col as f64, row as f64) * spacing;
                points.push(self.create_point_mass(origin + offset, BodyOptions::new())?);
            }
        }
        let grid = SoftGrid { cols, rows, points };

        let diagonal = spacing * SQRT_2;
        let mut links = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let here = grid.points[row * cols + col];
                if col + 1 < cols {
                    links.push((here, grid.points[row * cols + col + 1], spacing));
                }
                if row + 1 < rows {
                    links.push((here, grid.points[(row + 1) * cols + col], spacing));
                }
                if col + 1 < cols && row + 1 < rows {
                    links.push((here, grid.points[(row + 1) * cols + col + 1], diagonal));
                }
                if col > 0 && row + 1 < rows {
                    links.push((here, grid.points[(row + 1) * cols + col - 1], diagonal));
                }
            }
        }
        let spring_count = links.len();
        for (a, b, rest_length) in links {
            self.springs.push(Spring::new(a, b, rest_length));
        }

        debug!(cols, rows, spacing, spring_count, "created soft grid");
        Ok(grid)
    }

    /// Connects two bodies with a spring resting at `rest_length`.
    pub fn attach_spring(&mut self, a: BodyHandle, b: BodyHandle, rest_length: f64) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(PhysicsError::SelfSpring);
        }
        if !(rest_length.is_finite() && rest_length >= 0.0) {
            return Err(PhysicsError::InvalidRestLength(rest_length));
        }
        self.springs.push(Spring::new(a, b, rest_length));
        Ok(())
    }

    /// Removes all bodies and springs. Handles issued before become stale.
    pub fn reset(&mut self) {
        debug!(
            bodies = self.bodies.len(),
            springs = self.springs.len(),
            "resetting world"
        );
        self.bodies.clear();
        self.springs.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.check(handle)?;
        Ok(&self.bodies[handle.index()])
    }

    /// Overrides the velocity of one body.
    ///
    /// This is the only way for input collaborators to drive a body; every
    /// other physics-owned field stays private to the simulation.
    pub fn set_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: DVec2,
        angular_velocity: f64,
    ) -> Result<()> {
        self.check(handle)?;
        if !velocity.is_finite() || !angular_velocity.is_finite() {
            return Err(PhysicsError::NonFinite("velocity"));
        }
        let body = &mut self.bodies[handle.index()];
        body.velocity = velocity;
        body.angular_velocity = angular_velocity;
        Ok(())
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        let generation = self.generation;
        self.bodies
            .iter()
            .enumerate()
            .map(move |(i, body)| (BodyHandle::new(i, generation), body))
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// End points of every spring, for debug line rendering.
    pub fn spring_segments(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.springs.iter().map(|spring| {
            (
                self.bodies[spring.a.index()].position(),
                self.bodies[spring.b.index()].position(),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub(crate) fn body_slice(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn handle(&self, index: usize) -> BodyHandle {
        BodyHandle::new(index, self.generation)
    }

    /// Adds every spring's force to the accelerations of its bodies.
    pub(crate) fn apply_spring_forces(&mut self, stiffness: f64, damping: f64) {
        for spring in &self.springs {
            let (a, b) = pair_mut(&mut self.bodies, spring.a.index(), spring.b.index());
            spring.apply(a, b, stiffness, damping);
        }
    }

    fn insert(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle::new(self.bodies.len(), self.generation);
        trace!(?handle, position = ?body.position(), "created body");
        self.bodies.push(body);
        handle
    }

    fn check(&self, handle: BodyHandle) -> Result<()> {
        if handle.generation != self.generation || handle.index() >= self.bodies.len() {
            return Err(PhysicsError::StaleHandle(handle));
        }
        Ok(())
    }
}

/// Mutable references to two distinct bodies.
pub(crate) fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    assert_ne!(a, b, "a body cannot interact with itself");
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_factories_append_bodies() {
        let mut world = World::new();
        let circle = world
            .create_circle(DVec2::ZERO, 1.0, BodyOptions::new())
            .unwrap();
        let rect = world
            .create_box(DVec2::ONE, 1.0, 2.0, BodyOptions::new())
            .unwrap();
        assert_eq!(world.len(), 2);
        assert_eq!(circle.index(), 0);
        assert_eq!(rect.index(), 1);
        assert_eq!(world.body(rect).unwrap().position(), DVec2::ONE);
    }

    #[test]
    fn test_failed_factory_leaves_world_unchanged() {
        let mut world = World::new();
        assert!(world
            .create_circle(DVec2::ZERO, -1.0, BodyOptions::new())
            .is_err());
        assert!(world.is_empty());
    }

    #[test]
    fn test_reset_invalidates_handles() {
        let mut world = World::new();
        let old = world
            .create_circle(DVec2::ZERO, 1.0, BodyOptions::new())
            .unwrap();
        world.reset();
        assert_eq!(world.body(old).unwrap_err(), PhysicsError::StaleHandle(old));

        let new = world
            .create_circle(DVec2::ZERO, 1.0, BodyOptions::new())
            .unwrap();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(world.attach_spring(old, new, 1.0).is_err());
    }

    #[test]
    fn test_soft_grid_springs() {
        let mut world = World::new();
        let grid = world.create_soft_grid(DVec2::ZERO, 3, 4, 10.0).unwrap();
        assert_eq!(world.len(), 12);
        assert_eq!(grid.points().len(), 12);

        // structural: 2*4 horizontal + 3*3 vertical, shear: 2 * 2*3
        assert_eq!(world.springs().len(), 8 + 9 + 12);
        let shear = world
            .springs()
            .iter()
            .filter(|spring| spring.rest_length > 10.0)
            .count();
        assert_eq!(shear, 12);

        let corner = grid.get(2, 3).unwrap();
        assert_eq!(
            world.body(corner).unwrap().position(),
            DVec2::new(20.0, 30.0)
        );
        assert!(grid.get(3, 0).is_none());
        for (_, body) in world.bodies() {
            assert_eq!(body.inverse_inertia(), 0.0);
        }
    }

    #[test]
    fn test_invalid_grid() {
        let mut world = World::new();
        assert!(matches!(
            world.create_soft_grid(DVec2::ZERO, 0, 3, 1.0),
            Err(PhysicsError::InvalidGrid { .. })
        ));
        assert!(world.create_soft_grid(DVec2::ZERO, 2, 2, 0.0).is_err());
    }

    #[test]
    fn test_attach_spring_validation() {
        let mut world = World::new();
        let a = world
            .create_point_mass(DVec2::ZERO, BodyOptions::new())
            .unwrap();
        let b = world
            .create_point_mass(DVec2::X, BodyOptions::new())
            .unwrap();
        assert_eq!(world.attach_spring(a, a, 1.0), Err(PhysicsError::SelfSpring));
        assert_eq!(
            world.attach_spring(a, b, -1.0),
            Err(PhysicsError::InvalidRestLength(-1.0))
        );
        world.attach_spring(a, b, 1.0).unwrap();
        let segments: Vec<_> = world.spring_segments().collect();
        assert_eq!(segments, vec![(DVec2::ZERO, DVec2::X)]);
    }

    #[test]
    fn test_set_velocity() {
        let mut world = World::new();
        let handle = world
            .create_box(DVec2::ZERO, 1.0, 1.0, BodyOptions::new())
            .unwrap();
        world
            .set_velocity(handle, DVec2::new(20.0, 0.0), 0.5)
            .unwrap();
        let body = world.body(handle).unwrap();
        assert_eq!(body.velocity(), DVec2::new(20.0, 0.0));
        assert_eq!(body.angular_velocity(), 0.5);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut bodies = vec![
            Body::point_mass(DVec2::ZERO, &BodyOptions::new()).unwrap(),
            Body::point_mass(DVec2::X, &BodyOptions::new()).unwrap(),
        ];
        let (a, b) = pair_mut(&mut bodies, 1, 0);
        assert_eq!(a.position(), DVec2::X);
        assert_eq!(b.position(), DVec2::ZERO);
    }
}
