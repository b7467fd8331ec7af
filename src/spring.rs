use glam::DVec2;

use crate::{body::Body, vectors::VectorExt, world::BodyHandle};

/// Hookean spring with linear damping between two bodies.
///
/// Springs only reference bodies; they never own them. The force is added
/// straight to the acceleration accumulators, so it is independent of the
/// bodies' masses.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub rest_length: f64,
}

impl Spring {
    pub fn new(a: BodyHandle, b: BodyHandle, rest_length: f64) -> Self {
        Self { a, b, rest_length }
    }

    /// Force acting on `b`. `a` receives the negation.
    pub fn force(&self, a: &Body, b: &Body, stiffness: f64, damping: f64) -> DVec2 {
        let axis = a.position() - b.position();
        let direction = axis.unit();

        let stretch = (axis.length() - self.rest_length) * stiffness;
        let closing = direction.dot(a.velocity() - b.velocity()) * damping;

        direction * (stretch + closing)
    }

    /// Adds the spring force to both bodies' accelerations.
    pub fn apply(&self, a: &mut Body, b: &mut Body, stiffness: f64, damping: f64) {
        let force = self.force(a, b, stiffness, damping);
        a.accelerate(-force);
        b.accelerate(force);
    }

    /// Elastic energy stored at the current extension.
    pub fn potential_energy(&self, a: &Body, b: &Body, stiffness: f64) -> f64 {
        let extension = a.position().distance(b.position()) - self.rest_length;
        0.5 * stiffness * extension * extension
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::body::BodyOptions;
    use approx::assert_relative_eq;

    fn handles() -> (BodyHandle, BodyHandle) {
        (BodyHandle::new(0, 0), BodyHandle::new(1, 0))
    }

    #[test]
    fn test_stretched_spring_pulls_together() {
        let (ha, hb) = handles();
        let mut a = Body::point_mass(DVec2::ZERO, &BodyOptions::new()).unwrap();
        let mut b = Body::point_mass(DVec2::new(3.0, 0.0), &BodyOptions::new()).unwrap();
        let spring = Spring::new(ha, hb, 2.0);

        spring.apply(&mut a, &mut b, 10.0, 0.0);
        assert_relative_eq!(a.acceleration().x, 10.0);
        assert_relative_eq!(b.acceleration().x, -10.0);
    }

    #[test]
    fn test_damping_resists_separation() {
        let (ha, hb) = handles();
        let a = Body::point_mass(DVec2::ZERO, &BodyOptions::new()).unwrap();
        let b = Body::point_mass(
            DVec2::new(2.0, 0.0),
            &BodyOptions::new().velocity(DVec2::new(4.0, 0.0)),
        )
        .unwrap();
        let spring = Spring::new(ha, hb, 2.0);

        // at rest length only the damping term remains
        let force = spring.force(&a, &b, 350.0, 0.5);
        assert_relative_eq!(force.x, -2.0);
        assert_relative_eq!(force.y, 0.0);
    }

    #[test]
    fn test_coincident_bodies_produce_no_force() {
        let (ha, hb) = handles();
        let a = Body::point_mass(DVec2::ONE, &BodyOptions::new()).unwrap();
        let b = Body::point_mass(DVec2::ONE, &BodyOptions::new()).unwrap();
        let force = Spring::new(ha, hb, 5.0).force(&a, &b, 350.0, 2.75);
        assert_eq!(force, DVec2::ZERO);
    }

    #[test]
    fn test_potential_energy() {
        let (ha, hb) = handles();
        let a = Body::point_mass(DVec2::ZERO, &BodyOptions::new()).unwrap();
        let b = Body::point_mass(DVec2::new(0.0, 4.0), &BodyOptions::new()).unwrap();
        let spring = Spring::new(ha, hb, 3.0);
        assert_relative_eq!(spring.potential_energy(&a, &b, 10.0), 5.0);
    }
}
