//! Collision response: de-penetration followed by normal and friction
//! impulses at the contact point.

use glam::DVec2;

use crate::{
    body::Body,
    sat::Penetration,
    vectors::VectorExt,
    world::{pair_mut, BodyHandle},
};

/// A colliding pair found in the current substep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub depth: f64,
    /// Unit normal pointing from `b` toward `a`.
    pub normal: DVec2,
    pub contact_point: DVec2,
}

impl Collision {
    pub fn new(
        a: BodyHandle,
        b: BodyHandle,
        penetration: Penetration,
        contact_point: DVec2,
    ) -> Self {
        Self {
            a,
            b,
            depth: penetration.depth,
            normal: penetration.normal,
            contact_point,
        }
    }
}

/// Coulomb friction coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Friction {
    pub static_coefficient: f64,
    pub dynamic_coefficient: f64,
}

impl Default for Friction {
    fn default() -> Self {
        Self {
            static_coefficient: 0.6,
            dynamic_coefficient: 0.3,
        }
    }
}

/// Resolves one collision in place: positional correction, then impulses.
pub fn resolve(bodies: &mut [Body], collision: &Collision, friction: &Friction) {
    let (a, b) = pair_mut(bodies, collision.a.index(), collision.b.index());
    correct_position(a, b, collision.depth, collision.normal);
    apply_impulses(a, b, collision.normal, collision.contact_point, friction);
}

/// Pushes the bodies apart along `normal`, each in proportion to its inverse
/// mass. Static bodies stay put.
pub fn correct_position(a: &mut Body, b: &mut Body, depth: f64, normal: DVec2) {
    let total_inverse_mass = a.inverse_mass() + b.inverse_mass();
    if total_inverse_mass == 0.0 {
        return;
    }
    let escape = normal * (depth / total_inverse_mass);
    a.translate(escape * a.inverse_mass());
    b.translate(escape * -b.inverse_mass());
}

/// Applies the restitution impulse along `normal` and a friction impulse
/// along the contact tangent. Nothing happens when the bodies are already
/// separating.
pub fn apply_impulses(
    a: &mut Body,
    b: &mut Body,
    normal: DVec2,
    contact_point: DVec2,
    friction: &Friction,
) {
    let arm_a = contact_point - a.position();
    let arm_b = contact_point - b.position();

    let relative = a.velocity_at(contact_point) - b.velocity_at(contact_point);
    if relative.dot(normal) > 0.0 {
        return;
    }

    let Some(normal_impulse) = impulse_magnitude(a, b, arm_a, arm_b, relative, normal) else {
        return;
    };
    let restitution = a.restitution().min(b.restitution());
    let normal_impulse = normal_impulse * (1.0 + restitution);

    let impulse = normal * normal_impulse;
    a.apply_impulse(impulse, arm_a);
    b.apply_impulse(-impulse, arm_b);

    let relative = a.velocity_at(contact_point) - b.velocity_at(contact_point);
    let tangent = (relative - normal * relative.dot(normal)).unit();

    let Some(tangent_impulse) = impulse_magnitude(a, b, arm_a, arm_b, relative, tangent) else {
        return;
    };
    let friction_impulse = if tangent_impulse.abs() <= normal_impulse * friction.static_coefficient
    {
        tangent * tangent_impulse
    } else {
        tangent * (-normal_impulse * friction.dynamic_coefficient)
    };

    a.apply_impulse(friction_impulse, arm_a);
    b.apply_impulse(-friction_impulse, arm_b);
}

/// Impulse along `direction` that cancels the relative velocity component
/// in that direction, or `None` when neither body can respond.
fn impulse_magnitude(
    a: &Body,
    b: &Body,
    arm_a: DVec2,
    arm_b: DVec2,
    relative: DVec2,
    direction: DVec2,
) -> Option<f64> {
    let angular_a = arm_a.cross(direction).powi(2) * a.inverse_inertia();
    let angular_b = arm_b.cross(direction).powi(2) * b.inverse_inertia();
    let denominator = a.inverse_mass() + b.inverse_mass() + angular_a + angular_b;
    if denominator == 0.0 {
        return None;
    }
    Some(-relative.dot(direction) / denominator)
}
