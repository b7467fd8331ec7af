use std::f64::consts::PI;

use glam::DVec2;

use crate::{
    error::{PhysicsError, Result},
    vectors::{rotation_matrix, VectorExt},
};

/// Radius given to point masses so they still take part in collisions.
pub const POINT_MASS_RADIUS: f64 = 0.001;

const DEFAULT_RESTITUTION: f64 = 0.25;
const SEGMENT_RESTITUTION: f64 = 1.0;
const SEGMENT_MASS: f64 = 1.0;

/// Closed interval of a body projected onto an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Length of the shared part of both intervals. Negative when they are apart.
    pub fn overlap(&self, other: &Interval) -> f64 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.overlap(other) >= 0.0
    }

    /// True when one interval lies strictly inside the other.
    pub fn strictly_contains_or_within(&self, other: &Interval) -> bool {
        (self.max > other.max && self.min < other.min)
            || (self.max < other.max && self.min > other.min)
    }
}

/// Geometry of a body. Vertex lists are derived from position and direction
/// and rewritten after every integration.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle {
        radius: f64,
    },
    Polygon {
        width: f64,
        height: f64,
        vertices: [DVec2; 4],
    },
    Segment {
        length: f64,
        vertices: [DVec2; 2],
    },
}

impl Shape {
    /// World space vertices. Circles have none.
    pub fn vertices(&self) -> &[DVec2] {
        match self {
            Shape::Circle { .. } => &[],
            Shape::Polygon { vertices, .. } => vertices,
            Shape::Segment { vertices, .. } => vertices,
        }
    }

    /// Closed loop of edges `(v[i], v[i + 1 mod n])`.
    /// A segment yields its edge in both directions.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let vertices = self.vertices();
        let n = vertices.len();
        (0..n).map(move |i| (vertices[i], vertices[(i + 1) % n]))
    }

    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle { .. })
    }

    fn translate(&mut self, delta: DVec2) {
        match self {
            Shape::Circle { .. } => {}
            Shape::Polygon { vertices, .. } => vertices.iter_mut().for_each(|v| *v += delta),
            Shape::Segment { vertices, .. } => vertices.iter_mut().for_each(|v| *v += delta),
        }
    }

    fn recompute(&mut self, position: DVec2, direction: DVec2) {
        match self {
            Shape::Circle { .. } => {}
            Shape::Polygon {
                width,
                height,
                vertices,
            } => *vertices = box_vertices(position, direction, *width, *height),
            Shape::Segment { length, vertices } => {
                let half = direction * (*length / 2.0);
                *vertices = [position - half, position + half];
            }
        }
    }
}

fn box_vertices(position: DVec2, direction: DVec2, width: f64, height: f64) -> [DVec2; 4] {
    let half_width = direction * (width / 2.0);
    let half_height = direction.unit().normal() * (height / 2.0);
    [
        position - half_width + half_height,
        position + half_width + half_height,
        position + half_width - half_height,
        position - half_width - half_height,
    ]
}

/// Optional construction parameters shared by all body factories.
///
/// Anything left unset falls back to the default of the factory it is passed
/// to, so segments default to static and perfectly elastic while every other
/// shape defaults to dynamic with a restitution of `0.25`.
#[derive(Clone, Debug, Default)]
pub struct BodyOptions {
    fixed: Option<bool>,
    restitution: Option<f64>,
    mass: Option<f64>,
    velocity: DVec2,
    angle: f64,
}

impl BodyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Static bodies never move and have zero inverse mass and inertia.
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = Some(fixed);
        self
    }

    /// Bounciness between `0.0` (inelastic) and `1.0` (elastic).
    pub fn restitution(mut self, restitution: f64) -> Self {
        self.restitution = Some(restitution);
        self
    }

    /// Overrides the mass derived from the shape's area.
    /// Required meaning for segments, which have no area.
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Initial linear velocity.
    pub fn velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Initial orientation in radians. Only boxes use it.
    pub fn angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(restitution) = self.restitution {
            if !(0.0..=1.0).contains(&restitution) {
                return Err(PhysicsError::InvalidRestitution(restitution));
            }
        }
        if let Some(mass) = self.mass {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(PhysicsError::InvalidMass(mass));
            }
        }
        if !self.velocity.is_finite() {
            return Err(PhysicsError::NonFinite("velocity"));
        }
        if !self.angle.is_finite() {
            return Err(PhysicsError::NonFinite("angle"));
        }
        Ok(())
    }
}

/// A rigid body with one of the supported [`Shape`]s.
#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) shape: Shape,
    pub(crate) position: DVec2,
    pub(crate) velocity: DVec2,
    pub(crate) acceleration: DVec2,
    pub(crate) angle: f64,
    pub(crate) angular_velocity: f64,
    pub(crate) angular_acceleration: f64,
    pub(crate) direction: DVec2,
    reference_direction: DVec2,
    fixed: bool,
    restitution: f64,
    mass: f64,
    inverse_mass: f64,
    inertia: f64,
    inverse_inertia: f64,
}

impl Body {
    /// Solid disc. Mass defaults to `π·r²`, inertia is `m·r²/2`.
    pub fn circle(position: DVec2, radius: f64, options: &BodyOptions) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidRadius(radius));
        }
        options.validate()?;
        let mass = options.mass.unwrap_or(PI * radius * radius);
        let inertia = mass * radius * radius / 2.0;
        Self::assemble(
            Shape::Circle { radius },
            position,
            DVec2::X,
            options,
            DEFAULT_RESTITUTION,
            false,
            mass,
            inertia,
        )
    }

    /// Rectangle centred on `position`, rotated by `options.angle`.
    /// Mass defaults to `width·height`, inertia is `m·(h²+w²)/12`.
    pub fn rectangle(
        position: DVec2,
        height: f64,
        width: f64,
        options: &BodyOptions,
    ) -> Result<Self> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if !valid(width) || !valid(height) {
            return Err(PhysicsError::InvalidDimensions { width, height });
        }
        options.validate()?;
        let mass = options.mass.unwrap_or(width * height);
        let inertia = mass * (height * height + width * width) / 12.0;
        let shape = Shape::Polygon {
            width,
            height,
            vertices: [DVec2::ZERO; 4],
        };
        let mut body = Self::assemble(
            shape,
            position,
            DVec2::X,
            options,
            DEFAULT_RESTITUTION,
            false,
            mass,
            inertia,
        )?;
        body.angle = options.angle;
        body.direction = rotation_matrix(body.angle) * body.reference_direction;
        body.shape.recompute(body.position, body.direction);
        Ok(body)
    }

    /// Line segment between `start` and `end`, positioned at its midpoint.
    /// Defaults to static, elastic and a mass of `1`; inertia is `m·L²/12`.
    pub fn segment(start: DVec2, end: DVec2, options: &BodyOptions) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(PhysicsError::NonFinite("segment endpoint"));
        }
        let length = start.distance(end);
        if length == 0.0 {
            return Err(PhysicsError::DegenerateSegment {
                x: start.x,
                y: start.y,
            });
        }
        options.validate()?;
        let mass = options.mass.unwrap_or(SEGMENT_MASS);
        let inertia = mass * length * length / 12.0;
        let shape = Shape::Segment {
            length,
            vertices: [start, end],
        };
        let mut body = Self::assemble(
            shape,
            (start + end) * 0.5,
            (end - start).unit(),
            options,
            SEGMENT_RESTITUTION,
            true,
            mass,
            inertia,
        )?;
        // keep the exact endpoints instead of the midpoint reconstruction
        body.shape = Shape::Segment {
            length,
            vertices: [start, end],
        };
        Ok(body)
    }

    /// Tiny circle that never spins. Used as the node of soft body lattices.
    pub fn point_mass(position: DVec2, options: &BodyOptions) -> Result<Self> {
        let mut body = Self::circle(position, POINT_MASS_RADIUS, options)?;
        body.inertia = 0.0;
        body.inverse_inertia = 0.0;
        Ok(body)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        shape: Shape,
        position: DVec2,
        direction: DVec2,
        options: &BodyOptions,
        default_restitution: f64,
        default_fixed: bool,
        mass: f64,
        inertia: f64,
    ) -> Result<Self> {
        if !position.is_finite() {
            return Err(PhysicsError::NonFinite("position"));
        }
        let fixed = options.fixed.unwrap_or(default_fixed);
        let (mass, inverse_mass) = Self::mass_pair(fixed, mass);
        let (inertia, inverse_inertia) = Self::mass_pair(fixed, inertia);

        let mut body = Self {
            shape,
            position,
            velocity: options.velocity,
            acceleration: DVec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
            direction,
            reference_direction: direction,
            fixed,
            restitution: options.restitution.unwrap_or(default_restitution),
            mass,
            inverse_mass,
            inertia,
            inverse_inertia,
        };
        body.shape.recompute(body.position, body.direction);
        Ok(body)
    }

    fn mass_pair(fixed: bool, value: f64) -> (f64, f64) {
        if fixed || value == 0.0 {
            (0.0, 0.0)
        } else {
            (value, 1.0 / value)
        }
    }

    /// Advances the body by `dt` with semi-implicit Euler.
    ///
    /// The direction is rebuilt from the accumulated angle rather than rotated
    /// incrementally, so small rotations never drift.
    pub fn integrate(&mut self, dt: f64, air_resistance: f64) {
        let drag = 1.0 - air_resistance;

        self.velocity += self.acceleration * dt;
        self.velocity *= drag;
        self.position += self.velocity * dt;

        self.angular_velocity += self.angular_acceleration * dt;
        self.angular_velocity *= drag;
        self.angle += self.angular_velocity * dt;

        self.direction = rotation_matrix(self.angle) * self.reference_direction;
        self.shape.recompute(self.position, self.direction);
    }

    /// Rigidly shifts the body and its vertices. Velocity is untouched.
    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;
        self.shape.translate(delta);
    }

    /// Projects the body onto `axis`, which does not need to be normalised.
    pub fn project(&self, axis: DVec2) -> Interval {
        let axis = axis.unit();
        match &self.shape {
            Shape::Circle { radius } => {
                let center = axis.dot(self.position);
                Interval {
                    min: center - radius,
                    max: center + radius,
                }
            }
            shape => shape.vertices().iter().fold(
                Interval {
                    min: f64::INFINITY,
                    max: f64::NEG_INFINITY,
                },
                |interval, vertex| {
                    let distance = axis.dot(*vertex);
                    Interval {
                        min: interval.min.min(distance),
                        max: interval.max.max(distance),
                    }
                },
            ),
        }
    }

    pub(crate) fn accelerate(&mut self, acceleration: DVec2) {
        self.acceleration += acceleration;
    }

    pub(crate) fn clear_accelerations(&mut self) {
        self.acceleration = DVec2::ZERO;
        self.angular_acceleration = 0.0;
    }

    /// Velocity of the material point at `point`, including the spin.
    pub fn velocity_at(&self, point: DVec2) -> DVec2 {
        self.velocity + (point - self.position).normal() * self.angular_velocity
    }

    pub(crate) fn apply_impulse(&mut self, impulse: DVec2, arm: DVec2) {
        self.velocity += impulse * self.inverse_mass;
        self.angular_velocity += self.inverse_inertia * arm.cross(impulse);
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn vertices(&self) -> &[DVec2] {
        self.shape.vertices()
    }

    /// Radius for circles and point masses.
    pub fn radius(&self) -> Option<f64> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            _ => None,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Current unit direction, the reference direction rotated by the angle.
    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn is_static(&self) -> bool {
        self.fixed
    }

    pub fn restitution(&self) -> f64 {
        self.restitution
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn inverse_inertia(&self) -> f64 {
        self.inverse_inertia
    }
}
