//! Separating axis test between two bodies.

use glam::DVec2;

use crate::{
    body::{Body, Shape},
    vectors::{sign, VectorExt},
};

/// Minimum penetration found by [`separating_axis_test`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
    pub depth: f64,
    /// Unit axis pointing from the second body toward the first.
    pub normal: DVec2,
}

/// Axes the pair has to be projected onto.
///
/// Two circles only need the line through their centres. A circle facing a
/// polygon or segment is tested against the directions from its centre to
/// each of the other body's vertices; every other body contributes its own
/// edge normals.
pub fn axes(a: &Body, b: &Body) -> Vec<DVec2> {
    if a.shape().is_circle() && b.shape().is_circle() {
        return vec![(b.position() - a.position()).unit()];
    }

    let mut axes = Vec::with_capacity(8);
    push_axes(&mut axes, a, b);
    push_axes(&mut axes, b, a);
    axes
}

fn push_axes(axes: &mut Vec<DVec2>, body: &Body, other: &Body) {
    match body.shape() {
        Shape::Circle { .. } => axes.extend(
            other
                .vertices()
                .iter()
                .map(|vertex| (body.position() - *vertex).unit()),
        ),
        Shape::Polygon { .. } => {
            axes.push(body.direction());
            axes.push(body.direction().normal());
        }
        Shape::Segment { .. } => axes.push(body.direction().normal()),
    }
}

/// Returns the penetration of `a` and `b`, or `None` when some axis separates
/// them. Pairs of static bodies are never reported.
///
/// When one projection strictly contains the other, the raw overlap
/// understates how far the inner body has to travel to get out, so the
/// smaller of the two end gaps is added on top.
pub fn separating_axis_test(a: &Body, b: &Body) -> Option<Penetration> {
    if a.is_static() && b.is_static() {
        return None;
    }

    let mut best: Option<Penetration> = None;
    for axis in axes(a, b) {
        let pa = a.project(axis);
        let pb = b.project(axis);

        let mut overlap = pa.overlap(&pb);
        if overlap < 0.0 {
            return None;
        }

        if pa.strictly_contains_or_within(&pb) {
            let mins = (pa.min - pb.min).abs();
            let maxs = (pa.max - pb.max).abs();
            overlap += if mins < maxs { mins } else { maxs };
        }

        if best.map_or(true, |p| overlap < p.depth) {
            let orientation = sign(a.position().dot(axis) - b.position().dot(axis));
            best = Some(Penetration {
                depth: overlap,
                normal: axis * orientation,
            });
        }
    }
    best
}
