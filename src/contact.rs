//! World space contact points for colliding pairs.

use glam::DVec2;

use crate::{
    body::{Body, Shape},
    vectors::{round_to, VectorExt, EQUALITY_PRECISION},
};

/// Closest point on the segment `start..end` to `point`, with its distance.
pub fn closest_point_on_segment(point: DVec2, start: DVec2, end: DVec2) -> (DVec2, f64) {
    let along = (end - start).unit();

    let point_to_start = start - point;
    if point_to_start.dot(along) > 0.0 {
        return (start, start.distance(point));
    }

    let end_to_point = point - end;
    if end_to_point.dot(along) > 0.0 {
        return (end, end.distance(point));
    }

    let closest = start - along * point_to_start.dot(along);
    (closest, closest.distance(point))
}

/// Contact point between two bodies already known to overlap.
pub fn contact_point(a: &Body, b: &Body) -> DVec2 {
    match (a.shape(), b.shape()) {
        (Shape::Circle { .. }, Shape::Circle { radius }) => {
            b.position() + (a.position() - b.position()).unit() * *radius
        }
        (Shape::Circle { .. }, _) => closest_on_edges(a.position(), b.shape()),
        (_, Shape::Circle { .. }) => closest_on_edges(b.position(), a.shape()),
        _ => polygon_contact(a.shape(), b.shape()),
    }
}

fn closest_on_edges(center: DVec2, shape: &Shape) -> DVec2 {
    let mut best: Option<(DVec2, f64)> = None;
    for (start, end) in shape.edges() {
        let (point, distance) = closest_point_on_segment(center, start, end);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((point, distance));
        }
    }
    // every non-circle shape has at least one edge
    best.map_or(center, |(point, _)| point)
}

/// Up to two equally close points found while searching feature pairs.
struct ClosestPoints {
    points: Vec<DVec2>,
    distance: f64,
}

impl ClosestPoints {
    fn new() -> Self {
        Self {
            points: Vec::with_capacity(2),
            distance: f64::INFINITY,
        }
    }

    fn offer(&mut self, point: DVec2, distance: f64) {
        let tie = !self.points.is_empty()
            && round_to(distance, EQUALITY_PRECISION)
                == round_to(self.distance, EQUALITY_PRECISION);
        if tie {
            if self.points.len() < 2 && !self.points[0].is_equal(point) {
                self.points.push(point);
            }
        } else if distance < self.distance {
            self.distance = distance;
            self.points.clear();
            self.points.push(point);
        }
    }

    fn representative(&self) -> Option<DVec2> {
        match self.points.as_slice() {
            [first, second] => Some((*first + *second) * 0.5),
            [only] => Some(*only),
            _ => None,
        }
    }
}

/// Searches every edge of one body against every vertex of the other, in
/// both directions. Two distinct closest points mean parallel faces are in
/// contact and their midpoint is used.
fn polygon_contact(a: &Shape, b: &Shape) -> DVec2 {
    let mut closest = ClosestPoints::new();

    for (start, end) in a.edges() {
        for vertex in b.vertices() {
            let (point, distance) = closest_point_on_segment(*vertex, start, end);
            closest.offer(point, distance);
        }
    }
    for vertex in a.vertices() {
        for (start, end) in b.edges() {
            let (point, distance) = closest_point_on_segment(*vertex, start, end);
            closest.offer(point, distance);
        }
    }

    closest
        .representative()
        .unwrap_or_else(|| a.vertices().first().copied().unwrap_or_default())
}
