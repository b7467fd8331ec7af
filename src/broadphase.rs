//! Sort and sweep broad phase.
//!
//! Bodies are kept in an ordering by the lower end of their x projection.
//! Between substeps bodies barely move, so the ordering is repaired with an
//! insertion sort which runs in near linear time on almost sorted input.

use glam::DVec2;

use crate::body::{Body, Interval};

/// Candidate collision pairs as `(earlier, later)` body indices in sweep order.
pub type CandidatePair = (usize, usize);

#[derive(Debug, Default)]
pub struct SweepAndPrune {
    order: Vec<usize>,
    x_intervals: Vec<Interval>,
    y_intervals: Vec<Interval>,
    active: Vec<usize>,
}

impl SweepAndPrune {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sweep order as indices into the body slice.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Re-projects every body and restores the sweep order.
    pub fn update(&mut self, bodies: &[Body]) {
        self.sync(bodies.len());

        self.x_intervals.clear();
        self.y_intervals.clear();
        for body in bodies {
            self.x_intervals.push(body.project(DVec2::X));
            self.y_intervals.push(body.project(DVec2::Y));
        }

        self.insertion_sort();
    }

    /// Sweeps the ordering and returns every pair overlapping on both axes.
    ///
    /// Must be called after [`update`](Self::update) with the same bodies.
    pub fn candidate_pairs(&mut self) -> Vec<CandidatePair> {
        let mut pairs = Vec::new();
        self.active.clear();

        for &current in &self.order {
            let x = self.x_intervals[current];
            let y = self.y_intervals[current];
            self.active.retain(|&other| {
                if !self.x_intervals[other].overlaps(&x) {
                    return false;
                }
                if self.y_intervals[other].overlaps(&y) {
                    pairs.push((other, current));
                }
                true
            });
            self.active.push(current);
        }

        pairs
    }

    // Keeps `order` a permutation of `0..len` without discarding the
    // existing, mostly sorted arrangement.
    fn sync(&mut self, len: usize) {
        if self.order.len() > len {
            self.order.retain(|&i| i < len);
        }
        let known = self.order.len();
        self.order.extend(known..len);
    }

    fn insertion_sort(&mut self) {
        for i in 1..self.order.len() {
            let key = self.order[i];
            let key_min = self.x_intervals[key].min;
            let mut j = i;
            while j > 0 && self.x_intervals[self.order[j - 1]].min > key_min {
                self.order[j] = self.order[j - 1];
                j -= 1;
            }
            self.order[j] = key;
        }
    }
}
