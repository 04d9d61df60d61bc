use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Polyline from the requested start to the requested goal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    pub points: Vec<Vec2>,
}

impl NavPath {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    /// Remaining length when standing at `position` and heading to `points[next_index]`.
    pub fn remaining_from(&self, position: Vec2, next_index: usize) -> f32 {
        let Some(next) = self.points.get(next_index) else {
            return 0.0;
        };
        position.distance(*next)
            + self.points[next_index..]
                .windows(2)
                .map(|pair| pair[0].distance(pair[1]))
                .sum::<f32>()
    }

    pub fn goal(&self) -> Option<Vec2> {
        self.points.last().copied()
    }
}

pub trait Navigator {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath>;

    /// Project a point onto the nearest navigable location.
    ///
    /// Backends that don't support projection may return `None`.
    fn nearest_point(&self, _point: Vec2) -> Option<Vec2> {
        None
    }

    /// Whether `point` lies on navigable space.
    fn is_walkable(&self, point: Vec2) -> bool {
        self.nearest_point(point)
            .is_some_and(|p| p.distance_squared(point) <= f32::EPSILON)
    }
}
