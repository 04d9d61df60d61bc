use core::fmt::Debug;

use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A discrete change in what a [`Sensor`] is tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorChange<T> {
    Acquired(T),
    Lost(T),
    Switched { from: T, to: T },
}

impl<T: Copy> SensorChange<T> {
    /// The target tracked after the change, if any.
    pub fn current(&self) -> Option<T> {
        match *self {
            SensorChange::Acquired(target) => Some(target),
            SensorChange::Lost(_) => None,
            SensorChange::Switched { to, .. } => Some(to),
        }
    }
}

/// Radius detector tracking the nearest candidate in range.
///
/// [`Sensor::update`] reports a [`SensorChange`] at most once per discrete change, which the
/// owner typically forwards as a replan request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sensor<T = u64> {
    radius: f32,
    target: Option<(T, Vec2)>,
}

impl<T> Sensor<T>
where
    T: Copy + PartialEq + Debug,
{
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            target: None,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn target(&self) -> Option<T> {
        self.target.map(|(id, _)| id)
    }

    pub fn target_position(&self) -> Option<Vec2> {
        self.target.map(|(_, position)| position)
    }

    pub fn target_is_known(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_in_range(&self, origin: Vec2, point: Vec2) -> bool {
        origin.distance_squared(point) <= self.radius * self.radius
    }

    /// Re-scan `candidates` from `origin`. The nearest one in range becomes the target; equally
    /// near candidates resolve to the first listed.
    pub fn update<I>(&mut self, origin: Vec2, candidates: I) -> Option<SensorChange<T>>
    where
        I: IntoIterator<Item = (T, Vec2)>,
    {
        let mut nearest: Option<(f32, T, Vec2)> = None;
        for (id, position) in candidates {
            if !self.is_in_range(origin, position) {
                continue;
            }
            let d = origin.distance_squared(position);
            if nearest.map_or(true, |(best, _, _)| d < best) {
                nearest = Some((d, id, position));
            }
        }

        let previous = self.target();
        self.target = nearest.map(|(_, id, position)| (id, position));
        match (previous, self.target()) {
            (None, None) => None,
            (None, Some(to)) => Some(SensorChange::Acquired(to)),
            (Some(from), None) => Some(SensorChange::Lost(from)),
            (Some(from), Some(to)) if from != to => Some(SensorChange::Switched { from, to }),
            (Some(_), Some(_)) => None,
        }
    }

    pub fn clear(&mut self) -> Option<SensorChange<T>> {
        self.target.take().map(|(id, _)| SensorChange::Lost(id))
    }
}
