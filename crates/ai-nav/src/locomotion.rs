use crate::{NavPath, Navigator, Vec2};

/// Movement executor driven by movement strategies.
///
/// Requests are fire-and-forget: the executor resolves and follows paths on its own schedule
/// and strategies poll it for progress.
pub trait Locomotion {
    /// Replace the current destination. Path resolution may be deferred.
    fn request_move(&mut self, destination: Vec2);

    fn destination(&self) -> Option<Vec2>;

    /// A path to the current destination has been resolved and is being followed.
    fn has_path(&self) -> bool;

    /// A destination was requested but its path is not resolved yet.
    fn path_pending(&self) -> bool;

    /// The last requested destination turned out to be unreachable.
    fn path_failed(&self) -> bool;

    /// Distance left along the current path; `f32::INFINITY` without one.
    fn remaining_distance(&self) -> f32;

    /// Drop the destination and any path state.
    fn reset_path(&mut self);
}

/// Reference [`Locomotion`]: resolves paths lazily through a [`Navigator`] and moves at a
/// fixed speed along them.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    position: Vec2,
    speed: f32,
    destination: Option<Vec2>,
    path: Option<NavPath>,
    next_index: usize,
    pending: bool,
    failed: bool,
}

impl PathFollower {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            speed: speed.max(0.0),
            destination: None,
            path: None,
            next_index: 1,
            pending: false,
            failed: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport; any path in progress is re-resolved from the new position.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        if self.destination.is_some() {
            self.path = None;
            self.next_index = 1;
            self.pending = true;
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    /// Resolve a pending path, then advance along it for `dt` seconds. Returns the new position.
    pub fn step(&mut self, navigator: &dyn Navigator, dt: f32) -> Vec2 {
        if self.pending {
            self.pending = false;
            self.next_index = 1;
            self.path = self
                .destination
                .and_then(|goal| navigator.find_path(self.position, goal));
            self.failed = self.path.is_none();
        }

        let Some(path) = &self.path else {
            return self.position;
        };

        let mut budget = self.speed * dt.max(0.0);
        let mut current = self.position;
        while self.next_index < path.points.len() && budget > 0.0 {
            let target = path.points[self.next_index];
            let to_target = target - current;
            let dist = to_target.length();

            if dist <= f32::EPSILON {
                self.next_index += 1;
                continue;
            }

            if budget >= dist {
                current = target;
                self.next_index += 1;
                budget -= dist;
                continue;
            }

            current += to_target * (budget / dist);
            break;
        }

        self.position = current;
        current
    }

    pub fn is_moving(&self) -> bool {
        self.pending
            || self
                .path
                .as_ref()
                .is_some_and(|path| self.next_index < path.points.len())
    }
}

impl Locomotion for PathFollower {
    fn request_move(&mut self, destination: Vec2) {
        self.destination = Some(destination);
        self.path = None;
        self.next_index = 1;
        self.pending = true;
        self.failed = false;
    }

    fn destination(&self) -> Option<Vec2> {
        self.destination
    }

    fn has_path(&self) -> bool {
        self.path.is_some()
    }

    fn path_pending(&self) -> bool {
        self.pending
    }

    fn path_failed(&self) -> bool {
        self.failed
    }

    fn remaining_distance(&self) -> f32 {
        self.path
            .as_ref()
            .map_or(f32::INFINITY, |path| {
                path.remaining_from(self.position, self.next_index)
            })
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.path = None;
        self.next_index = 1;
        self.pending = false;
        self.failed = false;
    }
}
