//! Navigation primitives and movement strategies for GOAP agents.
//!
//! [`NavGrid`] answers path queries, [`PathFollower`] executes them as a [`Locomotion`], and
//! [`MoveToStrategy`]/[`WanderStrategy`] drive locomotion from planned actions.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod beliefs;
pub mod grid;
pub mod locomotion;
pub mod math;
pub mod navigator;
pub mod sensor;
pub mod strategies;
pub mod world;

pub use beliefs::{NavBeliefsExt, SensorAccessor};
pub use grid::NavGrid;
pub use locomotion::{Locomotion, PathFollower};
pub use math::Vec2;
pub use navigator::{NavPath, Navigator};
pub use sensor::{Sensor, SensorChange};
pub use strategies::{MoveToStrategy, WanderStrategy, WANDER_RNG_STREAM};
pub use world::{reset_locomotion, NavWorldMut, NavWorldView};
