//! Deterministic, engine-agnostic agent kernel primitives.
//!
//! Beliefs describe what an agent currently knows about its world, strategies are the runtime
//! behaviors the agent executes. Planning over them lives in `ai-goap`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod belief;
pub mod error;
pub mod rng;
pub mod strategy;
pub mod tick;
pub mod world;

pub use belief::{Belief, BeliefFn, BeliefKey, BeliefState, Beliefs};
pub use error::BeliefError;
pub use rng::{DeterministicRng, SplitMix64};
pub use strategy::{ActionStatus, IdleStrategy, Strategy};
pub use tick::TickContext;
pub use world::{AgentId, WorldMut, WorldView};
