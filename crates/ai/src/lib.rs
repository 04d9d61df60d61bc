//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! Beliefs and strategies come from [`core`], planning and the agent loop from [`goap`],
//! movement from [`nav`] and deterministic trace capture from [`tools`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use ai_nav as nav;

#[cfg(feature = "goap")]
#[cfg_attr(docsrs, doc(cfg(feature = "goap")))]
pub use ai_goap as goap;

/// The types most agent setups touch.
#[cfg(all(feature = "core", feature = "goap"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "core", feature = "goap"))))]
pub mod prelude {
    pub use ai_core::{
        AgentId, BeliefState, Beliefs, IdleStrategy, Strategy, TickContext, WorldMut, WorldView,
    };
    pub use ai_goap::{
        tick_agents, ActionBuilder, AgentState, GoapAgent, GoapAgentConfig, GoapError,
        GoapPlanner, Goal,
    };

    #[cfg(feature = "nav")]
    pub use ai_nav::{
        reset_locomotion, Locomotion, MoveToStrategy, NavBeliefsExt, NavWorldMut, NavWorldView,
        Vec2, WanderStrategy,
    };
}
