//! Deterministic goal-oriented action planning over `ai-core` beliefs and strategies.
//!
//! [`GoapPlanner`] searches backward from a goal's desired beliefs to the agent's current belief
//! snapshot; [`GoapAgent`] owns the per-tick loop that plans, runs strategies and handles
//! preemption.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod goal;
pub mod plan;
pub mod planner;
pub mod table;

pub use action::{ActionBuilder, ActionSchema, GoapAction};
pub use agent::{tick_agents, AgentState, GoapAgent, GoapAgentBuilder, PlanStartHook};
pub use config::GoapAgentConfig;
pub use error::{GoapError, Result};
pub use goal::{Goal, GoalBuilder};
pub use plan::{ActionId, ActionPlan, GoalId};
pub use planner::{GoapPlanner, GoapPlannerConfig};
pub use table::{ActionRow, GoalRow, GoapTable, StrategyFactory};
