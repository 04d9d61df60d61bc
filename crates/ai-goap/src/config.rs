//! Agent tunables.

use ai_core::AgentId;
use serde::{Deserialize, Serialize};

use crate::GoapPlannerConfig;

/// Per-agent loop configuration, typically loaded alongside the designer tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoapAgentConfig {
    /// Idle agents attempt to plan on every `think_every_ticks`-th tick.
    pub think_every_ticks: u32,

    /// Phase offset for `think_every_ticks`, spreading planning load across agents.
    pub think_offset_ticks: u32,

    /// Between two actions of a plan, switch to a strictly more urgent goal if one has become
    /// feasible.
    pub preempt_at_action_boundaries: bool,

    /// Planner search budget per goal.
    pub max_expansions: usize,
}

impl Default for GoapAgentConfig {
    fn default() -> Self {
        Self {
            think_every_ticks: 1,
            think_offset_ticks: 0,
            preempt_at_action_boundaries: true,
            max_expansions: GoapPlannerConfig::default().max_expansions,
        }
    }
}

impl GoapAgentConfig {
    /// Throttle idle planning, with a stable per-agent phase derived from the agent id.
    pub fn deterministic(agent: impl AgentId, think_every_ticks: u32) -> Self {
        let every = think_every_ticks.max(1);
        let offset = (agent.stable_id() % (every as u64)) as u32;
        Self {
            think_every_ticks: every,
            think_offset_ticks: offset,
            ..Self::default()
        }
    }

    pub fn should_think(&self, tick: u64) -> bool {
        let every = self.think_every_ticks.max(1) as u64;
        ((tick + (self.think_offset_ticks as u64)) % every) == 0
    }

    pub fn planner_config(&self) -> GoapPlannerConfig {
        GoapPlannerConfig {
            max_expansions: self.max_expansions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thinks_every_tick() {
        let config = GoapAgentConfig::default();
        assert!((0..10).all(|t| config.should_think(t)));
    }

    #[test]
    fn deterministic_offsets_spread_agents() {
        let a = GoapAgentConfig::deterministic(0u64, 4);
        let b = GoapAgentConfig::deterministic(1u64, 4);
        let a_ticks: Vec<u64> = (0..8).filter(|t| a.should_think(*t)).collect();
        let b_ticks: Vec<u64> = (0..8).filter(|t| b.should_think(*t)).collect();
        assert_eq!(a_ticks, vec![0, 4]);
        assert_eq!(b_ticks, vec![3, 7]);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GoapAgentConfig = serde_yaml::from_str("think_every_ticks: 5").unwrap();
        assert_eq!(config.think_every_ticks, 5);
        assert!(config.preempt_at_action_boundaries);
        assert_eq!(config.max_expansions, 4096);
    }
}
