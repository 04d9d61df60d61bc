//! Scenario files: world layout, agent tunables and the designer table in one YAML document.

use std::collections::BTreeMap;
use std::path::Path;

use ai_goap::{GoapAgentConfig, GoapTable};
use ai_nav::Vec2;
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::strategies::StrategySpec;

/// Built-in patrol scenario used when no file is given.
pub const DEFAULT_SCENARIO: &str = include_str!("../assets/patrol.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub agent: GoapAgentConfig,
    pub world: WorldConfig,
    pub table: GoapTable<StrategySpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    /// ASCII map rows, `#` blocked.
    pub map: Vec<String>,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    pub agent_start: [f32; 2],
    #[serde(default = "default_agent_speed")]
    pub agent_speed: f32,
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f32,
    /// Named points; each gets an `AgentAt<Name>` location belief.
    #[serde(default)]
    pub locations: BTreeMap<String, [f32; 2]>,
    #[serde(default = "default_location_radius")]
    pub location_radius: f32,
    pub player: PlayerConfig,
    pub chase_radius: f32,
    pub attack_radius: f32,
    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    /// Patrol loop the player walks forever.
    pub waypoints: Vec<[f32; 2]>,
    #[serde(default = "default_player_speed")]
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub health: f32,
    pub stamina: f32,
    /// Health lost per second.
    pub health_decay: f32,
    /// Stamina lost per second while moving.
    pub stamina_decay: f32,
    pub health_low: f32,
    pub health_ok: f32,
    pub stamina_low: f32,
    pub stamina_ok: f32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            health: 100.0,
            stamina: 100.0,
            health_decay: 2.0,
            stamina_decay: 5.0,
            health_low: 30.0,
            health_ok: 50.0,
            stamina_low: 10.0,
            stamina_ok: 50.0,
        }
    }
}

fn default_cell_size() -> f32 {
    1.0
}

fn default_agent_speed() -> f32 {
    3.0
}

fn default_arrival_radius() -> f32 {
    0.1
}

fn default_location_radius() -> f32 {
    1.0
}

fn default_player_speed() -> f32 {
    1.5
}

pub fn vec2(p: [f32; 2]) -> Vec2 {
    Vec2::new(p[0], p[1])
}

impl Scenario {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse scenario yaml")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_SCENARIO)
    }
}
