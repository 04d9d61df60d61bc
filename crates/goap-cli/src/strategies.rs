//! Strategy specs referenced from designer tables, and the factory turning them into behaviors.

use std::collections::BTreeMap;

use ai_core::{IdleStrategy, Strategy, TickContext};
use ai_goap::{GoapError, StrategyFactory};
use ai_nav::{Locomotion, MoveToStrategy, NavWorldMut, NavWorldView, Vec2, WanderStrategy};
use serde::Deserialize;
use tracing::info;

use crate::scenario::vec2;
use crate::world::{SimWorld, Stat};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    Idle { duration: f32 },
    Wander { radius: f32 },
    MoveTo { location: String },
    Recover { stat: StatSpec, rate: f32, until: f32 },
    Chase,
    Attack { duration: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatSpec {
    Health,
    Stamina,
}

impl From<StatSpec> for Stat {
    fn from(value: StatSpec) -> Self {
        match value {
            StatSpec::Health => Stat::Health,
            StatSpec::Stamina => Stat::Stamina,
        }
    }
}

pub struct SimStrategies {
    locations: BTreeMap<String, Vec2>,
    arrival_radius: f32,
}

impl SimStrategies {
    pub fn new(locations: &BTreeMap<String, [f32; 2]>, arrival_radius: f32) -> Self {
        Self {
            locations: locations
                .iter()
                .map(|(name, point)| (name.clone(), vec2(*point)))
                .collect(),
            arrival_radius,
        }
    }
}

impl StrategyFactory<SimWorld> for SimStrategies {
    type Spec = StrategySpec;

    fn build(
        &self,
        action: &str,
        spec: &StrategySpec,
    ) -> ai_goap::Result<Box<dyn Strategy<SimWorld>>> {
        let strategy: Box<dyn Strategy<SimWorld>> = match spec {
            StrategySpec::Idle { duration } => Box::new(IdleStrategy::new(*duration)),
            StrategySpec::Wander { radius } => {
                Box::new(WanderStrategy::new(*radius, self.arrival_radius))
            }
            StrategySpec::MoveTo { location } => {
                let destination =
                    self.locations
                        .get(location)
                        .copied()
                        .ok_or_else(|| GoapError::Strategy {
                            action: action.to_string(),
                            reason: format!("unknown location `{location}`"),
                        })?;
                Box::new(MoveToStrategy::new(destination, self.arrival_radius))
            }
            StrategySpec::Recover { stat, rate, until } => Box::new(RecoverStrategy {
                stat: (*stat).into(),
                rate: *rate,
                until: *until,
            }),
            StrategySpec::Chase => Box::new(ChaseStrategy::default()),
            StrategySpec::Attack { duration } => Box::new(AttackStrategy {
                duration: duration.max(0.0),
                remaining: 0.0,
            }),
        };
        Ok(strategy)
    }
}

/// Regain a stat at `rate` per second until it reaches `until`.
#[derive(Debug, Clone)]
pub struct RecoverStrategy {
    stat: Stat,
    rate: f32,
    until: f32,
}

impl Strategy<SimWorld> for RecoverStrategy {
    fn complete(&self, _agent: u64, world: &SimWorld) -> bool {
        world.stat(self.stat) >= self.until
    }

    fn update(&mut self, ctx: &TickContext, _agent: u64, world: &mut SimWorld) {
        world.recover(self.stat, self.rate * ctx.dt());
    }
}

/// Follow the player known to the chase sensor until it enters attack range.
///
/// Fails when the player is lost.
#[derive(Debug, Clone, Default)]
pub struct ChaseStrategy {
    requested: Option<Vec2>,
}

const REPATH_DISTANCE: f32 = 0.5;

impl Strategy<SimWorld> for ChaseStrategy {
    fn can_perform(&self, _agent: u64, world: &SimWorld) -> bool {
        world.chase_sensor().target_is_known()
    }

    fn complete(&self, _agent: u64, world: &SimWorld) -> bool {
        world.attack_sensor().target_is_known() || !world.chase_sensor().target_is_known()
    }

    fn failed(&self, _agent: u64, world: &SimWorld) -> bool {
        !world.attack_sensor().target_is_known() && !world.chase_sensor().target_is_known()
    }

    fn start(&mut self, _ctx: &TickContext, agent: u64, world: &mut SimWorld) {
        self.requested = None;
        self.follow(agent, world);
    }

    fn update(&mut self, _ctx: &TickContext, agent: u64, world: &mut SimWorld) {
        self.follow(agent, world);
    }

    fn stop(&mut self, _ctx: &TickContext, agent: u64, world: &mut SimWorld) {
        if self.requested.take().is_some() {
            if let Some(locomotion) = world.locomotion_mut(agent) {
                locomotion.reset_path();
            }
        }
    }
}

impl ChaseStrategy {
    fn follow(&mut self, agent: u64, world: &mut SimWorld) {
        let Some(target) = world.chase_sensor().target_position() else {
            return;
        };
        let target = world.navigator().nearest_point(target).unwrap_or(target);
        let stale = self
            .requested
            .map_or(true, |requested| requested.distance(target) > REPATH_DISTANCE);
        if !stale {
            return;
        }
        if let Some(locomotion) = world.locomotion_mut(agent) {
            locomotion.request_move(target);
            self.requested = Some(target);
        }
    }
}

/// Swing at the player for `duration` seconds.
#[derive(Debug, Clone)]
pub struct AttackStrategy {
    duration: f32,
    remaining: f32,
}

impl Strategy<SimWorld> for AttackStrategy {
    fn can_perform(&self, _agent: u64, world: &SimWorld) -> bool {
        world.attack_sensor().target_is_known()
    }

    fn complete(&self, _agent: u64, _world: &SimWorld) -> bool {
        self.remaining <= 0.0
    }

    fn start(&mut self, _ctx: &TickContext, _agent: u64, _world: &mut SimWorld) {
        self.remaining = self.duration;
    }

    fn update(&mut self, ctx: &TickContext, agent: u64, world: &mut SimWorld) {
        if self.remaining <= 0.0 {
            return;
        }
        self.remaining = (self.remaining - ctx.dt()).max(0.0);
        if self.remaining <= 0.0 {
            world.record_attack();
            info!(agent, tick = ctx.tick, "agent attacks player");
        }
    }
}
