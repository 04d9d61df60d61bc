//! Fixed-step driver wiring a scenario's world, beliefs and table into one agent.

use std::collections::BTreeMap;

use ai_core::TickContext;
use ai_goap::{ActionId, GoapAgent};
use ai_nav::{reset_locomotion, SensorChange};
use ai_tools::{TraceEvent, TraceLog, TraceSink, Tracer};
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::Scenario;
use crate::strategies::SimStrategies;
use crate::world::{sim_beliefs, SimWorld, Stat, AGENT};

/// Mirrors agent decision events into `tracing` at trace level.
#[derive(Debug, Default)]
struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&mut self, event: TraceEvent) {
        tracing::trace!(tick = event.tick, tag = %event.tag, a = event.a, b = event.b, "goap");
    }
}

pub struct Simulation {
    agent: GoapAgent<SimWorld>,
    world: SimWorld,
    ctx: TickContext,
    replan_requests: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub ticks: u64,
    pub plan_calls: u64,
    pub plans_started: u64,
    pub replan_requests: u64,
    pub attacks: u32,
    pub health: f32,
    pub stamina: f32,
    pub position: [f32; 2],
    pub player_position: [f32; 2],
    pub current_goal: Option<String>,
    pub current_action: Option<String>,
    /// How often each action was started.
    pub actions_started: BTreeMap<String, u64>,
}

impl Simulation {
    pub fn new(scenario: &Scenario, dt_seconds: f32, seed: u64) -> Result<Self> {
        anyhow::ensure!(
            dt_seconds.is_finite() && dt_seconds > 0.0,
            "dt must be a positive number of seconds, got {dt_seconds}"
        );
        let world = SimWorld::new(&scenario.world)?;
        let beliefs = sim_beliefs(&scenario.world)?;
        let factory = SimStrategies::new(&scenario.world.locations, scenario.world.arrival_radius);

        let agent = GoapAgent::builder(AGENT)
            .config(scenario.agent)
            .beliefs(beliefs)
            .table(&scenario.table, &factory)
            .on_plan_start(reset_locomotion::<SimWorld>)
            .tracer(Tracer::new().with_log().with_sink(Box::new(TracingSink)))
            .build()?;

        Ok(Self {
            agent,
            world,
            ctx: TickContext::new(0, dt_seconds, seed),
            replan_requests: 0,
        })
    }

    /// One fixed step: think/act, then advance the world and forward perception changes.
    pub fn step(&mut self) {
        self.agent.tick(&self.ctx, &mut self.world);

        if let Some(change) = self.world.step(self.ctx.dt()) {
            match change {
                SensorChange::Acquired(player) => {
                    info!(tick = self.ctx.tick, player, "player spotted")
                }
                SensorChange::Lost(player) => info!(tick = self.ctx.tick, player, "player lost"),
                SensorChange::Switched { from, to } => {
                    info!(tick = self.ctx.tick, from, to, "chase target switched")
                }
            }
            self.agent.request_replan();
            self.replan_requests += 1;
        }

        debug!(
            tick = self.ctx.tick,
            goal = self.agent.current_goal_name().unwrap_or("-"),
            action = self.agent.current_action_name().unwrap_or("-"),
            "step"
        );
        self.ctx = self.ctx.next();
    }

    pub fn run(&mut self, ticks: u64) -> Summary {
        for _ in 0..ticks {
            self.step();
        }
        self.summary()
    }

    pub fn summary(&self) -> Summary {
        let mut actions_started = BTreeMap::new();
        if let Some(log) = self.agent.tracer().log() {
            for event in log.events.iter().filter(|e| e.tag == "goap.action.start") {
                if let Some(action) = self.agent.action(ActionId(event.a as usize)) {
                    *actions_started.entry(action.name().to_string()).or_insert(0) += 1;
                }
            }
        }
        let position = self.world.agent_position();
        let player = self.world.player_position();

        Summary {
            ticks: self.ctx.tick,
            plan_calls: self.agent.plan_calls(),
            plans_started: self.agent.plans_started(),
            replan_requests: self.replan_requests,
            attacks: self.world.attacks(),
            health: self.world.stat(Stat::Health),
            stamina: self.world.stat(Stat::Stamina),
            position: [position.x, position.y],
            player_position: [player.x, player.y],
            current_goal: self.agent.current_goal_name().map(str::to_string),
            current_action: self.agent.current_action_name().map(str::to_string),
            actions_started,
        }
    }

    /// Decision events recorded so far.
    pub fn trace(&self) -> Option<&TraceLog> {
        self.agent.tracer().log()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(seed: u64) -> Simulation {
        Simulation::new(&Scenario::builtin().unwrap(), 0.1, seed).unwrap()
    }

    #[test]
    fn builtin_scenario_runs_and_plans() {
        let mut sim = builtin(7);
        let summary = sim.run(600);

        assert_eq!(summary.ticks, 600);
        assert!(summary.plans_started > 0);
        assert!(summary.plan_calls >= summary.plans_started);
        assert!(!summary.actions_started.is_empty());
        let trace = sim.trace().unwrap();
        assert!(trace.count("goap.plan.result") > 0);
        assert!(trace.count("goap.action.start") > 0);
    }

    #[test]
    fn runs_are_reproducible() {
        let a = builtin(42).run(400);
        let b = builtin(42).run(400);
        assert_eq!(a, b);
    }

    #[test]
    fn agent_reacts_to_the_player() {
        let mut sim = builtin(3);
        let summary = sim.run(1200);

        assert!(summary.replan_requests > 0);
        assert!(summary.actions_started.contains_key("ChasePlayer"));
    }

    #[test]
    fn rejects_bad_timestep() {
        let scenario = Scenario::builtin().unwrap();
        assert!(Simulation::new(&scenario, 0.0, 0).is_err());
    }
}
