//! The simulated arena: one GOAP agent, one patrolling player, two stats.

use ai_core::{BeliefError, Beliefs, WorldMut, WorldView};
use ai_nav::{
    Locomotion, NavBeliefsExt, NavGrid, NavWorldMut, NavWorldView, Navigator, PathFollower,
    Sensor, SensorChange, Vec2,
};
use anyhow::{Context, Result};

use crate::scenario::{vec2, StatsConfig, WorldConfig};

pub const AGENT: u64 = 1;
pub const PLAYER: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Health,
    Stamina,
}

#[derive(Debug, Clone)]
struct Player {
    position: Vec2,
    waypoints: Vec<Vec2>,
    next: usize,
    speed: f32,
}

impl Player {
    fn step(&mut self, dt: f32) {
        let Some(&target) = self.waypoints.get(self.next) else {
            return;
        };
        let to_target = target - self.position;
        let dist = to_target.length();
        let travel = self.speed * dt;
        if dist <= travel {
            self.position = target;
            self.next = (self.next + 1) % self.waypoints.len();
        } else {
            self.position += to_target * (travel / dist);
        }
    }
}

#[derive(Debug)]
pub struct SimWorld {
    grid: NavGrid,
    follower: PathFollower,
    player: Player,
    chase_sensor: Sensor,
    attack_sensor: Sensor,
    stats: StatsConfig,
    health: f32,
    stamina: f32,
    attacks: u32,
}

impl SimWorld {
    pub fn new(config: &WorldConfig) -> Result<Self> {
        let grid = NavGrid::from_rows(config.map.as_slice(), config.cell_size)
            .context("world map must be a non-empty rectangle")?;
        let start = vec2(config.agent_start);
        anyhow::ensure!(
            grid.is_walkable(start),
            "agent start {start:?} is not on walkable ground"
        );
        let waypoints: Vec<Vec2> = config.player.waypoints.iter().copied().map(vec2).collect();
        let player_start = waypoints
            .first()
            .copied()
            .context("player needs at least one waypoint")?;

        Ok(Self {
            grid,
            follower: PathFollower::new(start, config.agent_speed),
            player: Player {
                position: player_start,
                next: 1 % waypoints.len(),
                waypoints,
                speed: config.player.speed.max(0.0),
            },
            chase_sensor: Sensor::new(config.chase_radius),
            attack_sensor: Sensor::new(config.attack_radius),
            stats: config.stats,
            health: config.stats.health,
            stamina: config.stats.stamina,
            attacks: 0,
        })
    }

    /// Advance movement, stats and perception by `dt`. Returns the chase sensor change, if any.
    pub fn step(&mut self, dt: f32) -> Option<SensorChange<u64>> {
        let moving = self.follower.is_moving();
        self.follower.step(&self.grid, dt);
        self.player.step(dt);

        self.health = (self.health - self.stats.health_decay * dt).max(0.0);
        if moving {
            self.stamina = (self.stamina - self.stats.stamina_decay * dt).max(0.0);
        }

        let origin = self.follower.position();
        let player = [(PLAYER, self.player.position)];
        self.attack_sensor.update(origin, player);
        self.chase_sensor.update(origin, player)
    }

    pub fn agent_position(&self) -> Vec2 {
        self.follower.position()
    }

    pub fn player_position(&self) -> Vec2 {
        self.player.position
    }

    pub fn is_moving(&self) -> bool {
        self.follower.is_moving()
    }

    pub fn stat(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Health => self.health,
            Stat::Stamina => self.stamina,
        }
    }

    pub fn recover(&mut self, stat: Stat, amount: f32) {
        let value = match stat {
            Stat::Health => &mut self.health,
            Stat::Stamina => &mut self.stamina,
        };
        *value = (*value + amount).min(100.0);
    }

    pub fn chase_sensor(&self) -> &Sensor {
        &self.chase_sensor
    }

    pub fn attack_sensor(&self) -> &Sensor {
        &self.attack_sensor
    }

    pub fn attacks(&self) -> u32 {
        self.attacks
    }

    pub fn record_attack(&mut self) {
        self.attacks += 1;
    }
}

impl WorldView for SimWorld {
    type Agent = u64;
}

impl WorldMut for SimWorld {}

impl NavWorldView for SimWorld {
    fn position(&self, agent: u64) -> Option<Vec2> {
        (agent == AGENT).then(|| self.follower.position())
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.grid
    }

    fn locomotion(&self, agent: u64) -> Option<&dyn Locomotion> {
        (agent == AGENT).then_some(&self.follower as &dyn Locomotion)
    }
}

impl NavWorldMut for SimWorld {
    fn locomotion_mut(&mut self, agent: u64) -> Option<&mut dyn Locomotion> {
        if agent == AGENT {
            Some(&mut self.follower)
        } else {
            None
        }
    }
}

fn chase_sensor(world: &SimWorld, agent: u64) -> Option<&Sensor> {
    (agent == AGENT).then_some(&world.chase_sensor)
}

fn attack_sensor(world: &SimWorld, agent: u64) -> Option<&Sensor> {
    (agent == AGENT).then_some(&world.attack_sensor)
}

/// The belief vocabulary the designer tables are written against.
pub fn sim_beliefs(config: &WorldConfig) -> Result<Beliefs<SimWorld>, BeliefError> {
    let stats = config.stats;
    let mut beliefs = Beliefs::new();
    beliefs
        .register_constant("Nothing", false)?
        .register("AgentIdle", |_, w: &SimWorld| !w.is_moving())?
        .register("AgentMoving", |_, w: &SimWorld| w.is_moving())?
        .register("AgentHealthLow", move |_, w: &SimWorld| {
            w.stat(Stat::Health) < stats.health_low
        })?
        .register("AgentIsHealthy", move |_, w: &SimWorld| {
            w.stat(Stat::Health) >= stats.health_ok
        })?
        .register("AgentStaminaLow", move |_, w: &SimWorld| {
            w.stat(Stat::Stamina) < stats.stamina_low
        })?
        .register("AgentIsRested", move |_, w: &SimWorld| {
            w.stat(Stat::Stamina) >= stats.stamina_ok
        })?
        .add_sensor_belief("PlayerInChaseRange", chase_sensor)?
        .add_sensor_belief("PlayerInAttackRange", attack_sensor)?
        .register_constant("AttackingPlayer", false)?;

    for (name, point) in &config.locations {
        beliefs.add_location_belief(
            format!("AgentAt{name}"),
            vec2(*point),
            config.location_radius,
        )?;
    }
    Ok(beliefs)
}
