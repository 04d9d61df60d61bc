use core::f32::consts::TAU;

use ai_core::{AgentId, DeterministicRng, Strategy, TickContext};
use tracing::debug;

use crate::{NavWorldMut, Navigator, Vec2};

/// Walk to a fixed destination through the agent's [`crate::Locomotion`].
///
/// Completes once the remaining path distance drops to `arrival_radius`, or immediately with
/// failure when the destination is unreachable.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveToStrategy {
    destination: Vec2,
    arrival_radius: f32,
    started: bool,
}

impl MoveToStrategy {
    pub fn new(destination: Vec2, arrival_radius: f32) -> Self {
        Self {
            destination,
            arrival_radius: arrival_radius.max(0.0),
            started: false,
        }
    }

    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    pub fn arrival_radius(&self) -> f32 {
        self.arrival_radius
    }
}

impl<W> Strategy<W> for MoveToStrategy
where
    W: NavWorldMut + 'static,
{
    fn can_perform(&self, agent: W::Agent, world: &W) -> bool {
        world.position(agent).is_some() && world.locomotion(agent).is_some()
    }

    fn complete(&self, agent: W::Agent, world: &W) -> bool {
        self.started && movement_finished(world, agent, self.arrival_radius)
    }

    fn failed(&self, agent: W::Agent, world: &W) -> bool {
        movement_failed(world, agent)
    }

    fn start(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.started = true;
        if let Some(locomotion) = world.locomotion_mut(agent) {
            locomotion.request_move(self.destination);
        }
    }

    fn stop(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        if !self.started {
            return;
        }
        self.started = false;
        if let Some(locomotion) = world.locomotion_mut(agent) {
            locomotion.reset_path();
        }
    }
}

/// RNG stream used by [`WanderStrategy`] destination picks.
pub const WANDER_RNG_STREAM: u64 = 0x5741_4e44;

const WANDER_ATTEMPTS: usize = 5;

/// Walk to a random navigable point within `radius` of the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct WanderStrategy {
    radius: f32,
    arrival_radius: f32,
    started: bool,
    no_destination: bool,
}

impl WanderStrategy {
    pub fn new(radius: f32, arrival_radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            arrival_radius: arrival_radius.max(0.0),
            started: false,
            no_destination: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn pick_destination<W>(&self, ctx: &TickContext, agent: W::Agent, world: &W) -> Option<Vec2>
    where
        W: NavWorldMut,
    {
        let origin = world.position(agent)?;
        let navigator = world.navigator();
        let mut rng = ctx.rng_for_agent(agent, WANDER_RNG_STREAM);
        for _ in 0..WANDER_ATTEMPTS {
            let heading = Vec2::from_angle(rng.next_f32_range(0.0, TAU));
            let candidate = origin + heading * rng.next_f32_range(0.0, self.radius);
            let Some(point) = navigator.nearest_point(candidate) else {
                continue;
            };
            if point.distance(origin) <= self.radius {
                return Some(point);
            }
        }
        self.closest_in_radius(navigator, origin)
    }

    /// The navigable point nearest to `origin`, if it lies within the wander radius.
    fn closest_in_radius(&self, navigator: &dyn Navigator, origin: Vec2) -> Option<Vec2> {
        navigator
            .nearest_point(origin)
            .filter(|point| point.distance(origin) <= self.radius)
    }
}

impl<W> Strategy<W> for WanderStrategy
where
    W: NavWorldMut + 'static,
{
    fn can_perform(&self, agent: W::Agent, world: &W) -> bool {
        world.locomotion(agent).is_some()
            && world.position(agent).is_some_and(|origin| {
                self.closest_in_radius(world.navigator(), origin).is_some()
            })
    }

    fn complete(&self, agent: W::Agent, world: &W) -> bool {
        self.started
            && (self.no_destination || movement_finished(world, agent, self.arrival_radius))
    }

    fn failed(&self, agent: W::Agent, world: &W) -> bool {
        self.no_destination || movement_failed(world, agent)
    }

    fn start(&mut self, ctx: &TickContext, agent: W::Agent, world: &mut W) {
        self.started = true;
        self.no_destination = false;
        match self.pick_destination(ctx, agent, world) {
            Some(destination) => {
                if let Some(locomotion) = world.locomotion_mut(agent) {
                    locomotion.request_move(destination);
                }
            }
            None => {
                debug!(
                    agent = agent.stable_id(),
                    radius = self.radius,
                    "wander found no navigable destination"
                );
                self.no_destination = true;
            }
        }
    }

    fn stop(&mut self, _ctx: &TickContext, agent: W::Agent, world: &mut W) {
        if !self.started {
            return;
        }
        self.started = false;
        if let Some(locomotion) = world.locomotion_mut(agent) {
            locomotion.reset_path();
        }
    }
}

fn movement_finished<W: NavWorldMut>(world: &W, agent: W::Agent, arrival_radius: f32) -> bool {
    let Some(locomotion) = world.locomotion(agent) else {
        return true;
    };
    if locomotion.path_failed() {
        return true;
    }
    !locomotion.path_pending()
        && locomotion.has_path()
        && locomotion.remaining_distance() <= arrival_radius
}

fn movement_failed<W: NavWorldMut>(world: &W, agent: W::Agent) -> bool {
    world
        .locomotion(agent)
        .map_or(true, |locomotion| locomotion.path_failed())
}
