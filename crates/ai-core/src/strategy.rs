use crate::{TickContext, WorldMut};

/// Where a running strategy stands after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Success,
    Failure,
}

/// Runtime behavior bound to a planned action.
///
/// Lifecycle, as driven by the agent loop:
/// 1. `can_perform` is queried before starting.
/// 2. `start` resets per-invocation state and begins the behavior.
/// 3. `update` runs once per tick; `complete` is polled right after.
/// 4. `stop` runs once per started invocation, on completion or on preemption.
///
/// `stop` must tolerate being called without a prior `start`, and twice in a row.
///
/// Failure is reported as `complete() == true` together with `failed() == true`.
pub trait Strategy<W>: 'static
where
    W: WorldMut + 'static,
{
    fn can_perform(&self, _agent: W::Agent, _world: &W) -> bool {
        true
    }

    fn complete(&self, agent: W::Agent, world: &W) -> bool;

    fn failed(&self, _agent: W::Agent, _world: &W) -> bool {
        false
    }

    fn start(&mut self, _ctx: &TickContext, _agent: W::Agent, _world: &mut W) {}

    fn update(&mut self, _ctx: &TickContext, _agent: W::Agent, _world: &mut W) {}

    fn stop(&mut self, _ctx: &TickContext, _agent: W::Agent, _world: &mut W) {}

    fn status(&self, agent: W::Agent, world: &W) -> ActionStatus {
        if !self.complete(agent, world) {
            ActionStatus::Running
        } else if self.failed(agent, world) {
            ActionStatus::Failure
        } else {
            ActionStatus::Success
        }
    }
}

/// Stand still for `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleStrategy {
    duration: f32,
    remaining: f32,
}

impl IdleStrategy {
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

impl<W> Strategy<W> for IdleStrategy
where
    W: WorldMut + 'static,
{
    fn complete(&self, _agent: W::Agent, _world: &W) -> bool {
        self.remaining <= 0.0
    }

    fn start(&mut self, _ctx: &TickContext, _agent: W::Agent, _world: &mut W) {
        self.remaining = self.duration;
    }

    fn update(&mut self, ctx: &TickContext, _agent: W::Agent, _world: &mut W) {
        self.remaining = (self.remaining - ctx.dt()).max(0.0);
    }
}
