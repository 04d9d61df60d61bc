use ai_core::{TickContext, WorldMut, WorldView};

use crate::{Locomotion, Navigator, Vec2};

pub trait NavWorldView: WorldView {
    fn position(&self, agent: Self::Agent) -> Option<Vec2>;
    fn navigator(&self) -> &dyn Navigator;
    fn locomotion(&self, agent: Self::Agent) -> Option<&dyn Locomotion>;
}

pub trait NavWorldMut: WorldMut + NavWorldView {
    fn locomotion_mut(&mut self, agent: Self::Agent) -> Option<&mut dyn Locomotion>;
}

/// Clear any stale destination. Suitable as a GOAP plan-start hook.
pub fn reset_locomotion<W>(_ctx: &TickContext, agent: W::Agent, world: &mut W)
where
    W: NavWorldMut,
{
    if let Some(locomotion) = world.locomotion_mut(agent) {
        locomotion.reset_path();
    }
}
