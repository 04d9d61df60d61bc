use core::fmt::Debug;

use ai_core::{BeliefError, BeliefKey, Beliefs};

use crate::{NavWorldView, Sensor, Vec2};

/// Accessor for a sensor owned by the world.
pub type SensorAccessor<W, T> = fn(&W, <W as ai_core::WorldView>::Agent) -> Option<&Sensor<T>>;

/// Spatial belief registrations.
pub trait NavBeliefsExt<W>
where
    W: NavWorldView + 'static,
{
    /// True while the agent stands within `radius` of `location`.
    fn add_location_belief(
        &mut self,
        name: impl Into<BeliefKey>,
        location: Vec2,
        radius: f32,
    ) -> Result<&mut Self, BeliefError>;

    /// True while the sensor returned by `sensor` knows a target.
    fn add_sensor_belief<T>(
        &mut self,
        name: impl Into<BeliefKey>,
        sensor: SensorAccessor<W, T>,
    ) -> Result<&mut Self, BeliefError>
    where
        T: Copy + PartialEq + Debug + 'static;
}

impl<W> NavBeliefsExt<W> for Beliefs<W>
where
    W: NavWorldView + 'static,
{
    fn add_location_belief(
        &mut self,
        name: impl Into<BeliefKey>,
        location: Vec2,
        radius: f32,
    ) -> Result<&mut Self, BeliefError> {
        let radius = radius.max(0.0);
        self.register(name, move |agent, world: &W| {
            world
                .position(agent)
                .is_some_and(|position| position.distance(location) <= radius)
        })
    }

    fn add_sensor_belief<T>(
        &mut self,
        name: impl Into<BeliefKey>,
        sensor: SensorAccessor<W, T>,
    ) -> Result<&mut Self, BeliefError>
    where
        T: Copy + PartialEq + Debug + 'static,
    {
        self.register(name, move |agent, world: &W| {
            sensor(world, agent).is_some_and(Sensor::target_is_known)
        })
    }
}
