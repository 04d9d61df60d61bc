use core::fmt;

use ai_core::{BeliefKey, BeliefState, Strategy, WorldMut};

use crate::error::{GoapError, Result};

/// The plannable half of an action: name, cost, preconditions and effects.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSchema {
    name: String,
    cost: f32,
    preconditions: BeliefState,
    effects: BeliefState,
}

impl ActionSchema {
    pub fn builder(name: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn preconditions(&self) -> &BeliefState {
        &self.preconditions
    }

    pub fn effects(&self) -> &BeliefState {
        &self.effects
    }

    pub fn is_applicable(&self, state: &BeliefState) -> bool {
        state.satisfies(&self.preconditions)
    }

    pub fn apply(&self, state: &mut BeliefState) {
        state.apply(&self.effects);
    }
}

impl AsRef<ActionSchema> for ActionSchema {
    fn as_ref(&self) -> &ActionSchema {
        self
    }
}

/// An action owned by an agent: its schema plus the strategy that performs it.
///
/// Actions are built once and reused by every plan; plans refer to them by
/// [`ActionId`](crate::ActionId).
pub struct GoapAction<W>
where
    W: WorldMut + 'static,
{
    schema: ActionSchema,
    strategy: Box<dyn Strategy<W>>,
}

impl<W> GoapAction<W>
where
    W: WorldMut + 'static,
{
    pub fn new(schema: ActionSchema, strategy: Box<dyn Strategy<W>>) -> Self {
        Self { schema, strategy }
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &ActionSchema {
        &self.schema
    }

    pub fn strategy(&self) -> &dyn Strategy<W> {
        self.strategy.as_ref()
    }

    pub fn strategy_mut(&mut self) -> &mut dyn Strategy<W> {
        self.strategy.as_mut()
    }
}

impl<W> AsRef<ActionSchema> for GoapAction<W>
where
    W: WorldMut + 'static,
{
    fn as_ref(&self) -> &ActionSchema {
        &self.schema
    }
}

impl<W> fmt::Debug for GoapAction<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoapAction")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Fluent, setup-time builder for actions.
///
/// Without a strategy, `build` yields a bare [`ActionSchema`] (useful for planner-only use);
/// after [`ActionBuilder::strategy`] it yields a [`GoapAction`].
#[derive(Debug, Clone)]
pub struct ActionBuilder<S = ()> {
    name: String,
    cost: f32,
    preconditions: BeliefState,
    effects: BeliefState,
    strategy: S,
}

impl ActionBuilder<()> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost: 1.0,
            preconditions: BeliefState::new(),
            effects: BeliefState::new(),
            strategy: (),
        }
    }

    pub fn strategy<W, T>(self, strategy: T) -> ActionBuilder<Box<dyn Strategy<W>>>
    where
        W: WorldMut + 'static,
        T: Strategy<W>,
    {
        self.boxed_strategy(Box::new(strategy))
    }

    pub fn boxed_strategy<W>(self, strategy: Box<dyn Strategy<W>>) -> ActionBuilder<Box<dyn Strategy<W>>>
    where
        W: WorldMut + 'static,
    {
        ActionBuilder {
            name: self.name,
            cost: self.cost,
            preconditions: self.preconditions,
            effects: self.effects,
            strategy,
        }
    }

    pub fn build(self) -> Result<ActionSchema> {
        self.into_parts().map(|(schema, ())| schema)
    }
}

impl<W> ActionBuilder<Box<dyn Strategy<W>>>
where
    W: WorldMut + 'static,
{
    pub fn build(self) -> Result<GoapAction<W>> {
        let (schema, strategy) = self.into_parts()?;
        Ok(GoapAction::new(schema, strategy))
    }
}

impl<S> ActionBuilder<S> {
    pub fn cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    pub fn precondition(mut self, belief: impl Into<BeliefKey>, value: bool) -> Self {
        self.preconditions.set(belief, value);
        self
    }

    pub fn effect(mut self, belief: impl Into<BeliefKey>, value: bool) -> Self {
        self.effects.set(belief, value);
        self
    }

    fn into_parts(self) -> Result<(ActionSchema, S)> {
        if self.name.is_empty() {
            return Err(GoapError::config("action name must not be empty"));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(GoapError::config(format!(
                "action `{}` has invalid cost {}",
                self.name, self.cost
            )));
        }
        if self.effects.is_empty() {
            return Err(GoapError::config(format!(
                "action `{}` has no effects",
                self.name
            )));
        }

        let schema = ActionSchema {
            name: self.name,
            cost: self.cost,
            preconditions: self.preconditions,
            effects: self.effects,
        };
        Ok((schema, self.strategy))
    }
}
