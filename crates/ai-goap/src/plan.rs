use std::collections::VecDeque;

use crate::ActionSchema;

/// Index of an action in the agent's action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub usize);

/// Index of a goal in the agent's goal set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoalId(pub usize);

/// Ordered actions that take the believed world state to one satisfying `goal`.
///
/// Consumed strictly front to back and discarded once exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    goal: GoalId,
    steps: VecDeque<ActionId>,
    cost: f32,
}

impl ActionPlan {
    pub fn new(goal: GoalId, steps: impl IntoIterator<Item = ActionId>, cost: f32) -> Self {
        Self {
            goal,
            steps: steps.into_iter().collect(),
            cost,
        }
    }

    pub fn goal(&self) -> GoalId {
        self.goal
    }

    /// Summed cost of the plan as computed, including steps already consumed.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn peek(&self) -> Option<ActionId> {
        self.steps.front().copied()
    }

    pub fn pop_front(&mut self) -> Option<ActionId> {
        self.steps.pop_front()
    }

    pub fn steps(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.steps.iter().copied()
    }

    /// Names of the remaining steps, resolved against the action set the plan was made from.
    pub fn names<'a, A>(&self, actions: &'a [A]) -> Vec<&'a str>
    where
        A: AsRef<ActionSchema>,
    {
        self.steps
            .iter()
            .filter_map(|id| actions.get(id.0))
            .map(|a| a.as_ref().name())
            .collect()
    }
}
