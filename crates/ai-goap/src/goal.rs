use ai_core::{BeliefKey, BeliefState};

use crate::error::{GoapError, Result};

/// A prioritized desired belief state. Higher priority is more urgent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    name: String,
    priority: i32,
    desired: BeliefState,
}

impl Goal {
    pub fn builder(name: impl Into<String>) -> GoalBuilder {
        GoalBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn desired(&self) -> &BeliefState {
        &self.desired
    }

    pub fn is_satisfied(&self, snapshot: &BeliefState) -> bool {
        snapshot.satisfies(&self.desired)
    }
}

#[derive(Debug, Clone)]
pub struct GoalBuilder {
    name: String,
    priority: i32,
    desired: BeliefState,
}

impl GoalBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            desired: BeliefState::new(),
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn desire(mut self, belief: impl Into<BeliefKey>, value: bool) -> Self {
        self.desired.set(belief, value);
        self
    }

    pub fn build(self) -> Result<Goal> {
        if self.name.is_empty() {
            return Err(GoapError::config("goal name must not be empty"));
        }
        if self.desired.is_empty() {
            return Err(GoapError::config(format!(
                "goal `{}` has no desired effects",
                self.name
            )));
        }
        Ok(Goal {
            name: self.name,
            priority: self.priority,
            desired: self.desired,
        })
    }
}
