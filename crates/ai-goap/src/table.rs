//! Designer-authored action/goal tables.
//!
//! Tables are plain data loaded once at startup. Beliefs stay in code (they are closures over
//! the world); strategies are referenced by a spec type `S` and instantiated through a
//! [`StrategyFactory`].

use std::collections::BTreeMap;

use ai_core::{Strategy, WorldMut};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{ActionBuilder, GoapAction, Goal};

/// Build runtime strategies from table specs.
pub trait StrategyFactory<W>
where
    W: WorldMut + 'static,
{
    type Spec;

    fn build(&self, action: &str, spec: &Self::Spec) -> Result<Box<dyn Strategy<W>>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct GoapTable<S> {
    #[serde(default)]
    pub actions: Vec<ActionRow<S>>,
    #[serde(default)]
    pub goals: Vec<GoalRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRow<S> {
    pub name: String,
    #[serde(default = "default_cost")]
    pub cost: f32,
    #[serde(default)]
    pub preconditions: BTreeMap<String, bool>,
    #[serde(default)]
    pub effects: BTreeMap<String, bool>,
    pub strategy: S,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRow {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub desired: BTreeMap<String, bool>,
}

fn default_cost() -> f32 {
    1.0
}

impl<S> GoapTable<S> {
    pub fn from_yaml_str(text: &str) -> Result<Self>
    where
        S: DeserializeOwned,
    {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self>
    where
        S: DeserializeOwned,
    {
        Ok(serde_json::from_str(text)?)
    }

    pub fn build_actions<W, F>(&self, factory: &F) -> Result<Vec<GoapAction<W>>>
    where
        W: WorldMut + 'static,
        F: StrategyFactory<W, Spec = S>,
    {
        self.actions
            .iter()
            .map(|row| {
                let mut builder = ActionBuilder::new(row.name.clone()).cost(row.cost);
                for (name, value) in &row.preconditions {
                    builder = builder.precondition(name.clone(), *value);
                }
                for (name, value) in &row.effects {
                    builder = builder.effect(name.clone(), *value);
                }
                let strategy = factory.build(&row.name, &row.strategy)?;
                builder.boxed_strategy(strategy).build()
            })
            .collect()
    }

    pub fn build_goals(&self) -> Result<Vec<Goal>> {
        self.goals
            .iter()
            .map(|row| {
                row.desired
                    .iter()
                    .fold(
                        Goal::builder(row.name.clone()).priority(row.priority),
                        |builder, (name, value)| builder.desire(name.clone(), *value),
                    )
                    .build()
            })
            .collect()
    }
}
