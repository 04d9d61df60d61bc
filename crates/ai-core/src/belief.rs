use core::fmt;
use std::borrow::{Borrow, Cow};
use std::collections::btree_map;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BeliefError, WorldView};

/// Name of a belief.
///
/// Static names stay borrowed; names loaded from designer tables are owned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct BeliefKey(Cow<'static, str>);

impl BeliefKey {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for BeliefKey {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for BeliefKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&BeliefKey> for BeliefKey {
    fn from(value: &BeliefKey) -> Self {
        value.clone()
    }
}

impl Borrow<str> for BeliefKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BeliefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of `(belief, value)` pairs.
///
/// Used for belief snapshots, action preconditions/effects and goal targets alike. Ordered so
/// that iteration (and therefore planning) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct BeliefState {
    values: BTreeMap<BeliefKey, bool>,
}

impl BeliefState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<BeliefKey>, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<BeliefKey>, value: bool) -> Option<bool> {
        self.values.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<bool> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// `true` when `name` is present with exactly `value`. Absent beliefs never hold.
    pub fn holds(&self, name: &str, value: bool) -> bool {
        self.get(name) == Some(value)
    }

    /// Every pair in `required` holds in `self`.
    pub fn satisfies(&self, required: &BeliefState) -> bool {
        required.iter().all(|(name, value)| self.holds(name.as_str(), value))
    }

    /// Pairs of `required` that do not hold in `self`.
    pub fn unmet<'a>(
        &'a self,
        required: &'a BeliefState,
    ) -> impl Iterator<Item = (&'a BeliefKey, bool)> + 'a {
        required
            .iter()
            .filter(move |(name, value)| !self.holds(name.as_str(), *value))
    }

    /// Some belief is present in both sets with opposite values.
    pub fn conflicts_with(&self, other: &BeliefState) -> bool {
        other
            .iter()
            .any(|(name, value)| self.get(name.as_str()) == Some(!value))
    }

    /// Overwrite `self` with `effects`.
    pub fn apply(&mut self, effects: &BeliefState) {
        for (name, value) in effects.iter() {
            self.values.insert(name.clone(), value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BeliefKey, bool)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &BeliefKey> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<BeliefKey>> FromIterator<(K, bool)> for BeliefState {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut state = BeliefState::new();
        state.extend(iter);
        state
    }
}

impl<K: Into<BeliefKey>> Extend<(K, bool)> for BeliefState {
    fn extend<I: IntoIterator<Item = (K, bool)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a BeliefState {
    type Item = (&'a BeliefKey, &'a bool);
    type IntoIter = btree_map::Iter<'a, BeliefKey, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Evaluator signature: reads the world, never writes it.
pub type BeliefFn<W> = dyn Fn(<W as WorldView>::Agent, &W) -> bool;

/// A named predicate over the agent's observable state.
pub struct Belief<W>
where
    W: WorldView + 'static,
{
    key: BeliefKey,
    evaluate: Box<BeliefFn<W>>,
}

impl<W> Belief<W>
where
    W: WorldView + 'static,
{
    pub fn new(
        key: impl Into<BeliefKey>,
        evaluate: impl Fn(W::Agent, &W) -> bool + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            evaluate: Box::new(evaluate),
        }
    }

    pub fn key(&self) -> &BeliefKey {
        &self.key
    }

    pub fn evaluate(&self, agent: W::Agent, world: &W) -> bool {
        (self.evaluate)(agent, world)
    }
}

impl<W> fmt::Debug for Belief<W>
where
    W: WorldView + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Belief").field("key", &self.key).finish()
    }
}

/// Name-keyed belief registry.
///
/// Populated once while an agent is being set up and read-only afterwards. It is the only
/// source of truth the planner consults, via [`Beliefs::snapshot`].
pub struct Beliefs<W>
where
    W: WorldView + 'static,
{
    entries: BTreeMap<BeliefKey, Belief<W>>,
}

impl<W> Beliefs<W>
where
    W: WorldView + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: impl Into<BeliefKey>,
        evaluate: impl Fn(W::Agent, &W) -> bool + 'static,
    ) -> Result<&mut Self, BeliefError> {
        self.insert(Belief::new(name, evaluate))?;
        Ok(self)
    }

    /// Register a belief whose value never changes (e.g. the conventional `Nothing` belief).
    pub fn register_constant(
        &mut self,
        name: impl Into<BeliefKey>,
        value: bool,
    ) -> Result<&mut Self, BeliefError> {
        self.register(name, move |_, _| value)
    }

    pub fn insert(&mut self, belief: Belief<W>) -> Result<(), BeliefError> {
        match self.entries.entry(belief.key.clone()) {
            btree_map::Entry::Occupied(_) => Err(BeliefError::Duplicate(belief.key.to_string())),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(belief);
                Ok(())
            }
        }
    }

    pub fn evaluate(&self, name: &str, agent: W::Agent, world: &W) -> Result<bool, BeliefError> {
        self.entries
            .get(name)
            .map(|belief| belief.evaluate(agent, world))
            .ok_or_else(|| BeliefError::Unknown(name.to_string()))
    }

    /// Check every pair in `required` against the live world.
    pub fn all_hold(
        &self,
        required: &BeliefState,
        agent: W::Agent,
        world: &W,
    ) -> Result<bool, BeliefError> {
        for (name, value) in required.iter() {
            if self.evaluate(name.as_str(), agent, world)? != value {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Evaluate every registered belief once.
    pub fn snapshot(&self, agent: W::Agent, world: &W) -> BeliefState {
        self.entries
            .iter()
            .map(|(key, belief)| (key.clone(), belief.evaluate(agent, world)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Belief<W>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &BeliefKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<W> Default for Beliefs<W>
where
    W: WorldView + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for Beliefs<W>
where
    W: WorldView + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
