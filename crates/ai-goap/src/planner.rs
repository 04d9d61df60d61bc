use core::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use ai_core::{BeliefKey, BeliefState};
use tracing::{debug, trace};

use crate::{ActionId, ActionPlan, ActionSchema, Goal, GoalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoapPlannerConfig {
    /// Upper bound on node expansions per goal. A goal that exhausts it is treated as
    /// infeasible for this call.
    pub max_expansions: usize,
}

impl Default for GoapPlannerConfig {
    fn default() -> Self {
        Self { max_expansions: 4096 }
    }
}

/// Regression planner: searches backward from a goal's unmet targets through action effects,
/// lowest accumulated cost first.
///
/// Pure with respect to its inputs: the same snapshot, actions and goals always produce the
/// same plan.
#[derive(Debug, Clone, Default)]
pub struct GoapPlanner {
    config: GoapPlannerConfig,
}

/// One frontier in the backward search.
///
/// `open` holds targets not yet established by any chosen action. `protected` holds targets
/// that already hold in the snapshot and must survive until the point where they are needed,
/// so no earlier-executing action may flip them.
#[derive(Debug)]
struct SearchNode {
    open: BeliefState,
    protected: BeliefState,
    seen: BTreeSet<(BeliefKey, bool)>,
    parent: Option<usize>,
    action: Option<ActionId>,
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    cost: f32,
    depth: u32,
    tie: u64,
    node: usize,
}

impl OpenEntry {
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.depth.cmp(&other.depth))
            .then(self.tie.cmp(&other.tie))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.cmp_key(self)
    }
}

impl GoapPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GoapPlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> GoapPlannerConfig {
        self.config
    }

    /// Plan for the most urgent feasible goal.
    pub fn plan<A>(
        &self,
        snapshot: &BeliefState,
        actions: &[A],
        goals: &[Goal],
        previous_goal: Option<GoalId>,
    ) -> Option<ActionPlan>
    where
        A: AsRef<ActionSchema>,
    {
        self.plan_above(snapshot, actions, goals, previous_goal, None)
    }

    /// Like [`GoapPlanner::plan`], restricted to goals with priority strictly above
    /// `min_priority` when one is given.
    pub fn plan_above<A>(
        &self,
        snapshot: &BeliefState,
        actions: &[A],
        goals: &[Goal],
        previous_goal: Option<GoalId>,
        min_priority: Option<i32>,
    ) -> Option<ActionPlan>
    where
        A: AsRef<ActionSchema>,
    {
        self.plan_above_filtered(snapshot, actions, goals, previous_goal, min_priority, |_| true)
    }

    /// Like [`GoapPlanner::plan_above`], but a found plan is only returned when `accept`
    /// agrees; otherwise the next candidate goal is tried.
    pub fn plan_above_filtered<A>(
        &self,
        snapshot: &BeliefState,
        actions: &[A],
        goals: &[Goal],
        previous_goal: Option<GoalId>,
        min_priority: Option<i32>,
        mut accept: impl FnMut(&ActionPlan) -> bool,
    ) -> Option<ActionPlan>
    where
        A: AsRef<ActionSchema>,
    {
        for goal_id in self.candidate_goals(snapshot, goals, previous_goal, min_priority) {
            let goal = &goals[goal_id.0];
            let Some((steps, cost)) = self.plan_for_goal(snapshot, actions, goal) else {
                debug!(goal = goal.name(), "goap goal infeasible");
                continue;
            };
            debug!(goal = goal.name(), steps = steps.len(), cost, "goap plan found");
            let plan = ActionPlan::new(goal_id, steps, cost);
            if accept(&plan) {
                return Some(plan);
            }
            debug!(goal = goal.name(), "goap plan rejected");
        }
        None
    }

    /// Unsatisfied goals, most urgent first.
    ///
    /// Equal priorities prefer `previous_goal`, then declaration order, so the agent does not
    /// oscillate between equally ranked goals.
    pub fn candidate_goals(
        &self,
        snapshot: &BeliefState,
        goals: &[Goal],
        previous_goal: Option<GoalId>,
        min_priority: Option<i32>,
    ) -> Vec<GoalId> {
        let mut ids: Vec<GoalId> = goals
            .iter()
            .enumerate()
            .filter(|(_, goal)| !goal.is_satisfied(snapshot))
            .filter(|(_, goal)| min_priority.map_or(true, |min| goal.priority() > min))
            .map(|(idx, _)| GoalId(idx))
            .collect();

        ids.sort_by_key(|id| {
            (
                Reverse(goals[id.0].priority()),
                Some(*id) != previous_goal,
                id.0,
            )
        });
        ids
    }

    /// Cheapest action sequence reaching `goal` from `snapshot`, with its summed cost.
    ///
    /// An already satisfied goal yields an empty sequence.
    pub fn plan_for_goal<A>(
        &self,
        snapshot: &BeliefState,
        actions: &[A],
        goal: &Goal,
    ) -> Option<(Vec<ActionId>, f32)>
    where
        A: AsRef<ActionSchema>,
    {
        let mut open = BeliefState::new();
        let mut protected = BeliefState::new();
        for (name, value) in goal.desired().iter() {
            if snapshot.holds(name.as_str(), value) {
                protected.set(name, value);
            } else {
                open.set(name, value);
            }
        }
        if open.is_empty() {
            return Some((Vec::new(), 0.0));
        }

        let seen = open.iter().map(|(k, v)| (k.clone(), v)).collect();
        let mut nodes = vec![SearchNode {
            open: open.clone(),
            protected: protected.clone(),
            seen,
            parent: None,
            action: None,
        }];

        let mut best: BTreeMap<(BeliefState, BeliefState), f32> = BTreeMap::new();
        best.insert((open, protected), 0.0);

        let mut heap = BinaryHeap::new();
        let mut tie: u64 = 0;
        heap.push(OpenEntry {
            cost: 0.0,
            depth: 0,
            tie,
            node: 0,
        });
        tie += 1;

        let mut expansions: usize = 0;

        while let Some(entry) = heap.pop() {
            if nodes[entry.node].open.is_empty() {
                let steps = forward_steps(&nodes, entry.node);
                if simulate(snapshot, actions, &steps, goal) {
                    trace!(goal = goal.name(), expansions, "goap search solved");
                    return Some((steps, entry.cost));
                }
                continue;
            }

            {
                let node = &nodes[entry.node];
                let key = (node.open.clone(), node.protected.clone());
                if best.get(&key).is_some_and(|&cost| cost < entry.cost) {
                    continue; // stale heap entry
                }
            }

            expansions += 1;
            if expansions > self.config.max_expansions {
                debug!(
                    goal = goal.name(),
                    max_expansions = self.config.max_expansions,
                    "goap search budget exhausted"
                );
                return None;
            }

            for (idx, action) in actions.iter().enumerate() {
                let id = ActionId(idx);
                let schema = action.as_ref();
                let Some(child) = regress(&nodes, entry.node, id, schema, snapshot) else {
                    continue;
                };

                let cost = entry.cost + schema.cost();
                let key = (child.open.clone(), child.protected.clone());
                if best.get(&key).is_some_and(|&prev| prev <= cost) {
                    continue;
                }
                best.insert(key, cost);

                nodes.push(child);
                heap.push(OpenEntry {
                    cost,
                    depth: entry.depth + 1,
                    tie,
                    node: nodes.len() - 1,
                });
                tie += 1;
            }
        }

        None
    }
}

/// Regress the frontier at `node_idx` through `action`, or `None` when the action is not a
/// candidate there.
fn regress(
    nodes: &[SearchNode],
    node_idx: usize,
    action: ActionId,
    schema: &ActionSchema,
    snapshot: &BeliefState,
) -> Option<SearchNode> {
    let node = &nodes[node_idx];
    let effects = schema.effects();

    // Must close at least one open target.
    if !effects
        .iter()
        .any(|(name, value)| node.open.holds(name.as_str(), value))
    {
        return None;
    }
    // Must not undo anything needed later in the plan.
    if node.open.conflicts_with(effects) || node.protected.conflicts_with(effects) {
        return None;
    }
    if path_uses(nodes, node_idx, action) {
        return None;
    }

    let mut open = node.open.clone();
    let mut protected = node.protected.clone();
    for name in effects.keys() {
        open.remove(name.as_str());
        protected.remove(name.as_str());
    }

    let mut seen = node.seen.clone();
    for (name, value) in schema.preconditions().iter() {
        let name_str = name.as_str();
        if open.get(name_str) == Some(!value) || protected.get(name_str) == Some(!value) {
            return None;
        }
        if snapshot.holds(name_str, value) {
            protected.set(name, value);
            continue;
        }
        if open.holds(name_str, value) {
            continue;
        }
        // Cycle guard: a target already closed on this path is never re-opened.
        if !seen.insert((name.clone(), value)) {
            return None;
        }
        open.set(name, value);
    }

    Some(SearchNode {
        open,
        protected,
        seen,
        parent: Some(node_idx),
        action: Some(action),
    })
}

fn path_uses(nodes: &[SearchNode], mut idx: usize, action: ActionId) -> bool {
    loop {
        let node = &nodes[idx];
        if node.action == Some(action) {
            return true;
        }
        match node.parent {
            Some(parent) => idx = parent,
            None => return false,
        }
    }
}

/// Selection order runs goal-first; execution order is its reverse.
fn forward_steps(nodes: &[SearchNode], leaf: usize) -> Vec<ActionId> {
    let mut selected = Vec::new();
    let mut idx = Some(leaf);
    while let Some(i) = idx {
        if let Some(action) = nodes[i].action {
            selected.push(action);
        }
        idx = nodes[i].parent;
    }
    selected
}

fn simulate<A>(snapshot: &BeliefState, actions: &[A], steps: &[ActionId], goal: &Goal) -> bool
where
    A: AsRef<ActionSchema>,
{
    let mut state = snapshot.clone();
    for id in steps {
        let schema = actions[id.0].as_ref();
        if !schema.is_applicable(&state) {
            return false;
        }
        schema.apply(&mut state);
    }
    goal.is_satisfied(&state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(name: &str) -> crate::ActionBuilder {
        ActionSchema::builder(name)
    }

    #[test]
    fn mutually_dependent_actions_do_not_loop() {
        // A needs B's effect, B needs A's effect: no finite plan exists.
        let actions = vec![
            action("A")
                .precondition("Y", true)
                .effect("X", true)
                .build()
                .unwrap(),
            action("B")
                .precondition("X", true)
                .effect("Y", true)
                .build()
                .unwrap(),
        ];
        let goal = Goal::builder("G").desire("X", true).build().unwrap();
        let snapshot: BeliefState = [("X", false), ("Y", false)].into_iter().collect();

        let planner = GoapPlanner::new();
        assert!(planner.plan_for_goal(&snapshot, &actions, &goal).is_none());
    }

    #[test]
    fn earlier_action_may_not_clobber_a_protected_precondition() {
        // Unlock needs HasKey (already true); the only way to get HasTool drops the key.
        let actions = vec![
            action("Unlock")
                .precondition("HasKey", true)
                .precondition("HasTool", true)
                .effect("DoorOpen", true)
                .build()
                .unwrap(),
            action("TradeKeyForTool")
                .effect("HasTool", true)
                .effect("HasKey", false)
                .build()
                .unwrap(),
        ];
        let goal = Goal::builder("Open").desire("DoorOpen", true).build().unwrap();
        let snapshot: BeliefState = [("HasKey", true), ("HasTool", false), ("DoorOpen", false)]
            .into_iter()
            .collect();

        assert!(GoapPlanner::new()
            .plan_for_goal(&snapshot, &actions, &goal)
            .is_none());
    }

    #[test]
    fn expansion_budget_bounds_the_search() {
        let mut actions = Vec::new();
        for i in 0..6 {
            actions.push(
                action("step")
                    .precondition(format!("S{i}"), true)
                    .effect(format!("S{}", i + 1), true)
                    .build()
                    .unwrap(),
            );
        }
        let goal = Goal::builder("End").desire("S6", true).build().unwrap();
        let snapshot = BeliefState::new().with("S0", true);

        let roomy = GoapPlanner::new();
        let (steps, cost) = roomy.plan_for_goal(&snapshot, &actions, &goal).unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(cost, 6.0);

        let tight = GoapPlanner::new().with_config(GoapPlannerConfig { max_expansions: 2 });
        assert!(tight.plan_for_goal(&snapshot, &actions, &goal).is_none());
    }
}
