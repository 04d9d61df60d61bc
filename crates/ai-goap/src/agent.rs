use core::fmt;
use std::collections::BTreeSet;

use ai_core::{
    ActionStatus, AgentId, BeliefKey, BeliefState, Beliefs, TickContext, WorldMut, WorldView,
};
use ai_tools::{TraceEvent, Tracer};
use tracing::{debug, info, warn};

use crate::error::{GoapError, Result};
use crate::table::{GoapTable, StrategyFactory};
use crate::{ActionId, ActionPlan, GoapAction, GoapAgentConfig, GoapPlanner, Goal, GoalId};

/// Hook run right before the first action of a freshly computed plan starts.
///
/// Typically clears stale movement state (see `ai_nav::reset_locomotion`).
pub type PlanStartHook<W> = dyn FnMut(&TickContext, <W as WorldView>::Agent, &mut W);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// No action in progress; the agent plans on its next think tick.
    Idle,
    /// A strategy is running.
    Executing,
}

/// The per-tick GOAP driver for one agent.
///
/// Owns the belief registry, the action and goal sets, and at most one current goal, plan and
/// in-progress action. Planning only happens when idle, or at an action boundary when a more
/// urgent goal may have become feasible.
///
/// External preemption (e.g. perception noticing a new target) is cooperative: call
/// [`GoapAgent::request_replan`], and the next [`GoapAgent::tick`] stops the running strategy
/// and plans again.
pub struct GoapAgent<W>
where
    W: WorldMut + 'static,
{
    agent: W::Agent,
    config: GoapAgentConfig,
    planner: GoapPlanner,
    beliefs: Beliefs<W>,
    actions: Vec<GoapAction<W>>,
    goals: Vec<Goal>,
    on_plan_start: Option<Box<PlanStartHook<W>>>,
    tracer: Tracer,

    current_goal: Option<GoalId>,
    current_action: Option<ActionId>,
    plan: Option<ActionPlan>,
    previous_goal: Option<GoalId>,
    replan_requested: bool,
    last_plan_tick: Option<u64>,

    plan_calls: u64,
    plans_started: u64,
}

impl<W> GoapAgent<W>
where
    W: WorldMut + 'static,
{
    pub fn builder(agent: W::Agent) -> GoapAgentBuilder<W> {
        GoapAgentBuilder::new(agent)
    }

    pub fn agent(&self) -> W::Agent {
        self.agent
    }

    pub fn config(&self) -> &GoapAgentConfig {
        &self.config
    }

    pub fn state(&self) -> AgentState {
        if self.current_action.is_some() {
            AgentState::Executing
        } else {
            AgentState::Idle
        }
    }

    pub fn beliefs(&self) -> &Beliefs<W> {
        &self.beliefs
    }

    pub fn actions(&self) -> &[GoapAction<W>] {
        &self.actions
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn action(&self, id: ActionId) -> Option<&GoapAction<W>> {
        self.actions.get(id.0)
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.get(id.0)
    }

    pub fn find_action(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.name() == name)
            .map(ActionId)
    }

    pub fn find_goal(&self, name: &str) -> Option<GoalId> {
        self.goals.iter().position(|g| g.name() == name).map(GoalId)
    }

    pub fn current_goal(&self) -> Option<GoalId> {
        self.current_goal
    }

    pub fn current_action(&self) -> Option<ActionId> {
        self.current_action
    }

    /// The goal of the last plan that ran to completion.
    pub fn previous_goal(&self) -> Option<GoalId> {
        self.previous_goal
    }

    /// The remaining steps of the current plan (the running action is already popped).
    pub fn plan(&self) -> Option<&ActionPlan> {
        self.plan.as_ref()
    }

    pub fn current_goal_name(&self) -> Option<&str> {
        self.current_goal.and_then(|id| self.goal(id)).map(Goal::name)
    }

    pub fn current_action_name(&self) -> Option<&str> {
        self.current_action
            .and_then(|id| self.action(id))
            .map(GoapAction::name)
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Number of times the planner was invoked.
    pub fn plan_calls(&self) -> u64 {
        self.plan_calls
    }

    /// Number of plans that were adopted and started.
    pub fn plans_started(&self) -> u64 {
        self.plans_started
    }

    pub fn snapshot(&self, world: &W) -> BeliefState {
        self.beliefs.snapshot(self.agent, world)
    }

    /// Ask for the current plan to be dropped and recomputed at the next tick boundary.
    pub fn request_replan(&mut self) {
        self.replan_requested = true;
    }

    pub fn replan_requested(&self) -> bool {
        self.replan_requested
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) {
        let mut force_plan = false;
        if self.replan_requested {
            self.replan_requested = false;
            self.preempt(ctx, world);
            force_plan = true;
        }

        if self.current_action.is_none() && (force_plan || self.config.should_think(ctx.tick)) {
            let min_priority = self.current_goal_priority();
            self.try_start_plan(ctx, world, min_priority);
        }

        self.update_current(ctx, world);
    }

    fn current_goal_priority(&self) -> Option<i32> {
        self.current_goal
            .and_then(|id| self.goal(id))
            .map(Goal::priority)
    }

    fn update_current(&mut self, ctx: &TickContext, world: &mut W) {
        let Some(id) = self.current_action else {
            return;
        };
        let agent = self.agent;

        let strategy = self.actions[id.0].strategy_mut();
        strategy.update(ctx, agent, world);
        let status = strategy.status(agent, world);
        if status == ActionStatus::Running {
            return;
        }
        strategy.stop(ctx, agent, world);
        self.current_action = None;

        let goal_idx = self.current_goal.map_or(0, |g| g.0 as u64);
        if status == ActionStatus::Failure {
            warn!(
                agent = agent.stable_id(),
                action = self.actions[id.0].name(),
                "goap action failed; abandoning plan"
            );
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.action.failure")
                    .with_a(id.0 as u64)
                    .with_b(goal_idx),
            );
            self.abandon_plan();
            return;
        }

        debug!(
            agent = agent.stable_id(),
            action = self.actions[id.0].name(),
            "goap action complete"
        );
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.action.stop")
                .with_a(id.0 as u64)
                .with_b(goal_idx),
        );

        if self.plan.as_ref().map_or(true, ActionPlan::is_empty) {
            self.finish_plan(ctx);
            return;
        }

        // The planner runs at most once per tick.
        if self.config.preempt_at_action_boundaries && self.last_plan_tick != Some(ctx.tick) {
            if let Some(priority) = self.current_goal_priority() {
                if self.try_start_plan(ctx, world, Some(priority)) {
                    return;
                }
            }
        }

        self.start_next_action(ctx, world);
    }

    /// Plan against a fresh snapshot and adopt the result. Returns whether a plan was started.
    ///
    /// Goals whose first step cannot start right now are passed over. A running plan is only
    /// displaced once its replacement has actually started.
    fn try_start_plan(
        &mut self,
        ctx: &TickContext,
        world: &mut W,
        min_priority: Option<i32>,
    ) -> bool {
        let agent = self.agent;
        let snapshot = self.beliefs.snapshot(agent, world);

        self.plan_calls = self.plan_calls.saturating_add(1);
        self.last_plan_tick = Some(ctx.tick);
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.plan.call")
                .with_a(snapshot.len() as u64)
                .with_b(self.current_goal.map_or(u64::MAX, |g| g.0 as u64)),
        );

        let view: &W = world;
        let beliefs = &self.beliefs;
        let actions = &self.actions;
        let goals = &self.goals;
        let tracer = &mut self.tracer;
        let chosen = self.planner.plan_above_filtered(
            &snapshot,
            actions,
            goals,
            self.previous_goal,
            min_priority,
            |plan| {
                let Some(first) = plan.peek() else {
                    return true;
                };
                if step_ready(beliefs, &actions[first.0], agent, view) {
                    return true;
                }
                debug!(
                    agent = agent.stable_id(),
                    goal = goals[plan.goal().0].name(),
                    action = actions[first.0].name(),
                    "goap goal passed over; first step cannot start"
                );
                tracer.emit(
                    TraceEvent::new(ctx.tick, "goap.action.blocked")
                        .with_a(first.0 as u64)
                        .with_b(plan.goal().0 as u64),
                );
                false
            },
        );
        let Some(plan) = chosen else {
            self.tracer.emit(TraceEvent::new(ctx.tick, "goap.plan.none"));
            return false;
        };

        let goal = &self.goals[plan.goal().0];
        info!(
            agent = agent.stable_id(),
            goal = goal.name(),
            priority = goal.priority(),
            steps = ?plan.names(&self.actions),
            cost = plan.cost(),
            "goap plan adopted"
        );
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.plan.result")
                .with_a(plan.len() as u64)
                .with_b(plan.goal().0 as u64),
        );

        let new_goal = plan.goal();
        let displaced_goal = self.current_goal.replace(new_goal);
        let displaced_plan = self.plan.replace(plan);

        if let Some(hook) = self.on_plan_start.as_mut() {
            hook(ctx, agent, world);
        }

        if !self.start_next_action(ctx, world) {
            self.current_goal = displaced_goal;
            self.plan = displaced_plan;
            return false;
        }

        self.plans_started = self.plans_started.saturating_add(1);
        if let Some(previous) = displaced_goal {
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.preempt")
                    .with_a(previous.0 as u64)
                    .with_b(new_goal.0 as u64),
            );
        }
        true
    }

    /// Pop the next step and start it, abandoning the plan if it can no longer run.
    fn start_next_action(&mut self, ctx: &TickContext, world: &mut W) -> bool {
        let Some(id) = self.plan.as_mut().and_then(ActionPlan::pop_front) else {
            self.finish_plan(ctx);
            return false;
        };
        let agent = self.agent;

        if !step_ready(&self.beliefs, &self.actions[id.0], agent, world) {
            debug!(
                agent = agent.stable_id(),
                action = self.actions[id.0].name(),
                "goap action cannot start; abandoning plan"
            );
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.action.blocked").with_a(id.0 as u64),
            );
            self.abandon_plan();
            return false;
        }

        debug!(
            agent = agent.stable_id(),
            action = self.actions[id.0].name(),
            "goap action start"
        );
        self.actions[id.0].strategy_mut().start(ctx, agent, world);
        self.current_action = Some(id);
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.action.start")
                .with_a(id.0 as u64)
                .with_b(self.current_goal.map_or(0, |g| g.0 as u64)),
        );
        true
    }

    /// Stop whatever is running and drop the plan.
    fn preempt(&mut self, ctx: &TickContext, world: &mut W) {
        if let Some(id) = self.current_action.take() {
            let agent = self.agent;
            self.actions[id.0].strategy_mut().stop(ctx, agent, world);
            info!(
                agent = agent.stable_id(),
                action = self.actions[id.0].name(),
                "goap replan requested; action interrupted"
            );
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.interrupt")
                    .with_a(id.0 as u64)
                    .with_b(self.current_goal.map_or(0, |g| g.0 as u64)),
            );
        }
        self.abandon_plan();
    }

    fn abandon_plan(&mut self) {
        self.plan = None;
        self.current_goal = None;
    }

    fn finish_plan(&mut self, ctx: &TickContext) {
        if let Some(goal) = self.current_goal {
            info!(
                agent = self.agent.stable_id(),
                goal = self.goals[goal.0].name(),
                "goap plan complete"
            );
            self.tracer
                .emit(TraceEvent::new(ctx.tick, "goap.plan.complete").with_a(goal.0 as u64));
        }
        self.previous_goal = self.current_goal.take();
        self.plan = None;
    }
}

/// Whether `action` could start now: its preconditions hold live and its strategy agrees.
fn step_ready<W>(
    beliefs: &Beliefs<W>,
    action: &GoapAction<W>,
    agent: W::Agent,
    world: &W,
) -> bool
where
    W: WorldMut + 'static,
{
    let preconditions_hold = beliefs
        .all_hold(action.schema().preconditions(), agent, world)
        .unwrap_or_else(|err| {
            warn!(action = action.name(), %err, "goap precondition check failed");
            false
        });
    preconditions_hold && action.strategy().can_perform(agent, world)
}

impl<W> fmt::Debug for GoapAgent<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoapAgent")
            .field("agent", &self.agent)
            .field("state", &self.state())
            .field("current_goal", &self.current_goal_name())
            .field("current_action", &self.current_action_name())
            .field("plan", &self.plan)
            .field("previous_goal", &self.previous_goal)
            .finish_non_exhaustive()
    }
}

/// Tick agents in stable id order.
pub fn tick_agents<W>(ctx: &TickContext, world: &mut W, agents: &mut [GoapAgent<W>])
where
    W: WorldMut + 'static,
{
    agents.sort_by_key(|a| a.agent.stable_id());
    for agent in agents.iter_mut() {
        agent.tick(ctx, world);
    }
}

/// Setup-time assembly of a [`GoapAgent`].
///
/// Errors from fluent calls are deferred and reported by [`GoapAgentBuilder::build`], which
/// also validates every belief reference.
pub struct GoapAgentBuilder<W>
where
    W: WorldMut + 'static,
{
    agent: W::Agent,
    config: GoapAgentConfig,
    beliefs: Beliefs<W>,
    actions: Vec<GoapAction<W>>,
    goals: Vec<Goal>,
    on_plan_start: Option<Box<PlanStartHook<W>>>,
    tracer: Tracer,
    error: Option<GoapError>,
}

impl<W> GoapAgentBuilder<W>
where
    W: WorldMut + 'static,
{
    pub fn new(agent: W::Agent) -> Self {
        Self {
            agent,
            config: GoapAgentConfig::default(),
            beliefs: Beliefs::new(),
            actions: Vec::new(),
            goals: Vec::new(),
            on_plan_start: None,
            tracer: Tracer::new(),
            error: None,
        }
    }

    pub fn config(mut self, config: GoapAgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the belief registry wholesale.
    pub fn beliefs(mut self, beliefs: Beliefs<W>) -> Self {
        self.beliefs = beliefs;
        self
    }

    pub fn belief(
        mut self,
        name: impl Into<BeliefKey>,
        evaluate: impl Fn(W::Agent, &W) -> bool + 'static,
    ) -> Self {
        if let Err(err) = self.beliefs.register(name, evaluate) {
            self.defer(err.into());
        }
        self
    }

    pub fn constant_belief(mut self, name: impl Into<BeliefKey>, value: bool) -> Self {
        if let Err(err) = self.beliefs.register_constant(name, value) {
            self.defer(err.into());
        }
        self
    }

    /// Mutable access for helpers that register beliefs in bulk.
    pub fn beliefs_mut(&mut self) -> &mut Beliefs<W> {
        &mut self.beliefs
    }

    pub fn action(mut self, action: GoapAction<W>) -> Self {
        self.actions.push(action);
        self
    }

    /// Accepts the direct output of an [`crate::ActionBuilder`].
    pub fn try_action(mut self, action: Result<GoapAction<W>>) -> Self {
        match action {
            Ok(action) => self.actions.push(action),
            Err(err) => self.defer(err),
        }
        self
    }

    pub fn goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn try_goal(mut self, goal: Result<Goal>) -> Self {
        match goal {
            Ok(goal) => self.goals.push(goal),
            Err(err) => self.defer(err),
        }
        self
    }

    /// Append the actions and goals of a designer table.
    pub fn table<S, F>(mut self, table: &GoapTable<S>, factory: &F) -> Self
    where
        F: StrategyFactory<W, Spec = S>,
    {
        match table.build_actions(factory) {
            Ok(actions) => self.actions.extend(actions),
            Err(err) => self.defer(err),
        }
        match table.build_goals() {
            Ok(goals) => self.goals.extend(goals),
            Err(err) => self.defer(err),
        }
        self
    }

    pub fn on_plan_start(
        mut self,
        hook: impl FnMut(&TickContext, W::Agent, &mut W) + 'static,
    ) -> Self {
        self.on_plan_start = Some(Box::new(hook));
        self
    }

    pub fn tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    fn defer(&mut self, err: GoapError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    pub fn build(mut self) -> Result<GoapAgent<W>> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let mut names = BTreeSet::new();
        for action in &self.actions {
            if !names.insert(action.name()) {
                return Err(GoapError::config(format!(
                    "duplicate action `{}`",
                    action.name()
                )));
            }
            let schema = action.schema();
            for name in schema.preconditions().keys().chain(schema.effects().keys()) {
                self.check_belief(action.name(), name)?;
            }
        }

        let mut names = BTreeSet::new();
        for goal in &self.goals {
            if !names.insert(goal.name()) {
                return Err(GoapError::config(format!("duplicate goal `{}`", goal.name())));
            }
            for name in goal.desired().keys() {
                self.check_belief(goal.name(), name)?;
            }
        }

        info!(
            agent = self.agent.stable_id(),
            beliefs = self.beliefs.len(),
            actions = self.actions.len(),
            goals = self.goals.len(),
            "goap agent ready"
        );

        Ok(GoapAgent {
            agent: self.agent,
            planner: GoapPlanner::new().with_config(self.config.planner_config()),
            config: self.config,
            beliefs: self.beliefs,
            actions: self.actions,
            goals: self.goals,
            on_plan_start: self.on_plan_start,
            tracer: self.tracer,
            current_goal: None,
            current_action: None,
            plan: None,
            previous_goal: None,
            replan_requested: false,
            last_plan_tick: None,
            plan_calls: 0,
            plans_started: 0,
        })
    }

    fn check_belief(&self, owner: &str, belief: &BeliefKey) -> Result<()> {
        if self.beliefs.contains(belief.as_str()) {
            Ok(())
        } else {
            Err(GoapError::UnknownBelief {
                owner: owner.to_string(),
                belief: belief.to_string(),
            })
        }
    }
}
