use std::collections::BTreeMap;

use ai_core::{Beliefs, Strategy, TickContext, WorldMut, WorldView};
use ai_goap::{ActionBuilder, GoapAgent, Goal};
use ai_nav::{
    reset_locomotion, Locomotion, MoveToStrategy, NavBeliefsExt, NavGrid, NavWorldMut,
    NavWorldView, Navigator, PathFollower, Sensor, Vec2, WanderStrategy,
};
use ai_tools::Tracer;

struct Arena {
    grid: NavGrid,
    movers: BTreeMap<u64, PathFollower>,
    sensors: BTreeMap<u64, Sensor>,
}

impl Arena {
    fn new(grid: NavGrid) -> Self {
        Self {
            grid,
            movers: BTreeMap::new(),
            sensors: BTreeMap::new(),
        }
    }

    fn with_mover(mut self, agent: u64, position: Vec2) -> Self {
        self.movers.insert(agent, PathFollower::new(position, 2.0));
        self
    }

    fn step(&mut self, dt: f32) {
        for mover in self.movers.values_mut() {
            mover.step(&self.grid, dt);
        }
    }
}

impl WorldView for Arena {
    type Agent = u64;
}

impl WorldMut for Arena {}

impl NavWorldView for Arena {
    fn position(&self, agent: u64) -> Option<Vec2> {
        self.movers.get(&agent).map(PathFollower::position)
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.grid
    }

    fn locomotion(&self, agent: u64) -> Option<&dyn Locomotion> {
        self.movers.get(&agent).map(|m| m as &dyn Locomotion)
    }
}

impl NavWorldMut for Arena {
    fn locomotion_mut(&mut self, agent: u64) -> Option<&mut dyn Locomotion> {
        self.movers.get_mut(&agent).map(|m| m as &mut dyn Locomotion)
    }
}

fn sensor_of(world: &Arena, agent: u64) -> Option<&Sensor> {
    world.sensors.get(&agent)
}

fn open_grid() -> NavGrid {
    NavGrid::new(9, 9, 1.0)
}

fn go_to_agent(destination: Vec2) -> GoapAgent<Arena> {
    let mut beliefs = Beliefs::<Arena>::new();
    beliefs
        .add_location_belief("AtTarget", destination, 0.25)
        .unwrap();
    GoapAgent::<Arena>::builder(1)
        .beliefs(beliefs)
        .try_action(
            ActionBuilder::new("GoThere")
                .strategy(MoveToStrategy::new(destination, 0.05))
                .effect("AtTarget", true)
                .build(),
        )
        .try_goal(Goal::builder("Arrive").priority(1).desire("AtTarget", true).build())
        .on_plan_start(reset_locomotion)
        .tracer(Tracer::new().with_log())
        .build()
        .unwrap()
}

fn simulate(agent: &mut GoapAgent<Arena>, arena: &mut Arena, ticks: u64) {
    let mut ctx = TickContext::new(0, 0.5, 11);
    for _ in 0..ticks {
        agent.tick(&ctx, arena);
        arena.step(ctx.dt());
        ctx = ctx.next();
    }
}

#[test]
fn move_to_walks_agent_to_destination() {
    let destination = Vec2::new(4.5, 0.5);
    let mut arena = Arena::new(open_grid()).with_mover(1, Vec2::new(0.5, 0.5));
    let mut agent = go_to_agent(destination);

    simulate(&mut agent, &mut arena, 8);

    assert_eq!(arena.position(1), Some(destination));
    assert_eq!(agent.previous_goal(), agent.find_goal("Arrive"));
    assert!(agent.current_action().is_none());
    assert_eq!(arena.movers[&1].destination(), None);
    assert_eq!(agent.tracer().log().map(|l| l.count("goap.plan.complete")), Some(1));
}

#[test]
fn move_to_unreachable_destination_fails_the_plan() {
    let mut grid = open_grid();
    grid.set_blocked(4, 0, true);
    let mut arena = Arena::new(grid).with_mover(1, Vec2::new(0.5, 0.5));
    let mut agent = go_to_agent(Vec2::new(4.5, 0.5));

    simulate(&mut agent, &mut arena, 2);

    assert_eq!(agent.previous_goal(), None);
    assert!(agent.current_goal().is_none());
    assert_eq!(
        agent.tracer().log().map(|l| l.count("goap.action.failure")),
        Some(1)
    );
    assert_eq!(arena.position(1), Some(Vec2::new(0.5, 0.5)));
}

#[test]
fn move_to_requires_locomotion_and_stop_is_idempotent() {
    let mut arena = Arena::new(open_grid()).with_mover(1, Vec2::new(0.5, 0.5));
    let ctx = TickContext::new(0, 0.1, 0);
    let mut strategy = MoveToStrategy::new(Vec2::new(3.5, 3.5), 0.1);

    assert!(!strategy.can_perform(2, &arena));
    assert!(strategy.can_perform(1, &arena));

    strategy.stop(&ctx, 1, &mut arena);
    strategy.start(&ctx, 1, &mut arena);
    assert!(!strategy.complete(1, &arena));
    assert_eq!(arena.movers[&1].destination(), Some(Vec2::new(3.5, 3.5)));

    strategy.stop(&ctx, 1, &mut arena);
    strategy.stop(&ctx, 1, &mut arena);
    assert_eq!(arena.movers[&1].destination(), None);
}

#[test]
fn wander_picks_deterministic_destination_within_radius() {
    let origin = Vec2::new(4.5, 4.5);
    let ctx = TickContext::new(3, 0.5, 42);

    let pick = || {
        let mut arena = Arena::new(open_grid()).with_mover(7, origin);
        let mut wander = WanderStrategy::new(3.0, 0.05);
        wander.start(&ctx, 7, &mut arena);
        (arena.movers[&7].destination(), wander)
    };

    let (first, _) = pick();
    let (second, _) = pick();
    let destination = first.expect("destination");
    assert_eq!(first, second);
    assert!(destination.distance(origin) <= 3.0);
}

#[test]
fn wander_completes_on_arrival() {
    let mut arena = Arena::new(open_grid()).with_mover(7, Vec2::new(4.5, 4.5));
    let mut wander = WanderStrategy::new(3.0, 0.05);
    let ctx = TickContext::new(0, 0.5, 5);

    wander.start(&ctx, 7, &mut arena);
    let mut ticks = 0;
    while !wander.complete(7, &arena) {
        arena.step(0.5);
        ticks += 1;
        assert!(ticks < 20, "wander never arrived");
    }
    assert!(!wander.failed(7, &arena));

    wander.stop(&ctx, 7, &mut arena);
    wander.stop(&ctx, 7, &mut arena);
    assert_eq!(arena.movers[&7].destination(), None);
}

#[test]
fn wander_without_navigable_space_fails() {
    let blocked = NavGrid::from_rows(&["###", "###", "###"], 1.0).expect("grid");
    let mut arena = Arena::new(blocked).with_mover(7, Vec2::new(1.5, 1.5));
    let mut wander = WanderStrategy::new(2.0, 0.05);
    let ctx = TickContext::new(0, 0.5, 5);

    assert!(!wander.can_perform(8, &arena));
    wander.start(&ctx, 7, &mut arena);
    assert!(wander.complete(7, &arena));
    assert!(wander.failed(7, &arena));
}

#[test]
fn wander_refuses_to_start_without_free_point_in_radius() {
    let corridor = NavGrid::from_rows(&["#######."], 1.0).expect("grid");
    let arena = Arena::new(corridor).with_mover(7, Vec2::new(0.5, 0.5));

    assert!(!WanderStrategy::new(2.0, 0.05).can_perform(7, &arena));
    assert!(WanderStrategy::new(8.0, 0.05).can_perform(7, &arena));
}

#[test]
fn wander_in_a_narrow_corridor_picks_the_free_cell() {
    let corridor = NavGrid::from_rows(&["##.##"], 1.0).expect("grid");
    let mut arena = Arena::new(corridor).with_mover(7, Vec2::new(0.5, 0.5));
    let mut wander = WanderStrategy::new(2.5, 0.05);
    let ctx = TickContext::new(0, 0.5, 5);

    assert!(wander.can_perform(7, &arena));
    wander.start(&ctx, 7, &mut arena);
    assert!(!wander.failed(7, &arena));
    let destination = arena.movers[&7].destination().expect("destination");
    assert!((2.0..3.0).contains(&destination.x));
    assert!(destination.distance(Vec2::new(0.5, 0.5)) <= 2.5);
}

#[test]
fn sensor_belief_tracks_known_target() {
    let mut arena = Arena::new(open_grid()).with_mover(1, Vec2::new(0.5, 0.5));
    arena.sensors.insert(1, Sensor::new(3.0));

    let mut beliefs = Beliefs::<Arena>::new();
    beliefs
        .add_sensor_belief("TargetKnown", sensor_of)
        .unwrap()
        .add_location_belief("AtOrigin", Vec2::new(0.5, 0.5), 0.1)
        .unwrap();

    let snapshot = beliefs.snapshot(1, &arena);
    assert_eq!(snapshot.get("TargetKnown"), Some(false));
    assert_eq!(snapshot.get("AtOrigin"), Some(true));

    let origin = arena.position(1).unwrap();
    if let Some(sensor) = arena.sensors.get_mut(&1) {
        sensor.update(origin, [(9, Vec2::new(2.0, 2.0))]);
    }
    assert_eq!(beliefs.evaluate("TargetKnown", 1, &arena), Ok(true));
    // Agents without a sensor never know a target.
    assert_eq!(beliefs.evaluate("TargetKnown", 2, &arena), Ok(false));
}
