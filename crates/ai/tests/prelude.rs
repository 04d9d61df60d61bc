#![cfg(all(feature = "core", feature = "goap"))]

use ai::prelude::*;

struct Room;

impl WorldView for Room {
    type Agent = u64;
}

impl WorldMut for Room {}

#[test]
fn prelude_builds_and_runs_an_agent() {
    let mut agent = GoapAgent::<Room>::builder(1)
        .constant_belief("Nothing", false)
        .try_action(
            ActionBuilder::new("Relax")
                .strategy(IdleStrategy::new(0.2))
                .effect("Nothing", true)
                .build(),
        )
        .try_goal(Goal::builder("ChillOut").priority(1).desire("Nothing", true).build())
        .build()
        .expect("agent");

    let mut room = Room;
    let mut ctx = TickContext::new(0, 0.1, 0);
    agent.tick(&ctx, &mut room);
    assert_eq!(agent.state(), AgentState::Executing);
    assert_eq!(agent.current_action_name(), Some("Relax"));

    // "Nothing" never becomes true, so the agent relaxes again once the idle timer runs out.
    for _ in 0..2 {
        ctx = ctx.next();
        agent.tick(&ctx, &mut room);
    }
    assert_eq!(agent.previous_goal(), agent.find_goal("ChillOut"));
    assert_eq!(agent.plans_started(), 2);
}
