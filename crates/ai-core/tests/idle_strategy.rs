use ai_core::{ActionStatus, IdleStrategy, Strategy, TickContext, WorldMut, WorldView};

struct EmptyWorld;

impl WorldView for EmptyWorld {
    type Agent = u64;
}

impl WorldMut for EmptyWorld {}

#[test]
fn idle_completes_after_countdown() {
    let mut world = EmptyWorld;
    let mut idle = IdleStrategy::new(1.0);
    let mut ctx = TickContext::new(0, 0.25, 0);

    assert!(Strategy::<EmptyWorld>::can_perform(&idle, 1, &world));
    Strategy::<EmptyWorld>::start(&mut idle, &ctx, 1, &mut world);

    let mut ticks = 0;
    while Strategy::<EmptyWorld>::status(&idle, 1, &world) == ActionStatus::Running {
        Strategy::<EmptyWorld>::update(&mut idle, &ctx, 1, &mut world);
        ctx = ctx.next();
        ticks += 1;
        assert!(ticks <= 4, "idle should finish within four quarter-second ticks");
    }

    assert_eq!(ticks, 4);
    assert!(!Strategy::<EmptyWorld>::failed(&idle, 1, &world));
}

#[test]
fn idle_restart_resets_the_countdown() {
    let mut world = EmptyWorld;
    let mut idle = IdleStrategy::new(0.5);
    let ctx = TickContext::new(0, 1.0, 0);

    Strategy::<EmptyWorld>::start(&mut idle, &ctx, 1, &mut world);
    Strategy::<EmptyWorld>::update(&mut idle, &ctx, 1, &mut world);
    assert!(Strategy::<EmptyWorld>::complete(&idle, 1, &world));

    Strategy::<EmptyWorld>::start(&mut idle, &ctx, 1, &mut world);
    assert!(!Strategy::<EmptyWorld>::complete(&idle, 1, &world));
    assert_eq!(idle.remaining(), 0.5);
}

#[test]
fn stop_without_start_is_harmless() {
    let mut world = EmptyWorld;
    let mut idle = IdleStrategy::new(2.0);
    let ctx = TickContext::new(0, 0.1, 0);

    Strategy::<EmptyWorld>::stop(&mut idle, &ctx, 1, &mut world);
    Strategy::<EmptyWorld>::stop(&mut idle, &ctx, 1, &mut world);
    assert_eq!(idle.remaining(), 2.0);
}
