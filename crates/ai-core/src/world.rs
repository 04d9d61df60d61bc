use core::fmt::Debug;

/// Stable identifier for an agent.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`) so agents tick in the same order every run
/// - a stable numeric ID (`stable_id`) for RNG streams, think offsets and traces
pub trait AgentId: Copy + Ord + Eq + Debug + 'static {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl AgentId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

/// Read-only world access.
///
/// Belief evaluators only ever receive `&Self`, which is what keeps them free of side effects.
/// Subsystems (navigation, perception, ...) extend this with their own query traits.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink handed to strategies.
pub trait WorldMut: WorldView {}
