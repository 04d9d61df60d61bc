#![cfg(feature = "serde")]

use ai_core::BeliefState;

#[test]
fn belief_state_serializes_as_plain_map() {
    let state = BeliefState::new()
        .with("AgentIdle", true)
        .with("HasKey", false);

    let json = serde_json::to_string(&state).expect("serialize");
    assert_eq!(json, r#"{"AgentIdle":true,"HasKey":false}"#);

    let roundtrip: BeliefState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, state);
}
