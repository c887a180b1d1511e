use super::*;
use serde_json::json;

#[test]
fn test_events_serialize_tagged() {
    let event = SessionEvent::MoveApplied {
        from: "e2".to_string(),
        to: "e4".to_string(),
        san: "e4".to_string(),
        fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPPPPPP/RNBQKBNR b KQkq e3 0 1".to_string(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "move_applied");
    assert_eq!(value["san"], "e4");

    let tick = SessionEvent::ClockTick {
        white_ms: Some(59_000),
        black_ms: None,
    };
    assert_eq!(
        serde_json::to_value(&tick).unwrap(),
        json!({ "type": "clock_tick", "white_ms": 59_000, "black_ms": null })
    );

    assert_eq!(
        serde_json::to_value(SessionEvent::PremoveCleared).unwrap(),
        json!({ "type": "premove_cleared" })
    );
}
