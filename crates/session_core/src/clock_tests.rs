use super::*;

#[test]
fn test_parse_time_control() {
    let tc: TimeControl = "10+5".parse().unwrap();
    assert_eq!(tc, TimeControl::new(10, 5));
    assert_eq!(tc.initial_time, 600);
    assert_eq!(tc.increment, 5);

    let tc: TimeControl = "0+0".parse().unwrap();
    assert!(tc.is_unlimited());
}

#[test]
fn test_parse_time_control_rejects_garbage() {
    assert!("".parse::<TimeControl>().is_err());
    assert!("10".parse::<TimeControl>().is_err());
    assert!("ten+five".parse::<TimeControl>().is_err());
    assert!("10+".parse::<TimeControl>().is_err());
}

#[test]
fn test_time_control_display_round_trip() {
    let tc = TimeControl::new(3, 2);
    assert_eq!(tc.to_string(), "3+2");
    assert_eq!(tc.to_string().parse::<TimeControl>().unwrap(), tc);
    assert_eq!(TimeControl::unlimited().to_string(), "Unlimited");
}

#[test]
fn test_only_one_side_runs() {
    let mut clock = ChessClock::new(TimeControl::new(5, 0));
    assert_eq!(clock.running_for(), None);

    clock.start(Color::White);
    assert_eq!(clock.running_for(), Some(Color::White));

    // Starting the other side implicitly stops the first.
    clock.start(Color::Black);
    assert_eq!(clock.running_for(), Some(Color::Black));

    clock.stop();
    assert_eq!(clock.running_for(), None);
}

#[test]
fn test_tick_decrements_running_side_only() {
    let mut clock = ChessClock::new(TimeControl::new(5, 0));
    clock.start(Color::White);

    assert_eq!(clock.tick(), None);
    assert_eq!(clock.remaining_ms(Color::White), Some(300_000 - TICK_MS));
    assert_eq!(clock.remaining_ms(Color::Black), Some(300_000));
}

#[test]
fn test_expiry_flags_running_side_and_stops() {
    let mut clock = ChessClock::new(TimeControl::new(1, 0));
    clock.start(Color::Black);

    let mut flagged = None;
    for _ in 0..60 {
        flagged = clock.tick();
        if flagged.is_some() {
            break;
        }
    }
    assert_eq!(flagged, Some(Color::Black));
    assert_eq!(clock.remaining_ms(Color::Black), Some(0));
    assert_eq!(clock.running_for(), None);
    // A latched clock never ticks again.
    assert_eq!(clock.tick(), None);
}

#[test]
fn test_increment_added_to_mover() {
    let mut clock = ChessClock::new(TimeControl::new(1, 5));
    clock.start(Color::White);
    clock.add_increment(Color::White);
    assert_eq!(clock.remaining_ms(Color::White), Some(65_000));
    assert_eq!(clock.remaining_ms(Color::Black), Some(60_000));
}

#[test]
fn test_unlimited_clock_never_ticks_or_expires() {
    let mut clock = ChessClock::new(TimeControl::unlimited());
    assert!(!clock.is_enabled());

    clock.start(Color::White);
    assert_eq!(clock.running_for(), None);
    assert_eq!(clock.tick(), None);
    assert_eq!(clock.remaining_ms(Color::White), None);
    assert_eq!(clock.remaining_ms(Color::Black), None);
}

#[test]
fn test_format_time() {
    assert_eq!(
        ChessClock::format_time(Duration::from_secs(605)),
        "10:05"
    );
    // Tenths shown under ten seconds
    assert_eq!(
        ChessClock::format_time(Duration::from_millis(9_300)),
        "0:09.3"
    );
}
