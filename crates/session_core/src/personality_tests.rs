use super::*;

#[test]
fn test_lookup_known_key() {
    let p = Personality::lookup("club");
    assert_eq!(p.key, "club");
    assert!(matches!(p.kind, PersonalityKind::Engine { .. }));
}

#[test]
fn test_lookup_unknown_key_falls_back_to_strongest() {
    let p = Personality::lookup("no-such-opponent");
    assert_eq!(p.key, Personality::strongest().key);
}

#[test]
fn test_random_kind_exists() {
    let p = Personality::lookup("scatter");
    assert!(p.is_random());
}

#[test]
fn test_table_is_sane() {
    let mut count = 0;
    for p in Personality::all() {
        count += 1;
        let (min, max) = p.think_delay_ms;
        assert!(min <= max, "{} has an inverted delay window", p.key);
        if let PersonalityKind::Engine {
            depth,
            move_time_ms,
            blunder_chance,
        } = p.kind
        {
            assert!(depth > 0);
            assert!(move_time_ms > 0);
            assert!((0.0..=1.0).contains(&blunder_chance));
        }
    }
    assert!(count >= 2, "table needs a random and an engine personality");
}

#[test]
fn test_strongest_never_blunders() {
    match Personality::strongest().kind {
        PersonalityKind::Engine { blunder_chance, .. } => assert_eq!(blunder_chance, 0.0),
        PersonalityKind::Random => panic!("strongest personality must be engine-backed"),
    }
}
