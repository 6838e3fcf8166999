use chrono::NaiveDateTime;
use sptrackcli::types::ArtistRef;
use sptrackcli::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_local_timestamp_format() {
    let ts = local_timestamp();

    // Should parse back with the format it is stored in
    assert!(NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M:%S").is_ok());
    assert_eq!(ts.len(), 19);
}

#[test]
fn test_normalize_genre() {
    assert_eq!(normalize_genre("Rock"), "rock");
    assert_eq!(normalize_genre("  Indie Pop  "), "indie pop");
    assert_eq!(normalize_genre("LO-FI"), "lo-fi");

    // Already normalized input is unchanged
    assert_eq!(normalize_genre("techno"), "techno");

    // Whitespace-only input folds to empty
    assert_eq!(normalize_genre("   "), "");
}

#[test]
fn test_join_fields() {
    let artists = vec![
        ArtistRef {
            id: "id_a".to_string(),
            name: "Artist A".to_string(),
        },
        ArtistRef {
            id: "id_b".to_string(),
            name: "Artist B".to_string(),
        },
    ];

    assert_eq!(
        join_fields(&artists, |a| a.name.as_str()),
        "Artist A, Artist B"
    );
    assert_eq!(join_fields(&artists, |a| a.id.as_str()), "id_a, id_b");

    // Single element has no separator
    assert_eq!(join_fields(&artists[..1], |a| a.name.as_str()), "Artist A");

    // Empty slice joins to empty string
    let none: Vec<ArtistRef> = Vec::new();
    assert_eq!(join_fields(&none, |a| a.name.as_str()), "");
}

#[test]
fn test_change_detector_first_observation() {
    let mut detector = ChangeDetector::new();

    // The very first observation is always a new event
    assert!(detector.observe("Song A", Some(60_000)));
    assert_eq!(detector.last_track(), Some("Song A"));
}

#[test]
fn test_change_detector_same_track_no_event() {
    let mut detector = ChangeDetector::new();
    assert!(detector.observe("Song A", Some(10_000)));

    // Same track mid-play does not fire again
    assert!(!detector.observe("Song A", Some(20_000)));
    assert!(!detector.observe("Song A", None));
}

#[test]
fn test_change_detector_track_change() {
    let mut detector = ChangeDetector::new();
    assert!(detector.observe("Song A", Some(10_000)));

    assert!(detector.observe("Song B", Some(30_000)));
    assert_eq!(detector.last_track(), Some("Song B"));

    // Going back to the previous track is a change as well
    assert!(detector.observe("Song A", Some(30_000)));
}

#[test]
fn test_change_detector_restart() {
    let mut detector = ChangeDetector::new();
    assert!(detector.observe("Song A", Some(120_000)));

    // Progress below the threshold counts as a restart of the same track
    assert!(detector.observe("Song A", Some(500)));

    // Exactly at the threshold is not a restart
    assert!(!detector.observe("Song A", Some(RESTART_THRESHOLD_MS)));

    // Unknown progress cannot signal a restart
    assert!(!detector.observe("Song A", None));
}
