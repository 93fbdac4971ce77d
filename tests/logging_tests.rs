use whisperbot::setup_logging;

#[test]
fn test_logging_setup() {
    // Repeated calls must not panic; later calls keep the first subscriber.
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
    assert!(
        tracing::dispatcher::has_been_set(),
        "setup_logging should install a global subscriber"
    );
    assert!(tracing::enabled!(tracing::Level::INFO));
}
