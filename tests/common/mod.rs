use once_cell::sync::Lazy;

static INIT: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
});

/// Installs a test-scoped tracing subscriber exactly once per process,
/// the way the teacher's own test setup wires `tracing-subscriber` in
/// ahead of any `#[instrument]`-annotated call.
pub fn init_tracing() {
    Lazy::force(&INIT);
}
