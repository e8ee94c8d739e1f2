/// Initializes a tracing subscriber once per test binary so log output is
/// captured instead of lost. Later calls are no-ops.
pub struct TestTracing;

impl TestTracing {
    pub fn init() -> Self {
        switchyard::server::init_tracing();
        TestTracing
    }
}
