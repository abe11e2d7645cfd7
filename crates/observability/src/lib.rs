//! Process-wide logging setup shared by the server binary and tests.

pub mod tracing;

/// Initialize logging for the process.
///
/// Idempotent: the first caller installs the subscriber, later calls are
/// no-ops. Tests call this freely without coordinating.
pub fn init() {
    tracing::init();
}
