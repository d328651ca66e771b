//! Helpers shared by the integration suites that need a real PostgreSQL.

pub mod embedded_postgres;

pub use embedded_postgres::{provision_migrated_database, shared_cluster};

/// Decides what a suite does when the embedded cluster cannot start.
///
/// With `SKIP_TEST_CLUSTER` set to `1`, `true` or `yes` the failure is
/// printed and the caller receives `None`; otherwise the test panics so a
/// broken CI environment is not hidden.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    let skip = std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if skip {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded cluster unavailable: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
