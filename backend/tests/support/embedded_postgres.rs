//! Embedded PostgreSQL provisioning for store-backed tests.
//!
//! Every test gets its own temporary database on one shared cluster. The
//! schema comes from the same embedded migrations the service applies at
//! startup, so the constraint names under test are the production ones.

use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use user_registry::outbound::persistence::run_pending_migrations;

const CLUSTER_START_ATTEMPTS: u32 = 3;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns the process-wide cluster, retrying start-up a few times.
///
/// Parallel suites race to download and initialise the binaries, so the
/// first attempt can fail transiently.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt < CLUSTER_START_ATTEMPTS => {
                eprintln!("pg-embed: cluster start attempt {attempt} failed: {err}");
                std::thread::sleep(CLUSTER_RETRY_DELAY * attempt);
                attempt += 1;
            }
            Err(err) => return Err(format!("start cluster: {err}")),
        }
    }
}

/// Creates an empty database on `cluster` and migrates it to the latest
/// schema. The database is dropped when the returned guard is.
pub fn provision_migrated_database(
    cluster: &ClusterHandle,
    runtime: &Runtime,
) -> Result<TemporaryDatabase, String> {
    let name = format!("user_registry_test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_string();
    let applied = runtime
        .block_on(run_pending_migrations(&url))
        .map_err(|err| format!("migrate {url}: {err}"))?;
    if applied == 0 {
        return Err(format!("no migrations applied to {url}"));
    }
    Ok(database)
}
