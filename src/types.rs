//! Shared application state.

use crate::catalog::CatalogCache;
use crate::db::SnapshotStore;
use crate::evaluation::EvaluationClient;
use crate::generate::OracleClient;
use crate::requirements::ProgramCatalog;

/// State shared across all request handlers.
pub struct AppState {
    /// Memoized class catalog loaded from the CSV export.
    pub catalog: CatalogCache,
    /// Program curriculum and course-to-program mapping files.
    pub programs: ProgramCatalog,
    /// Client for the evaluation and preferences providers.
    pub evaluations: EvaluationClient,
    /// Client for the completion oracle used by schedule generation.
    pub oracle: OracleClient,
    /// Persistent store for saved schedule snapshots.
    pub snapshots: SnapshotStore,
}
