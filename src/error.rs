// ============================================================================
// Event Store Errors
// ============================================================================

/// Failure taxonomy for every store operation.
///
/// Absence of data is a distinct signal from storage failure; callers must
/// not conflate the two. No operation retries internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No matching row where exactly one was expected.
    #[error("event not found")]
    NotFound,

    /// I/O or protocol failure from the backing store, surfaced verbatim.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Schema creation or pool setup failed; the store cannot start.
    #[error("event store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}
