/// Lifecycle of a compute cache inside [`crate::StateCtx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSyncStatus {
    /// Registered but never computed.
    Init,
    /// `compute()` returned `Pending`; a background task will assign later.
    Pending,
    /// A dependency changed or the cache was invalidated.
    Dirty,
    /// Cached value is up to date.
    Clean,
}
