use std::sync::{LockResult, PoisonError};

/// Unwraps a lock result, recovering the guard if another thread panicked
/// while holding it.
///
/// Every critical section in this crate leaves the guarded data consistent at
/// each step (single pushes, or checks that run before any write), so a
/// poisoned lock never exposes a half-applied mutation.
pub(crate) trait RecoverPoison<G> {
    fn recover(self) -> G;
}

impl<G> RecoverPoison<G> for LockResult<G> {
    #[inline]
    fn recover(self) -> G {
        self.unwrap_or_else(PoisonError::into_inner)
    }
}
