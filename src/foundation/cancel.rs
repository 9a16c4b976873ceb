//! Cooperative cancellation shared between a render caller and the pipeline stages.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::foundation::error::{RenderError, RenderResult};

/// Cloneable cancellation flag.
///
/// Every pipeline stage calls [`CancelToken::check`] at its boundaries and the frame loop checks
/// once per frame, so a cancelled render stops within one frame of work and persists nothing.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Return `true` once [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Return [`RenderError::Cancelled`] when cancellation was requested.
    pub fn check(&self) -> RenderResult<()> {
        if self.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }
}
