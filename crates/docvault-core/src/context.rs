//! Call context handed to every rule.

use thiserror::Error as ThisError;
use tokio_util::sync::CancellationToken;

///
/// Context
///
/// Per-call context handed unchanged to every rule function.
/// Wraps the caller's cancellation token so long-running custom rules can
/// stop early; the walker itself checks it between fields.
///

#[derive(Clone, Debug)]
pub struct Context {
    cancel: CancellationToken,
}

impl Context {
    /// A context that is never cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Return `Err(Cancelled)` once the caller has cancelled.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

///
/// Cancelled
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("operation cancelled")]
pub struct Cancelled;
