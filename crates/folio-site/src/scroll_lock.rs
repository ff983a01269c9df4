#![forbid(unsafe_code)]

//! Page scroll lock shared by every component that needs it.
//!
//! Each holder engages the lock under its own [`LockReason`]. The page is
//! locked while any reason is held, and the host hears about it only when the
//! aggregate flips, so two holders never fight over the document.

use std::collections::BTreeSet;

use folio_core::effect::HostEffect;
use folio_runtime::Cmd;

/// Why the page is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockReason {
    Preloader,
    Modal,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollLock {
    reasons: BTreeSet<LockReason>,
}

impl ScrollLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the lock for `reason`. Engaging twice is a no-op.
    pub fn engage<M>(&mut self, reason: LockReason) -> Cmd<M> {
        let was = self.is_locked();
        self.reasons.insert(reason);
        self.announce(was)
    }

    /// Drop `reason`. Releasing a reason that is not held is a no-op.
    pub fn release<M>(&mut self, reason: LockReason) -> Cmd<M> {
        let was = self.is_locked();
        self.reasons.remove(&reason);
        self.announce(was)
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        !self.reasons.is_empty()
    }

    #[inline]
    pub fn holds(&self, reason: LockReason) -> bool {
        self.reasons.contains(&reason)
    }

    fn announce<M>(&self, was: bool) -> Cmd<M> {
        let locked = self.is_locked();
        if locked == was {
            return Cmd::none();
        }
        tracing::debug!(locked, reasons = ?self.reasons, "scroll lock changed");
        Cmd::host(HostEffect::SetScrollLock(locked))
    }
}
