//! Fade transition state and navigation generations.
//!
//! The body classes are driven through a [`Transition`] rather than poked
//! directly, and every navigation carries a [`NavigationToken`]: once a newer
//! navigation begins, the older one stops mutating the shell, including
//! after its pending delays resolve.

use std::cell::Cell;

use crate::config::transition_classes::{ENTERING, LEAVING, PRE_ENTERING};
use crate::core::host::ViewHost;

/// Where the shell is in the fade sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Steady,
    Leaving,
    Entering,
}

/// Tracks and applies the transition classes on the document body.
#[derive(Debug, Default)]
pub struct Transition {
    phase: Cell<TransitionPhase>,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase.get()
    }

    /// Start the outbound fade.
    pub fn leave<H: ViewHost>(&self, host: &H) {
        host.remove_root_class(ENTERING);
        host.remove_root_class(PRE_ENTERING);
        host.add_root_class(LEAVING);
        host.reflow();
        self.phase.set(TransitionPhase::Leaving);
    }

    /// Undo the outbound fade after a failed navigation.
    pub fn abort<H: ViewHost>(&self, host: &H) {
        host.remove_root_class(LEAVING);
        self.phase.set(TransitionPhase::Steady);
    }

    /// Start the inbound fade from its pre-entering state.
    pub fn enter<H: ViewHost>(&self, host: &H) {
        host.remove_root_class(LEAVING);
        host.add_root_class(PRE_ENTERING);
        host.reflow();
        host.add_root_class(ENTERING);
        host.remove_root_class(PRE_ENTERING);
        self.phase.set(TransitionPhase::Entering);
    }

    /// Return to the steady state once the inbound fade has played.
    pub fn settle<H: ViewHost>(&self, host: &H) {
        host.remove_root_class(ENTERING);
        self.phase.set(TransitionPhase::Steady);
    }
}

// =============================================================================
// Navigation generations
// =============================================================================

/// Identifies one navigation; stale once a newer one has begun.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationToken(u64);

/// Monotonic navigation counter.
#[derive(Debug, Default)]
pub struct Generation {
    current: Cell<u64>,
}

impl Generation {
    /// Begin a navigation, superseding any in flight.
    pub fn begin(&self) -> NavigationToken {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        NavigationToken(next)
    }

    pub fn is_current(&self, token: NavigationToken) -> bool {
        self.current.get() == token.0
    }
}
