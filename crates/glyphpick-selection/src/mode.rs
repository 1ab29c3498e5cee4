//! Alternate selection mode gate.
//!
//! The UI layer owns the flag telling whether section-level (alternate)
//! selection is active. Selection services only read it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Read-only view of the alternate selection mode.
pub trait ModeGate: Send + Sync {
    fn is_alternate_mode(&self) -> bool;
}

impl<F> ModeGate for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_alternate_mode(&self) -> bool {
        self()
    }
}

/// Shared on/off switch, set by the UI layer and read through [`ModeGate`].
#[derive(Debug, Clone, Default)]
pub struct ModeFlag(Arc<AtomicBool>);

impl ModeFlag {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl ModeGate for ModeFlag {
    fn is_alternate_mode(&self) -> bool {
        self.get()
    }
}
