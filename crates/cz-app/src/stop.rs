//! External stop signal for the control loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that asks a running loop to stop after its current cycle.
///
/// Clones share the same flag, so one clone can be moved into a signal
/// handler while the loop keeps another.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let handle = StopHandle::new();
        let for_handler = handle.clone();
        assert!(!handle.is_stopped());
        for_handler.stop();
        assert!(handle.is_stopped());
    }
}
