//! Cooperative frame scheduling.
//!
//! Mirrors a "request animation frame" loop: at most one frame is pending at
//! a time, each tick consumes it, and the engine re-arms only while it is
//! running. Cancelling drops the pending request so a stale tick after a
//! pause, stop or completion does nothing.

/// Identifier of a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameRequest>,
    next_id: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the next frame. An already pending request is kept.
    pub fn request(&mut self) -> FrameRequest {
        if let Some(pending) = self.pending {
            return pending;
        }
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending = Some(request);
        request
    }

    pub fn cancel(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    /// Consume the pending request for the frame being delivered.
    pub fn take(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_idempotent_until_taken() {
        let mut frames = FrameScheduler::new();
        let a = frames.request();
        let b = frames.request();
        assert_eq!(a, b);

        assert_eq!(frames.take(), Some(a));
        assert!(!frames.is_pending());

        let c = frames.request();
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn cancel_drops_the_pending_frame() {
        let mut frames = FrameScheduler::new();
        frames.request();
        assert!(frames.cancel().is_some());
        assert_eq!(frames.take(), None);
        assert_eq!(frames.cancel(), None);
    }
}
