//! Deferred work polled by the event loop: one-shot timers and the per-frame animation loop.

use std::time::{Duration, Instant};

/// What a one-shot timer does when it fires. At most one of each kind is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    ClearMessage,
    FinishPurchase,
}

/// Identifies one scheduling of a timer; a rescheduled kind gets a new generation,
/// so whoever holds the old token can tell it went stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    due: Instant,
}

#[derive(Debug, Default)]
pub struct Timers {
    next_generation: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `due`, replacing any pending timer of the same kind.
    pub fn schedule(&mut self, kind: TimerKind, due: Instant) -> TimerToken {
        self.cancel(kind);
        self.next_generation += 1;
        let token = TimerToken {
            kind,
            generation: self.next_generation,
        };
        self.pending.push(Pending { token, due });
        token
    }

    pub fn schedule_in(&mut self, kind: TimerKind, now: Instant, delay: Duration) -> TimerToken {
        self.schedule(kind, now + delay)
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|p| p.token.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    #[cfg(test)]
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|p| p.token.kind == kind)
    }

    /// Earliest pending deadline, for sizing the event-loop poll timeout.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerToken> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| p.due);
        due.into_iter().map(|p| p.token).collect()
    }
}

/// Repeating per-frame task. While running, the event loop redraws every frame and the
/// renderer reads `phase` to animate. Cancelling stops the redraws.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLoop {
    started: Option<Instant>,
}

/// One full pulse cycle.
const PULSE_PERIOD: Duration = Duration::from_millis(800);

impl FrameLoop {
    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub fn cancel(&mut self) {
        self.started = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Position within the current pulse cycle in `0.0..1.0`; None when stopped.
    pub fn phase(&self, now: Instant) -> Option<f32> {
        let started = self.started?;
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        Some((elapsed / PULSE_PERIOD.as_secs_f32()).fract())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        let a = timers.schedule_in(TimerKind::ClearMessage, t0, Duration::from_secs(3));
        let b = timers.schedule_in(TimerKind::FinishPurchase, t0, Duration::from_secs(2));
        assert!(timers.take_due(t0 + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.next_due(), Some(t0 + Duration::from_secs(2)));
        assert_eq!(timers.take_due(t0 + Duration::from_secs(5)), vec![b, a]);
        assert!(timers.next_due().is_none());
    }

    #[test]
    fn test_reschedule_replaces_and_bumps_generation() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        let first = timers.schedule_in(TimerKind::ClearMessage, t0, Duration::from_secs(3));
        let second =
            timers.schedule_in(TimerKind::ClearMessage, t0 + Duration::from_secs(2), Duration::from_secs(3));
        assert_ne!(first, second);
        assert!(timers.take_due(t0 + Duration::from_secs(3)).is_empty());
        assert_eq!(timers.take_due(t0 + Duration::from_secs(5)), vec![second]);
    }

    #[test]
    fn test_cancel_all() {
        let t0 = Instant::now();
        let mut timers = Timers::new();
        timers.schedule_in(TimerKind::ClearMessage, t0, Duration::from_secs(3));
        timers.schedule_in(TimerKind::FinishPurchase, t0, Duration::from_secs(2));
        timers.cancel(TimerKind::ClearMessage);
        assert!(!timers.is_pending(TimerKind::ClearMessage));
        assert!(timers.is_pending(TimerKind::FinishPurchase));
        timers.cancel_all();
        assert!(timers.take_due(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_frame_loop_phase() {
        let t0 = Instant::now();
        let mut frames = FrameLoop::default();
        assert_eq!(frames.phase(t0), None);
        frames.start(t0);
        assert_eq!(frames.phase(t0), Some(0.0));
        let half = frames.phase(t0 + Duration::from_millis(400)).unwrap();
        assert!((half - 0.5).abs() < 1e-3);
        frames.cancel();
        assert!(!frames.is_running());
        assert_eq!(frames.phase(t0 + Duration::from_millis(400)), None);
    }
}
