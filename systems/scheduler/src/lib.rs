#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-interval step scheduler driven by host frame callbacks.
//!
//! The host presents frames at its own rate. While running, the scheduler
//! keeps exactly one frame request outstanding and accepts a simulation step
//! on a frame only when the configured interval has elapsed since the last
//! accepted step. Every request carries an id; callbacks whose id does not
//! match the outstanding request are reported as stale and never step, so a
//! cancellation racing with an in-flight callback cannot double count.

use std::time::Duration;

use life_canvas_core::{FrameHost, FrameRequestId, StepInterval};

/// Whether the simulation advances on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Frames are requested and steps accepted on interval boundaries.
    Running,
    /// No frame request is outstanding.
    Paused,
}

impl RunState {
    /// Run state matching a boolean running flag.
    #[must_use]
    pub const fn from_running(running: bool) -> Self {
        if running {
            Self::Running
        } else {
            Self::Paused
        }
    }
}

/// Result of delivering a frame callback to the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The interval elapsed; the caller must tick, read and render exactly once.
    Step,
    /// Too early for a step; the caller must do no engine or render work.
    Idle,
    /// The callback does not belong to the outstanding request and was ignored.
    Stale,
}

/// Running/paused state machine with interval gating.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: RunState,
    interval: StepInterval,
    pending: Option<FrameRequestId>,
    last_step: Option<Duration>,
}

impl Scheduler {
    /// Creates a scheduler. No frame is requested until [`Scheduler::arm`] or
    /// [`Scheduler::start`] is called with a host.
    #[must_use]
    pub const fn new(interval: StepInterval, state: RunState) -> Self {
        Self {
            state,
            interval,
            pending: None,
            last_step: None,
        }
    }

    /// Current run state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Whether the scheduler is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running)
    }

    /// Minimum time between accepted steps.
    #[must_use]
    pub const fn interval(&self) -> StepInterval {
        self.interval
    }

    /// Outstanding frame request, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameRequestId> {
        self.pending
    }

    /// Requests a frame when running and none is outstanding.
    pub fn arm(&mut self, host: &mut dyn FrameHost) {
        if self.is_running() && self.pending.is_none() {
            self.pending = Some(host.request_frame());
        }
    }

    /// Transitions to running and re-arms the frame request.
    ///
    /// Returns `false` when already running.
    pub fn start(&mut self, host: &mut dyn FrameHost) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = RunState::Running;
        self.last_step = None;
        self.arm(host);
        tracing::debug!("scheduler started");
        true
    }

    /// Transitions to paused and cancels the outstanding frame request.
    ///
    /// Returns `false` when already paused.
    pub fn pause(&mut self, host: &mut dyn FrameHost) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = RunState::Paused;
        self.disarm(host);
        tracing::debug!("scheduler paused");
        true
    }

    /// Flips between running and paused, returning the new state.
    pub fn toggle(&mut self, host: &mut dyn FrameHost) -> RunState {
        if self.is_running() {
            let _ = self.pause(host);
        } else {
            let _ = self.start(host);
        }
        self.state
    }

    /// Replaces the interval. Takes effect from the next frame on.
    pub fn set_interval(&mut self, interval: StepInterval) {
        self.interval = interval;
    }

    /// Cancels the outstanding request without changing the run state.
    pub fn disarm(&mut self, host: &mut dyn FrameHost) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
    }

    /// Handles a frame callback presented at `now` on the host's monotonic clock.
    pub fn on_frame(
        &mut self,
        host: &mut dyn FrameHost,
        request: FrameRequestId,
        now: Duration,
    ) -> FrameOutcome {
        if self.pending != Some(request) || !self.is_running() {
            return FrameOutcome::Stale;
        }
        self.pending = Some(host.request_frame());

        let due = match self.last_step {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval.as_duration(),
        };
        if !due {
            return FrameOutcome::Idle;
        }

        self.last_step = Some(now);
        FrameOutcome::Step
    }
}

/// In-process [`FrameHost`] that queues requests until the owner drains them.
#[derive(Debug, Default, Clone)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameRequestId>,
}

impl FrameQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have not been delivered or cancelled.
    #[must_use]
    pub fn pending(&self) -> &[FrameRequestId] {
        &self.pending
    }

    /// Removes and returns every queued request for delivery.
    pub fn take_pending(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameHost for FrameQueue {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next_id += 1;
        let request = FrameRequestId::new(self.next_id);
        self.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequestId) {
        self.pending.retain(|pending| *pending != request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_after_start_steps_immediately() {
        let mut host = FrameQueue::new();
        let mut scheduler = Scheduler::new(StepInterval::DEFAULT, RunState::Running);
        scheduler.arm(&mut host);

        let request = host.take_pending()[0];
        assert_eq!(
            scheduler.on_frame(&mut host, request, Duration::from_millis(3)),
            FrameOutcome::Step,
        );
        assert_eq!(host.pending().len(), 1, "next frame is re-armed");
    }

    #[test]
    fn paused_scheduler_never_requests_frames() {
        let mut host = FrameQueue::new();
        let mut scheduler = Scheduler::new(StepInterval::DEFAULT, RunState::Paused);
        scheduler.arm(&mut host);

        assert!(host.pending().is_empty());
        assert_eq!(scheduler.pending(), None);
    }
}
