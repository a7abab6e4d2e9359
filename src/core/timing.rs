//=========================================================================
// Frame Timing
//=========================================================================
//
// Per-frame instrumentation for the pipeline phases.
//
// Every frame produces a fresh `FrameTimings` value; nothing is kept
// between frames. `LoopTimer` brackets one full loop iteration (set by the
// caller) and turns it into an upper-bound FPS estimate.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== TickControl =========================================================

/// Loop control signal returned by the event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== FrameTimings ========================================================

/// Wall-clock duration of each pipeline phase for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTimings {
    /// Event polling and listener dispatch.
    pub events: Duration,

    /// Movement, animation advance and widget surface refresh.
    pub update: Duration,

    /// Drawing the frame, excluding the buffer swap.
    pub composite: Duration,
}

impl FrameTimings {
    pub fn total(&self) -> Duration {
        self.events + self.update + self.composite
    }
}

//=== LoopTimer ===========================================================

/// Start/end timestamps of one loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopTimer {
    start: Option<Duration>,
    end: Option<Duration>,
}

impl LoopTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of an iteration and forgets the previous end.
    pub fn start(&mut self, now: Duration) {
        self.start = Some(now);
        self.end = None;
    }

    pub fn end(&mut self, now: Duration) {
        self.end = Some(now);
    }

    /// Time between `start` and `end`, if both were recorded in order.
    pub fn elapsed(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => end.checked_sub(start),
            _ => None,
        }
    }

    /// Highest frame rate the measured iteration would allow.
    ///
    /// This is `1000 / elapsed_ms`: an upper bound, not measured
    /// throughput. Returns `None` when the iteration took under a
    /// millisecond or was not bracketed.
    pub fn max_fps(&self) -> Option<u32> {
        let millis = self.elapsed()?.as_millis();
        if millis == 0 {
            return None;
        }
        Some((1000 / millis) as u32)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
