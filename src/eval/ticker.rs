use crate::foundation::core::{Fps, FrameIndex};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// One frame callback.
pub struct FrameTick {
    /// Frame counter.
    pub frame: FrameIndex,
    /// Elapsed time in seconds.
    pub time_s: f64,
}

/// Produces monotonically increasing frame times at a fixed rate.
#[derive(Clone, Debug)]
pub struct Ticker {
    fps: Fps,
    next: u64,
}

impl Ticker {
    /// Ticker starting at frame 0.
    pub fn new(fps: Fps) -> Self {
        Self { fps, next: 0 }
    }

    /// Frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTick {
        let frame = FrameIndex(self.next);
        self.next += 1;
        FrameTick {
            frame,
            time_s: self.fps.frames_to_secs(frame.0),
        }
    }

    /// Restart at frame 0.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Iterator for Ticker {
    type Item = FrameTick;

    fn next(&mut self) -> Option<FrameTick> {
        Some(self.tick())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/ticker.rs"]
mod tests;
