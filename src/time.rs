//! Frame clock: fixed-rate pacing and frame statistics.
//!
//! The viewer runs one simulation tick per frame. [`FrameClock`] decides when
//! the next frame is due so the event loop can sleep until then, and keeps
//! a periodically refreshed FPS figure for display.
//!
//! ```ignore
//! let mut clock = FrameClock::new(60);
//! // once per frame
//! clock.tick();
//! event_loop.set_control_flow(ControlFlow::WaitUntil(clock.next_deadline()));
//! ```

use std::time::{Duration, Instant};

/// Frame pacing and timing statistics.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame began.
    last_frame: Instant,
    /// Target interval between frame starts.
    interval: Duration,
    /// Seconds between the last two frames.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Clock targeting `target_fps` frames per second (at least 1).
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            interval: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Mark the start of a frame. Returns the time since the previous frame.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// When the next frame should start. A late frame is due immediately;
    /// missed frames are not made up.
    pub fn next_deadline(&self) -> Instant {
        (self.last_frame + self.interval).max(Instant::now())
    }

    /// Whether the next frame is due.
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.last_frame + self.interval
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new(60);
        assert_eq!(clock.frame_count, 0);
        assert_eq!(clock.fps(), 0.0);
        assert!((clock.interval.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_fps_is_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_tick_counts_frames_and_delta() {
        let mut clock = FrameClock::new(60);
        let start = clock.last_frame;
        let delta = clock.tick_at(start + Duration::from_millis(20));
        assert!((delta - 0.02).abs() < 1e-4);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_fps_refreshes_after_interval() {
        let mut clock = FrameClock::new(60);
        let start = clock.last_frame;
        for i in 1..=30u64 {
            clock.tick_at(start + Duration::from_millis(i * 20));
        }
        // 25 frames in the first 500 ms at 50 fps
        assert!((clock.fps() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_due_after_interval() {
        let mut clock = FrameClock::new(50);
        let start = clock.last_frame;
        clock.tick_at(start);
        assert!(!clock.is_due(start + Duration::from_millis(10)));
        assert!(clock.is_due(start + Duration::from_millis(20)));
        assert!(clock.next_deadline() >= start);
    }
}
