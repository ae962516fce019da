/// Frames-per-second counter fed with caller-supplied timestamps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    window_start_ms: Option<f64>,
    window_frames: u32,
    total_frames: u64,
    fps: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame drawn at `now_ms`. The FPS value refreshes once a
    /// second of frames has been seen.
    pub fn record(&mut self, now_ms: f64) {
        self.total_frames += 1;
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.window_frames += 1;

        let elapsed = now_ms - start;
        if elapsed >= 1000.0 {
            self.fps = (self.window_frames as f64 * 1000.0 / elapsed) as f32;
            self.window_frames = 0;
            self.window_start_ms = Some(now_ms);
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_after_one_second() {
        let mut stats = FrameStats::new();
        for frame in 0..=30 {
            stats.record(frame as f64 * 1000.0 / 30.0);
        }
        assert_eq!(stats.total_frames(), 31);
        assert!((stats.fps() - 31.0).abs() < 0.5);
    }

    #[test]
    fn test_no_fps_before_first_second() {
        let mut stats = FrameStats::new();
        stats.record(0.0);
        stats.record(500.0);
        assert_eq!(stats.fps(), 0.0);
    }
}
