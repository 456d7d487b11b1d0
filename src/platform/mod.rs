//! Platform helpers
//!
//! Handles browser/native differences for:
//! - Frame-rate measurement
//! - Mapping pointer coordinates into device pixels

use crate::sim::Vector2;

/// Frames averaged by the FPS meter
const FPS_WINDOW: usize = 60;

/// Rolling FPS over the last 60 frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Record a frame timestamp (ms) and refresh the estimate
    pub fn tick(&mut self, time: f64) -> u32 {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample sits at the next write position
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }
}

/// CSS-pixel pointer position to device pixels (the simulation's space)
pub fn pointer_to_device(x: f64, y: f64, device_pixel_ratio: f64) -> Vector2 {
    Vector2::new(x * device_pixel_ratio, y * device_pixel_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_at_steady_60hz() {
        let mut fps = FpsCounter::default();
        let mut t = 1000.0;
        for _ in 0..120 {
            fps.tick(t);
            t += 1000.0 / 60.0;
        }
        assert_eq!(fps.fps(), 60);
    }

    #[test]
    fn test_fps_unknown_until_window_fills() {
        let mut fps = FpsCounter::default();
        for i in 0..10 {
            fps.tick(1000.0 + i as f64 * 16.0);
        }
        assert_eq!(fps.fps(), 0);
    }

    #[test]
    fn test_pointer_scaling() {
        assert_eq!(pointer_to_device(10.0, 20.0, 2.0), Vector2::new(20.0, 40.0));
    }
}
