//! Frame statistics for the on-screen overlay
//!
//! The frame loop reports every delta through [`PerformanceMonitor::record_frame`].
//! Averages are recomputed at most ten times per second of frame time so the
//! overlay text stays readable.
//!
//! ```rust
//! use vitrine::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! for _ in 0..30 {
//!     monitor.record_frame(0.02);
//! }
//! assert!((monitor.metrics().fps - 50.0).abs() < 0.5);
//! ```

use std::collections::VecDeque;

use crate::gfx::scene::SceneStatistics;

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    pub min_frame_time_ms: f32,
    pub max_frame_time_ms: f32,
    pub object_count: usize,
    pub triangle_count: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            object_count: 0,
            triangle_count: 0,
        }
    }
}

pub struct PerformanceMonitor {
    /// Recent frame times in milliseconds
    frame_times: VecDeque<f32>,
    max_samples: usize,
    metrics: PerformanceMetrics,
    since_update: f32,
    update_interval: f32,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_capacity(120)
    }

    /// Keeps the last `max_samples` frame times
    pub fn with_capacity(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            metrics: PerformanceMetrics::default(),
            since_update: 0.0,
            update_interval: 0.1,
        }
    }

    /// Adds one frame lasting `delta` seconds
    pub fn record_frame(&mut self, delta: f32) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta.max(0.0) * 1000.0);

        self.since_update += delta.max(0.0);
        if self.since_update >= self.update_interval || self.metrics.fps == 0.0 {
            self.update_metrics();
            self.since_update = 0.0;
        }
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }
        let total: f32 = self.frame_times.iter().sum();
        let average = total / self.frame_times.len() as f32;

        self.metrics.frame_time_ms = average;
        self.metrics.fps = if average > 0.0 { 1000.0 / average } else { 0.0 };
        self.metrics.min_frame_time_ms = self.frame_times.iter().copied().fold(f32::MAX, f32::min);
        self.metrics.max_frame_time_ms = self.frame_times.iter().copied().fold(0.0, f32::max);
    }

    pub fn update_scene_stats(&mut self, stats: &SceneStatistics) {
        self.metrics.object_count = stats.object_count;
        self.metrics.triangle_count = stats.total_triangles;
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times.iter().copied().collect()
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.metrics = PerformanceMetrics::default();
        self.since_update = 0.0;
    }

    /// Full statistics window with a frame time graph
    pub fn render_ui(&self, ui: &imgui::Ui) {
        ui.window("Performance")
            .size([280.0, 200.0], imgui::Condition::FirstUseEver)
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .build(|| {
                let metrics = &self.metrics;
                ui.text(format!("FPS: {:.1}", metrics.fps));
                ui.text(format!(
                    "Frame: {:.2}ms (min {:.2}, max {:.2})",
                    metrics.frame_time_ms, metrics.min_frame_time_ms, metrics.max_frame_time_ms
                ));
                ui.separator();
                ui.text(format!("Objects: {}", metrics.object_count));
                ui.text(format!("Triangles: {}", metrics.triangle_count));

                if !self.frame_times.is_empty() {
                    ui.separator();
                    let history = self.frame_time_history();
                    ui.plot_lines("##frame_times", &history)
                        .graph_size([250.0, 50.0])
                        .scale_min(0.0)
                        .scale_max(50.0)
                        .build();
                }
            });
    }

    /// Small FPS readout in the top right corner
    pub fn render_overlay(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        ui.window("FPS")
            .size([120.0, 60.0], imgui::Condition::Always)
            .position([display_size[0] - 130.0, 10.0], imgui::Condition::Always)
            .no_decoration()
            .no_inputs()
            .bg_alpha(0.3)
            .build(|| {
                ui.text(format!("FPS: {:.0}", self.metrics.fps));
                ui.text(format!("{:.1}ms", self.metrics.frame_time_ms));
            });
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_fps() {
        let mut monitor = PerformanceMonitor::new();
        for _ in 0..10 {
            monitor.record_frame(0.016);
            monitor.record_frame(0.017);
        }
        let metrics = monitor.metrics();
        assert!((metrics.frame_time_ms - 16.5).abs() < 0.3);
        assert!((metrics.min_frame_time_ms - 16.0).abs() < 1e-3);
        assert!((metrics.max_frame_time_ms - 17.0).abs() < 1e-3);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut monitor = PerformanceMonitor::with_capacity(4);
        for i in 0..10 {
            monitor.record_frame(i as f32 / 1000.0);
        }
        assert_eq!(monitor.frame_time_history().len(), 4);
        assert!((monitor.frame_time_history()[3] - 9.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut monitor = PerformanceMonitor::new();
        monitor.record_frame(0.01);
        monitor.reset();
        assert!(monitor.frame_time_history().is_empty());
        assert_eq!(monitor.metrics().fps, 0.0);
    }
}
