//! # Thinking Indicator
//!
//! Cosmetic console spinner shown while a completion call is in flight.
//!
//! ## Design
//! - A background task redraws the spinner line every 100ms
//! - `stop` flips a shared flag, then awaits the task's join handle; the
//!   task erases its line before exiting, so the spinner can never
//!   interleave with output printed after the join
//! - The indicator carries no data; `stop` only reports how long the
//!   caller waited

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Width of the erase sweep; wide enough to cover the longest spinner line
const CLEAR_WIDTH: usize = 70;

fn render_frame(frame_idx: usize, elapsed: Duration) -> String {
    format!(
        "🤖 Thinking {}  ({:.1}s)",
        FRAMES[frame_idx % FRAMES.len()],
        elapsed.as_secs_f64()
    )
}

/// Spinner configuration; `start` begins one spin
#[derive(Debug, Clone)]
pub struct ThinkingIndicator {
    interval: Duration,
}

impl ThinkingIndicator {
    pub fn new() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawn the render task and hand back its stop handle
    pub fn start(&self) -> IndicatorHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let tick = self.interval;
        let started = Instant::now();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            let mut frame_idx = 0usize;
            loop {
                interval.tick().await;
                if stop_flag.load(Ordering::Acquire) {
                    // Erase the spinner line before handing the console back.
                    print!("\r{}\r", " ".repeat(CLEAR_WIDTH));
                    let _ = io::stdout().flush();
                    break;
                }
                print!("\r{}", render_frame(frame_idx, started.elapsed()));
                let _ = io::stdout().flush();
                frame_idx = (frame_idx + 1) % FRAMES.len();
            }
        });

        IndicatorHandle { stop, task, started }
    }
}

impl Default for ThinkingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one running spinner
pub struct IndicatorHandle {
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
    started: Instant,
}

impl IndicatorHandle {
    /// Signal the render task to stop, wait for it to clear the line,
    /// and report the elapsed wait.
    pub async fn stop(self) -> Duration {
        self.stop.store(true, Ordering::Release);
        let _ = self.task.await;
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_frame_format() {
        let line = render_frame(0, Duration::from_millis(1230));
        assert_eq!(line, "🤖 Thinking ⠋  (1.2s)");
    }

    #[test]
    fn test_frames_cycle() {
        for (i, frame) in FRAMES.iter().enumerate() {
            assert!(render_frame(i, Duration::ZERO).contains(frame));
        }
        // Index wraps around after the last frame.
        assert!(render_frame(FRAMES.len(), Duration::ZERO).contains(FRAMES[0]));
    }

    #[test]
    fn test_clear_width_covers_render() {
        let long = render_frame(3, Duration::from_secs(86399));
        assert!(long.chars().count() < CLEAR_WIDTH);
    }

    #[tokio::test]
    async fn test_stop_reports_elapsed() {
        let handle = ThinkingIndicator::new().start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let elapsed = handle.stop().await;
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_immediate_stop_does_not_hang() {
        let handle = ThinkingIndicator::new()
            .with_interval(Duration::from_millis(10))
            .start();
        let elapsed = handle.stop().await;
        assert!(elapsed < Duration::from_secs(5));
    }
}
