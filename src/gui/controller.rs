use std::time::{Duration, Instant};

use kiss3d::event::{Action, Key, WindowEvent};
use log::{debug, info};

// Key config, all in one place
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_REVERSE: Key = Key::R;
const KEY_TOGGLE_PAUSE: Key = Key::P;

// Frames longer than this (window drags, a stall in the event loop) only
// advance the simulation by this much.
const MAX_FRAME_SECONDS: f64 = 0.25;

pub struct Controller {
    time_scale: f64,
    paused: bool,
    fps_counter: FpsCounter,
    last_frame: Instant,
}

/// Frames per second, averaged over a sliding window of wall-clock time.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    window: Duration,
    fps: f64,
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        FpsCounter {
            window_start: Instant::now(),
            frames: 0,
            window,
            fps: 0.0,
        }
    }

    /// Frame rate over the last completed window; zero until one completes.
    pub fn value(&self) -> f64 {
        self.fps
    }

    /// Counts one rendered frame, closing the window once it has run its
    /// length.
    pub fn tick(&mut self) {
        self.frames += 1;

        let elapsed = self.window_start.elapsed();
        if elapsed >= self.window && !elapsed.is_zero() {
            self.fps = self.frames as f64 / elapsed.as_secs_f64();
            debug!("{:.1} fps over {} frames", self.fps, self.frames);
            self.window_start = Instant::now();
            self.frames = 0;
        }
    }
}

impl Controller {
    pub fn new(time_scale: f64) -> Self {
        Controller {
            time_scale,
            paused: false,
            fps_counter: FpsCounter::new(Duration::from_secs(1)),
            last_frame: Instant::now(),
        }
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.time_scale *= 2.0;
                info!("Time scale is {}x", self.time_scale);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.time_scale /= 2.0;
                info!("Time scale is {}x", self.time_scale);
            }
            WindowEvent::Key(KEY_REVERSE, Action::Press, _) => {
                self.time_scale *= -1.0;
                self.paused = false;
                info!("Time scale is {}x", self.time_scale);
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Simulated seconds covered by a frame that took `frame_seconds` of
    /// wall-clock time.
    pub fn timestep(&self, frame_seconds: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        frame_seconds.clamp(0.0, MAX_FRAME_SECONDS) * self.time_scale
    }

    /// Measures the wall-clock time since the last call and converts it to a
    /// simulation timestep.
    pub fn next_timestep(&mut self) -> f64 {
        let now = Instant::now();
        let frame_seconds = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.timestep(frame_seconds)
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.tick()
    }
}
