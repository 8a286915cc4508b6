//! Frame scheduling
//!
//! The host supplies a `Scheduler` (display refresh + input timer). `GameLoop`
//! arms one frame callback at a time and re-arms it at the end of each tick
//! while the run is playing. Handles are checked on every callback so a late
//! callback from a cancelled or finished run is dropped.

use super::engine::{Engine, RunObserver};
use super::input::Intent;
use super::state::RunStatus;
use crate::error::Result;
use crate::settings::Mode;

/// Handle to one armed frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle to a periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalHandle(pub u64);

/// Cooperative callback source provided by the host
pub trait Scheduler {
    /// Arm a one-shot callback for the next display refresh
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Start a periodic timer firing every `period_ms`
    fn start_interval(&mut self, period_ms: f64) -> IntervalHandle;
    fn clear_interval(&mut self, handle: IntervalHandle);
}

/// Scheduler driven by hand, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_handle: u64,
    frame: Option<FrameHandle>,
    intervals: Vec<(IntervalHandle, f64)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the armed frame callback, if any
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.frame.take()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn active_intervals(&self) -> &[(IntervalHandle, f64)] {
        &self.intervals
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    fn start_interval(&mut self, period_ms: f64) -> IntervalHandle {
        let handle = IntervalHandle(self.next());
        self.intervals.push((handle, period_ms));
        handle
    }

    fn clear_interval(&mut self, handle: IntervalHandle) {
        self.intervals.retain(|(h, _)| *h != handle);
    }
}

/// Engine wired to a scheduler and an observer
pub struct GameLoop<S: Scheduler, O: RunObserver> {
    engine: Engine,
    scheduler: S,
    observer: O,
    frame: Option<FrameHandle>,
    interval: Option<IntervalHandle>,
}

impl<S: Scheduler, O: RunObserver> GameLoop<S, O> {
    pub fn new(engine: Engine, scheduler: S, observer: O) -> Self {
        Self {
            engine,
            scheduler,
            observer,
            frame: None,
            interval: None,
        }
    }

    pub fn start(&mut self, mode: Mode, seed: u64) -> Result<()> {
        self.engine.start(mode, seed)?;
        self.arm();
        Ok(())
    }

    pub fn restart(&mut self) -> Result<()> {
        self.disarm();
        self.engine.restart()?;
        self.arm();
        Ok(())
    }

    /// Stop the run and deregister every callback
    pub fn cancel(&mut self) {
        self.disarm();
        self.engine.cancel();
    }

    /// Frame callback. Stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64) {
        if self.frame != Some(handle) {
            return;
        }
        self.frame = None;

        if let Some(result) = self.engine.tick(now) {
            self.observer.on_tick(&result.snapshot);
            if let Some(report) = &result.terminal {
                self.observer.on_terminal(report);
            }
        }

        if self.engine.status() == RunStatus::Playing {
            self.frame = Some(self.scheduler.request_frame());
        } else {
            self.disarm();
        }
    }

    /// Input-timer callback. Stale handles are ignored.
    pub fn on_interval(&mut self, handle: IntervalHandle, now: f64) {
        if self.interval != Some(handle) {
            return;
        }
        self.engine.sample_input(now);
    }

    /// Input events are only accepted while the loop is armed
    pub fn press(&mut self, intent: Intent) {
        if self.is_armed() {
            self.engine.press(intent);
        }
    }

    pub fn release(&mut self, intent: Intent) {
        if self.is_armed() {
            self.engine.release(intent);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.frame.is_some() || self.interval.is_some()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn interval_handle(&self) -> Option<IntervalHandle> {
        self.interval
    }

    fn arm(&mut self) {
        let period = self.engine.config().bullet.sample_interval_ms;
        self.interval = Some(self.scheduler.start_interval(period));
        self.frame = Some(self.scheduler.request_frame());
    }

    fn disarm(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.scheduler.cancel_frame(frame);
        }
        if let Some(interval) = self.interval.take() {
            self.scheduler.clear_interval(interval);
        }
    }
}

impl<O: RunObserver> GameLoop<ManualScheduler, O> {
    /// Fire the input timer (if running) and the armed frame at `now`.
    /// Returns false once nothing is armed.
    pub fn step(&mut self, now: f64) -> bool {
        if let Some(interval) = self.interval {
            self.on_interval(interval, now);
        }
        match self.scheduler.take_frame() {
            Some(frame) => {
                self.on_frame(frame, now);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::state::{Snapshot, TerminalReport};

    #[derive(Default)]
    struct Recorder {
        ticks: Vec<Snapshot>,
        terminals: Vec<TerminalReport>,
    }

    impl RunObserver for Recorder {
        fn on_tick(&mut self, snapshot: &Snapshot) {
            self.ticks.push(snapshot.clone());
        }

        fn on_terminal(&mut self, report: &TerminalReport) {
            self.terminals.push(*report);
        }
    }

    fn game_loop() -> GameLoop<ManualScheduler, Recorder> {
        let engine = Engine::new(GameConfig::default()).unwrap();
        GameLoop::new(engine, ManualScheduler::new(), Recorder::default())
    }

    #[test]
    fn test_manual_scheduler_handles() {
        let mut s = ManualScheduler::new();
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        s.cancel_frame(a);
        assert_eq!(s.pending_frame(), Some(b));
        s.cancel_frame(b);
        assert_eq!(s.pending_frame(), None);

        let i = s.start_interval(16.0);
        assert_eq!(s.active_intervals().len(), 1);
        s.clear_interval(i);
        assert!(s.active_intervals().is_empty());
    }

    #[test]
    fn test_start_arms_frame_and_timer() {
        let mut gl = game_loop();
        assert!(!gl.is_armed());
        gl.start(Mode::gate(), 1).unwrap();
        assert!(gl.scheduler().pending_frame().is_some());
        assert_eq!(gl.scheduler().active_intervals().len(), 1);
        assert_eq!(gl.scheduler().active_intervals()[0].1, 16.0);
    }

    #[test]
    fn test_frame_rearms_while_playing() {
        let mut gl = game_loop();
        gl.start(Mode::gate(), 1).unwrap();
        assert!(gl.step(0.0));
        assert!(gl.step(16.0));
        assert_eq!(gl.observer().ticks.len(), 2);
        assert!(gl.scheduler().pending_frame().is_some());
    }

    #[test]
    fn test_stale_frame_ignored() {
        let mut gl = game_loop();
        gl.start(Mode::gate(), 1).unwrap();
        let old = gl.frame_handle().unwrap();
        gl.step(0.0);
        gl.on_frame(old, 16.0);
        assert_eq!(gl.observer().ticks.len(), 1);
    }

    #[test]
    fn test_cancel_deregisters_everything() {
        let mut gl = game_loop();
        gl.start(Mode::gate(), 1).unwrap();
        gl.step(0.0);
        let frame = gl.frame_handle().unwrap();
        let interval = gl.interval_handle().unwrap();
        gl.cancel();

        assert!(gl.scheduler().pending_frame().is_none());
        assert!(gl.scheduler().active_intervals().is_empty());
        assert!(!gl.step(16.0));

        // Host keeps driving stale callbacks
        gl.on_frame(frame, 32.0);
        gl.on_interval(interval, 32.0);
        gl.press(Intent::Fire);
        assert_eq!(gl.observer().ticks.len(), 1);
        assert!(gl.observer().terminals.is_empty());
        assert!(!gl.engine().input().is_active(Intent::Fire));
    }

    #[test]
    fn test_restart_rearms_fresh_handles() {
        let mut gl = game_loop();
        gl.start(Mode::gate(), 1).unwrap();
        let first = gl.frame_handle().unwrap();
        gl.restart().unwrap();
        let second = gl.frame_handle().unwrap();
        assert_ne!(first, second);
        assert_eq!(gl.scheduler().active_intervals().len(), 1);
        gl.on_frame(first, 0.0);
        assert!(gl.observer().ticks.is_empty());
    }
}
