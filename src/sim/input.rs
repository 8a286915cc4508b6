//! Input tracking and control sampling
//!
//! The host feeds logical intents in; the sampler turns held intents into
//! queued movement and shots. Neither touches entities: the tick drains the
//! queued controls when it runs.

use serde::{Deserialize, Serialize};

/// Logical player intents (physical key mapping is the host's job)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Fire,
}

impl Intent {
    fn bit(self) -> u8 {
        match self {
            Intent::MoveLeft => 1,
            Intent::MoveRight => 1 << 1,
            Intent::Fire => 1 << 2,
        }
    }
}

/// Live set of active intents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTracker {
    active: u8,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, intent: Intent) {
        self.active |= intent.bit();
    }

    pub fn release(&mut self, intent: Intent) {
        self.active &= !intent.bit();
    }

    pub fn is_active(&self, intent: Intent) -> bool {
        self.active & intent.bit() != 0
    }

    /// Release everything (used when a run is cancelled or reset)
    pub fn clear(&mut self) {
        self.active = 0;
    }

    /// -1, 0 or +1; left and right together cancel out
    pub fn horizontal(&self) -> f32 {
        let mut dir = 0.0;
        if self.is_active(Intent::MoveLeft) {
            dir -= 1.0;
        }
        if self.is_active(Intent::MoveRight) {
            dir += 1.0;
        }
        dir
    }
}

/// Controls accumulated by the sampler since the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingControls {
    /// Net horizontal displacement requested
    pub dx: f32,
    /// Shots that passed the re-fire limit
    pub shots: u32,
}

/// Fixed-interval sampler turning held intents into controls
#[derive(Debug, Clone, Default)]
pub struct ControlSampler {
    pending: PendingControls,
    last_shot_at: Option<f64>,
}

impl ControlSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the tracker once at `now` (ms)
    pub fn sample(&mut self, tracker: &InputTracker, now: f64, step: f32, fire_interval_ms: f64) {
        self.pending.dx += tracker.horizontal() * step;

        if tracker.is_active(Intent::Fire) {
            let ready = self
                .last_shot_at
                .map(|last| now - last > fire_interval_ms)
                .unwrap_or(true);
            if ready {
                self.pending.shots += 1;
                self.last_shot_at = Some(now);
            }
        }
    }

    /// Hand the accumulated controls to the tick and reset the buffer
    pub fn drain(&mut self) -> PendingControls {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> PendingControls {
        self.pending
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut input = InputTracker::new();
        assert!(!input.is_active(Intent::Fire));
        input.press(Intent::Fire);
        input.press(Intent::MoveLeft);
        assert!(input.is_active(Intent::Fire));
        assert!(input.is_active(Intent::MoveLeft));
        assert!(!input.is_active(Intent::MoveRight));

        input.release(Intent::Fire);
        assert!(!input.is_active(Intent::Fire));
        assert!(input.is_active(Intent::MoveLeft));
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let mut input = InputTracker::new();
        input.release(Intent::MoveRight);
        assert_eq!(input, InputTracker::new());
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut input = InputTracker::new();
        input.press(Intent::MoveLeft);
        assert_eq!(input.horizontal(), -1.0);
        input.press(Intent::MoveRight);
        assert_eq!(input.horizontal(), 0.0);
    }

    #[test]
    fn test_sampler_accumulates_movement() {
        let mut input = InputTracker::new();
        input.press(Intent::MoveRight);
        let mut sampler = ControlSampler::new();
        sampler.sample(&input, 0.0, 10.0, 200.0);
        sampler.sample(&input, 16.0, 10.0, 200.0);
        assert_eq!(sampler.pending().dx, 20.0);

        let drained = sampler.drain();
        assert_eq!(drained.dx, 20.0);
        assert_eq!(sampler.pending(), PendingControls::default());
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut input = InputTracker::new();
        input.press(Intent::Fire);
        let mut sampler = ControlSampler::new();

        // First shot is immediate, then one per >200ms
        let mut now = 0.0;
        while now <= 400.0 {
            sampler.sample(&input, now, 10.0, 200.0);
            now += 16.0;
        }
        // Shots at 0, 208, 416 would need now > 400; only 0 and 208 fit
        assert_eq!(sampler.drain().shots, 2);
    }

    #[test]
    fn test_moving_and_firing_together() {
        let mut input = InputTracker::new();
        input.press(Intent::MoveLeft);
        input.press(Intent::Fire);
        let mut sampler = ControlSampler::new();
        sampler.sample(&input, 0.0, 10.0, 200.0);
        let controls = sampler.drain();
        assert_eq!(controls.dx, -10.0);
        assert_eq!(controls.shots, 1);
    }
}
