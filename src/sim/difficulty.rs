//! Difficulty progression
//!
//! One policy per run: falling mode creeps bug speed up per kill, formation
//! mode derives its speed multiplier from the wave number. Both are capped.

use serde::{Deserialize, Serialize};

use crate::settings::{DifficultyConfig, Policy};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Speed grows by a fixed step per kill
    KillDriven { speed: f32 },
    /// Multiplier recomputed from the current wave
    WaveDriven { wave: u32, ramp: f32 },
}

impl Difficulty {
    pub fn for_policy(policy: Policy, config: &DifficultyConfig, ramp: f32) -> Self {
        match policy {
            Policy::Falling => Difficulty::KillDriven {
                speed: config.base_speed,
            },
            Policy::Formation => Difficulty::WaveDriven { wave: 0, ramp },
        }
    }

    pub fn on_kill(&mut self, config: &DifficultyConfig) {
        if let Difficulty::KillDriven { speed } = self {
            *speed = (*speed + config.speed_per_kill).min(config.max_speed);
        }
    }

    pub fn on_wave(&mut self, new_wave: u32) {
        if let Difficulty::WaveDriven { wave, .. } = self {
            *wave = new_wave;
        }
    }

    /// Falling: pixels per tick. Formation: multiplier on the base step.
    pub fn speed(&self, config: &DifficultyConfig) -> f32 {
        match *self {
            Difficulty::KillDriven { speed } => speed,
            Difficulty::WaveDriven { wave, ramp } => {
                (1.0 + wave as f32 * ramp).min(config.max_speed)
            }
        }
    }
}
