//! Bug spawning
//!
//! Falling mode drops one bug at a time behind a throttle that tightens as
//! the field fills up. Formation mode lays out a whole grid per wave.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{BugKind, BugSpec};
use crate::settings::{FallingConfig, FormationConfig};

/// Throttled single-bug spawner for falling mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    last_spawn_at: Option<f64>,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum gap before the next spawn with `live_bugs` on the field
    pub fn interval(config: &FallingConfig, live_bugs: usize) -> f64 {
        let shrink = live_bugs as f64 * config.spawn_interval_step_ms;
        (config.spawn_interval_ms - shrink).max(config.min_spawn_interval_ms)
    }

    /// Spawn at most one bug. The first call of a run always spawns.
    pub fn maybe_spawn(
        &mut self,
        now: f64,
        live_bugs: usize,
        config: &FallingConfig,
        arena_width: f32,
        rng: &mut impl Rng,
    ) -> Option<BugSpec> {
        if let Some(last) = self.last_spawn_at {
            if now - last <= Self::interval(config, live_bugs) {
                return None;
            }
        }
        self.last_spawn_at = Some(now);

        let max_x = (arena_width - config.bug_width).max(0.0);
        let x = if max_x > 0.0 {
            rng.random_range(0.0..max_x)
        } else {
            0.0
        };
        // Start just above the visible arena so the bug slides into view
        Some(BugSpec {
            pos: Vec2::new(x, -config.bug_height),
            size: Vec2::new(config.bug_width, config.bug_height),
            kind: BugKind::Normal,
        })
    }

    pub fn reset(&mut self) {
        self.last_spawn_at = None;
    }
}

/// Grid layout for a formation wave, centred horizontally.
/// The top row is made of hard bugs.
pub fn build_formation(config: &FormationConfig, wave: u32, arena_width: f32) -> Vec<BugSpec> {
    let rows = config.rows_for_wave(wave);
    let left = ((arena_width - config.grid_width()) / 2.0).max(0.0);
    let size = Vec2::new(config.bug_width, config.bug_height);

    let mut specs = Vec::with_capacity((rows * config.columns) as usize);
    for row in 0..rows {
        let kind = if row == 0 { BugKind::Hard } else { BugKind::Normal };
        for col in 0..config.columns {
            specs.push(BugSpec {
                pos: Vec2::new(
                    left + col as f32 * config.spacing_x,
                    config.top_margin + row as f32 * config.spacing_y,
                ),
                size,
                kind,
            });
        }
    }
    specs
}
