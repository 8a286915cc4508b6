//! Motion integration
//!
//! One fixed step per tick; no delta-time scaling. All speeds are in arena
//! units per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::PendingControls;
use super::state::{BulletSpec, EntityStore, Particle, Player};
use crate::settings::{BulletConfig, FormationConfig, ParticleConfig};

/// Shared state of the marching grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationState {
    pub wave: u32,
    /// +1 right, -1 left
    pub direction: f32,
    /// Whether the current wave's grid has been laid out yet
    pub built: bool,
}

impl Default for FormationState {
    fn default() -> Self {
        Self {
            wave: 0,
            direction: 1.0,
            built: false,
        }
    }
}

/// Apply sampled controls: move (clamped) then fire from the ship's nose
pub fn apply_controls(
    player: &mut Player,
    controls: PendingControls,
    arena_width: f32,
    bullet: &BulletConfig,
    store: &mut EntityStore,
) {
    let half = player.half_width();
    player.pos.x = (player.pos.x + controls.dx).clamp(half, arena_width - half);

    for _ in 0..controls.shots {
        store.spawn_bullet(BulletSpec {
            pos: Vec2::new(player.pos.x - bullet.width / 2.0, player.pos.y),
            size: Vec2::new(bullet.width, bullet.height),
        });
    }
}

/// Falling mode: every bug drops by the shared speed
pub fn fall(store: &mut EntityStore, speed: f32) {
    for bug in store.bugs_mut() {
        bug.pos.y += speed;
    }
}

/// Formation mode: slide the grid sideways; on touching a wall, drop every
/// member once and turn around for the next tick.
pub fn march(
    store: &mut EntityStore,
    formation: &mut FormationState,
    config: &FormationConfig,
    multiplier: f32,
    arena_width: f32,
) {
    let dx = config.step * formation.direction * multiplier;
    for bug in store.bugs_mut() {
        bug.pos.x += dx;
    }

    let bugs = store.bugs_mut();
    let touching = if formation.direction > 0.0 {
        bugs.iter().any(|b| b.pos.x + b.size.x >= arena_width)
    } else {
        bugs.iter().any(|b| b.pos.x <= 0.0)
    };

    if touching {
        formation.direction = -formation.direction;
        for bug in bugs.iter_mut() {
            bug.pos.y += config.drop;
        }
    }
}

/// Bullets rise by a constant speed
pub fn rise(store: &mut EntityStore, speed: f32) {
    for bullet in store.bullets_mut() {
        bullet.pos.y -= speed;
    }
}

/// Drift and fade particles, dropping dead ones
pub fn update_particles(store: &mut EntityStore, config: &ParticleConfig) {
    let particles = store.particles_mut();
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel *= 0.95;
        particle.life -= config.decay;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Emit a burst at `at`. Directions come from a hash of the tick and index,
/// not the run's random stream, so particles never shift gameplay.
pub fn emit_burst(store: &mut EntityStore, at: Vec2, time_ticks: u64, config: &ParticleConfig) {
    if !config.enabled {
        return;
    }
    let particles = store.particles_mut();
    for j in 0..config.burst {
        let hash = (time_ticks as u32)
            .wrapping_mul(2654435761)
            .wrapping_add(j.wrapping_mul(7919));
        let jitter = (hash % 1000) as f32 / 1000.0; // 0 to 1
        let angle = (j as f32 + jitter) / config.burst.max(1) as f32 * std::f32::consts::TAU;
        let speed = 1.5 + ((hash >> 10) % 1000) as f32 / 1000.0 * 2.5;
        particles.push(Particle {
            pos: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
        });
    }
    if particles.len() > config.max {
        let excess = particles.len() - config.max;
        particles.drain(..excess);
    }
}
