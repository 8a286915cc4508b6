//! Collision detection and response
//!
//! Everything is an axis-aligned box. Bullets hit at most one bug per tick:
//! the first overlapping bug in store order wins (first found, not nearest).

use glam::Vec2;

use super::state::{Bug, EntityId, EntityStore};

/// Axis-aligned bounding box from a top-left corner and a size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }
}

/// A resolved bullet-bug hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub bullet: EntityId,
    pub bug: EntityId,
    /// Bug centre, for particle bursts
    pub at: Vec2,
}

/// Match bullets against bugs and remove every matched pair.
///
/// A bug consumed by an earlier bullet is skipped by later bullets in the
/// same pass, and both sides are removed before anything else looks at them.
pub fn resolve_hits(store: &mut EntityStore) -> Vec<Kill> {
    let mut kills: Vec<Kill> = Vec::new();

    for bullet in store.bullets() {
        let bullet_box = Aabb::new(bullet.pos, bullet.size);
        let hit = store.bugs().iter().find(|bug| {
            !kills.iter().any(|k| k.bug == bug.id)
                && bullet_box.overlaps(&Aabb::new(bug.pos, bug.size))
        });
        if let Some(bug) = hit {
            kills.push(Kill {
                bullet: bullet.id,
                bug: bug.id,
                at: bug.center(),
            });
        }
    }

    if !kills.is_empty() {
        store.retain_bullets(|b| !kills.iter().any(|k| k.bullet == b.id));
        store.retain_bugs(|b| !kills.iter().any(|k| k.bug == b.id));
    }

    kills
}

/// Remove bugs whose top edge has passed the arena bottom; returns how many
pub fn remove_escaped(store: &mut EntityStore, arena_height: f32) -> u32 {
    let before = store.bugs().len();
    store.retain_bugs(|bug| bug.pos.y <= arena_height);
    (before - store.bugs().len()) as u32
}

/// Remove bullets that have left through the arena top
pub fn remove_spent_bullets(store: &mut EntityStore) {
    store.retain_bullets(|bullet| bullet.pos.y > 0.0);
}

/// Whether any bug's bottom edge has reached the player's row
pub fn formation_reached(bugs: &[Bug], player_y: f32) -> bool {
    bugs.iter().any(|bug| bug.bottom() >= player_y)
}
