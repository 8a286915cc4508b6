//! Entity and run state types
//!
//! The entity store is the single ownership boundary for everything that
//! moves. Ids come from a private counter so they are unique within a run
//! and never reused while alive.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::motion::FormationState;
use super::spawner::Spawner;
use crate::settings::{GameConfig, Mode, Policy};

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Not started, or cancelled
    Idle,
    /// Active gameplay
    Playing,
    /// Win predicate satisfied
    Won,
    /// Lose predicate satisfied
    Lost,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Won | RunStatus::Lost)
    }
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Entity identity, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// The player ship. `pos.x` is the centre, `pos.y` the top edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Player {
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }
}

/// Bug types (formation mode places hard bugs on the top row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BugKind {
    #[default]
    Normal,
    Hard,
}

/// Placement for a bug that has not been inserted yet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BugSpec {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BugKind,
}

/// An enemy. `pos` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BugKind,
}

impl Bug {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletSpec {
    pub pos: Vec2,
    pub size: Vec2,
}

/// A player shot. `pos` is the top-left corner; it only ever moves up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

/// A particle for visual effects (never consulted by gameplay)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32, // 0-1, decreases over time
}

/// Owns every mutable collection of one run
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    bugs: Vec<Bug>,
    bullets: Vec<Bullet>,
    particles: Vec<Particle>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_bug(&mut self, spec: BugSpec) -> EntityId {
        let id = self.next_entity_id();
        self.bugs.push(Bug {
            id,
            pos: spec.pos,
            size: spec.size,
            kind: spec.kind,
        });
        id
    }

    pub fn spawn_bullet(&mut self, spec: BulletSpec) -> EntityId {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: spec.pos,
            size: spec.size,
        });
        id
    }

    pub fn remove_bug(&mut self, id: EntityId) -> Option<Bug> {
        let idx = self.bugs.iter().position(|b| b.id == id)?;
        Some(self.bugs.remove(idx))
    }

    pub fn remove_bullet(&mut self, id: EntityId) -> Option<Bullet> {
        let idx = self.bullets.iter().position(|b| b.id == id)?;
        Some(self.bullets.remove(idx))
    }

    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn bugs_mut(&mut self) -> &mut [Bug] {
        &mut self.bugs
    }

    pub(crate) fn bullets_mut(&mut self) -> &mut [Bullet] {
        &mut self.bullets
    }

    pub(crate) fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    /// Batch removal, one pass per collection
    pub(crate) fn retain_bugs(&mut self, keep: impl FnMut(&Bug) -> bool) {
        self.bugs.retain(keep);
    }

    pub(crate) fn retain_bullets(&mut self, keep: impl FnMut(&Bullet) -> bool) {
        self.bullets.retain(keep);
    }

    /// Empty every collection and restart id allocation
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Formation progress, exposed for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationSnapshot {
    pub wave: u32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
}

/// Read-only per-frame view for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: RunStatus,
    pub score: u64,
    pub kill_count: u32,
    /// `None` in formation mode
    pub lives: Option<u32>,
    /// `None` in falling mode
    pub formation: Option<FormationSnapshot>,
    pub bug_speed: f32,
    pub time_ticks: u64,
    pub bugs: usize,
    pub bullets: usize,
}

/// Fired once when a run enters Won or Lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalReport {
    pub run_id: u64,
    pub outcome: Outcome,
    pub final_score: u64,
    pub kill_count: u32,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Increments on every start/restart
    pub run_id: u64,
    /// Seed for this run's random stream
    pub seed: u64,
    pub mode: Mode,
    pub status: RunStatus,
    pub score: u64,
    pub kill_count: u32,
    /// Only present in falling mode
    pub lives: Option<u32>,
    pub difficulty: Difficulty,
    /// Only present in formation mode
    pub formation: Option<FormationState>,
    pub spawner: Spawner,
    pub player: Player,
    pub store: EntityStore,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl RunState {
    /// Fresh state for a run; status starts as `Idle`
    pub fn new(config: &GameConfig, mode: Mode, seed: u64, run_id: u64) -> Self {
        let player = Player {
            pos: Vec2::new(config.arena.width / 2.0, config.player_y()),
            size: Vec2::new(config.player.width, config.player.height),
        };
        let lives = mode.uses_lives().then_some(config.player.lives);
        let formation = match mode.policy {
            Policy::Falling => None,
            Policy::Formation => Some(FormationState::default()),
        };

        Self {
            run_id,
            seed,
            mode,
            status: RunStatus::Idle,
            score: 0,
            kill_count: 0,
            lives,
            difficulty: Difficulty::for_policy(
                mode.policy,
                &config.difficulty,
                config.formation.ramp_per_wave,
            ),
            formation,
            spawner: Spawner::new(),
            player,
            store: EntityStore::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
        }
    }

    pub fn snapshot(&self, config: &GameConfig) -> Snapshot {
        Snapshot {
            status: self.status,
            score: self.score,
            kill_count: self.kill_count,
            lives: self.lives,
            formation: self.formation.map(|f| FormationSnapshot {
                wave: f.wave,
                direction: f.direction,
            }),
            bug_speed: self.difficulty.speed(&config.difficulty),
            time_ticks: self.time_ticks,
            bugs: self.store.bugs().len(),
            bullets: self.store.bullets().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug_spec(x: f32) -> BugSpec {
        BugSpec {
            pos: Vec2::new(x, -40.0),
            size: Vec2::splat(40.0),
            kind: BugKind::Normal,
        }
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut store = EntityStore::new();
        let a = store.spawn_bug(bug_spec(0.0));
        let b = store.spawn_bullet(BulletSpec {
            pos: Vec2::ZERO,
            size: Vec2::new(4.0, 10.0),
        });
        let c = store.spawn_bug(bug_spec(10.0));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut store = EntityStore::new();
        let a = store.spawn_bug(bug_spec(0.0));
        assert!(store.remove_bug(a).is_some());
        let b = store.spawn_bug(bug_spec(0.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_twice_returns_none() {
        let mut store = EntityStore::new();
        let a = store.spawn_bug(bug_spec(0.0));
        assert!(store.remove_bug(a).is_some());
        assert!(store.remove_bug(a).is_none());
        assert!(store.remove_bullet(a).is_none());
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut store = EntityStore::new();
        store.spawn_bug(bug_spec(0.0));
        store.particles_mut().push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ONE,
            life: 1.0,
        });
        store.clear();
        assert!(store.bugs().is_empty());
        assert!(store.bullets().is_empty());
        assert!(store.particles().is_empty());
    }

    #[test]
    fn test_new_run_matches_mode() {
        let config = GameConfig::default();
        let run = RunState::new(&config, Mode::gate(), 1, 1);
        assert_eq!(run.status, RunStatus::Idle);
        assert_eq!(run.lives, Some(3));
        assert!(run.formation.is_none());
        assert_eq!(run.player.pos, Vec2::new(400.0, 550.0));

        let run = RunState::new(&config, Mode::formation(), 1, 2);
        assert_eq!(run.lives, None);
        assert_eq!(run.formation.map(|f| f.wave), Some(0));
        assert_eq!(run.snapshot(&config).bug_speed, 1.0);
    }

    #[test]
    fn test_bug_geometry() {
        let bug = Bug {
            id: EntityId(0),
            pos: Vec2::new(10.0, 20.0),
            size: Vec2::new(40.0, 30.0),
            kind: BugKind::Hard,
        };
        assert_eq!(bug.center(), Vec2::new(30.0, 35.0));
        assert_eq!(bug.bottom(), 50.0);
    }
}
