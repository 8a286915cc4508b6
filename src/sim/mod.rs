//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (insertion order in the entity store)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod engine;
pub mod input;
pub mod motion;
pub mod scheduler;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::{Autopilot, Steering};
pub use collision::{Aabb, Kill};
pub use difficulty::Difficulty;
pub use engine::{Engine, RunObserver};
pub use input::{ControlSampler, InputTracker, Intent, PendingControls};
pub use motion::FormationState;
pub use scheduler::{FrameHandle, GameLoop, IntervalHandle, ManualScheduler, Scheduler};
pub use spawner::Spawner;
pub use state::{
    Bug, BugKind, BugSpec, Bullet, BulletSpec, EntityId, EntityStore, FormationSnapshot, Outcome,
    Particle, Player, RunState, RunStatus, Snapshot, TerminalReport,
};
pub use tick::TickResult;
