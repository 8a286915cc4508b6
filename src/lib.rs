//! Bug Invaders - the skill-gate arcade core
//!
//! Core modules:
//! - `sim`: Real-time simulation (entities, spawning, motion, collisions, run state)
//! - `settings`: Data-driven game configuration and mode presets
//! - `highscores`: Local leaderboard used as a score sink
//! - `submission`: Score submission rules and identity plumbing
//! - `error`: Error types shared across the crate

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod submission;

pub use error::{ConfigError, EngineError, SubmitError};
pub use highscores::HighScores;
pub use settings::{GameConfig, Mode, Policy, WinCondition};
pub use sim::{Engine, GameLoop, ManualScheduler, RunObserver, RunStatus, Snapshot};

/// Default game constants (logical arena units)
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults - top edge sits this far above the arena bottom
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;
    /// Horizontal distance covered per input sample
    pub const PLAYER_STEP: f32 = 10.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 8.0;
    /// Minimum time between shots (ms)
    pub const FIRE_INTERVAL_MS: f64 = 200.0;
    /// Input sampling period (~60 Hz)
    pub const INPUT_SAMPLE_MS: f64 = 16.0;

    /// Falling bug defaults
    pub const BUG_SIZE: f32 = 40.0;
    pub const SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 50.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 100.0;

    /// Kill-driven difficulty
    pub const BASE_BUG_SPEED: f32 = 1.0;
    pub const BUG_SPEED_PER_KILL: f32 = 0.1;
    pub const MAX_BUG_SPEED: f32 = 3.0;

    /// Formation defaults
    pub const FORMATION_COLUMNS: u32 = 8;
    pub const FORMATION_BASE_ROWS: u32 = 2;
    pub const FORMATION_MAX_ROWS: u32 = 5;
    pub const FORMATION_BUG_WIDTH: f32 = 40.0;
    pub const FORMATION_BUG_HEIGHT: f32 = 30.0;
    pub const FORMATION_SPACING_X: f32 = 60.0;
    pub const FORMATION_SPACING_Y: f32 = 45.0;
    pub const FORMATION_TOP_MARGIN: f32 = 40.0;
    pub const FORMATION_STEP: f32 = 1.0;
    pub const FORMATION_RAMP: f32 = 0.1;
    pub const FORMATION_DROP: f32 = 20.0;

    /// Cosmetic particles
    pub const PARTICLE_BURST: u32 = 8;
    pub const MAX_PARTICLES: usize = 256;
    pub const PARTICLE_DECAY: f32 = 0.04;
}
