//! Game configuration and mode presets
//!
//! Everything tunable lives here so balance changes never touch the sim code.
//! Configs round-trip through JSON; missing sections fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Spawn/motion policy for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Bugs rain down one at a time; each bug that escapes costs a life
    Falling,
    /// Bugs march as a rigid grid; reaching the player ends the run
    Formation,
}

/// Win predicate for a run (exactly one is active)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinCondition {
    /// Win once this many bugs are killed (gate mode)
    Kills(u32),
    /// Win once the score reaches this value (arcade/threshold mode)
    Score(u64),
}

/// Mode selected at start, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub policy: Policy,
    pub win: WinCondition,
    pub points_per_kill: u64,
}

impl Mode {
    /// Skill gate: shoot 20 bugs to unlock sign-up
    pub fn gate() -> Self {
        Self {
            policy: Policy::Falling,
            win: WinCondition::Kills(20),
            points_per_kill: 1,
        }
    }

    /// Arcade: reach a score threshold with falling bugs
    pub fn arcade() -> Self {
        Self {
            policy: Policy::Falling,
            win: WinCondition::Score(500),
            points_per_kill: 10,
        }
    }

    /// Wave survival against a marching formation
    pub fn formation() -> Self {
        Self {
            policy: Policy::Formation,
            win: WinCondition::Score(5000),
            points_per_kill: 100,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "gate" => Some(Self::gate()),
            "arcade" => Some(Self::arcade()),
            "formation" | "waves" => Some(Self::formation()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match (self.policy, self.win) {
            (Policy::Falling, WinCondition::Kills(_)) => "gate",
            (Policy::Falling, WinCondition::Score(_)) => "arcade",
            (Policy::Formation, _) => "formation",
        }
    }

    /// Lives only exist in falling mode
    pub fn uses_lives(&self) -> bool {
        self.policy == Policy::Falling
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.win {
            WinCondition::Kills(0) => return Err(ConfigError::Zero { field: "mode.win.kills" }),
            WinCondition::Score(0) => return Err(ConfigError::Zero { field: "mode.win.score" }),
            _ => {}
        }
        if self.points_per_kill == 0 {
            return Err(ConfigError::Zero {
                field: "mode.points_per_kill",
            });
        }
        Ok(())
    }
}

/// Fixed logical arena
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Distance from the arena bottom to the player's top edge
    pub bottom_offset: f32,
    /// Horizontal step per input sample
    pub step: f32,
    pub lives: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            bottom_offset: PLAYER_BOTTOM_OFFSET,
            step: PLAYER_STEP,
            lives: STARTING_LIVES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: f32,
    pub height: f32,
    /// Upward distance per tick
    pub speed: f32,
    /// Minimum time between shots (ms)
    pub fire_interval_ms: f64,
    /// Period of the input sampling timer (ms)
    pub sample_interval_ms: f64,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            speed: BULLET_SPEED,
            fire_interval_ms: FIRE_INTERVAL_MS,
            sample_interval_ms: INPUT_SAMPLE_MS,
        }
    }
}

/// Falling-mode spawn throttle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingConfig {
    pub bug_width: f32,
    pub bug_height: f32,
    /// Interval with an empty field
    pub spawn_interval_ms: f64,
    /// Interval reduction per live bug
    pub spawn_interval_step_ms: f64,
    /// Floor for the interval
    pub min_spawn_interval_ms: f64,
}

impl Default for FallingConfig {
    fn default() -> Self {
        Self {
            bug_width: BUG_SIZE,
            bug_height: BUG_SIZE,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
        }
    }
}

/// Bug speed progression (speed is a multiplier in formation mode)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub base_speed: f32,
    pub speed_per_kill: f32,
    pub max_speed: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            base_speed: BASE_BUG_SPEED,
            speed_per_kill: BUG_SPEED_PER_KILL,
            max_speed: MAX_BUG_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub columns: u32,
    pub base_rows: u32,
    pub max_rows: u32,
    pub bug_width: f32,
    pub bug_height: f32,
    /// Distance between the left edges of neighbouring columns
    pub spacing_x: f32,
    /// Distance between the top edges of neighbouring rows
    pub spacing_y: f32,
    pub top_margin: f32,
    /// Base horizontal distance per tick
    pub step: f32,
    /// Speed gained per wave (multiplier = 1 + wave * ramp)
    pub ramp_per_wave: f32,
    /// Downward step when the grid touches a side wall
    pub drop: f32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            columns: FORMATION_COLUMNS,
            base_rows: FORMATION_BASE_ROWS,
            max_rows: FORMATION_MAX_ROWS,
            bug_width: FORMATION_BUG_WIDTH,
            bug_height: FORMATION_BUG_HEIGHT,
            spacing_x: FORMATION_SPACING_X,
            spacing_y: FORMATION_SPACING_Y,
            top_margin: FORMATION_TOP_MARGIN,
            step: FORMATION_STEP,
            ramp_per_wave: FORMATION_RAMP,
            drop: FORMATION_DROP,
        }
    }
}

impl FormationConfig {
    /// Rows for a wave, growing by one per wave up to the cap
    pub fn rows_for_wave(&self, wave: u32) -> u32 {
        self.base_rows.saturating_add(wave).min(self.max_rows)
    }

    /// Total width covered by one grid row
    pub fn grid_width(&self) -> f32 {
        (self.columns.saturating_sub(1)) as f32 * self.spacing_x + self.bug_width
    }
}

/// Visual-only particle bursts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub enabled: bool,
    pub burst: u32,
    pub max: usize,
    /// Life lost per tick (life starts at 1.0)
    pub decay: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            burst: PARTICLE_BURST,
            max: MAX_PARTICLES,
            decay: PARTICLE_DECAY,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: ArenaConfig,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub falling: FallingConfig,
    pub difficulty: DifficultyConfig,
    pub formation: FormationConfig,
    pub particles: ParticleConfig,
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn fits(entity: &'static str, size: f32, arena: f32) -> Result<(), ConfigError> {
    if size <= arena {
        Ok(())
    } else {
        Err(ConfigError::DoesNotFit { entity, size, arena })
    }
}

impl GameConfig {
    /// Parse a JSON config; absent fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file, falling back to defaults if it is missing
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let config = Self::from_json(&json)?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Malformed { msg: e.to_string() }),
        }
    }

    /// Player's top edge
    pub fn player_y(&self) -> f32 {
        self.arena.height - self.player.bottom_offset
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.arena;
        positive("arena.width", a.width as f64)?;
        positive("arena.height", a.height as f64)?;

        let p = &self.player;
        positive("player.width", p.width as f64)?;
        positive("player.height", p.height as f64)?;
        positive("player.step", p.step as f64)?;
        positive("player.bottom_offset", p.bottom_offset as f64)?;
        if p.lives == 0 {
            return Err(ConfigError::Zero { field: "player.lives" });
        }
        fits("player", p.width, a.width)?;
        fits("player", p.bottom_offset, a.height)?;

        let b = &self.bullet;
        positive("bullet.width", b.width as f64)?;
        positive("bullet.height", b.height as f64)?;
        positive("bullet.speed", b.speed as f64)?;
        positive("bullet.fire_interval_ms", b.fire_interval_ms)?;
        positive("bullet.sample_interval_ms", b.sample_interval_ms)?;

        let f = &self.falling;
        positive("falling.bug_width", f.bug_width as f64)?;
        positive("falling.bug_height", f.bug_height as f64)?;
        positive("falling.spawn_interval_ms", f.spawn_interval_ms)?;
        positive("falling.min_spawn_interval_ms", f.min_spawn_interval_ms)?;
        if !f.spawn_interval_step_ms.is_finite() || f.spawn_interval_step_ms < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "falling.spawn_interval_step_ms",
                value: f.spawn_interval_step_ms,
            });
        }
        fits("falling bug", f.bug_width, a.width)?;

        let d = &self.difficulty;
        positive("difficulty.base_speed", d.base_speed as f64)?;
        positive("difficulty.max_speed", d.max_speed as f64)?;
        if !d.speed_per_kill.is_finite() || d.speed_per_kill < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "difficulty.speed_per_kill",
                value: d.speed_per_kill as f64,
            });
        }
        if d.max_speed < d.base_speed {
            return Err(ConfigError::SpeedCapBelowBase {
                base: d.base_speed,
                max: d.max_speed,
            });
        }

        let fm = &self.formation;
        if fm.columns == 0 {
            return Err(ConfigError::Zero { field: "formation.columns" });
        }
        if fm.base_rows == 0 {
            return Err(ConfigError::Zero { field: "formation.base_rows" });
        }
        if fm.max_rows < fm.base_rows {
            return Err(ConfigError::Zero { field: "formation.max_rows" });
        }
        positive("formation.bug_width", fm.bug_width as f64)?;
        positive("formation.bug_height", fm.bug_height as f64)?;
        positive("formation.spacing_x", fm.spacing_x as f64)?;
        positive("formation.spacing_y", fm.spacing_y as f64)?;
        positive("formation.step", fm.step as f64)?;
        positive("formation.drop", fm.drop as f64)?;
        if !fm.ramp_per_wave.is_finite() || fm.ramp_per_wave < 0.0 {
            return Err(ConfigError::NotPositive {
                field: "formation.ramp_per_wave",
                value: fm.ramp_per_wave as f64,
            });
        }
        // A grid as wide as the arena touches a wall every tick and never stops dropping
        if fm.grid_width() >= a.width {
            return Err(ConfigError::DoesNotFit {
                entity: "formation grid",
                size: fm.grid_width(),
                arena: a.width,
            });
        }
        let grid_height = fm.top_margin + (fm.max_rows - 1) as f32 * fm.spacing_y + fm.bug_height;
        fits("formation grid", grid_height, self.player_y())?;

        Ok(())
    }
}
