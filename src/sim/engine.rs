//! Run lifecycle
//!
//! `Engine` owns the configuration, the input side (tracker + sampler) and the
//! current run. Input handlers only ever write to the sampler's buffer; the
//! tick is the single writer of entities.

use super::input::{ControlSampler, InputTracker, Intent};
use super::state::{EntityStore, Player, RunState, RunStatus, Snapshot, TerminalReport};
use super::tick::{TickResult, tick};
use crate::error::{EngineError, Result};
use crate::settings::{GameConfig, Mode};

/// Receives per-frame snapshots and the one terminal report of each run
pub trait RunObserver {
    fn on_tick(&mut self, _snapshot: &Snapshot) {}
    fn on_terminal(&mut self, _report: &TerminalReport) {}
}

impl RunObserver for () {}

/// The unified game engine (falling and formation policies)
#[derive(Debug, Clone)]
pub struct Engine {
    config: GameConfig,
    input: InputTracker,
    sampler: ControlSampler,
    run: RunState,
    next_run_id: u64,
}

impl Engine {
    /// Create an idle engine. The configuration is validated up front.
    pub fn new(config: GameConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected config: {}", e);
            return Err(e.into());
        }
        let run = RunState::new(&config, Mode::gate(), 0, 0);
        Ok(Self {
            config,
            input: InputTracker::new(),
            sampler: ControlSampler::new(),
            run,
            next_run_id: 1,
        })
    }

    /// Idle -> Playing. Rejected without touching state if the engine is not
    /// idle or the mode is invalid.
    pub fn start(&mut self, mode: Mode, seed: u64) -> Result<()> {
        if self.run.status != RunStatus::Idle {
            log::warn!("start() rejected while {:?}", self.run.status);
            return Err(EngineError::NotIdle {
                status: self.run.status,
            });
        }
        if let Err(e) = mode.validate() {
            log::warn!("start() rejected: {}", e);
            return Err(e.into());
        }
        self.begin(mode, seed);
        Ok(())
    }

    /// Re-run `start()`'s reset with the current mode and the next seed.
    /// Allowed from Playing (explicit restart) and from Won/Lost.
    pub fn restart(&mut self) -> Result<()> {
        let seed = self.run.seed.wrapping_add(1);
        self.restart_with_seed(seed)
    }

    pub fn restart_with_seed(&mut self, seed: u64) -> Result<()> {
        if self.run.status == RunStatus::Idle {
            log::warn!("restart() rejected: no run to restart");
            return Err(EngineError::NotStarted);
        }
        let mode = self.run.mode;
        self.begin(mode, seed);
        Ok(())
    }

    /// Discard the current run and go back to Idle
    pub fn cancel(&mut self) {
        if self.run.status != RunStatus::Idle {
            log::info!("Run {} cancelled", self.run.run_id);
        }
        self.run.status = RunStatus::Idle;
        self.run.store.clear();
        self.input.clear();
        self.sampler.reset();
    }

    fn begin(&mut self, mode: Mode, seed: u64) {
        let run_id = self.next_run_id;
        self.next_run_id += 1;

        self.run = RunState::new(&self.config, mode, seed, run_id);
        self.run.status = RunStatus::Playing;
        self.input.clear();
        self.sampler.reset();

        log::info!("Run {} started: mode={} seed={}", run_id, mode.as_str(), seed);
    }

    pub fn press(&mut self, intent: Intent) {
        self.input.press(intent);
    }

    pub fn release(&mut self, intent: Intent) {
        self.input.release(intent);
    }

    /// Input-timer callback: turn held intents into queued controls
    pub fn sample_input(&mut self, now: f64) {
        if self.run.status != RunStatus::Playing {
            return;
        }
        self.sampler.sample(
            &self.input,
            now,
            self.config.player.step,
            self.config.bullet.fire_interval_ms,
        );
    }

    /// Frame callback: drain queued controls and advance one step.
    /// `None` when no run is playing.
    pub fn tick(&mut self, now: f64) -> Option<TickResult> {
        if self.run.status != RunStatus::Playing {
            return None;
        }
        let controls = self.sampler.drain();
        tick(&mut self.run, &self.config, controls, now)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.run.snapshot(&self.config)
    }

    pub fn status(&self) -> RunStatus {
        self.run.status
    }

    pub fn store(&self) -> &EntityStore {
        &self.run.store
    }

    pub fn player(&self) -> &Player {
        &self.run.player
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn mode(&self) -> Mode {
        self.run.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.run.seed
    }

    /// Id of the current (or last) run; 0 before the first start
    pub fn run_id(&self) -> u64 {
        self.run.run_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::settings::WinCondition;

    fn engine() -> Engine {
        Engine::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.player.lives = 0;
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::InvalidConfig(ConfigError::Zero { .. }))
        ));
    }

    #[test]
    fn test_start_resets_and_plays() {
        let mut e = engine();
        assert_eq!(e.status(), RunStatus::Idle);
        e.start(Mode::gate(), 7).unwrap();

        let snap = e.snapshot();
        assert_eq!(snap.status, RunStatus::Playing);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.kill_count, 0);
        assert_eq!(snap.lives, Some(3));
        assert_eq!(snap.bugs, 0);
        assert_eq!(e.run_id(), 1);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut e = engine();
        e.start(Mode::gate(), 1).unwrap();
        e.tick(0.0);
        let before = e.snapshot();
        let err = e.start(Mode::arcade(), 2).unwrap_err();
        assert_eq!(
            err,
            EngineError::NotIdle {
                status: RunStatus::Playing
            }
        );
        assert_eq!(e.snapshot(), before);
        assert_eq!(e.mode(), Mode::gate());
    }

    #[test]
    fn test_invalid_mode_rejected_without_mutation() {
        let mut e = engine();
        let mut mode = Mode::gate();
        mode.win = WinCondition::Kills(0);
        assert!(matches!(e.start(mode, 1), Err(EngineError::InvalidConfig(_))));
        assert_eq!(e.status(), RunStatus::Idle);
        assert_eq!(e.run_id(), 0);
    }

    #[test]
    fn test_restart_requires_a_run() {
        let mut e = engine();
        assert_eq!(e.restart(), Err(EngineError::NotStarted));

        e.start(Mode::gate(), 1).unwrap();
        e.cancel();
        assert_eq!(e.restart(), Err(EngineError::NotStarted));
    }

    #[test]
    fn test_restart_bumps_seed_and_run() {
        let mut e = engine();
        e.start(Mode::arcade(), u64::MAX).unwrap();
        e.tick(0.0);
        e.restart().unwrap();
        assert_eq!(e.seed(), 0);
        assert_eq!(e.run_id(), 2);
        assert_eq!(e.mode(), Mode::arcade());
        assert_eq!(e.snapshot().bugs, 0);
    }

    #[test]
    fn test_cancel_goes_quiet() {
        let mut e = engine();
        e.start(Mode::gate(), 1).unwrap();
        e.press(Intent::Fire);
        e.tick(0.0);
        e.cancel();

        assert_eq!(e.status(), RunStatus::Idle);
        assert!(e.store().bugs().is_empty());
        assert!(!e.input().is_active(Intent::Fire));
        assert!(e.tick(16.0).is_none());
        e.sample_input(32.0);
        assert!(e.tick(48.0).is_none());
    }

    #[test]
    fn test_held_input_moves_player_on_next_tick() {
        let mut e = engine();
        e.start(Mode::gate(), 1).unwrap();
        e.press(Intent::MoveRight);
        e.sample_input(0.0);
        e.sample_input(16.0);
        // Sampling alone never touches entities
        assert_eq!(e.player().pos.x, 400.0);

        e.tick(16.0);
        assert_eq!(e.player().pos.x, 420.0);
    }

    #[test]
    fn test_sampling_ignored_when_idle() {
        let mut e = engine();
        e.press(Intent::Fire);
        e.sample_input(0.0);
        e.start(Mode::gate(), 1).unwrap();
        e.tick(0.0);
        assert_eq!(e.store().bullets().len(), 0);
    }
}
