//! Fixed-step simulation tick
//!
//! Order is fixed: spawn, move, collide, difficulty, then the win/lose check.
//! Reordering changes observable behaviour (a bug spawned this tick also
//! moves this tick).

use super::collision::{formation_reached, remove_escaped, remove_spent_bullets, resolve_hits};
use super::input::PendingControls;
use super::motion::{apply_controls, emit_burst, fall, march, rise, update_particles};
use super::spawner::build_formation;
use super::state::{Outcome, RunState, RunStatus, Snapshot, TerminalReport};
use crate::settings::{GameConfig, Policy, WinCondition};

/// What a tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub snapshot: Snapshot,
    /// Set only on the tick that ended the run
    pub terminal: Option<TerminalReport>,
}

/// Advance a playing run by one step. Returns `None` (and touches nothing)
/// unless the run is `Playing`.
pub fn tick(
    run: &mut RunState,
    config: &GameConfig,
    controls: PendingControls,
    now: f64,
) -> Option<TickResult> {
    if run.status != RunStatus::Playing {
        return None;
    }
    run.time_ticks += 1;

    spawn(run, config, now);
    let speed = run.difficulty.speed(&config.difficulty);

    // --- MOTION ---
    apply_controls(
        &mut run.player,
        controls,
        config.arena.width,
        &config.bullet,
        &mut run.store,
    );
    match run.mode.policy {
        Policy::Falling => fall(&mut run.store, speed),
        Policy::Formation => {
            if let Some(formation) = run.formation.as_mut() {
                march(
                    &mut run.store,
                    formation,
                    &config.formation,
                    speed,
                    config.arena.width,
                );
            }
        }
    }
    rise(&mut run.store, config.bullet.speed);
    update_particles(&mut run.store, &config.particles);

    // --- COLLISIONS ---
    let escaped = match run.mode.policy {
        Policy::Falling => remove_escaped(&mut run.store, config.arena.height),
        Policy::Formation => 0,
    };
    if escaped > 0 {
        if let Some(lives) = run.lives.as_mut() {
            *lives = lives.saturating_sub(escaped);
            log::debug!("{} bug(s) escaped, {} lives left", escaped, lives);
        }
    }

    remove_spent_bullets(&mut run.store);
    let kills = resolve_hits(&mut run.store);
    for kill in &kills {
        run.kill_count += 1;
        run.score += run.mode.points_per_kill;
        emit_burst(&mut run.store, kill.at, run.time_ticks, &config.particles);
    }

    let overrun = run.mode.policy == Policy::Formation
        && formation_reached(run.store.bugs(), run.player.pos.y);

    // --- DIFFICULTY ---
    for _ in &kills {
        run.difficulty.on_kill(&config.difficulty);
    }

    // --- WIN / LOSE (loss is checked first) ---
    let lost = overrun || run.lives == Some(0);
    let won = match run.mode.win {
        WinCondition::Kills(target) => run.kill_count >= target,
        WinCondition::Score(target) => run.score >= target,
    };
    let outcome = if lost {
        Some(Outcome::Lost)
    } else if won {
        Some(Outcome::Won)
    } else {
        None
    };

    let terminal = outcome.map(|outcome| {
        run.status = match outcome {
            Outcome::Won => RunStatus::Won,
            Outcome::Lost => RunStatus::Lost,
        };
        log::info!(
            "Run {} {:?}: score {}, kills {}",
            run.run_id,
            outcome,
            run.score,
            run.kill_count
        );
        TerminalReport {
            run_id: run.run_id,
            outcome,
            final_score: run.score,
            kill_count: run.kill_count,
        }
    });

    Some(TickResult {
        snapshot: run.snapshot(config),
        terminal,
    })
}

/// Spawner phase: one throttled bug in falling mode, a whole grid when the
/// field is empty in formation mode.
fn spawn(run: &mut RunState, config: &GameConfig, now: f64) {
    match run.mode.policy {
        Policy::Falling => {
            let live = run.store.bugs().len();
            if let Some(spec) = run.spawner.maybe_spawn(
                now,
                live,
                &config.falling,
                config.arena.width,
                &mut run.rng,
            ) {
                let id = run.store.spawn_bug(spec);
                log::debug!("Spawned bug {} at x={:.1}", id.raw(), spec.pos.x);
            }
        }
        Policy::Formation => {
            let Some(formation) = run.formation.as_mut() else {
                return;
            };
            if !run.store.bugs().is_empty() {
                return;
            }
            if formation.built {
                formation.wave += 1;
            }
            formation.built = true;
            run.difficulty.on_wave(formation.wave);

            let specs = build_formation(&config.formation, formation.wave, config.arena.width);
            log::info!(
                "Wave {}: {} x {} formation",
                formation.wave,
                config.formation.rows_for_wave(formation.wave),
                config.formation.columns
            );
            for spec in specs {
                run.store.spawn_bug(spec);
            }
        }
    }
}
