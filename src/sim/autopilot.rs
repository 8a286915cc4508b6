//! Demo-mode AI
//!
//! Chases the most dangerous bug (the lowest one) and holds fire. Used by the
//! headless runner and the lifecycle tests; it only talks to the engine
//! through intents, like a human player would.

use super::engine::{Engine, RunObserver};
use super::input::Intent;
use super::scheduler::{GameLoop, Scheduler};
use super::state::Bug;

/// Intents the autopilot wants held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Horizontal slack before the ship bothers moving
    pub dead_zone: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { dead_zone: 6.0 }
    }
}

impl Autopilot {
    pub fn new(dead_zone: f32) -> Self {
        Self { dead_zone }
    }

    /// Pick a target and decide which intents to hold
    pub fn choose(&self, engine: &Engine) -> Steering {
        let player_x = engine.player().pos.x;
        let target = engine
            .store()
            .bugs()
            .iter()
            .filter(|b| b.pos.y + b.size.y > 0.0)
            .max_by(|a, b| danger(a, player_x).total_cmp(&danger(b, player_x)));

        let Some(bug) = target else {
            return Steering::default();
        };

        let dx = bug.center().x - player_x;
        Steering {
            left: dx < -self.dead_zone,
            right: dx > self.dead_zone,
            fire: dx.abs() <= bug.size.x / 2.0,
        }
    }

    /// Press/release intents on a running loop to match `choose`
    pub fn drive<S: Scheduler, O: RunObserver>(&self, game: &mut GameLoop<S, O>) {
        let steering = self.choose(game.engine());
        for (intent, held) in [
            (Intent::MoveLeft, steering.left),
            (Intent::MoveRight, steering.right),
            (Intent::Fire, steering.fire),
        ] {
            if held {
                game.press(intent);
            } else {
                game.release(intent);
            }
        }
    }
}

/// Lower bugs first; among equals, the one closer to the ship
fn danger(bug: &Bug, player_x: f32) -> f32 {
    bug.bottom() * 1000.0 - (bug.center().x - player_x).abs()
}
