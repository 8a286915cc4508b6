//! Bug Invaders - native headless runner
//!
//! Plays one autopilot run on a simulated 60 Hz clock and records a won score
//! in a local JSON leaderboard.
//!
//! Usage: `bug-invaders [gate|arcade|formation] [seed]`

use std::path::Path;

use bug_invaders::highscores::MAX_HIGH_SCORES;
use bug_invaders::sim::{
    Autopilot, Engine, GameLoop, ManualScheduler, Outcome, RunObserver, TerminalReport,
};
use bug_invaders::submission::{Identity, ScoreSubmitter};
use bug_invaders::{GameConfig, HighScores, Mode, Snapshot};

const CONFIG_PATH: &str = "bug-invaders.json";
const HIGHSCORES_PATH: &str = "bug-invaders-highscores.json";
/// Simulated display refresh (ms)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Hard stop for a run that never ends (one hour of play)
const MAX_FRAMES: u64 = 60 * 60 * 60;

#[derive(Default)]
struct Console {
    last_wave: Option<u32>,
    terminal: Option<TerminalReport>,
}

impl RunObserver for Console {
    fn on_tick(&mut self, snapshot: &Snapshot) {
        let wave = snapshot.formation.map(|f| f.wave);
        if wave.is_some() && wave != self.last_wave {
            self.last_wave = wave;
            log::info!(
                "Tick {}: wave {:?}, score {}",
                snapshot.time_ticks,
                wave,
                snapshot.score
            );
        }
    }

    fn on_terminal(&mut self, report: &TerminalReport) {
        self.terminal = Some(*report);
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mode_name = args.next().unwrap_or_else(|| "gate".to_string());
    let Some(mode) = Mode::preset(&mode_name) else {
        eprintln!("Unknown mode '{}'. Use gate, arcade or formation.", mode_name);
        std::process::exit(2);
    };
    let seed = match args.next() {
        Some(raw) => match raw.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("Seed must be an unsigned integer, got '{}'", raw);
                std::process::exit(2);
            }
        },
        None => std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };

    let config = match GameConfig::load(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Bad config: {}", e);
            std::process::exit(1);
        }
    };
    let engine = match Engine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Bug Invaders (native) starting...");
    let mut game = GameLoop::new(engine, ManualScheduler::new(), Console::default());
    if let Err(e) = game.start(mode, seed) {
        eprintln!("Could not start: {}", e);
        std::process::exit(1);
    }

    let pilot = Autopilot::default();
    let mut now = 0.0;
    let mut frames = 0;
    while frames < MAX_FRAMES {
        pilot.drive(&mut game);
        if !game.step(now) {
            break;
        }
        now += FRAME_MS;
        frames += 1;
    }
    if frames >= MAX_FRAMES {
        log::warn!("Run did not finish after {} frames, cancelling", frames);
        game.cancel();
    }

    let Some(report) = game.observer().terminal else {
        println!("Run cancelled.");
        return;
    };
    let snapshot = game.engine().snapshot();
    println!(
        "{} run (seed {}): {:?} with score {} ({} kills) after {} ticks",
        mode.as_str(),
        seed,
        report.outcome,
        report.final_score,
        report.kill_count,
        snapshot.time_ticks
    );

    let path = Path::new(HIGHSCORES_PATH);
    let mut board = HighScores::load(path);
    if report.outcome == Outcome::Won {
        match board.potential_rank(report.final_score) {
            Some(rank) => println!("Good for #{} on the local board", rank),
            None => println!("Not enough for the local top {}", MAX_HIGH_SCORES),
        }
    }
    let identity = Some(Identity::new("local", std::env::var("BUG_INVADERS_EMAIL").ok()));
    let mut submitter = ScoreSubmitter::new();
    match submitter.submit(&report, &identity, &mut board) {
        Ok(submission) => {
            if let Err(e) = board.save(path) {
                log::warn!("Could not save high scores: {}", e);
            }
            if let Some(top) = board.top_score() {
                println!("Recorded for {}. Best score: {}", submission.username, top);
            }
        }
        Err(e) => println!("Score not recorded: {}", e),
    }
}
