//! Game session state and phase transitions
//!
//! One `GameSession` holds everything a run needs: actor, gates, camera,
//! ramps and score. It is passed explicitly to `tick` and to the render pass.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::camera::Camera;
use super::gate::{Gate, GateGenerator};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::theme::Theme;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Run ended (or not begun); waiting for a restart request
    Stopped,
    /// Fresh run, actor bobbing, waiting for the first jump
    Idle,
    /// Scrolling and scoring
    Running,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    Jumped,
    GatePassed { score: u64 },
    Collided { gate_id: u32 },
    NewHighScore(u64),
}

/// Snapshot for the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub phase: GamePhase,
}

/// Salt separating the cosmetic RNG stream from the gameplay one
const COSMETIC_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub actor: Actor,
    /// Live gates, ascending `x` (newest last)
    pub gates: Vec<Gate>,
    pub camera: Camera,
    pub camera_zoom: f32,
    /// Current horizontal scroll speed
    pub scroll_speed: f32,
    pub score: u64,
    pub high_score: u64,
    pub theme: Theme,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Scroll speed still ramping up after a start
    pub(crate) speedup: bool,
    /// Zoom still ramping in after a restart
    pub(crate) zoom_in: bool,
    /// Jump input is down
    pub(crate) jump_held: bool,
    /// The held jump was already applied
    pub(crate) jump_consumed: bool,
    pub(crate) generator: GateGenerator,
    cosmetic_rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a stopped session; the host restarts it to begin playing
    pub fn new(config: GameConfig, seed: u64, high_score: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = GateGenerator::new(&config, Pcg32::seed_from_u64(seed));
        Ok(Self {
            actor: Actor::new(&config),
            gates: Vec::new(),
            camera: Camera::new(0.0, 0.0),
            camera_zoom: config.min_zoom,
            scroll_speed: 0.0,
            score: 0,
            high_score,
            theme: Theme::default(),
            time_ticks: 0,
            phase: GamePhase::Stopped,
            speedup: false,
            zoom_in: false,
            jump_held: false,
            jump_consumed: false,
            generator,
            cosmetic_rng: Pcg32::seed_from_u64(seed ^ COSMETIC_SALT),
            events: Vec::new(),
            seed,
            config,
        })
    }

    /// Resize the view from a viewport in CSS pixels
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        let scale = self.config.scale;
        self.camera
            .resize(viewport_width * scale, viewport_height * scale);
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            high_score: self.high_score,
            phase: self.phase,
        }
    }

    /// Take the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            log::info!("Phase {:?} -> {:?} (score {})", from, to, self.score);
            self.phase = to;
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Begin a fresh run: clear gates and score, re-roll the theme
    pub fn restart(&mut self) {
        self.actor.restore();
        self.camera.snap(self.actor.y, self.camera_zoom);
        self.zoom_in = true;
        self.speedup = false;
        self.gates.clear();
        self.score = 0;
        self.scroll_speed = 0.0;
        self.jump_held = false;
        self.jump_consumed = false;
        self.theme = Theme::random(&mut self.cosmetic_rng);
        self.set_phase(GamePhase::Idle);
    }

    /// First jump of a run: scoring starts and the world speeds up
    pub fn start(&mut self) {
        if self.phase == GamePhase::Idle {
            self.speedup = true;
            self.set_phase(GamePhase::Running);
        }
    }

    /// End the run. Safe to call again while already stopped.
    pub fn stop(&mut self) {
        self.actor.speed = 0.0;
        self.speedup = false;
        self.set_phase(GamePhase::Stopped);
    }

    /// Record a new high score if the run beat it
    pub(crate) fn update_high_score(&mut self) {
        if self.score > self.high_score && self.config.collisions {
            self.high_score = self.score;
            log::info!("New high score: {}", self.high_score);
            self.events.push(GameEvent::NewHighScore(self.high_score));
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.phase == GamePhase::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        let mut s = GameSession::new(GameConfig::default(), 12345, 0).unwrap();
        s.resize(1000.0, 800.0);
        s
    }

    #[test]
    fn test_starts_stopped() {
        let s = session();
        assert_eq!(s.phase, GamePhase::Stopped);
        assert!(s.gates.is_empty());
        assert_eq!(s.camera_zoom, s.config.min_zoom);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            collision_steps: 0,
            ..Default::default()
        };
        assert!(GameSession::new(config, 1, 0).is_err());
    }

    #[test]
    fn test_restart_start_stop_cycle() {
        let mut s = session();
        s.restart();
        assert_eq!(s.phase, GamePhase::Idle);
        s.start();
        assert_eq!(s.phase, GamePhase::Running);
        assert!(s.speedup);
        s.actor.speed = 3.0;
        s.stop();
        assert_eq!(s.phase, GamePhase::Stopped);
        assert_eq!(s.actor.speed, 0.0);
        assert!(!s.speedup);

        let events = s.take_events();
        assert_eq!(events.len(), 3);
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut s = session();
        s.start();
        assert_eq!(s.phase, GamePhase::Stopped);
    }

    #[test]
    fn test_stop_twice_emits_once() {
        let mut s = session();
        s.restart();
        s.take_events();
        s.stop();
        s.stop();
        assert_eq!(s.take_events().len(), 1);
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut s = session();
        s.restart();
        let first = (s.score, s.gates.len(), s.actor.y, s.actor.speed, s.scroll_speed, s.phase);
        s.score = 7;
        s.actor.y = 90.0;
        s.scroll_speed = 100.0;
        s.stop();
        s.restart();
        let second = (s.score, s.gates.len(), s.actor.y, s.actor.speed, s.scroll_speed, s.phase);
        assert_eq!(first, second);
        assert_eq!(second, (0, 0, 0.0, 0.0, 0.0, GamePhase::Idle));
    }

    #[test]
    fn test_high_score_respects_collisions_flag() {
        let mut s = session();
        s.score = 5;
        s.update_high_score();
        assert_eq!(s.high_score, 5);

        let mut cheat = GameSession::new(
            GameConfig {
                collisions: false,
                ..Default::default()
            },
            1,
            0,
        )
        .unwrap();
        cheat.score = 9;
        cheat.update_high_score();
        assert_eq!(cheat.high_score, 0);
    }
}
