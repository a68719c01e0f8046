//! Game driver
//!
//! Owns the session, the fixed-step scheduler, pending input and the high
//! score store. Hosts call `frame` once per display callback.

use crate::config::GameConfig;
use crate::error::{ConfigError, RenderError};
use crate::persistence::HighScoreStore;
use crate::platform::FixedStep;
use crate::renderer::{Renderer, render_session};
use crate::sim::{GameEvent, GamePhase, GameSession, Hud, TickInput, tick};

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Jump,
    Restart,
    ToggleAutopilot,
}

/// Map a DOM `KeyboardEvent.key` value; any key continues a stopped game
pub fn key_action(key: &str, phase: GamePhase) -> Option<KeyAction> {
    if phase == GamePhase::Stopped {
        return Some(KeyAction::Restart);
    }
    match key {
        " " | "ArrowUp" | "w" | "W" => Some(KeyAction::Jump),
        "Enter" | "r" | "R" => Some(KeyAction::Restart),
        "a" | "A" => Some(KeyAction::ToggleAutopilot),
        _ => None,
    }
}

pub struct Game<S: HighScoreStore> {
    session: GameSession,
    scheduler: FixedStep,
    input: TickInput,
    store: S,
    events: Vec<GameEvent>,
}

impl<S: HighScoreStore> Game<S> {
    /// Build a stopped game; the stored high score seeds the session
    pub fn new(config: GameConfig, seed: u64, store: S) -> Result<Self, ConfigError> {
        let high_score = store.high_score();
        let session = GameSession::new(config, seed, high_score)?;
        let scheduler = FixedStep::from_config(&session.config);
        log::info!("Game created (seed {}, high score {})", seed, high_score);

        Ok(Self {
            session,
            scheduler,
            input: TickInput::default(),
            store,
            events: Vec::new(),
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hud(&self) -> Hud {
        self.session.hud()
    }

    /// Jump (or start the run from Idle)
    pub fn request_jump(&mut self) {
        self.input.jump = true;
    }

    /// Start a fresh run; ignored unless stopped
    pub fn request_restart(&mut self) {
        self.input.restart = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.input.autopilot != enabled {
            log::info!("Autopilot: {}", enabled);
        }
        self.input.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// New viewport size in CSS pixels; the target is sized in world units
    pub fn resize<R: Renderer + ?Sized>(&mut self, width: f32, height: f32, renderer: &mut R) {
        self.session.resize(width, height);
        let view = self.session.camera.view;
        renderer.resize(view.x.round() as u32, view.y.round() as u32);
    }

    /// Run one display callback: catch-up steps, then a single render
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        elapsed: f32,
        renderer: &mut R,
    ) -> Result<Hud, RenderError> {
        let input = self.input;
        let (steps, rendered) = self.scheduler.run_fixed_step(
            elapsed,
            &mut self.session,
            |session, dt| tick(session, &input, dt),
            |session| {
                render_session(session, renderer);
                renderer.present()
            },
        );

        // Edges stay pending until a step has seen them
        if steps > 0 {
            self.input.jump = false;
            self.input.restart = false;
        }

        self.collect_events();
        rendered?;
        Ok(self.session.hud())
    }

    /// Events since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect_events(&mut self) {
        let events = self.session.take_events();
        let best = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::NewHighScore(score) => Some(*score),
                _ => None,
            })
            .max();

        if let Some(score) = best {
            self.store.set_high_score(score);
        }
        self.events.extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::renderer::ShapeBatch;
    use crate::sim::Gate;

    const FRAME: f32 = 1.0 / 60.0 + 1e-4;

    fn game(store: MemoryStore) -> (Game<MemoryStore>, ShapeBatch) {
        let mut game = Game::new(GameConfig::default(), 99, store).unwrap();
        let mut batch = ShapeBatch::new(1, 1);
        game.resize(1000.0, 800.0, &mut batch);
        (game, batch)
    }

    #[test]
    fn test_resize_sizes_target_in_world_units() {
        let (_, batch) = game(MemoryStore::new());
        assert_eq!(batch.size(), (800, 640));
    }

    #[test]
    fn test_stored_high_score_seeds_session() {
        let (game, _) = game(MemoryStore::with_high_score(12));
        assert_eq!(game.hud().high_score, 12);
        assert_eq!(game.hud().phase, GamePhase::Stopped);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            min_gate_height: 500.0,
            max_gate_height: 100.0,
            ..Default::default()
        };
        assert!(Game::new(config, 1, MemoryStore::new()).is_err());
    }

    #[test]
    fn test_inputs_wait_for_a_step() {
        let (mut game, mut batch) = game(MemoryStore::new());
        game.request_restart();
        let hud = game.frame(0.0, &mut batch).unwrap();
        assert_eq!(hud.phase, GamePhase::Stopped);
        assert_eq!(batch.frames(), 1);

        let hud = game.frame(FRAME * 2.0, &mut batch).unwrap();
        assert_eq!(hud.phase, GamePhase::Idle);

        game.request_jump();
        let hud = game.frame(FRAME, &mut batch).unwrap();
        assert_eq!(hud.phase, GamePhase::Running);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Jumped));
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_new_high_score_is_persisted() {
        let (mut game, mut batch) = game(MemoryStore::new());
        game.request_restart();
        game.frame(FRAME * 2.0, &mut batch).unwrap();
        game.request_jump();
        game.frame(FRAME, &mut batch).unwrap();

        let session = game.session_mut();
        let width = session.config.gate_width;
        session.gates = vec![Gate {
            id: 500,
            x: -width - session.actor.radius - 1.0,
            width,
            gap_top: -400.0,
            gap_bottom: 400.0,
            passed: false,
        }];

        let hud = game.frame(FRAME, &mut batch).unwrap();
        assert_eq!(hud.score, 1);
        assert_eq!(hud.high_score, 1);
        assert_eq!(game.store().high_score(), 1);
        assert_eq!(game.store().writes(), 1);
    }

    #[test]
    fn test_unbeaten_high_score_never_written() {
        let (mut game, mut batch) = game(MemoryStore::with_high_score(1000));
        game.set_autopilot(true);
        for _ in 0..600 {
            game.frame(FRAME, &mut batch).unwrap();
        }
        assert!(game.hud().score < 1000);
        assert_eq!(game.store().writes(), 0);
        assert_eq!(game.store().high_score(), 1000);
    }

    #[test]
    fn test_any_key_restarts_when_stopped() {
        for key in [" ", "ArrowUp", "x", "Shift"] {
            assert_eq!(key_action(key, GamePhase::Stopped), Some(KeyAction::Restart));
        }
        assert_eq!(key_action(" ", GamePhase::Running), Some(KeyAction::Jump));
        assert_eq!(key_action("a", GamePhase::Idle), Some(KeyAction::ToggleAutopilot));
        assert_eq!(key_action("x", GamePhase::Running), None);
    }

    #[test]
    fn test_space_after_crash_starts_a_new_run() {
        let (mut game, mut batch) = game(MemoryStore::new());
        if let Some(KeyAction::Restart) = key_action(" ", game.hud().phase) {
            game.request_restart();
        }
        let hud = game.frame(FRAME * 2.0, &mut batch).unwrap();
        assert_eq!(hud.phase, GamePhase::Idle);
        // Hosts restyle the page on this transition
        assert!(game.drain_events().contains(&GameEvent::PhaseChanged {
            from: GamePhase::Stopped,
            to: GamePhase::Idle,
        }));
    }

    #[test]
    fn test_one_render_per_frame() {
        let (mut game, mut batch) = game(MemoryStore::new());
        game.set_autopilot(true);
        game.frame(0.5, &mut batch).unwrap();
        game.frame(0.0, &mut batch).unwrap();
        assert_eq!(batch.frames(), 2);
        assert!(batch.last_frame_vertices() > 0);
    }
}
