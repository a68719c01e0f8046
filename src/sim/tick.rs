//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically.

use super::collision::{collides, straddles_gap};
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump requested (click/tap/space); also starts a run from Idle
    pub jump: bool,
    /// Restart requested; honoured only while stopped
    pub restart: bool,
    /// Demo mode - the game plays itself
    pub autopilot: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    session.time_ticks += 1;

    let input = if input.autopilot {
        autopilot(session, input)
    } else {
        *input
    };

    handle_input(session, &input);
    update_ramps(session);
    apply_controls(session, dt);

    session.actor.apply_gravity(dt);
    session.actor.update_tilt(dt, session.config.world_speed);

    advance(session, dt);
    spawn_gates(session);

    session
        .camera
        .follow(session.actor.y, session.camera_zoom);
    session.update_high_score();
}

/// Phase transitions driven by the two input edges
fn handle_input(session: &mut GameSession, input: &TickInput) {
    if input.restart && session.is_stopped() {
        session.restart();
    }

    if input.jump {
        if !session.is_stopped() {
            session.jump_held = true;
            session.start();
        }
    } else {
        // Released: the next press may jump again
        session.jump_held = false;
        session.jump_consumed = false;
    }
}

/// Scroll speed and zoom easing
fn update_ramps(session: &mut GameSession) {
    let (min_zoom, max_zoom) = (session.config.min_zoom, session.config.max_zoom);
    let world_speed = session.config.world_speed;
    let stopped = session.is_stopped();

    if stopped {
        session.camera_zoom = (session.camera_zoom + ZOOM_OUT_RATE * session.camera_zoom)
            .clamp(min_zoom, max_zoom);
    }

    if session.speedup {
        session.scroll_speed =
            (session.scroll_speed + world_speed * SPEEDUP_RATE).clamp(0.0, world_speed);
        session.speedup = session.scroll_speed != world_speed;
    } else if stopped {
        session.scroll_speed =
            (session.scroll_speed - world_speed * SLOWDOWN_RATE).clamp(0.0, world_speed);
    }

    if session.zoom_in {
        session.camera_zoom = (session.camera_zoom - ZOOM_IN_STEP).clamp(min_zoom, max_zoom);
        session.zoom_in = session.camera_zoom != min_zoom;
    }
}

/// Apply a pending jump, or keep the idle actor bobbing around the start line
fn apply_controls(session: &mut GameSession, dt: f32) {
    if session.is_stopped() {
        return;
    }

    let wants_jump = session.jump_held && !session.jump_consumed;
    let bob = session.phase == GamePhase::Idle && session.actor.y > 0.0;

    if wants_jump || bob {
        session.jump_consumed = session.is_running();
        session.actor.jump(dt);
        if wants_jump {
            session.events.push(GameEvent::Jumped);
        }
    }
}

/// Move actor and gates in sub-steps, scoring and colliding as they go
fn advance(session: &mut GameSession, dt: f32) {
    let steps = session.config.collision_steps.max(1);
    let x_step = session.scroll_speed / steps as f32 * dt;
    let y_step = session.actor.speed / steps as f32;
    let close_amount = session.config.gate_close_rate * dt;
    let left_bound = session.camera.visible_left(session.config.min_zoom);
    let collisions = session.config.collisions;

    for _ in 0..steps {
        session.actor.y += y_step;
        let actor_leading = session.actor.x - session.actor.radius;

        // Newest gate first
        let mut hit = None;
        let mut i = session.gates.len();
        while i > 0 {
            i -= 1;
            let gate = &mut session.gates[i];
            gate.x -= x_step;

            if gate.passed {
                gate.close(close_amount);
            } else if gate.right() < actor_leading {
                gate.passed = true;
                session.score += 1;
                log::debug!("Gate {} passed, score {}", gate.id, session.score);
                session.events.push(GameEvent::GatePassed {
                    score: session.score,
                });
            }

            if gate.right() < left_bound {
                log::trace!("Gate {} left the view", gate.id);
                session.gates.remove(i);
            } else if collisions && collides(&session.actor, gate) {
                hit = Some(i);
                break;
            }
        }

        if let Some(i) = hit {
            // Undo this sub-step's scroll for every gate already moved
            for gate in &mut session.gates[i..] {
                gate.x += x_step;
            }

            let gate = &session.gates[i];
            let gate_id = gate.id;
            if straddles_gap(&session.actor, gate) {
                session.actor.y -= y_step;
            } else {
                session.scroll_speed = 0.0;
            }

            session.events.push(GameEvent::Collided { gate_id });
            session.stop();
            break;
        }
    }
}

/// Keep the stretch ahead of the actor filled with gates
fn spawn_gates(session: &mut GameSession) {
    let limit = session.camera.visible_right(session.config.min_zoom);
    let spacing = session.config.gate_spacing;

    loop {
        let next_x = match session.gates.last() {
            Some(last) => {
                let x = last.right() + spacing;
                if x >= limit {
                    break;
                }
                Some(x)
            }
            // A fresh run seeds its first gate; a running one never restarts the chain
            None if session.is_running() => break,
            None => None,
        };

        let gate = session.generator.next_gate(next_x);
        log::trace!(
            "Spawned gate {} at x={:.1} gap=[{:.1}, {:.1}]",
            gate.id,
            gate.x,
            gate.gap_top,
            gate.gap_bottom
        );
        session.gates.push(gate);
    }
}

/// Demo pilot: restart when stopped, jump when about to sink below the next gap
fn autopilot(session: &GameSession, input: &TickInput) -> TickInput {
    let mut input = *input;
    let actor = &session.actor;

    match session.phase {
        GamePhase::Stopped => {
            input.restart = true;
            input.jump = false;
        }
        GamePhase::Idle => input.jump = true,
        GamePhase::Running => {
            let floor = session
                .gates
                .iter()
                .find(|g| !g.passed && g.right() >= actor.x - actor.radius)
                .map(|g| g.gap_bottom)
                .unwrap_or(actor.radius * 4.0);
            let next_y = actor.y + actor.speed;
            input.jump = actor.speed > 0.0 && next_y + actor.radius > floor - 2.0;
        }
    }

    input
}
