//! Render pass: draws one session through any `Renderer`

use super::Renderer;
use crate::sim::GameSession;

/// Draw the current session state.
///
/// The previous frame's transform is popped first, so the pass is safe to
/// repeat every callback. Gates are drawn newest first, skipping those
/// outside the view.
pub fn render_session<R: Renderer + ?Sized>(session: &GameSession, renderer: &mut R) {
    let zoom = session.camera_zoom;
    let camera = &session.camera;
    let theme = &session.theme;
    let pad = session.config.scale;

    renderer.restore();
    renderer.clear(theme.background);
    renderer.save();
    renderer.set_line_width(session.config.line_width);
    renderer.scale(zoom, zoom);
    renderer.translate(camera.offset_x / zoom, camera.current_y);

    let actor = &session.actor;
    renderer.set_fill_color(None);
    renderer.set_stroke_color(Some(theme.actor));
    renderer.draw_polygon(actor.x, actor.y, actor.radius, theme.actor_sides, actor.angle);

    renderer.set_stroke_color(Some(theme.gate));
    let (left, right) = (camera.visible_left(zoom), camera.visible_right(zoom));
    let top = camera.visible_top() + pad;
    let bottom = camera.visible_bottom(zoom) - pad;

    for gate in session.gates.iter().rev() {
        if gate.x > right || gate.right() < left {
            continue;
        }

        let top_height = gate.gap_top - top;
        if top_height > 0.0 {
            renderer.draw_rect(gate.x, top, gate.width, top_height);
        }

        let bottom_height = bottom - gate.gap_bottom;
        if bottom_height > 0.0 {
            renderer.draw_rect(gate.x, gate.gap_bottom, gate.width, bottom_height);
        }
    }
}
