//! Flapgate entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlMetaElement};

    use flapgate::persistence::LocalStorageStore;
    use flapgate::platform::{PerformanceClock, Ticker};
    use flapgate::renderer::{CanvasRenderer, GpuRenderer, Renderer};
    use flapgate::sim::{GameEvent, GamePhase, Hud};
    use flapgate::game::{KeyAction, key_action};
    use flapgate::{Game, GameConfig, InputProfile, RenderError};

    /// Everything the page callbacks share
    struct App {
        game: Game<LocalStorageStore>,
        renderer: Box<dyn Renderer>,
        ticker: Ticker<PerformanceClock>,
        last_hud: Option<Hud>,
    }

    impl App {
        fn resize(&mut self) {
            let (w, h) = viewport();
            self.game.resize(w, h, self.renderer.as_mut());
        }

        fn frame(&mut self) {
            let elapsed = self.ticker.lap();
            match self.game.frame(elapsed, self.renderer.as_mut()) {
                Ok(hud) => self.update_hud(hud),
                Err(RenderError::SurfaceLost) => {
                    log::warn!("Surface lost, reconfiguring");
                    self.resize();
                }
                Err(e) => log::error!("Render error: {}", e),
            }

            for event in self.game.drain_events() {
                match event {
                    GameEvent::PhaseChanged { from, to } => {
                        log::debug!("{:?} -> {:?}", from, to);
                        if to == GamePhase::Idle {
                            self.apply_theme();
                        }
                    }
                    GameEvent::NewHighScore(score) => log::info!("High score {}", score),
                    _ => {}
                }
            }
        }

        /// Page chrome follows the background re-rolled on restart
        fn apply_theme(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let background = self.game.session().theme.background.to_css();

            if let Some(meta) = document
                .query_selector("meta.theme")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlMetaElement>().ok())
            {
                meta.set_content(&background);
            }
            if let Some(canvas) = document
                .get_element_by_id("canvas")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = canvas.style().set_property("background", &background);
            }
        }

        /// Touch the DOM only when something visible changed
        fn update_hud(&mut self, hud: Hud) {
            if self.last_hud == Some(hud) {
                return;
            }
            self.last_hud = Some(hud);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let stopped = hud.phase == GamePhase::Stopped;

            set_text(&document, "score", &hud.score.to_string());
            set_text(&document, "results-score", &hud.score.to_string());
            set_text(&document, "results-highscore", &hud.high_score.to_string());
            set_visible(&document, "score", !stopped);
            set_visible(&document, "results", stopped);
            set_visible(&document, "restart-button", stopped);
            set_visible(&document, "tip", hud.phase == GamePhase::Idle);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Viewport size in CSS pixels
    fn viewport() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (0.0, 0.0);
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (width as f32, height as f32)
    }

    fn is_touch_device(window: &web_sys::Window) -> bool {
        js_sys::Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
    }

    /// Use WebGPU when an adapter is available, otherwise Canvas 2D.
    ///
    /// The adapter is probed before the canvas is bound to any context, so
    /// the 2D fallback can still claim it.
    async fn create_renderer(canvas: &HtmlCanvasElement) -> Box<dyn Renderer> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await;

        match adapter {
            Ok(adapter) => {
                log::info!("Using adapter: {:?}", adapter.get_info().name);
                match create_gpu_renderer(&instance, &adapter, canvas).await {
                    Ok(renderer) => return Box::new(renderer),
                    Err(e) => log::warn!("GPU renderer failed: {}", e),
                }
            }
            Err(e) => log::info!("No WebGPU adapter ({}), using Canvas 2D", e),
        }

        Box::new(CanvasRenderer::new(canvas.clone()).expect("no canvas 2d context"))
    }

    async fn create_gpu_renderer(
        instance: &wgpu::Instance,
        adapter: &wgpu::Adapter,
        canvas: &HtmlCanvasElement,
    ) -> Result<GpuRenderer, RenderError> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;
        GpuRenderer::new(surface, adapter, canvas.width(), canvas.height()).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flapgate starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let profile = if is_touch_device(&window) {
            InputProfile::Touch
        } else {
            InputProfile::Pointer
        };
        let config = GameConfig::load(GameConfig::for_scale(
            flapgate::consts::DEFAULT_SCALE,
            profile,
        ));
        config.save();

        let seed = js_sys::Date::now() as u64;
        let mut game = match Game::new(config, seed, LocalStorageStore::new()) {
            Ok(game) => game,
            Err(e) => {
                log::warn!("Invalid config ({}), using defaults", e);
                let fallback = GameConfig::for_scale(flapgate::consts::DEFAULT_SCALE, profile);
                Game::new(fallback, seed, LocalStorageStore::new()).expect("default config")
            }
        };

        // Size the canvas before a context is created on it
        let (w, h) = viewport();
        let view_scale = game.session().config.scale;
        canvas.set_width((w * view_scale).round() as u32);
        canvas.set_height((h * view_scale).round() as u32);

        let mut renderer = create_renderer(&canvas).await;
        game.resize(w, h, renderer.as_mut());
        game.request_restart();

        let clock = PerformanceClock::new().expect("no performance clock");
        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            ticker: Ticker::new(clock),
            last_hud: None,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_restart_button(app.clone());
        setup_resize(app.clone());

        request_animation_frame(app);

        log::info!("Flapgate running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.request_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.request_jump();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Holding a key must not repeat-fire
                if event.repeat() {
                    return;
                }
                let mut app = app.borrow_mut();
                let Some(action) = key_action(&event.key(), app.game.hud().phase) else {
                    return;
                };
                match action {
                    KeyAction::Jump => {
                        event.prevent_default();
                        app.game.request_jump();
                    }
                    KeyAction::Restart => app.game.request_restart(),
                    KeyAction::ToggleAutopilot => {
                        let enabled = !app.game.autopilot();
                        app.game.set_autopilot(enabled);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.stop_propagation();
                app.borrow_mut().game.request_restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flapgate (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - serve the wasm build to play");

    if let Err(e) = headless::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot demo on a CPU shape batch, driven by a manual clock
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use flapgate::persistence::MemoryStore;
    use flapgate::platform::{Clock, ManualClock, SystemClock, Ticker};
    use flapgate::renderer::ShapeBatch;
    use flapgate::sim::{GameEvent, GamePhase};
    use flapgate::{Game, GameConfig};

    /// Simulated demo length in seconds
    const DEMO_SECONDS: f64 = 60.0;
    /// Display refresh the demo pretends to run at
    const DISPLAY_HZ: f64 = 60.0;

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let wall = SystemClock::new();
        let seed = std::env::args()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0x5eed);

        let mut game = Game::new(GameConfig::default(), seed, MemoryStore::new())?;
        let mut batch = ShapeBatch::new(1, 1);
        game.resize(1280.0, 720.0, &mut batch);
        game.set_autopilot(true);

        let clock = ManualClock::new();
        let mut ticker = Ticker::new(clock.clone());
        let frames = (DEMO_SECONDS * DISPLAY_HZ) as u32;
        let mut runs = 0;
        let mut last_gate = None;

        for _ in 0..frames {
            clock.advance(1.0 / DISPLAY_HZ);
            game.frame(ticker.lap(), &mut batch)?;

            for event in game.drain_events() {
                match event {
                    GameEvent::Collided { gate_id } => last_gate = Some(gate_id),
                    GameEvent::PhaseChanged {
                        to: GamePhase::Stopped,
                        ..
                    } => {
                        runs += 1;
                        log::info!(
                            "Run {} ended on gate {:?} with score {}",
                            runs,
                            last_gate,
                            game.hud().score
                        );
                    }
                    GameEvent::NewHighScore(score) => log::debug!("New high score {}", score),
                    _ => {}
                }
            }
        }

        let hud = game.hud();
        log::info!(
            "Simulated {:.0}s ({} frames, {} vertices last frame) in {:.1}ms",
            DEMO_SECONDS,
            batch.frames(),
            batch.last_frame_vertices(),
            wall.now() * 1000.0
        );
        println!(
            "score {} | high score {} | phase {:?} | runs ended {}",
            hud.score, hud.high_score, hud.phase, runs
        );
        Ok(())
    }
}
