//! Paddle Pong entry point
//!
//! Browser builds wire the canvas, keyboard and pointer to a [`FrameDriver`]
//! and run it from `requestAnimationFrame`. Native builds run a headless
//! computer-vs-computer match on a fixed clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use paddle_pong::render::{self, Surface};
    use paddle_pong::sim::{GameEvent, Side};
    use paddle_pong::{FrameDriver, Settings};

    /// Canvas 2D implementation of the drawing primitives
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
    }

    impl Surface for CanvasSurface {
        fn clear(&mut self, width: f32, height: f32) {
            self.ctx.set_fill_style_str("#000");
            self.ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
            self.ctx.set_fill_style_str("#fff");
        }

        fn fill_rect(&mut self, pos: Vec2, size: Vec2) {
            self.ctx
                .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32) {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
            self.ctx.fill();
        }

        fn dashed_line(&mut self, from: Vec2, to: Vec2, dash: f32) {
            let pattern = js_sys::Array::of2(&(dash as f64).into(), &(dash as f64).into());
            let _ = self.ctx.set_line_dash(&pattern);
            self.ctx.set_stroke_style_str("#fff");
            self.ctx.set_line_width(2.0);
            self.ctx.begin_path();
            self.ctx.move_to(from.x as f64, from.y as f64);
            self.ctx.line_to(to.x as f64, to.y as f64);
            self.ctx.stroke();
            let _ = self.ctx.set_line_dash(&js_sys::Array::new());
        }
    }

    /// Game instance holding all state
    struct Game {
        driver: FrameDriver,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        /// Whether a frame callback is currently scheduled
        scheduled: bool,
    }

    impl Game {
        /// Push score changes to the page and announce the winner
        fn dispatch_events(&mut self) {
            let document = web_sys::window().and_then(|w| w.document());
            for event in self.driver.drain_events() {
                match event {
                    GameEvent::ScoreChanged { side, score } => {
                        let id = match side {
                            Side::Left => "left-score",
                            Side::Right => "right-score",
                        };
                        if let Some(el) = document.as_ref().and_then(|d| d.get_element_by_id(id)) {
                            el.set_text_content(Some(&score.to_string()));
                        }
                    }
                    GameEvent::MatchEnded { winner } => {
                        let message = match winner {
                            Side::Left => "You win!",
                            Side::Right => "Computer wins!",
                        };
                        log::info!("{}", message);
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(message);
                        }
                    }
                    _ => {}
                }
            }
        }

        /// Convert a mouse event to surface y (canvas may be CSS-scaled)
        fn pointer_to_surface_y(&self, event: &MouseEvent) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            let scale = if rect.height() > 0.0 {
                self.driver.state.settings.surface_height as f64 / rect.height()
            } else {
                1.0
            };
            ((event.client_y() as f64 - rect.top()) * scale) as f32
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }
        log::info!("Paddle Pong starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> found");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::load();
        canvas.set_width(settings.surface_width as u32);
        canvas.set_height(settings.surface_height as u32);

        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            driver: FrameDriver::new(seed, settings),
            surface: CanvasSurface { ctx },
            canvas: canvas.clone(),
            scheduled: false,
        }));
        game.borrow_mut().dispatch_events();

        setup_input_handlers(&canvas, game.clone());
        setup_reset_button(game.clone());

        request_animation_frame(game);
        log::info!("Paddle Pong running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let bound = game
                    .borrow_mut()
                    .driver
                    .key_down(&event.key(), event.repeat());
                if bound {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().driver.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - absolute paddle position
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let y = g.pointer_to_surface_y(&event);
                g.driver.pointer_move(y);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_reset_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let restart = {
                    let mut g = game.borrow_mut();
                    g.driver.reset();
                    g.dispatch_events();
                    !g.scheduled
                };
                // The loop stops at match end; start it again
                if restart {
                    request_animation_frame(game.clone());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        game.borrow_mut().scheduled = true;
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.scheduled = false;

            let keep_running = g.driver.frame(time / 1000.0);
            let snapshot = g.driver.snapshot();
            render::draw(&mut g.surface, &snapshot);
            g.dispatch_events();
            keep_running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames simulated before the headless runner gives up (one hour at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAME_CAP: u64 = 60 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use paddle_pong::consts::NOMINAL_FRAME_DT;
    use paddle_pong::sim::GameEvent;
    use paddle_pong::{FrameDriver, Settings};

    env_logger::init();
    log::info!("Paddle Pong (headless) starting...");

    // Usage: paddle-pong [seed] [settings.json]
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    let settings = args
        .next()
        .map(Settings::load_from)
        .unwrap_or_default();

    log::info!("Game initialized with seed: {}", seed);
    let mut driver = FrameDriver::new(seed, settings);
    driver.set_autopilot(true);

    let mut now = 0.0f64;
    let mut frames = 0u64;
    while frames < HEADLESS_FRAME_CAP {
        let keep_running = driver.frame(now);
        for event in driver.drain_events() {
            match event {
                GameEvent::ScoreChanged { side, score } => {
                    println!("{:>5} {}", side.as_str(), score)
                }
                GameEvent::MatchEnded { winner } => {
                    println!("{} wins after {:.1}s", winner.as_str(), now)
                }
                _ => {}
            }
        }
        if !keep_running {
            break;
        }
        now += NOMINAL_FRAME_DT as f64;
        frames += 1;
    }

    if driver.is_running() {
        log::warn!("Frame cap reached before the match ended");
    }

    match serde_json::to_string_pretty(&driver.snapshot()) {
        Ok(json) => log::info!("Final state (seed {}):\n{}", driver.state.seed, json),
        Err(err) => log::error!("Could not serialize final state: {}", err),
    }
}
