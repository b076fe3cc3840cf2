//! Orbit Dodge entry point
//!
//! Wires the deterministic core to its boundaries. On wasm32 the display
//! boundary is a `requestAnimationFrame` loop feeding timestamps into `tick`,
//! with keyboard events sampled into an `InputIntent`, a 2D-canvas render
//! sink, and DOM text sinks for score and phase. The native build runs a
//! headless scripted session and prints a JSON summary.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use orbit_dodge::consts::*;
    use orbit_dodge::sim::{
        GameEvent, GamePhase, GameSession, InputIntent, Track, TrackShape, tick,
    };

    /// Game instance holding session state and boundary wiring
    struct Game {
        session: GameSession,
        accel_held: bool,
        brake_held: bool,
        canvas: HtmlCanvasElement,
        context: CanvasRenderingContext2d,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement, context: CanvasRenderingContext2d) -> Self {
            let track = Track::figure_eight(TRACK_RADIUS, TRACK_WIDTH, LOBE_OFFSET)
                .expect("reference track geometry is valid");
            Self {
                session: GameSession::new(track, seed),
                accel_held: false,
                brake_held: false,
                canvas,
                context,
            }
        }

        /// Sampled intent; acceleration wins when both keys are held
        fn intent(&self) -> InputIntent {
            if self.accel_held {
                InputIntent::Accelerate
            } else if self.brake_held {
                InputIntent::Decelerate
            } else {
                InputIntent::Coast
            }
        }

        fn update(&mut self, timestamp: f64) {
            tick(&mut self.session, self.intent(), timestamp);
            for event in self.session.take_events() {
                match event {
                    GameEvent::LapCompleted { lap } => log::info!("lap {lap} complete"),
                    GameEvent::BodySpawned { id } => log::info!("body {id} spawned"),
                    GameEvent::Collision { score, laps } => {
                        log::info!("game over: score {score}, laps {laps}")
                    }
                }
            }
        }

        /// Draw the track and every body from the post-tick snapshot
        fn render(&self) {
            let ctx = &self.context;
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;

            ctx.set_fill_style_str("#05060a");
            ctx.fill_rect(0.0, 0.0, w, h);

            let span_x = 2.0 * (LOBE_OFFSET + TRACK_RADIUS + TRACK_WIDTH) as f64 + 100.0;
            let span_y = 2.0 * (TRACK_RADIUS + TRACK_WIDTH) as f64 + 100.0;
            let scale = (w / span_x).min(h / span_y);

            ctx.save();
            let _ = ctx.translate(w / 2.0, h / 2.0);
            let _ = ctx.scale(scale, scale);

            // Track band
            ctx.set_stroke_style_str("#1b1e2b");
            ctx.set_line_width(2.0 * TRACK_WIDTH as f64);
            let centers: Vec<f64> = match self.session.track.shape {
                TrackShape::Circle => vec![0.0],
                TrackShape::FigureEight { lobe_offset } => {
                    vec![lobe_offset as f64, -(lobe_offset as f64)]
                }
            };
            for &cx in &centers {
                ctx.begin_path();
                let _ = ctx.arc(cx, 0.0, self.session.track.radius as f64, 0.0, TAU);
                ctx.stroke();
            }

            // Other bodies
            for body in self.session.bodies.others() {
                ctx.set_fill_style_str(body.color.as_css());
                ctx.begin_path();
                let _ = ctx.arc(
                    body.pos.x as f64,
                    body.pos.y as f64,
                    body.radius as f64,
                    0.0,
                    TAU,
                );
                ctx.fill();
            }

            // Player
            let player = &self.session.bodies.player;
            ctx.set_fill_style_str("#44aa88");
            ctx.begin_path();
            let _ = ctx.arc(
                player.pos.x as f64,
                player.pos.y as f64,
                PLAYER_RADIUS as f64,
                0.0,
                TAU,
            );
            ctx.fill();

            ctx.restore();
        }

        /// Push score, laps, and phase to the DOM text sinks
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.session.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("laps") {
                el.set_text_content(Some(&self.session.laps_completed.to_string()));
            }
            if let Some(el) = document.get_element_by_id("state") {
                let label = match self.session.phase {
                    GamePhase::Idle => "ready",
                    GamePhase::Running => "running",
                    GamePhase::GameOver => "game over - press R",
                };
                el.set_text_content(Some(label));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("Orbit Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("failed to get 2d context")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas, context)));
        log::info!("session created with seed {seed}");

        setup_input_handlers(game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keydown: movement intent and reset command
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" => g.accel_held = true,
                    "ArrowDown" | "s" => g.brake_held = true,
                    "r" | "R" => g.session.reset(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup: release intent
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" => g.accel_held = false,
                    "ArrowDown" | "s" => g.brake_held = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use orbit_dodge::consts::*;
    use orbit_dodge::sim::{GameEvent, GamePhase, GameSession, InputIntent, Track, tick};

    env_logger::init();

    let track = Track::figure_eight(TRACK_RADIUS, TRACK_WIDTH, LOBE_OFFSET)
        .expect("reference track geometry is valid");
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = GameSession::new(track, seed);

    log::info!("headless run, seed {seed}");

    // Two simulated minutes of 16 ms frames, leaning on the accelerator in
    // alternating one-second bursts
    let mut timestamp = 0.0;
    for frame in 0..7500u32 {
        let intent = if (frame / 62) % 2 == 0 {
            InputIntent::Accelerate
        } else {
            InputIntent::Coast
        };
        tick(&mut session, intent, timestamp);

        for event in session.take_events() {
            match event {
                GameEvent::LapCompleted { lap } => log::info!("lap {lap} complete"),
                GameEvent::BodySpawned { id } => log::info!("body {id} spawned"),
                GameEvent::Collision { score, laps } => {
                    log::info!("game over: score {score}, laps {laps}")
                }
            }
        }
        if session.phase == GamePhase::GameOver {
            break;
        }
        timestamp += 16.0;
    }

    let summary = serde_json::json!({
        "seed": session.seed,
        "score": session.score,
        "laps_completed": session.laps_completed,
        "bodies": session.bodies.body_count(),
        "phase": format!("{:?}", session.phase),
    });
    println!("{summary}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
