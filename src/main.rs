//! Tumbler entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use tumbler::consts::*;
    use tumbler::renderer::RenderState;
    use tumbler::sim::{Direction, GamePhase, GameState, TickInput, tick};
    use tumbler::{BestResults, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        settings: Settings,
        best: BestResults,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // Clock: whole-second boundary for the timer display
        next_second: f64,
        // Per-level baselines for best-result recording
        level_start_moves: u32,
        level_start_secs: u32,
        last_level: u32,
        last_phase: GamePhase,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let state = GameState::new(settings.effective_rules())
                .expect("shipped levels validate at load");
            let last_level = state.level.number;
            Self {
                state,
                render_state: None,
                settings,
                best: BestResults::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                next_second: 0.0,
                level_start_moves: 0,
                level_start_secs: 0,
                last_level,
                last_phase: GamePhase::Playing,

                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.roll = None;
                self.input.restart = false;

                self.track_level_transitions();
            }

            // Low-frequency clock for the timer display
            if self.next_second == 0.0 {
                self.next_second = time + 1000.0;
            }
            while time >= self.next_second {
                self.state.on_second();
                self.next_second += 1000.0;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Record per-level bests as levels are cleared
        fn track_level_transitions(&mut self) {
            let level = self.state.level.number;
            let phase = self.state.phase;

            // Run restart: counters went backwards, re-baseline, nothing to
            // record
            if self.state.moves < self.level_start_moves {
                self.level_start_moves = self.state.moves;
                self.level_start_secs = self.state.elapsed_secs;
                self.last_level = level;
                self.last_phase = phase;
                return;
            }

            let advanced = level == self.last_level + 1;
            let cleared_last =
                phase == GamePhase::Complete && self.last_phase != GamePhase::Complete;
            if advanced || cleared_last {
                let moves = self.state.moves - self.level_start_moves;
                let secs = self.state.elapsed_secs - self.level_start_secs;
                if self.best.record(self.last_level, moves, secs, js_sys::Date::now()) {
                    log::info!(
                        "new best for level {}: {} moves, {}s",
                        self.last_level,
                        moves,
                        secs
                    );
                    self.best.save();
                }
                self.level_start_moves = self.state.moves;
                self.level_start_secs = self.state.elapsed_secs;
            }
            self.last_level = level;
            self.last_phase = phase;
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.level.number.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-moves .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.moves.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                let secs = self.state.elapsed_secs;
                el.set_text_content(Some(&format!("{}:{:02}", secs / 60, secs % 60)));
            }

            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Show/hide run-complete screen
            if let Some(el) = document.get_element_by_id("run-complete") {
                if self.state.phase == GamePhase::Complete {
                    let _ = el.set_attribute("class", "");
                    if let Some(moves_el) = document.get_element_by_id("final-moves") {
                        moves_el.set_text_content(Some(&self.state.moves.to_string()));
                    }
                    if let Some(time_el) = document.get_element_by_id("final-time") {
                        time_el.set_text_content(Some(&self.state.elapsed_secs.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tumbler starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Tumbler running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        // Keyboard: arrows roll on press edges, R restarts the run
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.repeat() {
                return;
            }
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" => g.input.roll = Some(Direction::Left),
                "ArrowRight" => g.input.roll = Some(Direction::Right),
                "ArrowUp" => g.input.roll = Some(Direction::Up),
                "ArrowDown" => g.input.roll = Some(Direction::Down),
                "r" | "R" => g.input.restart = true,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
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
    log::info!("Tumbler (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Run a scripted smoke sequence through the simulation
    println!("\nRunning roll smoke sequence...");
    smoke_roll_sequence();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_roll_sequence() {
    use tumbler::Rules;
    use tumbler::sim::{Direction, GameState, Orientation, TickInput, tick};

    let mut state = GameState::new(Rules::default()).expect("level 1 loads");

    let input = TickInput {
        roll: Some(Direction::Right),
        ..Default::default()
    };
    tick(&mut state, &input);

    let idle = TickInput::default();
    while state.block.is_rolling() {
        tick(&mut state, &idle);
    }

    assert_eq!(state.block.active_orientation(), Orientation::ProneX);
    assert!((state.block.pos.x - 1.0).abs() < 1e-5);
    println!("✓ Roll smoke sequence passed!");
}
