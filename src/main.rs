//! Retro Arcade entry point
//!
//! The browser build hosts one game on a canvas. The native build runs a game
//! headless under a simple autopilot and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use retro_arcade::consts::TICK_MS;
    use retro_arcade::games::{self, CatalogEntry};
    use retro_arcade::renderer::{RenderState, snapshot_vertices};
    use retro_arcade::sim::{GameState, Scheduler, SessionState};
    use retro_arcade::{Action, BestScore, InputState};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scheduler: Scheduler,
        input: InputState,
        render_state: Option<RenderState>,
        best: BestScore,
        best_key: String,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_state: SessionState,
    }

    impl Game {
        fn new(entry: &CatalogEntry, seed: u64) -> Result<Self, retro_arcade::ConfigError> {
            let mut state = GameState::new((entry.config)(), seed)?;
            let best_key = state.config.best_score_key();
            let best = BestScore::load(&best_key);
            state.session.best_score = best.value;
            Ok(Self {
                last_state: state.session.state,
                state,
                scheduler: Scheduler::new(),
                input: InputState::new(),
                render_state: None,
                best,
                best_key,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            })
        }

        /// Advance the simulation by one display frame
        fn update(&mut self, dt_ms: f64, time: f64) {
            let report = self.scheduler.frame(&mut self.state, &mut self.input, dt_ms);
            for event in &report.events {
                log::debug!("{:?}", event);
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }

            // Persist a new best whenever the run stops moving
            let current = self.state.session.state;
            if current != self.last_state {
                if current != SessionState::Running {
                    self.persist_best();
                }
                self.last_state = current;
            }
        }

        /// Write the best score if the session beat the stored one
        fn persist_best(&mut self) {
            if self.best.record(self.state.session.best_score) {
                self.best.save(&self.best_key);
            }
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = snapshot_vertices(&self.state.snapshot());
                match render_state.render(&vertices) {
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
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let session = &self.state.session;

            let set_value = |selector: &str, text: String| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(&text));
                }
            };
            set_value("#hud-score .hud-value", session.score.to_string());
            set_value("#hud-lives .hud-value", session.lives.to_string());
            set_value("#hud-level .hud-value", session.level.to_string());
            set_value("#hud-best .hud-value", session.best_score.to_string());
            set_value("#hud-fps .hud-value", self.fps.to_string());

            let status = match session.state {
                SessionState::NotStarted => "Press Space to start",
                SessionState::Running => "",
                SessionState::Paused => "Paused",
                SessionState::LevelComplete => "Level complete - press Space",
                SessionState::GameOver => "Game over - press Space",
            };
            set_value("#hud-status", status.to_string());
        }

        /// Replace the running game with another catalog entry
        fn switch_to(&mut self, entry: &CatalogEntry) {
            let seed = js_sys::Date::now() as u64;
            match Game::new(entry, seed) {
                Ok(mut next) => {
                    if let Some(mut render_state) = self.render_state.take() {
                        render_state.set_world_bounds(next.state.world.bounds);
                        next.render_state = Some(render_state);
                    }
                    *self = next;
                    set_document_title(entry.title);
                    log::info!("Switched to '{}' (seed {})", entry.title, seed);
                }
                Err(e) => log::error!("Cannot start '{}': {}", entry.name, e),
            }
        }

        /// Auto-pause; the scheduler keeps ticking so the resume edge is seen
        fn auto_pause(&mut self, reason: &str) {
            self.input.clear();
            if self.state.session.state == SessionState::Running
                && self.state.session.pause().is_ok()
            {
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    fn set_document_title(title: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(title);
        }
    }

    /// `?game=<name>` picks the game; the first catalog entry otherwise
    fn selected_game() -> &'static CatalogEntry {
        let requested = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| {
                search
                    .trim_start_matches('?')
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("game=").map(str::to_owned))
            });
        requested
            .as_deref()
            .and_then(games::find)
            .unwrap_or(&games::catalog()[0])
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Retro Arcade starting...");

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

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let entry = selected_game();
        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(entry, seed) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Cannot start '{}': {}", entry.name, e);
                return;
            }
        };
        set_document_title(entry.title);
        log::info!("Loaded '{}' with seed: {}", entry.title, seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
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

        let bounds = game.borrow().state.world.bounds;
        match RenderState::new(surface, &adapter, width, height, bounds).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Retro Arcade running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if let Some(action) = Action::from_key(&key) {
                    event.prevent_default();
                    g.input.press(action);
                } else {
                    match key.as_str() {
                        "r" | "R" => {
                            g.state.reset();
                            g.input.clear();
                            log::info!("Game reset");
                        }
                        "]" | "[" => {
                            let offset = if key == "]" { 1 } else { -1 };
                            let next = games::neighbor(&g.state.config.name, offset);
                            g.switch_to(next);
                        }
                        _ => {}
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(action) = Action::from_key(&event.key()) {
                    game.borrow_mut().input.release(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                TICK_MS
            };
            g.last_time = time;

            g.update(dt_ms, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.auto_pause("tab hidden");
                    g.scheduler.stop();
                    g.persist_best();
                } else {
                    g.scheduler.resume();
                    g.last_time = 0.0;
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use retro_arcade::config::GameConfig;
    use retro_arcade::consts::TICK_MS;
    use retro_arcade::games;
    use retro_arcade::sim::entity::EntityClass;
    use retro_arcade::sim::{CollisionEvent, GameState, Scheduler, SessionState};
    use retro_arcade::{Action, BestScore, InputState};

    use anyhow::{Context, Result};
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(name = "retro-arcade")]
    #[command(about = "Run a retro arcade game headless with an autopilot")]
    pub struct Args {
        /// Catalog name or path to a JSON game config
        #[arg(default_value = "platformer")]
        pub game: String,
        /// Simulation ticks to run (60 per second)
        #[arg(long, default_value_t = 3600)]
        pub ticks: u32,
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
    }

    /// `game` is a catalog name or a path to a JSON config
    pub fn load_config(game: &str) -> Result<GameConfig> {
        if game.ends_with(".json") {
            let json = std::fs::read_to_string(game)
                .with_context(|| format!("Failed to read config {}", game))?;
            return GameConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", game));
        }
        match games::find(game) {
            Some(entry) => Ok((entry.config)()),
            None => {
                let names: Vec<_> = games::catalog().iter().map(|e| e.name).collect();
                anyhow::bail!("unknown game '{}' (try one of: {})", game, names.join(", "))
            }
        }
    }

    /// Actions a crude bot would hold this tick
    fn autopilot(state: &GameState) -> Vec<Action> {
        let Some(player) = state.world.entities.player() else {
            return Vec::new();
        };
        let me = player.bounds();
        let obstacles: Vec<_> = state
            .world
            .entities
            .live()
            .filter(|e| e.class() == EntityClass::Obstacle)
            .map(|e| e.bounds())
            .collect();
        let config = &state.config;

        if config.player.weapon.is_some() {
            // Shooter: chase the lowest enemy and keep firing
            let mut actions = vec![Action::Primary];
            if let Some(target) = obstacles
                .iter()
                .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
            {
                let dx = target.center().x - me.center().x;
                if dx < -4.0 {
                    actions.push(Action::MoveLeft);
                } else if dx > 4.0 {
                    actions.push(Action::MoveRight);
                }
            }
            return actions;
        }

        if let Some(lanes) = &state.world.lanes {
            // Racer: accelerate, change lane when something is just ahead
            let mut actions = vec![Action::Up];
            let blocked = obstacles.iter().any(|o| {
                o.overlaps_horizontally(&me) && o.bottom() < me.top() && me.top() - o.bottom() < 150.0
            });
            if blocked {
                let lane = lanes.lane_at(me.center().x);
                actions.push(if lane == 0 {
                    Action::MoveRight
                } else {
                    Action::MoveLeft
                });
            }
            return actions;
        }

        if config.player.floor_is_lethal {
            // Flyer: aim for the middle of the next gap
            let ahead: Vec<_> = obstacles.iter().filter(|o| o.right() >= me.left()).collect();
            let nearest = ahead.iter().map(|o| o.left()).fold(f32::MAX, f32::min);
            let column: Vec<_> = ahead.iter().filter(|o| o.left() == nearest).collect();
            let target = match (
                column.iter().min_by(|a, b| a.top().total_cmp(&b.top())),
                column.iter().max_by(|a, b| a.top().total_cmp(&b.top())),
            ) {
                (Some(upper), Some(lower)) if column.len() >= 2 => {
                    (upper.bottom() + lower.top()) / 2.0
                }
                _ => state.world.bounds.center().y,
            };
            return if me.center().y > target + 10.0 && player.vel.y >= 0.0 {
                vec![Action::Up]
            } else {
                Vec::new()
            };
        }

        // Platformer: walk right, hop over anything close on the same level
        let mut actions = vec![Action::MoveRight, Action::Up];
        let threat = obstacles.iter().any(|o| {
            (o.center().y - me.center().y).abs() < me.height && (o.left() - me.right()).abs() < 40.0
        });
        if !threat {
            actions.pop();
        }
        actions
    }

    /// Run one game for up to `ticks` ticks and return the final score
    pub fn run(config: GameConfig, seed: u64, ticks: u32) -> Result<u64> {
        let mut state = GameState::new(config, seed).context("Config rejected")?;
        let key = state.config.best_score_key();
        let mut best = BestScore::load(&key);
        state.session.best_score = best.value;

        let mut scheduler = Scheduler::new();
        let mut input = InputState::new();
        log::info!(
            "Running '{}' headless for {} ticks (seed {})",
            state.config.title,
            ticks,
            seed
        );

        let mut ran = 0;
        while ran < ticks {
            let held = match state.session.state {
                SessionState::NotStarted | SessionState::LevelComplete => vec![Action::Primary],
                SessionState::Running => autopilot(&state),
                SessionState::Paused | SessionState::GameOver => break,
            };
            for action in Action::ALL {
                if held.contains(&action) {
                    input.press(action);
                } else {
                    input.release(action);
                }
            }

            let report = scheduler.frame(&mut state, &mut input, TICK_MS);
            ran += report.ticks;
            for event in &report.events {
                match event {
                    CollisionEvent::Damaged { .. }
                    | CollisionEvent::FellOut { .. }
                    | CollisionEvent::Escaped { .. }
                    | CollisionEvent::GoalReached { .. } => log::info!("{:?}", event),
                    _ => log::debug!("{:?}", event),
                }
            }
        }

        let session = &state.session;
        log::info!(
            "Finished after {} ticks: {:?}, score {}, level {}, lives {}",
            ran,
            session.state,
            session.score,
            session.level,
            session.lives
        );
        if best.record(session.best_score) {
            log::info!("New best score: {}", best.value);
            best.save(&key);
        }
        Ok(session.score)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    let args = headless::Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Retro Arcade (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to play in a browser");

    let config = headless::load_config(&args.game)?;
    let score = headless::run(config, args.seed, args.ticks)?;
    println!("{}: final score {}", args.game, score);
    Ok(())
}
