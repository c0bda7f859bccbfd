//! Fishing Scene entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_scene {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use fishing_scene::consts::{MAX_FRAME_MS, NOMINAL_FRAME_MS};
    use fishing_scene::renderer::{RenderState, frame_vertices};
    use fishing_scene::sim::{SceneState, TickInput, resize, set_reel_held, tick};
    use fishing_scene::tuning::WaterTuning;
    use fishing_scene::{ResourceManifest, Settings, Tuning};

    /// Scene instance holding all state
    struct Scene {
        state: SceneState,
        render_state: Option<RenderState>,
        settings: Settings,
        /// Water tuning before motion preferences were applied
        base_water: WaterTuning,
        input: TickInput,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_fps_log: f64,
    }

    impl Scene {
        fn new(state: SceneState, settings: Settings, base_water: WaterTuning) -> Self {
            Self {
                state,
                render_state: None,
                settings,
                base_water,
                input: TickInput::default(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_fps_log: 0.0,
            }
        }

        /// Advance the scene by the wall-clock delta
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).clamp(0.0, MAX_FRAME_MS)
            } else {
                NOMINAL_FRAME_MS
            };
            self.last_time = time;

            let input = self.input.clone();
            tick(&mut self.state, &input, dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59000.0 / elapsed).round() as u32;
                }
            }
            if self.settings.show_fps && time - self.last_fps_log >= 1000.0 {
                self.last_fps_log = time;
                log::info!("FPS: {}", self.fps);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = frame_vertices(&self.state.snapshot(), self.settings.quality);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h, self.state.viewport);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Flip reduced motion, persist it and re-derive the water tuning
        fn toggle_reduced_motion(&mut self) {
            self.settings.reduced_motion = !self.settings.reduced_motion;
            self.settings.save();

            self.state.tuning.water = self.settings.motion_water(&self.base_water);
            log::info!("Reduced motion: {}", self.settings.reduced_motion);
        }

        /// Apply new canvas dimensions to the scene and the surface
        fn apply_canvas_size(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let (css, physical) = canvas_size(canvas, dpr);
            canvas.set_width(physical.0);
            canvas.set_height(physical.1);
            resize(&mut self.state, css);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(physical.0, physical.1, css);
            }
        }
    }

    /// CSS size (scene units) and backing-store size in physical pixels
    fn canvas_size(canvas: &HtmlCanvasElement, dpr: f64) -> (Vec2, (u32, u32)) {
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        (
            Vec2::new(client_w as f32, client_h as f32),
            (
                (client_w as f64 * dpr) as u32,
                (client_h as f64 * dpr) as u32,
            ),
        )
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Fishing Scene starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let (viewport, (width, height)) = canvas_size(&canvas, dpr);
        canvas.set_width(width);
        canvas.set_height(height);

        // Preferences fold into the tuning before anything is placed
        let settings = Settings::load();
        let mut tuning = Tuning::default();
        let base_water = tuning.water.clone();
        settings.apply_to(&mut tuning);

        let manifest = ResourceManifest::bundled();
        for url in manifest.urls() {
            log::debug!("Resource: {}", url);
        }

        let seed = js_sys::Date::now() as u64;
        let state = SceneState::new(seed, viewport, tuning, &manifest);
        log::info!(
            "Scene initialized with seed {} ({} entities, {} issues)",
            seed,
            state.entities.len(),
            state.issues.len()
        );
        let scene = Rc::new(RefCell::new(Scene::new(state, settings, base_water)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, viewport)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        scene.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, scene.clone())?;
        setup_resize_handler(&window, &canvas, scene.clone())?;
        setup_visibility_handler(&document, scene.clone())?;

        request_animation_frame(scene);

        log::info!("Fishing Scene running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, scene: Rc<RefCell<Scene>>) -> Result<(), JsValue> {
        // Reel while any configured key is held
        {
            let scene = scene.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut s = scene.borrow_mut();
                if s.settings.is_reel_key(&event.key()) {
                    event.prevent_default();
                    set_reel_held(&mut s.state, true);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut s = scene.borrow_mut();
                let key = event.key();
                if s.settings.is_reel_key(&key) {
                    set_reel_held(&mut s.state, false);
                } else if key.eq_ignore_ascii_case("m") {
                    s.toggle_reduced_motion();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        scene: Rc<RefCell<Scene>>,
    ) -> Result<(), JsValue> {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            scene.borrow_mut().apply_canvas_size(&canvas, dpr);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_visibility_handler(document: &web_sys::Document, scene: Rc<RefCell<Scene>>) -> Result<(), JsValue> {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut s = scene.borrow_mut();
                // Keys released while hidden never reach us
                set_reel_held(&mut s.state, false);
                // Restart the clock on return instead of replaying the gap
                s.last_time = 0.0;
                log::info!("Scene hidden, reel released");
            }
        });
        document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(scene: Rc<RefCell<Scene>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(scene, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(scene: Rc<RefCell<Scene>>, time: f64) {
        {
            let mut s = scene.borrow_mut();
            s.update(time);
            s.render();
        }

        request_animation_frame(scene);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_scene::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fishing Scene (native) starting...");
    log::info!("Native mode runs the scene headless - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => fishing_scene::Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Cannot read tuning {}: {}", path, e);
                fishing_scene::Tuning::default()
            }
        },
        None => fishing_scene::Tuning::default(),
    };

    let quality = args.next().and_then(|s| fishing_scene::QualityPreset::from_str(&s));

    run_headless(seed, frames, tuning, quality);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Tick the scene at the nominal rate, holding the reel for the middle third
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(
    seed: u64,
    frames: usize,
    mut tuning: fishing_scene::Tuning,
    quality: Option<fishing_scene::QualityPreset>,
) {
    use fishing_scene::consts::NOMINAL_FRAME_MS;
    use fishing_scene::renderer::frame_vertices;
    use fishing_scene::sim::{SceneState, TickInput, tick};
    use fishing_scene::{ResourceManifest, Settings};
    use glam::Vec2;

    let settings = match quality {
        Some(preset) => Settings::from_preset(preset),
        None => Settings::load(),
    };
    settings.apply_to(&mut tuning);
    log::info!("Quality: {}", settings.quality.as_str());

    let mut state = SceneState::new(seed, Vec2::new(1280.0, 720.0), tuning, &ResourceManifest::bundled());
    for issue in &state.issues {
        log::warn!("{}", issue);
    }

    for frame in 0..frames {
        let input = TickInput {
            reel_held: Some(frame >= frames / 3 && frame < 2 * frames / 3),
        };
        tick(&mut state, &input, NOMINAL_FRAME_MS);
    }

    let snapshot = state.snapshot();
    let vertices = frame_vertices(&snapshot, settings.quality);
    log::info!(
        "Ran {} frames ({:.1}s): {} entities, {} clouds, reel {:?}, {} vertices, {} issues",
        snapshot.frame,
        state.elapsed_ms / 1000.0,
        state.entities.len(),
        snapshot.clouds.len(),
        snapshot.reel_factor,
        vertices.len(),
        state.issues.len()
    );
}
