//! Blob Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use blob_arena::platform::{FpsCounter, pointer_to_device};
    use blob_arena::renderer::{BlobRenderer, pipeline::BLOB_SHADER};
    use blob_arena::sim::Simulation;
    use blob_arena::{RenderError, Settings};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        renderer: BlobRenderer,
        settings: Settings,
        fps: FpsCounter,
    }

    impl Game {
        /// One display frame: fixed updates, then one draw pass
        fn frame(&mut self, time: f64) {
            self.renderer.begin_frame();
            self.sim.frame(time, &mut self.renderer);

            match self.renderer.finish_frame() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("Surface lost, reconfiguring");
                    self.renderer.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }

            let fps = self.fps.tick(time);
            if self.settings.show_fps {
                update_fps_hud(fps);
            }
        }
    }

    fn update_fps_hud(fps: u32) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
            el.set_text_content(Some(&fps.to_string()));
        }
    }

    /// Size the canvas backing store to its CSS box in device pixels
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32, f64) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height, dpr)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Blob Arena starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {}", e);
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("loading"))
            {
                el.set_text_content(Some(&e.to_string()));
            }
        }
    }

    async fn start() -> Result<(), RenderError> {
        let window = web_sys::window().ok_or_else(|| RenderError::Surface("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::Surface("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| RenderError::Surface("no <canvas id=\"canvas\">".into()))?;

        let (width, height, _) = fit_canvas(&window, &canvas);

        // Initialize WebGPU (falls back to WebGL2)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = BlobRenderer::new(surface, &adapter, width, height, BLOB_SHADER).await?;

        let settings = Settings::load();
        let sim = Simulation::from_settings(&settings);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game {
            sim,
            renderer,
            settings,
            fps: FpsCounter::default(),
        }));

        setup_input_handlers(game.clone(), &canvas);
        setup_resize_handler(game.clone(), canvas);

        // The clock starts on the first rAF timestamp, so every delta shares
        // the performance.now() time base
        request_animation_frame(game);
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        let window = web_sys::window().unwrap();

        // Mouse move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
                let pos = pointer_to_device(event.offset_x() as f64, event.offset_y() as f64, dpr);
                game.borrow_mut().sim.set_pointer(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    let y = touch.client_y() as f64 - rect.top();
                    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
                    game.borrow_mut().sim.set_pointer(pointer_to_device(x, y, dpr));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space splits
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" && !event.repeat() {
                    event.prevent_default();
                    game.borrow_mut().sim.request_split();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height, _) = fit_canvas(&window, &canvas);
            game.borrow_mut().renderer.resize(width, height);
            log::info!("Resized to {}x{}", width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game.borrow_mut().frame(time);
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
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
    log::info!("Blob Arena (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    headless::run(600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// GPU-free run of the frame loop with a wandering pointer
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use blob_arena::renderer::{FanMesh, MeshSink};
    use blob_arena::sim::{Simulation, Vector2};
    use blob_arena::Settings;

    /// Counts what would have been drawn
    #[derive(Default)]
    struct NullSink {
        meshes: usize,
        vertices: usize,
    }

    impl MeshSink for NullSink {
        fn draw_mesh(&mut self, mesh: &FanMesh, _fill: [f32; 4]) {
            self.meshes += 1;
            self.vertices += mesh.vertices.len();
        }
    }

    pub fn run(frames: u32) {
        let settings = Settings::load();
        let mut sim = Simulation::from_settings(&settings);
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let mut sink = NullSink::default();

        let mut now = 0.0;
        sim.start(now);

        for frame in 0..frames {
            // Jittery 60 Hz display with the occasional stall
            now += if frame % 150 == 149 { 250.0 } else { rng.random_range(12.0..22.0) };

            if frame % 60 == 0 {
                let target = Vector2::new(rng.random_range(0.0..1280.0), rng.random_range(0.0..720.0));
                sim.set_pointer(target);
            }
            if frame % 200 == 199 {
                sim.request_split();
            }

            sim.frame(now, &mut sink);

            if frame % 120 == 0 {
                for player in sim.players() {
                    let pos = player.position();
                    log::info!(
                        "frame {:4} tick {:5}: {} at ({:.1}, {:.1}) size {:.1}, {} blob(s)",
                        frame,
                        sim.time_ticks(),
                        player.name,
                        pos.x,
                        pos.y,
                        player.size(),
                        player.blobs().len()
                    );
                }
            }
        }

        log::info!(
            "Done: {} ticks, {} meshes ({} vertices) drawn",
            sim.time_ticks(),
            sink.meshes,
            sink.vertices
        );
    }
}
