use std::sync::Arc;

use glam::DVec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::audio::{Cue, LogAudio};
use crate::config::Settings;
use crate::overlay::Overlay;
use crate::render::instance::{self, FishInstance};
use crate::render::GpuState;
use crate::sim::population::FishType;
use crate::sim::Simulation;
use crate::util::timer::Phase;

/// Max accumulated time before we clamp (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<Overlay>,

    sim: Simulation,
    tick_secs: f64,

    // Fixed timestep
    last_frame_time: Option<Instant>,
    accumulator: f64,

    screen_w: u32,
    screen_h: u32,

    // Reusable instance buffer (avoid per-frame allocation)
    instance_buf: Vec<FishInstance>,

    /// Set when window or GPU setup fails; returned from `run`.
    fatal: Option<Box<dyn std::error::Error>>,
}

impl App {
    fn new(settings: Settings) -> Self {
        let tick_secs = 1.0 / settings.simulation.tick_rate;
        let (screen_w, screen_h) = (settings.screen.width, settings.screen.height);
        let mut sim = Simulation::new(settings, Box::new(LogAudio), fastrand::Rng::new());
        sim.play(Cue::Music);
        Self {
            window: None,
            gpu: None,
            overlay: None,
            sim,
            tick_secs,
            last_frame_time: None,
            accumulator: 0.0,
            screen_w,
            screen_h,
            instance_buf: Vec::with_capacity(256),
            fatal: None,
        }
    }

    /// Run fixed-timestep simulation ticks.
    fn run_fixed_update(&mut self, dt: f64) {
        self.accumulator = (self.accumulator + dt).min(MAX_ACCUMULATOR);
        while self.accumulator >= self.tick_secs {
            self.sim.tick();
            self.accumulator -= self.tick_secs;
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let attrs = WindowAttributes::default()
            .with_title("Big Fish")
            .with_resizable(false)
            .with_inner_size(PhysicalSize::new(self.screen_w, self.screen_h));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        self.screen_w = size.width;
        self.screen_h = size.height;
        log::info!("Window created: {}x{}", size.width, size.height);

        let gpu = GpuState::new(window.clone())?;
        self.overlay = Some(Overlay::new(&window, &gpu));
        self.gpu = Some(gpu);
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) {
        let (Some(window), Some(gpu), Some(overlay)) = (&self.window, &mut self.gpu, &mut self.overlay) else {
            return;
        };

        self.sim.timers.begin();
        instance::collect(&self.sim, overlay.debug_visible, &mut self.instance_buf);
        self.sim.timers.end(Phase::BuildInstances);

        gpu.update_instances(&self.instance_buf);
        let Some(mut frame) = gpu.begin_frame() else {
            return;
        };
        gpu.draw_sprites(&mut frame.encoder, &frame.view);

        let (primitives, textures_delta, screen_descriptor) =
            overlay.run_frame(window, &self.sim, self.screen_w, self.screen_h);
        let extra = overlay.prepare_egui(
            &gpu.device,
            &gpu.queue,
            &mut frame.encoder,
            &primitives,
            &textures_delta,
            &screen_descriptor,
        );
        {
            let mut pass = GpuState::begin_egui_pass(&mut frame.encoder, &frame.view);
            overlay.render_egui(&mut pass, &primitives, &screen_descriptor);
        }
        gpu.finish_frame(frame.encoder, frame.output, extra);
        overlay.free_textures(&textures_delta);
        self.sim.timers.end(Phase::Render);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("Graphics setup failed: {e}");
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.sim.exit_requested() {
            log::info!("Game over, exiting");
            event_loop.exit();
            return;
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(overlay)) = (&self.window, &mut self.overlay) {
            if overlay.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.screen_w = new_size.width;
                    self.screen_h = new_size.height;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.sim.pointer = DVec2::new(position.x, position.y);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.sim.thrust(),
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(KeyCode::F12) => {
                    if let Some(overlay) = &mut self.overlay {
                        overlay.poll_toggle(event.state.is_pressed());
                    }
                }
                PhysicalKey::Code(KeyCode::Escape) if event.state.is_pressed() => {
                    log::info!("ESC pressed, exiting");
                    event_loop.exit();
                }
                PhysicalKey::Code(code) if event.state.is_pressed() && !event.repeat => {
                    // Debug spawning, only while the overlay is up.
                    let debug = self.overlay.as_ref().is_some_and(|o| o.debug_visible);
                    if let (true, Some(kind)) = (debug, debug_spawn_key(code)) {
                        let made = self.sim.spawn(kind);
                        log::info!("Debug spawn: {kind:?} x{}", made.len());
                    }
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    let dt = now.duration_since(last).as_secs_f64();
                    if let Some(overlay) = &mut self.overlay {
                        overlay.record_frame(dt);
                    }
                    self.run_fixed_update(dt);
                }
                self.last_frame_time = Some(now);
                self.render();
            }
            _ => {}
        }
    }
}

fn debug_spawn_key(code: KeyCode) -> Option<FishType> {
    match code {
        KeyCode::Digit1 => Some(FishType::Small),
        KeyCode::Digit2 => Some(FishType::Medium),
        KeyCode::Digit3 => Some(FishType::Large),
        KeyCode::Digit4 => Some(FishType::School),
        KeyCode::Digit5 => Some(FishType::Barracuda),
        _ => None,
    }
}

/// Open the window and run the game until it exits.
pub fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
