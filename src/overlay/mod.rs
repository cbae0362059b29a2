//! egui layer drawn over the sprites: the always-on HUD and the F12 debug panel.

mod panel;

use winit::window::Window;

use crate::hud::progress_fraction;
use crate::render::GpuState;
use crate::sim::components::Vitals;
use crate::sim::{player, Simulation};
use crate::util::ring::RingBuffer;

/// Number of frame times to keep in the histogram.
const FRAME_HISTORY_LEN: usize = 300;

pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,

    /// Debug panel and collider outlines.
    pub debug_visible: bool,
    f12_was_down: bool,

    /// Rolling window of frame times (seconds).
    pub frame_times: RingBuffer<f64>,
    pub fps: f64,
    pub frame_time_avg: f64,
    pub frame_time_min: f64,
    pub frame_time_max: f64,

    frame_count: u64,
    log_timer: f64,
    log_frame_count: u32,
    log_frame_sum: f64,
    log_frame_min: f64,
    log_frame_max: f64,
}

/// One drifting text, in window pixels.
pub(crate) struct TextSnapshot {
    pub position: [f32; 2],
    pub text: String,
    pub size: f32,
    pub rgb: [u8; 3],
}

/// Everything the HUD draws, copied out of the simulation.
pub(crate) struct HudSnapshot {
    pub progress: f32,
    pub progress_rect: [f32; 4],
    pub border: f32,
    pub score: u64,
    pub score_pos: [f32; 2],
    pub score_size: f32,
    pub texts: Vec<TextSnapshot>,
    pub pixels_per_point: f32,
}

pub(crate) struct DebugSnapshot {
    pub fps: f64,
    pub frame_time_avg: f64,
    pub frame_time_min: f64,
    pub frame_time_max: f64,
    pub frame_times: Vec<f64>,
    pub phase_durations: [f64; 8],
    pub phase_total_us: f64,
    pub creature_count: usize,
    pub entity_count: u32,
    pub tick: u64,
    pub pending_transitions: usize,
    pub player_transitions: usize,
    pub level: u32,
    pub experience: u64,
    pub xp_to_next_level: u64,
    pub invulnerable: bool,
    pub thrusting: bool,
    pub camera: [f64; 2],
    pub camera_samples: usize,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            debug_visible: false,
            f12_was_down: false,
            frame_times: RingBuffer::new(FRAME_HISTORY_LEN),
            fps: 0.0,
            frame_time_avg: 0.0,
            frame_time_min: 0.0,
            frame_time_max: 0.0,
            frame_count: 0,
            log_timer: 0.0,
            log_frame_count: 0,
            log_frame_sum: 0.0,
            log_frame_min: f64::MAX,
            log_frame_max: 0.0,
        }
    }

    /// Record a frame time, update rolling stats, and periodically log.
    pub fn record_frame(&mut self, dt: f64) {
        self.frame_count += 1;
        self.frame_times.push(dt);

        let len = self.frame_times.len();
        if !self.frame_times.is_empty() {
            let mut sum = 0.0;
            let mut min = f64::MAX;
            let mut max = 0.0f64;
            for &t in self.frame_times.iter() {
                sum += t;
                min = min.min(t);
                max = max.max(t);
            }
            self.frame_time_avg = sum / len as f64;
            self.frame_time_min = min;
            self.frame_time_max = max;
            self.fps = 1.0 / self.frame_time_avg;
        }

        // Periodic log (every 5s).
        self.log_frame_count += 1;
        self.log_frame_sum += dt;
        self.log_frame_min = self.log_frame_min.min(dt);
        self.log_frame_max = self.log_frame_max.max(dt);
        self.log_timer += dt;

        if self.log_timer >= 5.0 {
            let avg_ms = (self.log_frame_sum / self.log_frame_count as f64) * 1000.0;
            let fps = self.log_frame_count as f64 / self.log_timer;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                fps,
                avg_ms,
                self.log_frame_min * 1000.0,
                self.log_frame_max * 1000.0,
                self.frame_count,
            );
            self.log_timer = 0.0;
            self.log_frame_count = 0;
            self.log_frame_sum = 0.0;
            self.log_frame_min = f64::MAX;
            self.log_frame_max = 0.0;
        }
    }

    /// Handle F12 toggle. Returns true if visibility changed.
    pub fn poll_toggle(&mut self, f12_down: bool) -> bool {
        // Edge-detect: trigger on press, not hold.
        if f12_down && !self.f12_was_down {
            self.f12_was_down = true;
            self.debug_visible = !self.debug_visible;
            log::debug!("Debug overlay {}", if self.debug_visible { "shown" } else { "hidden" });
            return true;
        }
        if !f12_down {
            self.f12_was_down = false;
        }
        false
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    fn hud_snapshot(&self, sim: &Simulation, pixels_per_point: f32) -> HudSnapshot {
        let hud = sim.settings.hud;
        let stats = player::stats(sim);
        let progress = stats.map_or(0.0, |s| progress_fraction(s.experience, s.xp_to_next_level));
        let anchor = sim.texts.target();
        HudSnapshot {
            progress,
            progress_rect: [hud.progress_x, hud.progress_y, hud.progress_width, hud.progress_height],
            border: hud.progress_border,
            score: sim.score.shown(),
            score_pos: [anchor.x as f32, anchor.y as f32],
            score_size: hud.score_text_size,
            texts: sim
                .texts
                .iter()
                .map(|t| TextSnapshot {
                    position: [t.position.x as f32, t.position.y as f32],
                    text: t.text.clone(),
                    size: t.size,
                    rgb: t.color.rgb(),
                })
                .collect(),
            pixels_per_point,
        }
    }

    fn debug_snapshot(&self, sim: &Simulation) -> DebugSnapshot {
        let stats = player::stats(sim);
        let camera = sim.camera.position();
        DebugSnapshot {
            fps: self.fps,
            frame_time_avg: self.frame_time_avg,
            frame_time_min: self.frame_time_min,
            frame_time_max: self.frame_time_max,
            frame_times: self.frame_times.iter().copied().collect(),
            phase_durations: sim.timers.durations_us,
            phase_total_us: sim.timers.total_us(),
            creature_count: sim.population.len(),
            entity_count: sim.universe.len(),
            tick: sim.timeline.now(),
            pending_transitions: sim.timeline.len(),
            player_transitions: sim.timeline.pending_for(sim.player),
            level: player::level(sim),
            experience: stats.map_or(0, |s| s.experience),
            xp_to_next_level: stats.map_or(0, |s| s.xp_to_next_level),
            invulnerable: sim
                .universe
                .read::<Vitals>(sim.player)
                .is_some_and(|v| v.invulnerable),
            thrusting: stats.is_some_and(|s| s.thrust.is_some()),
            camera: [camera.x, camera.y],
            camera_samples: sim.camera.sample_count(),
        }
    }

    /// Run the egui frame and produce paint output.
    pub fn run_frame(
        &mut self,
        window: &Window,
        sim: &Simulation,
        screen_w: u32,
        screen_h: u32,
    ) -> (
        Vec<egui::epaint::ClippedPrimitive>,
        egui::TexturesDelta,
        egui_wgpu::ScreenDescriptor,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let hud = self.hud_snapshot(sim, window.scale_factor() as f32);
        let debug = self.debug_visible.then(|| self.debug_snapshot(sim));

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            panel::draw_hud(ctx, &hud);
            if let Some(debug) = &debug {
                panel::draw_debug(ctx, debug);
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [screen_w, screen_h],
            pixels_per_point,
        };

        (clipped_primitives, full_output.textures_delta, screen_descriptor)
    }

    /// Upload egui textures and buffers. Call before the egui render pass.
    pub fn prepare_egui(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::epaint::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor)
    }

    pub fn render_egui(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::epaint::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, textures_delta: &egui::TexturesDelta) {
        for &id in &textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }
    }
}
