use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

use super::{DebugSnapshot, HudSnapshot};
use crate::util::timer::Phase;

/// Progress bar, score and floating texts. Positions are window pixels.
pub(super) fn draw_hud(ctx: &egui::Context, s: &HudSnapshot) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("hud"),
    ));
    let px = |x: f32, y: f32| Pos2::new(x / s.pixels_per_point, y / s.pixels_per_point);

    let [x, y, w, h] = s.progress_rect;
    let b = s.border;
    painter.rect_filled(
        Rect::from_min_max(px(x - b, y - b), px(x + w + b, y + h + b)),
        3.0,
        Color32::BLACK,
    );
    painter.rect_filled(Rect::from_min_max(px(x, y), px(x + w, y + h)), 3.0, Color32::GRAY);
    if s.progress > 0.0 {
        painter.rect_filled(
            Rect::from_min_max(px(x, y), px(x + w * s.progress, y + h)),
            3.0,
            Color32::YELLOW,
        );
    }

    painter.text(
        px(s.score_pos[0], s.score_pos[1]),
        Align2::LEFT_BOTTOM,
        s.score.to_string(),
        FontId::monospace(s.score_size / s.pixels_per_point),
        Color32::WHITE,
    );

    for t in &s.texts {
        let [r, g, b] = t.rgb;
        painter.text(
            px(t.position[0], t.position[1]),
            Align2::LEFT_BOTTOM,
            &t.text,
            FontId::proportional(t.size / s.pixels_per_point),
            Color32::from_rgb(r, g, b),
        );
    }
}

pub(super) fn draw_debug(ctx: &egui::Context, s: &DebugSnapshot) {
    let panel_frame = egui::Frame::NONE
        .fill(Color32::from_rgba_unmultiplied(20, 20, 20, 220))
        .corner_radius(6.0)
        .inner_margin(10.0);

    egui::Window::new("Debug")
        .default_pos([10.0, 50.0])
        .default_width(320.0)
        .resizable(true)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(Color32::from_gray(220));

            ui.heading("Performance");
            ui.label(format!("FPS: {:.1}", s.fps));
            ui.label(format!(
                "Frame: {:.2}ms avg | {:.2} min | {:.2} max",
                s.frame_time_avg * 1000.0,
                s.frame_time_min * 1000.0,
                s.frame_time_max * 1000.0,
            ));
            ui.add_space(4.0);

            ui.heading("Frame Time History");
            if !s.frame_times.is_empty() {
                let max_time = s
                    .frame_times
                    .iter()
                    .copied()
                    .fold(0.0f64, f64::max)
                    .max(0.020);

                let (response, painter) =
                    ui.allocate_painter(egui::vec2(300.0, 60.0), egui::Sense::hover());
                let rect = response.rect;

                let bar_width = rect.width() / s.frame_times.len() as f32;
                let target_y = rect.bottom() - (0.01667 / max_time as f32) * rect.height();

                for (i, &t) in s.frame_times.iter().enumerate() {
                    let h = (t / max_time) as f32 * rect.height();
                    let x = rect.left() + i as f32 * bar_width;
                    let color = if t > 0.01667 {
                        Color32::from_rgb(255, 100, 80)
                    } else {
                        Color32::from_rgb(80, 200, 120)
                    };
                    painter.rect_filled(
                        Rect::from_min_max(
                            egui::pos2(x, rect.bottom() - h),
                            egui::pos2(x + bar_width - 1.0, rect.bottom()),
                        ),
                        0.0,
                        color,
                    );
                }

                // 60 Hz budget
                painter.line_segment(
                    [
                        egui::pos2(rect.left(), target_y),
                        egui::pos2(rect.right(), target_y),
                    ],
                    Stroke::new(1.0, Color32::from_rgb(255, 255, 100)),
                );
            }
            ui.add_space(4.0);

            ui.heading("Phase Timers");
            let total = s.phase_total_us.max(1.0);
            let max_us = s
                .phase_durations
                .iter()
                .copied()
                .fold(0.0f64, f64::max)
                .max(1.0);

            for phase in Phase::ALL {
                let us = s.phase_durations[phase as usize];
                let pct = us / total * 100.0;
                let bar_frac = (us / max_us) as f32;

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(format!("{:<12}", phase.label())).monospace());
                    ui.label(
                        egui::RichText::new(format!("{:>5.0}us ({:>2.0}%)", us, pct)).monospace(),
                    );

                    let (response, painter) =
                        ui.allocate_painter(egui::vec2(80.0, 12.0), egui::Sense::hover());
                    let r = response.rect;
                    painter.rect_filled(
                        Rect::from_min_max(
                            r.left_top(),
                            egui::pos2(r.left() + r.width() * bar_frac, r.bottom()),
                        ),
                        2.0,
                        Color32::from_rgb(100, 180, 255),
                    );
                });
            }
            ui.add_space(4.0);

            ui.heading("World");
            ui.label(format!(
                "Creatures: {} | Entities: {} | Tick: {}",
                s.creature_count, s.entity_count, s.tick
            ));
            ui.label(format!(
                "Pending transitions: {} ({} on player)",
                s.pending_transitions, s.player_transitions
            ));
            ui.label(format!(
                "Camera: ({:.0}, {:.0}) | {} samples",
                s.camera[0], s.camera[1], s.camera_samples
            ));
            ui.add_space(4.0);

            ui.heading("Player");
            ui.label(format!(
                "Level {} | {} / {} xp",
                s.level, s.experience, s.xp_to_next_level
            ));
            ui.label(format!(
                "Invulnerable: {} | Dashing: {}",
                s.invulnerable, s.thrusting
            ));
            ui.add_space(4.0);

            ui.label("Click: Dash | 1-5: Spawn | F12: Toggle | ESC: Quit");
        });
}
