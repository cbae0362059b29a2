//! The player-controlled fish: steering, dashing, growth and losing it all.

use glam::DVec2;

use super::components::{
    ColliderShape, Creature, PlayerStats, Position, Size, ThrustBurst, Velocity, Vitals,
};
use super::timeline::Transition;
use super::{creature, Simulation};
use crate::audio::Cue;
use crate::geometry::{angle, from_polar};
use crate::hud::TextColor;

/// Top-left corner of the player sprite.
pub fn position(sim: &Simulation) -> DVec2 {
    sim.universe
        .read::<Position>(sim.player)
        .map_or(DVec2::ZERO, |p| p.0)
}

pub fn center(sim: &Simulation) -> DVec2 {
    let size = sim
        .universe
        .read::<Size>(sim.player)
        .map_or(DVec2::ZERO, |s| s.0);
    position(sim) + size * 0.5
}

pub fn stats(sim: &Simulation) -> Option<PlayerStats> {
    sim.universe.read::<PlayerStats>(sim.player)
}

pub fn level(sim: &Simulation) -> u32 {
    sim.universe
        .read::<Creature>(sim.player)
        .map_or(0, |c| c.level)
}

/// Collider layout for a player of `size`.
pub(super) fn shape_for(sim: &Simulation, size: DVec2) -> ColliderShape {
    ColliderShape::fitted(size, (size.y * sim.settings.player.mouth_size_factor).floor())
}

pub(super) fn gain_experience(sim: &mut Simulation, amount: u64) {
    sim.universe.update::<PlayerStats, _>(sim.player, |s| {
        s.experience += amount;
        s.score += amount;
    });
}

/// Swim toward the pointer, slowing as it gets close.
pub(super) fn steer(sim: &mut Simulation) {
    let cfg = sim.settings.player;
    let center = center(sim);
    let delta = sim.pointer - center;
    let velocity = cfg.max_velocity * delta / (delta.length() + cfg.steer_smoothing);
    let u = &sim.universe;
    u.update::<Velocity, _>(sim.player, |v| v.0 = velocity);
    u.update::<Position, _>(sim.player, |p| p.0 += velocity);
}

/// Start a dash toward `target`. Ignored while one is running.
pub fn thrust(sim: &mut Simulation, target: DVec2) {
    let heading = angle(target - center(sim));
    let started = sim
        .universe
        .update::<PlayerStats, _>(sim.player, |s| {
            if s.thrust.is_some() {
                return false;
            }
            s.thrust = Some(ThrustBurst {
                angle: heading,
                elapsed: 0.0,
            });
            true
        })
        .unwrap_or(false);
    if started {
        sim.audio.play(Cue::Dash);
        sim.timeline
            .schedule(1, Some(sim.player), Transition::ThrustStep);
    }
}

/// One tick of the dash: several decaying sub-steps, each also fed to the
/// camera so the view keeps up.
pub(super) fn thrust_step(sim: &mut Simulation) {
    let cfg = sim.settings.thrust;
    let Some(mut burst) = stats(sim).and_then(|s| s.thrust) else {
        return;
    };
    let mut moved = DVec2::ZERO;
    let mut finished = false;
    for _ in 0..cfg.substeps_per_tick {
        let speed = cfg.speed - (cfg.speed / cfg.duration) * burst.elapsed;
        let step = from_polar(speed, burst.angle);
        moved += step;
        sim.camera.push_sample(step * cfg.camera_weight);
        burst.elapsed += cfg.time_increment;
        if speed < cfg.min_speed {
            finished = true;
            break;
        }
    }

    let u = &sim.universe;
    u.update::<Position, _>(sim.player, |p| p.0 += moved);
    u.update::<PlayerStats, _>(sim.player, |s| {
        s.thrust = if finished { None } else { Some(burst) };
    });
    if !finished {
        sim.timeline
            .schedule(1, Some(sim.player), Transition::ThrustStep);
    }
}

/// Level up once enough experience is banked, or win at the top level.
pub(super) fn check_level(sim: &mut Simulation) {
    let Some(current) = stats(sim) else {
        return;
    };
    if current.experience < current.xp_to_next_level {
        return;
    }
    let cfg = sim.settings.player;
    let from = level(sim);

    if from < cfg.max_level {
        let size = sim
            .universe
            .read::<Size>(sim.player)
            .map_or(DVec2::ZERO, |s| s.0)
            * cfg.size_growth_factor;
        let shape = shape_for(sim, size);
        let u = &sim.universe;
        u.update::<Creature, _>(sim.player, |c| c.level += 1);
        u.update::<Size, _>(sim.player, |s| s.0 = size);
        u.update::<ColliderShape, _>(sim.player, |s| *s = shape);
        u.update::<PlayerStats, _>(sim.player, |s| {
            s.experience = 0;
            s.xp_to_next_level *= cfg.xp_growth_factor;
        });
        log::info!("Player reached level {}", from + 1);
    } else if !current.has_won {
        sim.universe
            .update::<PlayerStats, _>(sim.player, |s| s.has_won = true);
        let screen = sim.settings.screen;
        sim.texts.enqueue(
            DVec2::new(f64::from(screen.width) / 4.0, f64::from(screen.height) / 2.0),
            0.0,
            "YOU WIN!",
            sim.settings.text.win_size,
            TextColor::Green,
        );
        let delay = sim.settings.ticks(cfg.win_exit_delay_secs);
        sim.timeline.schedule(delay, None, Transition::Exit);
        log::info!("Player won with score {}", current.score);
    }
}

/// Eaten: blink, become briefly invulnerable and start over from level one.
pub(super) fn die(sim: &mut Simulation) {
    let player = sim.player;
    let invulnerable = sim
        .universe
        .read::<Vitals>(player)
        .map_or(true, |v| v.invulnerable);
    if invulnerable {
        return;
    }
    let cfg = sim.settings.player;
    sim.audio.play(Cue::Bite);
    creature::blink(sim, player, cfg.blink_secs, cfg.blink_frequency);
    creature::grant_invulnerability(sim, player, cfg.respawn_invulnerability_secs);

    let Some(initial) = stats(sim).map(|s| s.initial_size) else {
        return;
    };
    let shape = shape_for(sim, initial);
    let u = &sim.universe;
    u.update::<Creature, _>(player, |c| c.level = cfg.start_level);
    u.update::<Size, _>(player, |s| s.0 = initial);
    u.update::<ColliderShape, _>(player, |s| *s = shape);
    u.update::<PlayerStats, _>(player, |s| {
        s.experience = 0;
        s.score = 0;
        s.xp_to_next_level = cfg.initial_xp_to_next_level;
    });

    let at = position(sim);
    sim.texts.enqueue(
        at,
        sim.settings.text.oh_no_speed,
        "OH NO!",
        sim.settings.text.oh_no_size,
        TextColor::Red,
    );
    log::info!("Player eaten, back to level {}", cfg.start_level);
}
