//! Barracuda behavior cycle: cruise, get bitten, wait, chase, cruise again.

use glam::DVec2;
use hecs::Entity;

use super::components::{BarracudaBrain, Behavior, Colliders, Facing, Position, Velocity, Vitals};
use super::timeline::Transition;
use super::{creature, player, Simulation};
use crate::audio::Cue;
use crate::geometry::{angle, from_polar};
use crate::hud::TextColor;

/// The player's mouth touched the tail.
pub(super) fn tail_bitten(sim: &mut Simulation, entity: Entity) {
    let Some(brain) = sim.universe.read::<BarracudaBrain>(entity) else {
        return;
    };
    // Bites while waiting or chasing never count.
    if brain.behavior != Behavior::Default {
        return;
    }
    if brain.lives_left <= 1 {
        log::info!("Barracuda {entity:?} bitten to death");
        creature::die(sim, entity);
        return;
    }

    let cfg = sim.settings.barracuda;
    player::gain_experience(sim, cfg.tail_bite_xp);
    let at = player::position(sim);
    let text = sim.settings.text;
    sim.texts.enqueue(
        at,
        text.xp_speed,
        format!("+{}", cfg.tail_bite_xp),
        text.xp_size,
        TextColor::White,
    );
    sim.texts.enqueue(
        at + DVec2::new(0.0, cfg.tail_bite_text_offset_y),
        text.xp_speed,
        "TAIL BITE!",
        text.xp_size,
        TextColor::Orange,
    );
    sim.audio.play(Cue::Bite);

    let u = &sim.universe;
    u.update::<Velocity, _>(entity, |v| v.0 = DVec2::ZERO);
    u.update::<Facing, _>(entity, |f| f.locked = true);
    u.update::<Vitals, _>(entity, |v| v.invulnerable = true);
    let lives_left = u
        .update::<BarracudaBrain, _>(entity, |b| {
            b.lives_left -= 1;
            b.behavior = Behavior::Waiting;
            b.lives_left
        })
        .unwrap_or(0);

    let wait = sim.settings.ticks(cfg.wait_secs);
    sim.timeline
        .schedule(wait, Some(entity), Transition::BeginChase);
    log::info!("Barracuda {entity:?} tail bitten, {lives_left} lives left");
}

pub(super) fn begin_chase(sim: &mut Simulation, entity: Entity) {
    let started = sim
        .universe
        .update::<BarracudaBrain, _>(entity, |b| {
            if b.behavior != Behavior::Waiting {
                return false;
            }
            b.behavior = Behavior::Chasing;
            true
        })
        .unwrap_or(false);
    if started {
        let chase = sim.settings.ticks(sim.settings.barracuda.chase_secs);
        sim.timeline
            .schedule(chase, Some(entity), Transition::EndChase);
        log::debug!("Barracuda {entity:?} chasing");
    }
}

pub(super) fn end_chase(sim: &mut Simulation, entity: Entity) {
    let u = &sim.universe;
    let Some(facing) = u.read::<Facing>(entity) else {
        return;
    };
    let dir = if facing.right { 1.0 } else { -1.0 };
    let cruise = sim.settings.barracuda.cruise_speed;
    u.update::<Velocity, _>(entity, |v| v.0 = DVec2::new(cruise * dir, 0.0));
    u.update::<Facing, _>(entity, |f| f.locked = false);
    u.update::<Vitals, _>(entity, |v| v.invulnerable = false);
    u.update::<BarracudaBrain, _>(entity, |b| b.behavior = Behavior::Default);
    log::debug!("Barracuda {entity:?} back to cruising");
}

/// While chasing, swim mouth-first at the player.
pub(super) fn pursue(sim: &mut Simulation, entity: Entity) {
    let u = &sim.universe;
    let chasing = u
        .read::<BarracudaBrain>(entity)
        .is_some_and(|b| b.behavior == Behavior::Chasing);
    if !chasing {
        return;
    }
    let (Some(colliders), Some(pos)) = (u.read::<Colliders>(entity), u.read::<Position>(entity)) else {
        return;
    };
    let target = player::center(sim);
    let heading = angle(colliders.mouth.center() - target);
    let pos = pos.0 - from_polar(sim.settings.barracuda.chase_speed, heading);
    let player_x = player::position(sim).x;

    u.update::<Position, _>(entity, |p| p.0 = pos);
    u.update::<Velocity, _>(entity, |v| v.0 = DVec2::ZERO);
    u.update::<Facing, _>(entity, |f| f.right = player_x > pos.x);
}
