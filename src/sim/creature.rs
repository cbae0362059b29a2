//! Per-tick creature update: facing, motion, despawn, colliders and the
//! collision scan. Kind-specific outcomes are dispatched through the mouth and
//! body rules on `CreatureKind`.

use glam::DVec2;
use hecs::Entity;

use super::components::{
    BodyRule, ColliderShape, Colliders, Creature, CreatureKind, Facing, MouthRule, Position, Size,
    Velocity, Visual, Vitals,
};
use super::timeline::Transition;
use super::{barracuda, player, Simulation};
use crate::audio::Cue;
use crate::config::ExperienceSettings;
use crate::geometry::Rect;
use crate::hud::TextColor;

/// Experience a creature of `level` is worth when eaten.
pub fn xp_from_level(exp: &ExperienceSettings, level: u32) -> u64 {
    (exp.total_factor * (exp.exp_factor * f64::from(level).powf(exp.exponent))) as u64
}

/// Hitboxes for a sprite at `pos` of `size` facing `right`.
pub fn compute_colliders(pos: DVec2, size: DVec2, right: bool, shape: &ColliderShape) -> Colliders {
    match *shape {
        ColliderShape::Streamlined {
            body_size,
            body_offset,
            mouth_size,
            mouth_offset_y,
        } => {
            let body = Rect::new(pos + (size - body_size) * 0.5 + body_offset, body_size);
            let mut mouth_x = pos.x;
            if right {
                mouth_x += size.x - mouth_size;
            }
            let mouth_y = body.min.y + (body_size.y - mouth_size) * 0.5 + mouth_offset_y;
            Colliders {
                mouth: Rect::new(DVec2::new(mouth_x, mouth_y), DVec2::splat(mouth_size)),
                body,
            }
        }
        ColliderShape::Hung {
            body_size,
            body_offset,
            mouth_size,
            mouth_offset,
        } => {
            let center_x = pos.x + size.x * 0.5;
            let hang = |extent: DVec2, offset: DVec2| {
                let dx = if right { -offset.x } else { offset.x };
                Rect::new(DVec2::new(center_x + dx - extent.x * 0.5, pos.y + offset.y), extent)
            };
            Colliders {
                mouth: hang(DVec2::splat(mouth_size), mouth_offset),
                body: hang(body_size, body_offset),
            }
        }
    }
}

/// Snapshot of what the collision rules look at.
#[derive(Debug, Clone, Copy)]
struct Combatant {
    kind: CreatureKind,
    level: u32,
    colliders: Colliders,
    vitals: Vitals,
}

fn combatant(sim: &Simulation, entity: Entity) -> Option<Combatant> {
    let u = &sim.universe;
    let creature = u.read::<Creature>(entity)?;
    Some(Combatant {
        kind: creature.kind,
        level: creature.level,
        colliders: u.read::<Colliders>(entity)?,
        vitals: u.read::<Vitals>(entity)?,
    })
}

/// Run one update for every registered creature, in registration order.
pub(super) fn update_all(sim: &mut Simulation) {
    let order = sim.population.entities().to_vec();
    let player_center = player::center(sim);
    for &entity in &order {
        update_one(sim, entity, &order, player_center);
    }
}

fn update_one(sim: &mut Simulation, entity: Entity, order: &[Entity], player_center: DVec2) {
    let Some(creature) = sim.universe.read::<Creature>(entity) else {
        return;
    };
    let dead = sim.universe.read::<Vitals>(entity).map_or(true, |v| v.dead);
    if dead {
        return;
    }

    let u = &sim.universe;
    let Some(mut pos) = u.read::<Position>(entity).map(|p| p.0) else {
        return;
    };
    let size = u.read::<Size>(entity).map_or(DVec2::ZERO, |s| s.0);
    let velocity = u.read::<Velocity>(entity).map_or(DVec2::ZERO, |v| v.0);

    let right = u
        .update::<Facing, _>(entity, |facing| {
            if !facing.locked {
                facing.right = match creature.kind {
                    CreatureKind::Player => sim.pointer.x > pos.x + size.x * 0.5,
                    _ => velocity.x > 0.0,
                };
            }
            facing.right
        })
        .unwrap_or(false);

    // The player moves in its own steering step.
    if creature.kind != CreatureKind::Player {
        pos += velocity;
        u.update::<Position, _>(entity, |p| p.0 = pos);
    }

    if creature.kind != CreatureKind::Player
        && player_center.distance(pos) > sim.settings.simulation.removal_distance
    {
        u.update::<Vitals, _>(entity, |v| v.dead = true);
        log::trace!("{entity:?} drifted out of range");
    }

    if let Some(shape) = u.read::<ColliderShape>(entity) {
        let colliders = compute_colliders(pos, size, right, &shape);
        u.update::<Colliders, _>(entity, |c| *c = colliders);
    }

    if !sim.universe.read::<Vitals>(entity).map_or(true, |v| v.dead) {
        scan(sim, entity, order);
    }

    if creature.kind == CreatureKind::Barracuda {
        barracuda::pursue(sim, entity);
    }
}

fn scan(sim: &mut Simulation, entity: Entity, order: &[Entity]) {
    for &other in order {
        if other == entity {
            continue;
        }
        let (Some(me), Some(them)) = (combatant(sim, entity), combatant(sim, other)) else {
            continue;
        };
        if me.vitals.dead {
            return;
        }
        if them.vitals.dead {
            continue;
        }
        mouth_contact(sim, me, other, them);

        let (Some(me), Some(them)) = (combatant(sim, entity), combatant(sim, other)) else {
            continue;
        };
        body_contact(sim, entity, me, them);
    }
}

/// `me`'s mouth against `them`'s body.
fn mouth_contact(sim: &mut Simulation, me: Combatant, other: Entity, them: Combatant) {
    if them.vitals.invulnerable || !me.colliders.mouth.intersects(&them.colliders.body) {
        return;
    }
    match me.kind.mouth_rule() {
        MouthRule::Strict if me.level > them.level => kill(sim, other, them.kind),
        MouthRule::Inclusive if me.level >= them.level => die(sim, other),
        MouthRule::Ambush if them.kind == CreatureKind::Player || me.level > them.level => {
            kill(sim, other, them.kind)
        }
        _ => {}
    }
}

/// `them`'s mouth against `me`'s body.
fn body_contact(sim: &mut Simulation, entity: Entity, me: Combatant, them: Combatant) {
    if me.vitals.invulnerable || !me.colliders.body.intersects(&them.colliders.mouth) {
        return;
    }
    match me.kind.body_rule() {
        BodyRule::Inert => {}
        BodyRule::Prey if me.level < them.level => player::die(sim),
        BodyRule::Prey => {}
        BodyRule::Tail if them.kind == CreatureKind::Player => barracuda::tail_bitten(sim, entity),
        BodyRule::Tail => {}
    }
}

/// Silent kill. The player is never marked dead, it loses its progress instead.
fn kill(sim: &mut Simulation, entity: Entity, kind: CreatureKind) {
    if kind == CreatureKind::Player {
        player::die(sim);
    } else {
        sim.universe.update::<Vitals, _>(entity, |v| v.dead = true);
    }
}

/// Eaten by the player: pay out experience and mark dead. No-op if already dead.
pub(super) fn die(sim: &mut Simulation, entity: Entity) {
    let Some(creature) = sim.universe.read::<Creature>(entity) else {
        return;
    };
    if sim.universe.read::<Vitals>(entity).map_or(true, |v| v.dead) {
        return;
    }
    let xp = xp_from_level(&sim.settings.experience, creature.level);
    player::gain_experience(sim, xp);
    let at = player::position(sim);
    sim.texts.enqueue(
        at,
        sim.settings.text.xp_speed,
        format!("+{xp}"),
        sim.settings.text.xp_size,
        TextColor::White,
    );
    sim.audio.play(Cue::Bite);
    sim.universe.update::<Vitals, _>(entity, |v| v.dead = true);
    log::debug!("{:?} level {} eaten for {xp} xp", creature.kind, creature.level);
}

/// Make `entity` invulnerable for `secs`.
pub(super) fn grant_invulnerability(sim: &mut Simulation, entity: Entity, secs: f64) {
    sim.universe.update::<Vitals, _>(entity, |v| v.invulnerable = true);
    let delay = sim.settings.ticks(secs);
    sim.timeline
        .schedule(delay, Some(entity), Transition::EndInvulnerability);
}

/// Toggle visibility `frequency` times a second for `secs`. Ignored while a
/// blink is already running.
pub(super) fn blink(sim: &mut Simulation, entity: Entity, secs: f64, frequency: f64) {
    let started = sim
        .universe
        .update::<Visual, _>(entity, |v| !std::mem::replace(&mut v.blinking, true))
        .unwrap_or(false);
    if !started || frequency <= 0.0 {
        return;
    }
    let toggles_left = (secs * frequency * 2.0) as u32 + 1;
    let interval = sim.settings.ticks(1.0 / (frequency * 2.0));
    sim.timeline.schedule(
        0,
        Some(entity),
        Transition::BlinkToggle {
            toggles_left,
            interval,
        },
    );
}

pub(super) fn blink_toggle(sim: &mut Simulation, entity: Entity, toggles_left: u32, interval: u64) {
    let left = toggles_left.saturating_sub(1);
    sim.universe.update::<Visual, _>(entity, |v| {
        if left == 0 {
            v.visible = true;
            v.blinking = false;
        } else {
            v.visible = !v.visible;
        }
    });
    if left > 0 {
        sim.timeline.schedule(
            interval,
            Some(entity),
            Transition::BlinkToggle {
                toggles_left: left,
                interval,
            },
        );
    }
}
