//! Sole owner of the live-creature registry. Every structural change to the
//! universe goes through here so the two never disagree.

use glam::DVec2;
use hecs::Entity;

use super::components::{
    BarracudaBrain, Behavior, ColliderShape, Colliders, Creature, CreatureKind, Decoration, Facing,
    PlayerStats, Position, SchoolId, Size, Velocity, Visual, Vitals,
};
use super::creature::compute_colliders;
use super::timeline::Timeline;
use super::universe::Universe;
use crate::config::Settings;
use crate::geometry::signum;
use crate::sprites::SpriteAtlas;

/// Fill in colliders right away so a creature is solid before its first update.
fn settle_colliders(universe: &Universe, entity: Entity) {
    let (Some(pos), Some(size), Some(facing), Some(shape)) = (
        universe.read::<Position>(entity),
        universe.read::<Size>(entity),
        universe.read::<Facing>(entity),
        universe.read::<ColliderShape>(entity),
    ) else {
        return;
    };
    let colliders = compute_colliders(pos.0, size.0, facing.right, &shape);
    universe.update::<Colliders, _>(entity, |c| *c = colliders);
}

/// What `spawn` can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishType {
    Small,
    Medium,
    Large,
    School,
    Barracuda,
}

impl FishType {
    pub fn level(self) -> u32 {
        match self {
            Self::Small | Self::School => 1,
            Self::Medium => 2,
            Self::Large => 3,
            Self::Barracuda => 15,
        }
    }
}

/// Borrowed context needed to build a creature.
pub struct Spawner<'a> {
    pub universe: &'a mut Universe,
    pub settings: &'a Settings,
    pub sprites: &'a mut SpriteAtlas,
    pub rng: &'a mut fastrand::Rng,
}

pub struct Population {
    creatures: Vec<Entity>,
    next_school: u32,
}

impl Population {
    pub fn new() -> Self {
        Self {
            creatures: Vec::new(),
            next_school: 0,
        }
    }

    /// Live creatures in registration order.
    pub fn entities(&self) -> &[Entity] {
        &self.creatures
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    fn register(&mut self, universe: &mut Universe, components: impl hecs::DynamicBundle) -> Entity {
        let entity = universe.spawn(components);
        self.creatures.push(entity);
        settle_colliders(universe, entity);
        entity
    }

    /// The scenery plate behind everything. Not a creature, so not registered.
    pub fn place_background(&mut self, universe: &mut Universe, settings: &Settings, sprites: &mut SpriteAtlas) -> Entity {
        let (map, screen) = (settings.map, settings.screen);
        universe.spawn((
            Position(DVec2::new(-f64::from(map.width) / 2.0, -f64::from(map.height) / 2.0)),
            Size(DVec2::new(
                f64::from(map.width + screen.width),
                f64::from(map.height + screen.height),
            )),
            Visual::new(sprites.resolve("BACKGROUND")),
            Decoration,
        ))
    }

    /// Create the player at the middle of the screen.
    pub fn spawn_player(&mut self, universe: &mut Universe, settings: &Settings, sprites: &mut SpriteAtlas) -> Entity {
        let cfg = settings.player;
        let size = DVec2::splat(cfg.start_size);
        let start = DVec2::new(
            f64::from(settings.screen.width) / 2.0,
            f64::from(settings.screen.height) / 2.0,
        );
        let visual = Visual::new(sprites.resolve("PLAYER"));
        self.register(
            universe,
            (
                Position(start),
                Size(size),
                Velocity(DVec2::ZERO),
                Creature {
                    kind: CreatureKind::Player,
                    level: cfg.start_level,
                },
                Facing {
                    right: false,
                    locked: false,
                },
                Vitals::default(),
                ColliderShape::fitted(size, (size.y * cfg.mouth_size_factor).floor()),
                Colliders::default(),
                visual,
                PlayerStats {
                    experience: 0,
                    xp_to_next_level: cfg.initial_xp_to_next_level,
                    score: 0,
                    has_won: false,
                    initial_size: size,
                    thrust: None,
                },
            ),
        )
    }

    /// A basic enemy of `level` at an explicit spot.
    pub fn spawn_enemy(&mut self, ctx: &mut Spawner<'_>, position: DVec2, velocity: DVec2, level: u32) -> Entity {
        self.spawn_basic(ctx, CreatureKind::BasicEnemy, position, velocity, level)
    }

    fn spawn_basic(
        &mut self,
        ctx: &mut Spawner<'_>,
        kind: CreatureKind,
        position: DVec2,
        velocity: DVec2,
        level: u32,
    ) -> Entity {
        let settings = ctx.settings;
        let (size, shape, sprite) = match settings.tier(level) {
            Some(tier) => {
                let size = DVec2::new(tier.width, tier.height);
                let shape = ColliderShape::Streamlined {
                    body_size: DVec2::new(tier.width, tier.body_height),
                    body_offset: DVec2::new(0.0, tier.body_offset_y),
                    mouth_size: tier.mouth_size,
                    mouth_offset_y: tier.mouth_offset_y,
                };
                (size, shape, ctx.sprites.resolve(&tier.sprite))
            }
            None => {
                // Unlisted levels scale the smallest tier.
                let base = &settings.enemies.tiers[0];
                let size = DVec2::new(base.width, base.height) * f64::from(level);
                let sprite = ctx.sprites.resolve(&base.sprite);
                (size, ColliderShape::fitted(size, 10.0 * f64::from(level)), sprite)
            }
        };
        self.register(
            ctx.universe,
            (
                Position(position),
                Size(size),
                Velocity(velocity),
                Creature { kind, level },
                Facing {
                    right: velocity.x > 0.0,
                    locked: false,
                },
                Vitals::default(),
                shape,
                Colliders::default(),
                Visual::new(sprite),
            ),
        )
    }

    pub fn spawn_barracuda(&mut self, ctx: &mut Spawner<'_>, position: DVec2, velocity: DVec2) -> Entity {
        let cfg = ctx.settings.barracuda;
        let visual = Visual::new(ctx.sprites.resolve("BARRACUDA"));
        self.register(
            ctx.universe,
            (
                Position(position),
                Size(DVec2::new(cfg.width, cfg.height)),
                Velocity(velocity),
                Creature {
                    kind: CreatureKind::Barracuda,
                    level: cfg.level,
                },
                Facing {
                    right: velocity.x > 0.0,
                    locked: false,
                },
                Vitals::default(),
                ColliderShape::Hung {
                    body_size: DVec2::new(cfg.body_width, cfg.body_height),
                    body_offset: DVec2::new(cfg.body_offset_x, cfg.body_offset_y),
                    mouth_size: cfg.mouth_size,
                    mouth_offset: DVec2::new(cfg.mouth_offset_x, cfg.mouth_offset_y),
                },
                Colliders::default(),
                visual,
                BarracudaBrain {
                    behavior: Behavior::Default,
                    lives_left: cfg.lives,
                },
            ),
        )
    }

    /// A cluster of level-1 fish sharing a heading and vertical drift.
    pub fn spawn_school(&mut self, ctx: &mut Spawner<'_>, origin: DVec2, velocity: DVec2, count: u32) -> Vec<Entity> {
        let cfg = ctx.settings.school;
        let id = SchoolId(self.next_school);
        self.next_school += 1;
        let jitter = cfg.spacing * cfg.displacement_factor;
        let mut members = Vec::with_capacity(count as usize);
        for i in 0..count {
            let offset = DVec2::new(
                ctx.rng.f64() * jitter + cfg.spacing * f64::from(i),
                ctx.rng.f64() * jitter + cfg.spacing * ctx.rng.f64() * f64::from(count),
            );
            let e = self.spawn_basic(ctx, CreatureKind::School, origin + offset, velocity, 1);
            ctx.universe.insert_one(e, id);
            members.push(e);
        }
        log::debug!("School {} of {count} spawned at {origin}", id.0);
        members
    }

    /// Build a creature of `kind` just off a random horizontal screen edge.
    /// Returns every entity created (several for a school).
    pub fn spawn(&mut self, ctx: &mut Spawner<'_>, kind: FishType) -> Vec<Entity> {
        let settings = ctx.settings;
        let enemies = &settings.enemies;
        let dir = if ctx.rng.bool() { 1.0 } else { -1.0 };
        let x = if dir > 0.0 {
            -enemies.screen_margin
        } else {
            f64::from(settings.screen.width) + enemies.screen_margin
        };
        let y = ctx.rng.f64() * f64::from(settings.map.height);

        match kind {
            FishType::Barracuda => {
                let cfg = settings.barracuda;
                let pos = DVec2::new(x + cfg.spawn_margin * signum(x), y);
                let e = self.spawn_barracuda(ctx, pos, DVec2::new(cfg.speed * dir, 0.0));
                log::debug!("Barracuda spawned at {pos}");
                vec![e]
            }
            FishType::School => {
                let velocity = DVec2::new(enemies.speed * dir, ctx.rng.f64() - enemies.y_velocity_offset);
                let school = settings.school;
                let count = ctx.rng.u32(school.min_count..=school.max_count);
                self.spawn_school(ctx, DVec2::new(x, y), velocity, count)
            }
            _ => {
                let velocity = DVec2::new(enemies.speed * dir, ctx.rng.f64() - enemies.y_velocity_offset);
                let e = self.spawn_enemy(ctx, DVec2::new(x, y), velocity, kind.level());
                log::debug!("{kind:?} spawned at ({x}, {y:.0})");
                vec![e]
            }
        }
    }

    /// Maybe spawn this frame. Returns how many creatures appeared.
    pub fn spawn_around_player(&mut self, ctx: &mut Spawner<'_>, rate: f32) -> usize {
        if ctx.rng.f32() >= rate {
            return 0;
        }
        let mut spawned = 0;
        if ctx.rng.f64() <= ctx.settings.spawn.barracuda_chance {
            spawned += self.spawn(ctx, FishType::Barracuda).len();
        }
        let bands = ctx.settings.spawn;
        let roll = ctx.rng.f32();
        let kind = if roll < bands.large_band {
            FishType::Large
        } else if roll < bands.medium_band {
            FishType::Medium
        } else if roll < bands.school_band {
            FishType::School
        } else {
            FishType::Small
        };
        spawned + self.spawn(ctx, kind).len()
    }

    /// Remove every dead creature except the player, cancelling its pending
    /// transitions. Returns how many were removed.
    pub fn purge_dead(&mut self, universe: &mut Universe, timeline: &mut Timeline, player: Entity) -> usize {
        let before = self.creatures.len();
        self.creatures.retain(|&e| {
            let dead = e != player && universe.read::<Vitals>(e).map_or(true, |v| v.dead);
            if dead {
                universe.despawn(e);
                timeline.cancel(e);
            }
            !dead
        });
        before - self.creatures.len()
    }
}
