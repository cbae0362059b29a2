use glam::DVec2;

use crate::geometry::Rect;
use crate::sprites::SpriteHandle;

/// Top-left corner in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub DVec2);

/// Width and height in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Size(pub DVec2);

/// Displacement per tick. Entities without one are stationary.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub DVec2);

/// Marks passive scenery such as the background.
#[derive(Debug, Clone, Copy)]
pub struct Decoration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CreatureKind {
    Player,
    BasicEnemy,
    School,
    Barracuda,
}

/// How a creature's mouth treats the body it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthRule {
    /// Kills strictly lower levels, silently.
    Strict,
    /// Eats equal or lower levels and pays out experience.
    Inclusive,
    /// Kills the player regardless of level, strictly lower levels otherwise.
    Ambush,
}

/// What happens when another creature's mouth touches this one's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    Inert,
    /// Dies to any strictly higher level.
    Prey,
    /// The body is a tail; the player biting it starts the chase cycle.
    Tail,
}

impl CreatureKind {
    pub fn mouth_rule(self) -> MouthRule {
        match self {
            Self::Player => MouthRule::Inclusive,
            Self::BasicEnemy | Self::School => MouthRule::Strict,
            Self::Barracuda => MouthRule::Ambush,
        }
    }

    pub fn body_rule(self) -> BodyRule {
        match self {
            Self::Player => BodyRule::Prey,
            Self::BasicEnemy | Self::School => BodyRule::Inert,
            Self::Barracuda => BodyRule::Tail,
        }
    }
}

/// Every swimming creature carries one.
#[derive(Debug, Clone, Copy)]
pub struct Creature {
    pub kind: CreatureKind,
    pub level: u32,
}

/// Which way the creature faces. While `locked` it is not derived from velocity.
#[derive(Debug, Clone, Copy)]
pub struct Facing {
    pub right: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vitals {
    pub invulnerable: bool,
    /// Set once, never cleared. The purge pass removes the entity.
    pub dead: bool,
}

/// Hitboxes, recomputed every tick from position, size and shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct Colliders {
    pub mouth: Rect,
    pub body: Rect,
}

/// Layout of the colliders relative to the sprite. Horizontal offsets are
/// given for a left-facing creature and mirrored when it faces right.
#[derive(Debug, Clone, Copy)]
pub enum ColliderShape {
    /// Body centered in the sprite, mouth on the leading edge.
    Streamlined {
        body_size: DVec2,
        body_offset: DVec2,
        mouth_size: f64,
        mouth_offset_y: f64,
    },
    /// Body and mouth hung off the sprite's vertical center line.
    Hung {
        body_size: DVec2,
        body_offset: DVec2,
        mouth_size: f64,
        mouth_offset: DVec2,
    },
}

impl ColliderShape {
    /// Body fills the sprite, square mouth of the given side.
    pub fn fitted(size: DVec2, mouth_size: f64) -> Self {
        Self::Streamlined {
            body_size: size,
            body_offset: DVec2::ZERO,
            mouth_size,
            mouth_offset_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Visual {
    /// `None` draws the placeholder.
    pub sprite: Option<SpriteHandle>,
    pub visible: bool,
    pub blinking: bool,
}

impl Visual {
    pub fn new(sprite: Option<SpriteHandle>) -> Self {
        Self {
            sprite,
            visible: true,
            blinking: false,
        }
    }
}

/// Members of one spawned school share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Behavior {
    Default,
    Waiting,
    Chasing,
}

#[derive(Debug, Clone, Copy)]
pub struct BarracudaBrain {
    pub behavior: Behavior,
    pub lives_left: u32,
}

/// An in-progress dash.
#[derive(Debug, Clone, Copy)]
pub struct ThrustBurst {
    pub angle: f64,
    pub elapsed: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerStats {
    pub experience: u64,
    pub xp_to_next_level: u64,
    pub score: u64,
    pub has_won: bool,
    pub initial_size: DVec2,
    pub thrust: Option<ThrustBurst>,
}
