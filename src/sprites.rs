use std::collections::{HashMap, HashSet};

/// Shape the fish shader draws for a sprite. Values are the shader's frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SpriteShape {
    /// Plain filled rectangle, used when no sprite resolves.
    Placeholder = 0,
    Backdrop = 1,
    Fish = 2,
    Barracuda = 3,
    Player = 4,
}

/// Opaque visual handle resolved by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteHandle {
    /// RGBA packed as u32.
    pub color: u32,
    pub shape: SpriteShape,
}

/// What an entity without a sprite is drawn as.
pub const PLACEHOLDER: SpriteHandle = SpriteHandle {
    color: 0xFFFFFFFF,
    shape: SpriteShape::Placeholder,
};

/// Name -> sprite lookup. Unknown names resolve to `None` and are logged once.
pub struct SpriteAtlas {
    sprites: HashMap<String, SpriteHandle>,
    warned: HashSet<String>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self {
            sprites: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    /// The procedural sprites the shader knows how to draw.
    pub fn builtin() -> Self {
        let mut atlas = Self::new();
        atlas.insert("BACKGROUND", 0x0B3D6BFF, SpriteShape::Backdrop);
        atlas.insert("PLAYER", 0xFFB020FF, SpriteShape::Player);
        atlas.insert("SMALL FISH", 0x9AD8F0FF, SpriteShape::Fish);
        atlas.insert("MEDIUM FISH", 0x5BC28AFF, SpriteShape::Fish);
        atlas.insert("LARGE FISH", 0xD0584AFF, SpriteShape::Fish);
        atlas.insert("BARRACUDA", 0x8A94A6FF, SpriteShape::Barracuda);
        atlas
    }

    pub fn insert(&mut self, name: &str, color: u32, shape: SpriteShape) {
        self.sprites
            .insert(name.to_owned(), SpriteHandle { color, shape });
    }

    pub fn resolve(&mut self, name: &str) -> Option<SpriteHandle> {
        let found = self.sprites.get(name).copied();
        if found.is_none() && self.warned.insert(name.to_owned()) {
            log::warn!("Sprite {name:?} not found, drawing placeholder");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sprites_resolve() {
        let mut atlas = SpriteAtlas::builtin();
        assert_eq!(atlas.resolve("BARRACUDA").unwrap().shape, SpriteShape::Barracuda);
    }

    #[test]
    fn unknown_sprite_is_absent() {
        let mut atlas = SpriteAtlas::builtin();
        assert!(atlas.resolve("WARNING SIGN").is_none());
        // Second lookup is still absent, just not logged again.
        assert!(atlas.resolve("WARNING SIGN").is_none());
        assert_eq!(atlas.warned.len(), 1);
    }
}
