use glam::DVec2;
use hecs::{Component, DynamicBundle, Entity};

use super::components::Position;

/// Every renderable entity: creatures plus scenery.
///
/// Structural changes (spawn/despawn) are only reachable from inside `sim`
/// and go through the population manager. Everyone else gets `&World` and
/// mutates fields through hecs' runtime-checked borrows.
pub struct Universe {
    world: hecs::World,
}

impl Universe {
    pub fn new() -> Self {
        Self {
            world: hecs::World::new(),
        }
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub(super) fn spawn(&mut self, components: impl DynamicBundle) -> Entity {
        self.world.spawn(components)
    }

    pub(super) fn insert_one(&mut self, entity: Entity, component: impl Component) -> bool {
        self.world.insert_one(entity, component).is_ok()
    }

    pub(super) fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn len(&self) -> u32 {
        self.world.len()
    }

    /// Copy a component out. The borrow is released before returning.
    pub fn read<T: Component + Copy>(&self, entity: Entity) -> Option<T> {
        self.world.get::<&T>(entity).ok().map(|c| *c)
    }

    /// Mutate one component in place. Returns `None` if the entity or
    /// component is gone.
    pub fn update<T: Component, R>(&self, entity: Entity, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut component = self.world.get::<&mut T>(entity).ok()?;
        Some(f(&mut component))
    }

    /// Shift every positioned entity by `delta`.
    pub fn translate(&mut self, delta: DVec2) {
        for (_, pos) in self.world.query_mut::<&mut Position>() {
            pos.0 += delta;
        }
    }
}
