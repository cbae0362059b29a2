use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use hecs::Entity;

use crate::geometry::Rect;
use crate::sim::components::{Colliders, Decoration, Position, Size, Visual};
use crate::sim::Simulation;
use crate::sprites::{SpriteHandle, PLACEHOLDER};

/// Shader frame index for a hollow rectangle (collider outlines).
pub const OUTLINE_FRAME: u32 = 5;

/// Mirror the shape horizontally.
pub const FLAG_FLIP: u32 = 1;

const BODY_OUTLINE: u32 = 0x00FF00FF;
const MOUTH_OUTLINE: u32 = 0xFF0000FF;

/// Per-instance data uploaded to GPU each frame.
/// Stride = 28 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FishInstance {
    /// Top-left corner in screen pixels.
    pub position: [f32; 2],
    /// Width and height in pixels.
    pub size: [f32; 2],
    /// RGBA color packed as u32.
    pub color: u32,
    /// Which procedural shape to draw (see `SpriteShape`).
    pub frame: u32,
    pub flags: u32,
}

impl FishInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x2, // position
        3 => Float32x2, // size
        4 => Uint32,    // color
        5 => Uint32,    // frame
        6 => Uint32,    // flags
    ];

    /// Per-instance vertex layout. Location 0 is the quad corner.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn sprite(position: DVec2, size: DVec2, sprite: SpriteHandle, flip: bool) -> Self {
        Self {
            position: position.as_vec2().into(),
            size: size.as_vec2().into(),
            color: sprite.color,
            frame: sprite.shape as u32,
            flags: if flip { FLAG_FLIP } else { 0 },
        }
    }

    pub fn outline(rect: &Rect, color: u32) -> Self {
        Self {
            position: rect.min.as_vec2().into(),
            size: rect.size.as_vec2().into(),
            color,
            frame: OUTLINE_FRAME,
            flags: 0,
        }
    }
}

/// Fill `out` with this frame's draw list: scenery first, then creatures in
/// registration order, then collider outlines when requested.
pub fn collect(sim: &Simulation, show_colliders: bool, out: &mut Vec<FishInstance>) {
    out.clear();
    let world = sim.universe.world();

    let mut scenery = world.query::<(&Position, &Size, &Visual, &Decoration)>();
    for (_, (pos, size, visual, _)) in scenery.iter() {
        let sprite = visual.sprite.unwrap_or(PLACEHOLDER);
        out.push(FishInstance::sprite(pos.0, size.0, sprite, false));
    }
    drop(scenery);

    for &e in sim.population.entities() {
        if let Some(instance) = creature_instance(sim, e) {
            out.push(instance);
        }
    }

    if show_colliders {
        for &e in sim.population.entities() {
            if let Some(c) = sim.universe.read::<Colliders>(e) {
                out.push(FishInstance::outline(&c.body, BODY_OUTLINE));
                out.push(FishInstance::outline(&c.mouth, MOUTH_OUTLINE));
            }
        }
    }
}

fn creature_instance(sim: &Simulation, e: Entity) -> Option<FishInstance> {
    if !sim.is_visible(e) {
        return None;
    }
    let visual = sim.universe.read::<Visual>(e)?;
    let pos = sim.universe.read::<Position>(e)?.0;
    let size = sim.universe.read::<Size>(e)?.0;
    Some(FishInstance::sprite(
        pos,
        size,
        visual.sprite.unwrap_or(PLACEHOLDER),
        sim.facing_right(e),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::quiet_sim;
    use crate::sprites::SpriteShape;

    #[test]
    fn instance_is_28_bytes() {
        assert_eq!(std::mem::size_of::<FishInstance>(), 28);
    }

    #[test]
    fn layout_offsets_match_fields() {
        let layout = FishInstance::layout();
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 20, 24]);
        assert_eq!(layout.array_stride, 28);
    }

    #[test]
    fn background_drawn_first_then_player() {
        let (sim, _) = quiet_sim();
        let mut out = Vec::new();
        collect(&sim, false, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].frame, SpriteShape::Backdrop as u32);
        assert_eq!(out[1].frame, SpriteShape::Player as u32);
    }

    #[test]
    fn hidden_creatures_are_skipped_and_outlines_added() {
        let (sim, _) = quiet_sim();
        sim.universe
            .update::<Visual, _>(sim.player, |v| v.visible = false);
        let mut out = Vec::new();
        collect(&sim, true, &mut out);
        // background + body and mouth outlines
        assert_eq!(out.len(), 3);
        assert!(out[1..].iter().all(|i| i.frame == OUTLINE_FRAME));
    }

    #[test]
    fn missing_sprite_draws_placeholder() {
        let (mut sim, _) = quiet_sim();
        let e = sim.spawn_enemy(DVec2::new(10.0, 10.0), DVec2::ZERO, 1);
        sim.universe.update::<Visual, _>(e, |v| v.sprite = None);
        let mut out = Vec::new();
        collect(&sim, false, &mut out);
        assert_eq!(out.last().unwrap().frame, SpriteShape::Placeholder as u32);
    }
}
