//! Seams to the rendering and input layers, which live outside the kernel.

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

/// What the render layer should draw for an entity.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Drawable {
    /// One tile from the shared city atlas.
    AtlasTile { index: u32 },
    /// A line of HUD text.
    Text { content: String, font_size: f32 },
}

/// Pixel-space position, size and layer of a drawn entity.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z: i32,
}

/// Axis-aligned pixel rectangle used for hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HitRegion {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Receives visual entities created by the kernel.
///
/// Each entity is registered once. Later edits, such as HUD text or anchors
/// moving on resize, are written to its [`Drawable`] and [`Placement`]
/// components in `SimWorld::entities` and are not sent here again. A frontend
/// picks them up with a `Changed<Drawable>` or `Changed<Placement>` query and
/// calls `World::clear_trackers` once it has drawn the frame.
pub trait RenderSink {
    /// Whether the assets behind `drawable` are loaded. Unresolved drawables
    /// are never registered.
    fn resolves(&self, drawable: &Drawable) -> bool {
        let _ = drawable;
        true
    }

    fn register(&mut self, entity: Entity, drawable: &Drawable, placement: &Placement);
}

/// Hit-testing for selectable entities.
pub trait InputSink {
    fn register(&mut self, entity: Entity, region: HitRegion, track: bool);

    /// Whether `entity` was activated since the last poll. Polling consumes
    /// the activation.
    fn activated(&mut self, entity: Entity) -> bool;

    fn unregister(&mut self, entity: Entity) {
        let _ = entity;
    }
}

/// Collaborator for headless runs: draws nothing, never activates anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl RenderSink for Headless {
    fn register(&mut self, _entity: Entity, _drawable: &Drawable, _placement: &Placement) {}
}

impl InputSink for Headless {
    fn register(&mut self, _entity: Entity, _region: HitRegion, _track: bool) {}

    fn activated(&mut self, _entity: Entity) -> bool {
        false
    }
}
