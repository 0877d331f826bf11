use std::rc::Rc;

use bevy_ecs::bundle::Bundle;
use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::bus::MessageBus;
use super::frontend::{Drawable, HitRegion, InputSink, Placement, RenderSink};
use super::message::Message;

/// Viewport size in pixels, as last reported by the window layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Everything a system may touch outside its own state.
///
/// Owns the entity store, the message bus, the RNG and the frontend
/// collaborators. Created by [`Simulation`](super::Simulation) and lent to
/// systems on attach and on every tick.
pub struct SimWorld {
    pub entities: World,
    pub rng: SmallRng,
    bus: Rc<MessageBus>,
    render: Box<dyn RenderSink>,
    input: Box<dyn InputSink>,
    viewport: Viewport,
    despawn_queue: Vec<Entity>,
}

impl SimWorld {
    pub fn new(
        seed: u64,
        viewport: Viewport,
        render: Box<dyn RenderSink>,
        input: Box<dyn InputSink>,
    ) -> Self {
        Self {
            entities: World::new(),
            rng: SmallRng::seed_from_u64(seed),
            bus: Rc::new(MessageBus::new()),
            render,
            input,
            viewport,
            despawn_queue: Vec::new(),
        }
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// Shared handle to the bus, for code that publishes outside a tick.
    pub fn bus_handle(&self) -> Rc<MessageBus> {
        Rc::clone(&self.bus)
    }

    pub fn publish(&self, message: Message) -> usize {
        self.bus.publish(message)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Spawn an entity with no visual representation.
    pub fn spawn(&mut self, bundle: impl Bundle) -> Entity {
        self.entities.spawn(bundle).id()
    }

    /// Spawn a drawn entity and hand it to the render layer.
    ///
    /// Returns `None`, without leaving anything behind, when the render layer
    /// cannot resolve the drawable's assets.
    pub fn spawn_visual(
        &mut self,
        bundle: impl Bundle,
        drawable: Drawable,
        placement: Placement,
    ) -> Option<Entity> {
        if !self.render.resolves(&drawable) {
            tracing::warn!(?drawable, "asset not loaded, entity not registered");
            return None;
        }
        let entity = self
            .entities
            .spawn((bundle, drawable.clone(), placement))
            .id();
        self.render.register(entity, &drawable, &placement);
        Some(entity)
    }

    pub fn register_hit_region(&mut self, entity: Entity, region: HitRegion, track: bool) {
        self.input.register(entity, region, track);
    }

    pub fn activated(&mut self, entity: Entity) -> bool {
        self.input.activated(entity)
    }

    /// Schedule `entity` for removal once the current frame's systems have run.
    pub fn queue_despawn(&mut self, entity: Entity) {
        self.despawn_queue.push(entity);
    }

    pub(super) fn take_despawn_queue(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.despawn_queue)
    }

    /// Remove `entity` from the store and the input layer. Returns false if it
    /// did not exist.
    pub(super) fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.despawn(entity) {
            return false;
        }
        self.input.unregister(entity);
        true
    }
}
