use bevy_ecs::entity::Entity;

use super::context::TickContext;
use super::world::SimWorld;
use crate::error::SimError;

/// A pluggable simulation system driven by the [`Simulation`](super::Simulation).
///
/// Object-safe so systems can be stored as `Box<dyn SimSystem>`. The scheduler
/// only ever talks to systems through this trait.
pub trait SimSystem {
    fn name(&self) -> &str;

    /// Called once when the system joins the world, in registration order.
    /// Bus subscriptions and startup entities are created here.
    fn attach(&mut self, world: &mut SimWorld) {
        let _ = world;
    }

    /// Advance the system by `ctx.dt` seconds.
    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError>;

    /// `entity` was removed from the world. Systems tracking entities drop it
    /// here. Default: no-op.
    fn entity_detached(&mut self, entity: Entity) {
        let _ = entity;
    }
}
