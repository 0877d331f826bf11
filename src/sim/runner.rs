use std::rc::Rc;

use bevy_ecs::entity::Entity;

use super::bus::MessageBus;
use super::context::TickContext;
use super::economy::EconomySystem;
use super::frontend::{InputSink, RenderSink};
use super::generator::CityGenerator;
use super::hud::HudSystem;
use super::message::Message;
use super::system::SimSystem;
use super::world::{SimWorld, Viewport};
use crate::config::SimConfig;
use crate::error::SimError;

/// Owns the world handle and the ordered list of systems, and drives them
/// once per frame.
///
/// Systems attach and tick in registration order. The scheduler never looks
/// past the [`SimSystem`] trait.
pub struct Simulation {
    world: SimWorld,
    systems: Vec<Box<dyn SimSystem>>,
    frames: u64,
    elapsed: f64,
}

impl Simulation {
    /// An empty world with no systems.
    pub fn new(
        config: &SimConfig,
        render: Box<dyn RenderSink>,
        input: Box<dyn InputSink>,
    ) -> Self {
        let viewport = Viewport {
            width: config.hud.viewport_width,
            height: config.hud.viewport_height,
        };
        Self {
            world: SimWorld::new(config.seed, viewport, render, input),
            systems: Vec::new(),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// A world running the city generator, the economy and the HUD, in that order.
    pub fn with_default_systems(
        config: &SimConfig,
        render: Box<dyn RenderSink>,
        input: Box<dyn InputSink>,
    ) -> Self {
        let mut sim = Self::new(config, render, input);
        sim.add_system(Box::new(CityGenerator::new(config)));
        sim.add_system(Box::new(EconomySystem::new(&config.economy)));
        sim.add_system(Box::new(HudSystem::new(config)));
        sim
    }

    /// Attach `system` and append it to the tick order.
    pub fn add_system(&mut self, mut system: Box<dyn SimSystem>) {
        system.attach(&mut self.world);
        self.systems.push(system);
    }

    /// Advance every system by `dt` seconds.
    ///
    /// All systems tick even if an earlier one fails. Entities queued for
    /// removal are despawned afterwards. Returns the first error raised this
    /// frame; every error is logged.
    pub fn tick(&mut self, dt: f32) -> Result<(), SimError> {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::warn!(dt, "invalid frame delta, treating as zero");
            0.0
        };

        let mut first_error = None;
        for system in self.systems.iter_mut() {
            let mut ctx = TickContext {
                dt,
                world: &mut self.world,
            };
            if let Err(err) = system.tick(&mut ctx) {
                tracing::error!(system = system.name(), %err, "system tick failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        for entity in self.world.take_despawn_queue() {
            self.despawn(entity);
        }

        self.frames += 1;
        self.elapsed += f64::from(dt);
        first_error.map_or(Ok(()), Err)
    }

    /// Remove `entity` from the world and tell every system. Returns false if
    /// it did not exist.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.world.despawn(entity) {
            return false;
        }
        for system in self.systems.iter_mut() {
            system.entity_detached(entity);
        }
        true
    }

    pub fn publish(&self, message: Message) -> usize {
        self.world.publish(message)
    }

    /// Record the new viewport size and announce it.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.world.set_viewport(Viewport { width, height });
        self.world.publish(Message::ViewportResized { width, height });
    }

    pub fn bus(&self) -> Rc<MessageBus> {
        self.world.bus_handle()
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SimWorld {
        &mut self.world
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds since the world started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// End the world: drop every bus subscription so handlers release the
    /// state they captured.
    pub fn shutdown(self) {
        self.world.bus().clear();
        tracing::info!(frames = self.frames, elapsed = self.elapsed, "simulation shut down");
    }
}
