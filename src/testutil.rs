//! Frontend doubles and helpers shared by unit tests, integration tests and
//! headless tools.

use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::entity::Entity;

use crate::config::SimConfig;
use crate::sim::{
    Drawable, Headless, HitRegion, InputSink, Message, MessageBus, MessageKind, Placement,
    RenderSink, Simulation,
};

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub entity: Entity,
    pub drawable: Drawable,
    pub placement: Placement,
}

/// Render layer that records every registration. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingRender {
    registered: Rc<RefCell<Vec<Registration>>>,
    font_missing: bool,
}

impl RecordingRender {
    /// A render layer whose HUD font failed to load.
    pub fn without_font() -> Self {
        Self {
            font_missing: true,
            ..Self::default()
        }
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.registered.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Registration) -> bool) -> usize {
        self.registered.borrow().iter().filter(|r| pred(r)).count()
    }
}

impl RenderSink for RecordingRender {
    fn resolves(&self, drawable: &Drawable) -> bool {
        !(self.font_missing && matches!(drawable, Drawable::Text { .. }))
    }

    fn register(&mut self, entity: Entity, drawable: &Drawable, placement: &Placement) {
        self.registered.borrow_mut().push(Registration {
            entity,
            drawable: drawable.clone(),
            placement: *placement,
        });
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct InputLog {
    regions: Vec<(Entity, HitRegion, bool)>,
    clicks: Vec<Entity>,
}

/// Input layer driven by the test: clicks are queued up front and consumed
/// when the kernel polls. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    log: Rc<RefCell<InputLog>>,
}

impl ScriptedInput {
    /// Queue an activation of `entity` for the next poll.
    pub fn click(&self, entity: Entity) {
        self.log.borrow_mut().clicks.push(entity);
    }

    /// Click at a pixel position, activating every tracked region under it.
    /// Returns how many entities were hit.
    pub fn click_at(&self, x: f32, y: f32) -> usize {
        let mut log = self.log.borrow_mut();
        let hits: Vec<Entity> = log
            .regions
            .iter()
            .filter(|(_, region, track)| *track && region.contains(x, y))
            .map(|(entity, _, _)| *entity)
            .collect();
        log.clicks.extend(&hits);
        hits.len()
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.log.borrow().regions.iter().any(|(e, _, _)| *e == entity)
    }

    pub fn registered_count(&self) -> usize {
        self.log.borrow().regions.len()
    }
}

impl InputSink for ScriptedInput {
    fn register(&mut self, entity: Entity, region: HitRegion, track: bool) {
        self.log.borrow_mut().regions.push((entity, region, track));
    }

    fn activated(&mut self, entity: Entity) -> bool {
        let mut log = self.log.borrow_mut();
        let Some(pos) = log.clicks.iter().position(|e| *e == entity) else {
            return false;
        };
        log.clicks.remove(pos);
        true
    }

    fn unregister(&mut self, entity: Entity) {
        let mut log = self.log.borrow_mut();
        log.regions.retain(|(e, _, _)| *e != entity);
        log.clicks.retain(|e| *e != entity);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Default systems wired to no-op frontends.
pub fn headless_sim(config: &SimConfig) -> Simulation {
    Simulation::with_default_systems(config, Box::new(Headless), Box::new(Headless))
}

/// Record every message of `kind` published on `bus` from now on.
pub fn collect(bus: &MessageBus, kind: MessageKind) -> Rc<RefCell<Vec<Message>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(kind, move |msg| sink.borrow_mut().push(msg.clone()));
    seen
}
