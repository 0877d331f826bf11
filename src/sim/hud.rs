//! HUD presentation state: four selection lines and the balance line.
//!
//! Bus handlers only update [`HudState`]. The tick registers new selectables
//! with the input layer, polls activations, and writes the resulting text and
//! anchors onto the HUD text entities for the render layer.

use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::change_detection::DetectChangesMut;
use bevy_ecs::entity::Entity;

use super::components::{HudSlot, HudText};
use super::context::TickContext;
use super::frontend::{Drawable, HitRegion, Placement};
use super::message::{Message, MessageKind};
use super::system::SimSystem;
use super::world::SimWorld;
use crate::config::{HudConfig, SimConfig};
use crate::error::SimError;

pub const PLACEHOLDER_LINES: [&str; 4] = [
    "Nothing selected!",
    "Click on an entity",
    "to get information",
    "about it here.",
];

/// An entity the player can click to show its description.
#[derive(Debug, Clone, PartialEq)]
pub struct Selectable {
    pub entity: Entity,
    pub lines: [String; 4],
    pub region: HitRegion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudState {
    /// Text of the four selection lines.
    pub lines: [String; 4],
    pub balance_text: String,
    /// Vertical pixel anchor of each selection line.
    pub line_anchors: [f32; 4],
    pub balance_anchor: f32,
    pub selected: Option<Entity>,
    /// Selectables registered with the input layer.
    pub selectables: Vec<Selectable>,
    /// Selectables announced but not yet registered.
    pub pending: Vec<Selectable>,
    line_offsets: [f32; 4],
    balance_offset: f32,
    dirty: bool,
}

impl HudState {
    /// Placeholder selection lines and `balance`, anchored for the configured viewport.
    pub fn new(config: &HudConfig, balance: i64) -> Self {
        let mut state = Self {
            lines: PLACEHOLDER_LINES.map(String::from),
            balance_text: format_balance(balance),
            line_anchors: [0.0; 4],
            balance_anchor: 0.0,
            selected: None,
            selectables: Vec::new(),
            pending: Vec::new(),
            line_offsets: config.line_offsets,
            balance_offset: config.balance_offset,
            dirty: true,
        };
        state.resize(config.viewport_height);
        state
    }

    /// Re-anchor every line at its fixed distance from the bottom edge.
    pub fn resize(&mut self, height: u32) {
        let height = height as f32;
        self.line_anchors = self.line_offsets.map(|offset| height - offset);
        self.balance_anchor = height - self.balance_offset;
        self.dirty = true;
    }

    pub fn set_balance(&mut self, balance: i64) {
        self.balance_text = format_balance(balance);
        self.dirty = true;
    }

    pub fn select(&mut self, entity: Entity, lines: [String; 4]) {
        self.lines = lines;
        self.selected = Some(entity);
        self.dirty = true;
    }

    pub fn forget(&mut self, entity: Entity) {
        self.selectables.retain(|s| s.entity != entity);
        self.pending.retain(|s| s.entity != entity);
    }
}

pub fn format_balance(balance: i64) -> String {
    format!("${balance}")
}

pub struct HudSystem {
    config: HudConfig,
    state: Rc<RefCell<HudState>>,
    /// Text surfaces that made it to the render layer, by slot.
    surfaces: Vec<(HudSlot, Entity)>,
}

impl HudSystem {
    /// Shows the economy's starting balance until the first accrual.
    pub fn new(config: &SimConfig) -> Self {
        let state = HudState::new(&config.hud, config.economy.starting_balance);
        Self {
            config: config.hud.clone(),
            state: Rc::new(RefCell::new(state)),
            surfaces: Vec::new(),
        }
    }

    /// Shared view of the HUD state, usable after the system is boxed.
    pub fn state(&self) -> Rc<RefCell<HudState>> {
        Rc::clone(&self.state)
    }

    fn slot_text(state: &HudState, slot: HudSlot) -> (&str, f32) {
        match slot {
            HudSlot::Line(i) => (state.lines[i].as_str(), state.line_anchors[i]),
            HudSlot::Balance => (state.balance_text.as_str(), state.balance_anchor),
        }
    }

    fn text_drawable(&self, content: &str) -> Drawable {
        Drawable::Text {
            content: content.to_string(),
            font_size: self.config.font_size,
        }
    }

    fn text_placement(&self, anchor: f32) -> Placement {
        Placement {
            x: 0.0,
            y: anchor,
            width: 0.0,
            height: self.config.font_size,
            z: self.config.z,
        }
    }

    /// Copy text and anchors onto the HUD entities. Components are only
    /// written when their value differs, so `Changed<_>` filters see real edits.
    fn sync_surfaces(&self, world: &mut SimWorld) {
        let state = self.state.borrow();
        for &(slot, entity) in &self.surfaces {
            let (content, anchor) = Self::slot_text(&state, slot);
            if let Some(mut drawable) = world.entities.get_mut::<Drawable>(entity) {
                drawable.set_if_neq(self.text_drawable(content));
            }
            if let Some(mut placement) = world.entities.get_mut::<Placement>(entity)
                && placement.y != anchor
            {
                placement.y = anchor;
            }
        }
    }
}

impl SimSystem for HudSystem {
    fn name(&self) -> &str {
        "hud"
    }

    fn attach(&mut self, world: &mut SimWorld) {
        self.state.borrow_mut().resize(world.viewport().height);

        let slots = (0..4).map(HudSlot::Line).chain([HudSlot::Balance]);
        for slot in slots {
            let (drawable, placement) = {
                let state = self.state.borrow();
                let (content, anchor) = Self::slot_text(&state, slot);
                (self.text_drawable(content), self.text_placement(anchor))
            };
            if let Some(entity) = world.spawn_visual(HudText { slot }, drawable, placement) {
                self.surfaces.push((slot, entity));
            }
        }

        let state = Rc::clone(&self.state);
        world.bus().subscribe(MessageKind::SelectionRequested, move |msg| {
            let Message::SelectionRequested {
                entity,
                lines,
                region,
            } = msg
            else {
                return;
            };
            state.borrow_mut().pending.push(Selectable {
                entity: *entity,
                lines: lines.clone(),
                region: *region,
            });
        });

        let state = Rc::clone(&self.state);
        world.bus().subscribe(MessageKind::BalanceChanged, move |msg| {
            if let Message::BalanceChanged { balance } = msg {
                state.borrow_mut().set_balance(*balance);
            }
        });

        let state = Rc::clone(&self.state);
        world.bus().subscribe(MessageKind::ViewportResized, move |msg| {
            if let Message::ViewportResized { height, .. } = msg {
                state.borrow_mut().resize(*height);
            }
        });
        tracing::info!(surfaces = self.surfaces.len(), "hud attached");
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        let world = &mut *ctx.world;
        let pending = std::mem::take(&mut self.state.borrow_mut().pending);
        for selectable in pending {
            world.register_hit_region(selectable.entity, selectable.region, true);
            self.state.borrow_mut().selectables.push(selectable);
        }

        let activated = {
            let state = self.state.borrow();
            state
                .selectables
                .iter()
                .filter(|s| world.activated(s.entity))
                .last()
                .map(|s| (s.entity, s.lines.clone()))
        };
        if let Some((entity, lines)) = activated {
            tracing::debug!(?entity, "selection shown");
            self.state.borrow_mut().select(entity, lines);
        }

        let dirty = std::mem::replace(&mut self.state.borrow_mut().dirty, false);
        if dirty {
            self.sync_surfaces(world);
        }
        Ok(())
    }

    fn entity_detached(&mut self, entity: Entity) {
        self.state.borrow_mut().forget(entity);
        self.surfaces.retain(|&(_, e)| e != entity);
    }
}
