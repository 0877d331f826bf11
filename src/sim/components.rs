use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

use super::message::Tier;
use super::occupancy::{GridCell, TileIndex};

/// Anchor entity of a placed settlement. Selection and tier messages refer to it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Settlement {
    pub cell: GridCell,
    pub tile: TileIndex,
    /// Tier at placement. Later upgrades are tracked by the economy, not here.
    pub tier: Tier,
    pub layout: &'static str,
}

/// One drawn sub-tile of a settlement block.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTile {
    pub settlement: Entity,
    /// Row-major position within the layout.
    pub slot: usize,
}

/// A HUD text surface. Slots 0-3 are the selection lines.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudText {
    pub slot: HudSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudSlot {
    Line(usize),
    Balance,
}
