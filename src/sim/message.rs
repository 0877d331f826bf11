use bevy_ecs::entity::Entity;

use super::frontend::HitRegion;
use super::occupancy::{GridCell, TileIndex};

/// Settlement classification, driving income weighting.
///
/// Upgrades are decided outside the kernel and arrive as
/// [`Message::TierChanged`]. Tiers never downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    New,
    Town,
    City,
    Metro,
}

/// A message routed through the [`MessageBus`](super::MessageBus).
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A settlement moved between tiers. `old` is `None` when it was just created.
    TierChanged {
        settlement: Entity,
        old: Option<Tier>,
        new: Tier,
    },

    /// A maintenance officer was hired. Officers are never dismissed.
    OfficerAdded,

    /// The economy applied an accrual.
    BalanceChanged { balance: i64 },

    /// An entity wants to be selectable, showing `lines` in the HUD when activated.
    SelectionRequested {
        entity: Entity,
        lines: [String; 4],
        region: HitRegion,
    },

    /// The viewport changed size.
    ViewportResized { width: u32, height: u32 },

    /// The generator placed a settlement.
    SettlementBuilt {
        settlement: Entity,
        cell: GridCell,
        tile: TileIndex,
        layout: &'static str,
        /// Settlements built so far, including this one.
        built: u32,
        /// Seconds until the next scheduled spawn.
        next_interval: f32,
    },

    /// The player asked for a settlement at a specific cell.
    BuildRequested { cell: GridCell },
}

/// Subscription key for [`Message`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    TierChanged,
    OfficerAdded,
    BalanceChanged,
    SelectionRequested,
    ViewportResized,
    SettlementBuilt,
    BuildRequested,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::TierChanged { .. } => MessageKind::TierChanged,
            Message::OfficerAdded => MessageKind::OfficerAdded,
            Message::BalanceChanged { .. } => MessageKind::BalanceChanged,
            Message::SelectionRequested { .. } => MessageKind::SelectionRequested,
            Message::ViewportResized { .. } => MessageKind::ViewportResized,
            Message::SettlementBuilt { .. } => MessageKind::SettlementBuilt,
            Message::BuildRequested { .. } => MessageKind::BuildRequested,
        }
    }
}
