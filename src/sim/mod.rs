mod bus;
mod components;
mod context;
mod economy;
mod frontend;
mod generator;
mod hud;
mod layouts;
mod message;
mod occupancy;
mod runner;
mod stages;
mod system;
mod world;

pub use bus::MessageBus;
pub use components::{HudSlot, HudText, Settlement, SubTile};
pub use context::TickContext;
pub use economy::{EconomyLedger, EconomySystem};
pub use frontend::{Drawable, Headless, HitRegion, InputSink, Placement, RenderSink};
pub use generator::CityGenerator;
pub use hud::{HudState, HudSystem, PLACEHOLDER_LINES, Selectable, format_balance};
pub use layouts::{LAYOUTS, LayoutTemplate, SUB_TILE_COLUMNS, SUB_TILE_ROWS, SUB_TILES};
pub use message::{Message, MessageKind, Tier};
pub use occupancy::{GridCell, OccupancyRegistry, TileIndex};
pub use runner::Simulation;
pub use stages::{Stage, sample_interval, stage_for};
pub use system::SimSystem;
pub use world::{SimWorld, Viewport};
