//! Run the city kernel without a frontend and log how it grows.
//!
//! ```text
//! cargo run --example headless -- [config.json] [minutes]
//! ```

use std::path::PathBuf;

use citygrowth::SimConfig;
use citygrowth::sim::{Message, MessageKind};
use citygrowth::testutil::{collect, headless_sim};
use tracing_subscriber::EnvFilter;

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next().map(PathBuf::from) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%err, "could not load config");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let minutes: u32 = args.next().and_then(|m| m.parse().ok()).unwrap_or(10);

    let mut sim = headless_sim(&config);
    let built = collect(&sim.bus(), MessageKind::SettlementBuilt);
    let balances = collect(&sim.bus(), MessageKind::BalanceChanged);

    let frames = u64::from(minutes) * 60 * 60;
    for frame in 0..frames {
        if let Err(err) = sim.tick(FRAME_DT) {
            tracing::error!(frame, %err, "simulation fault");
            break;
        }
        if frame % 3600 == 3599 {
            let balance = match balances.borrow().last() {
                Some(Message::BalanceChanged { balance }) => *balance,
                _ => config.economy.starting_balance,
            };
            tracing::info!(
                minute = (frame + 1) / 3600,
                built = built.borrow().len(),
                balance,
                "progress"
            );
        }
    }

    tracing::info!(
        built = built.borrow().len(),
        elapsed = sim.elapsed(),
        "run finished"
    );
    sim.shutdown();
}
