#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use citygrowth::SimConfig;
use citygrowth::sim::{
    CityGenerator, EconomyLedger, EconomySystem, HudState, HudSystem, Simulation,
};
use citygrowth::testutil::{RecordingRender, ScriptedInput};

/// A frame delta long enough to trigger a spawn at every stage.
pub const SPAWN_DT: f32 = 100.0;

/// A simulation with the default systems plus handles into their state.
pub struct Harness {
    pub sim: Simulation,
    pub render: RecordingRender,
    pub input: ScriptedInput,
    pub ledger: Rc<RefCell<EconomyLedger>>,
    pub hud: Rc<RefCell<HudState>>,
}

pub fn harness(config: &SimConfig) -> Harness {
    harness_with_render(config, RecordingRender::default())
}

pub fn harness_with_render(config: &SimConfig, render: RecordingRender) -> Harness {
    let input = ScriptedInput::default();
    let mut sim = Simulation::new(config, Box::new(render.clone()), Box::new(input.clone()));

    let economy = EconomySystem::new(&config.economy);
    let ledger = economy.ledger();
    let hud = HudSystem::new(config);
    let hud_state = hud.state();

    sim.add_system(Box::new(CityGenerator::new(config)));
    sim.add_system(Box::new(economy));
    sim.add_system(Box::new(hud));

    Harness {
        sim,
        render,
        input,
        ledger,
        hud: hud_state,
    }
}
