use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::entity::Entity;

use super::context::TickContext;
use super::message::{Message, MessageKind, Tier};
use super::system::SimSystem;
use super::world::SimWorld;
use crate::config::EconomyConfig;
use crate::error::SimError;

/// Running balance and the counts that drive income.
///
/// Every settlement sits in exactly one bucket. `New` settlements earn like
/// towns and share the town bucket. Officers and tiers only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EconomyLedger {
    pub balance: i64,
    pub towns: u32,
    pub cities: u32,
    pub metros: u32,
    pub officers: u32,
}

impl EconomyLedger {
    pub fn with_balance(balance: i64) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    fn bucket_mut(&mut self, tier: Tier) -> &mut u32 {
        match tier {
            Tier::New | Tier::Town => &mut self.towns,
            Tier::City => &mut self.cities,
            Tier::Metro => &mut self.metros,
        }
    }

    /// Move a settlement from `old`'s bucket to `new`'s.
    ///
    /// Fails without changing anything if `old`'s bucket is empty, which
    /// means a transition arrived before the one that filled it.
    pub fn apply_tier_change(
        &mut self,
        settlement: Entity,
        old: Option<Tier>,
        new: Tier,
    ) -> Result<(), SimError> {
        if let Some(old) = old {
            let bucket = self.bucket_mut(old);
            if *bucket == 0 {
                return Err(SimError::TierUnderflow {
                    settlement,
                    tier: old,
                });
            }
            *bucket -= 1;
        }
        *self.bucket_mut(new) += 1;
        Ok(())
    }

    pub fn add_officer(&mut self) {
        self.officers += 1;
    }

    pub fn settlements(&self) -> u32 {
        self.towns + self.cities + self.metros
    }

    /// Net change applied per accrual period.
    pub fn income(&self, rates: &EconomyConfig) -> i64 {
        i64::from(self.towns) * rates.town
            + i64::from(self.cities) * rates.city
            + i64::from(self.metros) * rates.metro
            + i64::from(self.officers) * rates.officer
    }
}

/// Integrates income over time and announces the balance every accrual period.
pub struct EconomySystem {
    rates: EconomyConfig,
    ledger: Rc<RefCell<EconomyLedger>>,
    faults: Rc<RefCell<Vec<SimError>>>,
    elapsed: f32,
}

impl EconomySystem {
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            rates: config.clone(),
            ledger: Rc::new(RefCell::new(EconomyLedger::with_balance(
                config.starting_balance,
            ))),
            faults: Rc::new(RefCell::new(Vec::new())),
            elapsed: 0.0,
        }
    }

    /// Shared view of the ledger, usable after the system is boxed.
    pub fn ledger(&self) -> Rc<RefCell<EconomyLedger>> {
        Rc::clone(&self.ledger)
    }
}

impl SimSystem for EconomySystem {
    fn name(&self) -> &str {
        "economy"
    }

    fn attach(&mut self, world: &mut SimWorld) {
        let ledger = Rc::clone(&self.ledger);
        let faults = Rc::clone(&self.faults);
        world.bus().subscribe(MessageKind::TierChanged, move |msg| {
            let Message::TierChanged {
                settlement,
                old,
                new,
            } = msg
            else {
                return;
            };
            if let Err(err) = ledger.borrow_mut().apply_tier_change(*settlement, *old, *new) {
                tracing::error!(%err, "rejected tier transition");
                faults.borrow_mut().push(err);
            }
        });

        let ledger = Rc::clone(&self.ledger);
        world.bus().subscribe(MessageKind::OfficerAdded, move |msg| {
            if let Message::OfficerAdded = msg {
                ledger.borrow_mut().add_officer();
            }
        });
        tracing::info!(period = self.rates.accrual_period, "economy attached");
    }

    fn tick(&mut self, ctx: &mut TickContext) -> Result<(), SimError> {
        self.elapsed += ctx.dt;
        if self.elapsed >= self.rates.accrual_period {
            let balance = {
                let mut ledger = self.ledger.borrow_mut();
                let delta = ledger.income(&self.rates);
                ledger.balance = ledger.balance.saturating_add(delta);
                tracing::debug!(delta, balance = ledger.balance, "income accrued");
                ledger.balance
            };
            self.elapsed = 0.0;
            ctx.world.publish(Message::BalanceChanged { balance });
        }

        let mut faults = self.faults.borrow_mut();
        if faults.is_empty() {
            return Ok(());
        }
        Err(faults.remove(0))
    }
}
