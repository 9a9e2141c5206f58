// 6.4 guard.rs: same tick repeat action lock. keyed on both the direct and the originating caller.

use crate::error::MarketError;
use crate::types::{Address, CallContext, Tick};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct FlashloanGuard {
    last_action: HashMap<Address, Tick>,
}

impl FlashloanGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, ctx: &CallContext) -> Result<(), MarketError> {
        for caller in [ctx.sender, ctx.origin] {
            if self.last_action.get(&caller) == Some(&ctx.tick) {
                return Err(MarketError::FlashloanGuardTriggered {
                    caller,
                    tick: ctx.tick,
                });
            }
        }
        Ok(())
    }

    /// Ticks only move forward, so entries from earlier ticks can never block
    /// again and are dropped here.
    pub fn record(&mut self, ctx: &CallContext) {
        self.last_action.retain(|_, tick| *tick >= ctx.tick);
        self.last_action.insert(ctx.sender, ctx.tick);
        self.last_action.insert(ctx.origin, ctx.tick);
    }

    pub fn last_action(&self, caller: Address) -> Option<Tick> {
        self.last_action.get(&caller).copied()
    }

    pub fn tracked(&self) -> usize {
        self.last_action.len()
    }
}
