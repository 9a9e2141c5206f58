// 6.0 oracle.rs: per tick value samples in a fixed ring buffer.
// one sample per tick, taken before the first swap of that tick moves the price.

use crate::error::MarketError;
use crate::math::{self, mul_div};
use crate::types::{unit, Amount, Tick};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

pub const MIN_ORACLE_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSample {
    pub value: Amount,
    pub tick: Tick,
}

/** 6.1: ring buffer. cursor is the next write slot, count saturates at capacity */
#[derive(Debug, Clone)]
pub struct OracleBuffer {
    samples: Vec<OracleSample>,
    capacity: usize,
    cursor: usize,
    count: usize,
    last_tick: Option<Tick>,
}

impl OracleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_ORACLE_LENGTH);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            count: 0,
            last_tick: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True if nothing has been recorded for `tick` yet.
    pub fn needs_sample(&self, tick: Tick) -> bool {
        self.last_tick != Some(tick)
    }

    // returns false if this tick already has its sample
    pub fn record(&mut self, value: Amount, tick: Tick) -> bool {
        if !self.needs_sample(tick) {
            return false;
        }
        let sample = OracleSample { value, tick };
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.cursor] = sample;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
        self.count = (self.count + 1).min(self.capacity);
        self.last_tick = Some(tick);
        true
    }

    pub fn latest(&self) -> Option<OracleSample> {
        if self.count == 0 {
            return None;
        }
        let index = (self.cursor + self.capacity - 1) % self.capacity;
        self.samples.get(index).copied()
    }

    /// Sample `index` counted from the oldest retained one.
    pub fn get(&self, index: usize) -> Option<OracleSample> {
        if index >= self.count {
            return None;
        }
        let oldest = (self.cursor + self.capacity - self.count) % self.capacity;
        self.samples.get((oldest + index) % self.capacity).copied()
    }

    // 6.2: floor average of the newest `n` samples
    pub fn average(&self, n: usize) -> Result<Amount, MarketError> {
        if n == 0 {
            return Err(MarketError::InvalidAmount {
                amount: U256::zero(),
                reason: "averaging window must be non-zero",
            });
        }
        if n > self.count {
            return Err(MarketError::OracleNotReady {
                required: n,
                available: self.count,
            });
        }
        let mut total = U256::zero();
        for i in (self.count - n)..self.count {
            if let Some(sample) = self.get(i) {
                total = math::add(total, sample.value)?;
            }
        }
        Ok(total / U256::from(n))
    }
}

/// 6.3: asset value (Rbear / Rbull)^2 in 18 decimal fixed point.
pub fn asset_value(bull: Amount, bear: Amount) -> Result<Amount, MarketError> {
    if bull.is_zero() {
        return Err(MarketError::ReserveUninitialized);
    }
    let numerator = math::mul(bear, bear)?;
    let denominator = math::mul(bull, bull)?;
    Ok(mul_div(numerator, unit(), denominator)?)
}
