//! Fixed point helpers over `U256`.
//!
//! Products go through a 512-bit intermediate so `a * b / c` never overflows
//! unless the quotient itself does.

use primitive_types::{U256, U512};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,
}

fn narrow(value: U512) -> Result<U256, MathError> {
    U256::try_from(value).map_err(|_| MathError::Overflow)
}

/// floor(a * b / c)
pub fn mul_div(a: U256, b: U256, c: U256) -> Result<U256, MathError> {
    if c.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    narrow(a.full_mul(b) / U512::from(c))
}

/// ceil(a * b / c)
pub fn mul_div_up(a: U256, b: U256, c: U256) -> Result<U256, MathError> {
    if c.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = a.full_mul(b);
    let divisor = U512::from(c);
    let quotient = product / divisor;
    if (product % divisor).is_zero() {
        narrow(quotient)
    } else {
        narrow(quotient + U512::one())
    }
}

pub fn ceil_div(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a / b;
    if (a % b).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::one())
    }
}

pub fn add(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub fn sub(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}

pub fn mul(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

// Newton's method, floor. deterministic so replays agree bit for bit.
pub fn isqrt(x: U256) -> U256 {
    if x.is_zero() {
        return U256::zero();
    }
    // (x + 1) / 2 without overflowing at U256::MAX
    let mut z = (x >> 1usize) + (x & U256::one());
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) >> 1usize;
    }
    y
}
