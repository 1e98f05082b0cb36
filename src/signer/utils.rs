//! Unit conversion and transfer sampling

use crate::{
    config::AgentConfig,
    error::{AgentError, Result},
};
use ethers::types::U256;
use rand::Rng;
use rust_decimal::Decimal;

/// Convert a decimal token amount into the token's smallest unit
///
/// Digits beyond `decimals` are truncated (no rounding).
///
/// # Returns
/// * `Ok(U256)` - The amount in base units
/// * `Err(AgentError)` - If the amount is negative or does not fit in 256 bits
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256> {
    scale_to_base_units(amount, decimals, false)
}

/// Like [`to_base_units`], but digits beyond `decimals` round up.
///
/// Used for inclusive lower bounds, which must never drop below the
/// configured amount.
pub fn to_base_units_ceil(amount: Decimal, decimals: u32) -> Result<U256> {
    scale_to_base_units(amount, decimals, true)
}

fn scale_to_base_units(amount: Decimal, decimals: u32, round_up: bool) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AgentError::encoding("Amount cannot be negative"));
    }

    let amount = amount.normalize();
    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let overflow = || {
        AgentError::config(format!(
            "{} with {} decimals does not fit in 256 bits",
            amount, decimals
        ))
    };

    if scale <= decimals {
        let factor = U256::from(10)
            .checked_pow(U256::from(decimals - scale))
            .ok_or_else(overflow)?;
        mantissa.checked_mul(factor).ok_or_else(overflow)
    } else {
        // scale is at most 28, so the divisor always fits
        let divisor = U256::exp10((scale - decimals) as usize);
        let (quotient, remainder) = mantissa.div_mod(divisor);
        if round_up && !remainder.is_zero() {
            Ok(quotient + U256::one())
        } else {
            Ok(quotient)
        }
    }
}

/// Render a base-unit amount as a decimal token amount, for logging
pub fn format_base_units(value: U256, decimals: u32) -> String {
    if value <= U256::from(i128::MAX as u128) {
        if let Ok(amount) = Decimal::try_from_i128_with_scale(value.as_u128() as i128, decimals) {
            return amount.normalize().to_string();
        }
    }
    format!("{} (base units)", value)
}

/// Bounds used to randomize each transfer
///
/// Amounts are converted to base units once, at startup, so sampling never
/// fails mid-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    gas_limit_min: u64,
    gas_limit_max: u64,
    amount_min: u128,
    amount_max: u128,
}

impl SamplingPolicy {
    /// Build from explicit bounds (lower inclusive, upper exclusive)
    pub fn new(gas_limit: (u64, u64), amount: (U256, U256)) -> Result<Self> {
        let (gas_limit_min, gas_limit_max) = gas_limit;
        if gas_limit_min >= gas_limit_max {
            return Err(AgentError::config("Gas limit range is empty"));
        }

        let (amount_min, amount_max) = amount;
        if amount_min >= amount_max {
            return Err(AgentError::config(
                "Transfer amount range is empty after unit conversion",
            ));
        }
        if amount_max > U256::from(u128::MAX) {
            return Err(AgentError::config("Transfer amount range is too large"));
        }

        Ok(Self {
            gas_limit_min,
            gas_limit_max,
            amount_min: amount_min.as_u128(),
            amount_max: amount_max.as_u128(),
        })
    }

    /// Build from the agent configuration
    ///
    /// The lower amount bound rounds up and the upper one truncates, so every
    /// sample stays inside the configured decimal range.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Self::new(
            (config.gas_limit_min, config.gas_limit_max),
            (
                to_base_units_ceil(config.min_amount, config.token_decimals)?,
                to_base_units(config.max_amount, config.token_decimals)?,
            ),
        )
    }

    /// Uniform gas limit in `[gas_limit_min, gas_limit_max)`.
    ///
    /// This is variance, not an estimate; no estimation endpoint is called.
    pub fn sample_gas_limit<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.gas_limit_min..self.gas_limit_max)
    }

    /// Uniform transfer amount in base units, in `[amount_min, amount_max)`
    pub fn sample_amount<R: Rng + ?Sized>(&self, rng: &mut R) -> U256 {
        U256::from(rng.gen_range(self.amount_min..self.amount_max))
    }

    /// Gas limit bounds
    pub fn gas_limit_range(&self) -> (u64, u64) {
        (self.gas_limit_min, self.gas_limit_max)
    }

    /// Amount bounds in base units
    pub fn amount_range(&self) -> (U256, U256) {
        (U256::from(self.amount_min), U256::from(self.amount_max))
    }
}
