//! Splitting and ratio allocation over whole minor units.
//!
//! Both operations return parts that sum exactly to the input: no minor
//! unit is created or destroyed.
//!
//! Ratio allocation uses the Largest Remainder Method:
//! 1. Compute each exact share `|total| * ratio`
//! 2. Give every party the floor of its share
//! 3. Hand the shortfall out one unit at a time, largest fractional part
//!    first, ties going to the earlier ratio
//! 4. Reapply the sign of the total

use crate::error::{MoneyError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Divide `total` into `parts` integers that differ by at most 1.
///
/// Leading parts receive the extra units. Negative totals use floor
/// division, so `-5` in two parts is `[-2, -3]`.
///
/// # Examples
///
/// ```
/// use money_engine::allocation::split;
///
/// assert_eq!(split(100, 3).unwrap(), vec![34, 33, 33]);
/// assert_eq!(split(2, 3).unwrap(), vec![1, 1, 0]);
/// assert!(split(1, 0).is_err());
/// ```
pub fn split(total: i64, parts: usize) -> Result<Vec<i64>> {
    if parts == 0 {
        return Err(MoneyError::InvalidArgument(
            "split needs at least one party".to_string(),
        ));
    }
    let n = i64::try_from(parts).map_err(|_| MoneyError::Overflow)?;
    let base = total.div_euclid(n);
    let remainder = total.rem_euclid(n);

    Ok((0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect())
}

/// Divide `total` according to `ratios`.
///
/// Ratios must be non-negative and sum to at most 1. When they sum to less
/// than 1 the unassigned units are still handed out, so the parts always sum
/// to `total`.
///
/// # Examples
///
/// ```
/// use money_engine::allocation::allocate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(allocate(5, &[dec!(0.3), dec!(0.7)]).unwrap(), vec![2, 3]);
/// assert_eq!(
///     allocate(100, &[dec!(0.333), dec!(0.333), dec!(0.333)]).unwrap(),
///     vec![34, 33, 33]
/// );
/// ```
pub fn allocate(total: i64, ratios: &[Decimal]) -> Result<Vec<i64>> {
    validate_ratios(ratios)?;

    let magnitude = Decimal::from(total.unsigned_abs());
    let mut parts: Vec<i128> = Vec::with_capacity(ratios.len());
    let mut remainders: Vec<(usize, Decimal)> = Vec::with_capacity(ratios.len());

    for (i, ratio) in ratios.iter().enumerate() {
        let exact = magnitude.checked_mul(*ratio).ok_or(MoneyError::Overflow)?;
        let floor = exact.floor();
        parts.push(floor.to_i128().ok_or(MoneyError::Overflow)?);
        remainders.push((i, exact - floor));
    }

    let assigned: i128 = parts.iter().sum();
    let shortfall = i128::from(total.unsigned_abs()) - assigned;
    if shortfall < 0 {
        // Only reachable if Decimal rounding pushed the shares past the total.
        return Err(MoneyError::Overflow);
    }

    // Stable sort keeps ratio order among equal remainders.
    remainders.sort_by(|a, b| b.1.cmp(&a.1));

    let count = ratios.len() as i128;
    let rounds = shortfall / count;
    let extra = shortfall % count;
    for (rank, (index, _)) in remainders.iter().enumerate() {
        parts[*index] += rounds + i128::from((rank as i128) < extra);
    }

    let negative = total < 0;
    parts
        .into_iter()
        .map(|part| {
            let signed = if negative { -part } else { part };
            i64::try_from(signed).map_err(|_| MoneyError::Overflow)
        })
        .collect()
}

fn validate_ratios(ratios: &[Decimal]) -> Result<()> {
    if ratios.is_empty() {
        return Err(MoneyError::InvalidArgument(
            "allocate needs at least one ratio".to_string(),
        ));
    }
    if let Some(negative) = ratios.iter().find(|r| r.is_sign_negative() && !r.is_zero()) {
        return Err(MoneyError::InvalidArgument(format!(
            "ratios must be non-negative, got {}",
            negative
        )));
    }
    let sum: Decimal = ratios.iter().sum();
    if sum > Decimal::ONE {
        return Err(MoneyError::InvalidArgument(format!(
            "ratios add up to {}, more than 1",
            sum
        )));
    }
    Ok(())
}
