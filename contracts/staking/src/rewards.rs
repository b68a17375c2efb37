use crate::{position::StakePosition, ContractError};

/// Fixed-point scaling factor.
///
/// Reward rates and the cumulative reward index are multiplied by this
/// constant before storage so that per-unit, per-second rewards far below one
/// token unit keep their precision without floating-point arithmetic.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

/// Day-count convention for APR conversion: a 365-day year.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// 10_000 basis points = 100 %.
pub const BPS_DENOMINATOR: i128 = 10_000;

// ── Global index ────────────────────────────────────────────────────────────

/// Reward per staked unit (scaled by `SCALE`) emitted over `elapsed` seconds.
pub fn index_delta(reward_rate: i128, elapsed: u64) -> Result<i128, ContractError> {
    reward_rate
        .checked_mul(i128::from(elapsed))
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Advance the cumulative reward index by `elapsed` seconds at `reward_rate`.
///
/// ```text
/// new_index = stored + reward_rate × elapsed
/// ```
///
/// Unlike a pool-emission accumulator the index does not divide by the total
/// stake: the rate is already expressed per staked unit, so the index keeps
/// moving while nobody is staked and an idle position still earns exactly the
/// rates that were in force while it sat untouched.
pub fn advance_index(stored: i128, reward_rate: i128, elapsed: u64) -> Result<i128, ContractError> {
    stored
        .checked_add(index_delta(reward_rate, elapsed)?)
        .ok_or(ContractError::ArithmeticOverflow)
}

// ── Per-position accrual ────────────────────────────────────────────────────

/// Bring `position` up to `current_index` at time `now`.
///
/// ```text
/// scaled  = principal × (current_index − reward_index_paid) + reward_remainder
/// accrued = floor(scaled / SCALE)
/// ```
///
/// The sub-unit remainder is carried into the next checkpoint rather than
/// dropped, so accruing in several steps yields exactly the same total as a
/// single accrual over the whole span. Floor division means the result is
/// never rounded up, whatever the call pattern.
///
/// Returns the updated position and the amount newly added to
/// `accrued_rewards`.
pub fn accrue(
    position: &StakePosition,
    current_index: i128,
    now: u64,
) -> Result<(StakePosition, i128), ContractError> {
    let (newly_accrued, remainder) = split_scaled(position, current_index)?;

    let mut updated = position.clone();
    updated.accrued_rewards = position
        .accrued_rewards
        .checked_add(newly_accrued)
        .ok_or(ContractError::ArithmeticOverflow)?;
    updated.reward_remainder = remainder;
    updated.reward_index_paid = current_index;
    updated.last_accrual = now.max(position.last_accrual);

    Ok((updated, newly_accrued))
}

/// Single-rate form of [`accrue`]: the rate is assumed constant since the
/// position's last checkpoint.
///
/// ```text
/// accrued = floor(elapsed × principal × reward_rate / SCALE)
/// ```
pub fn accrue_at_rate(
    position: &StakePosition,
    now: u64,
    reward_rate: i128,
) -> Result<(StakePosition, i128), ContractError> {
    let elapsed = now.saturating_sub(position.last_accrual);
    let current_index = advance_index(position.reward_index_paid, reward_rate, elapsed)?;
    accrue(position, current_index, now)
}

/// Rewards the position would hold after accruing to `current_index`,
/// without producing an updated record.
pub fn pending(position: &StakePosition, current_index: i128) -> Result<i128, ContractError> {
    let (newly_accrued, _) = split_scaled(position, current_index)?;
    position
        .accrued_rewards
        .checked_add(newly_accrued)
        .ok_or(ContractError::ArithmeticOverflow)
}

fn split_scaled(position: &StakePosition, current_index: i128) -> Result<(i128, i128), ContractError> {
    let index_gain = current_index
        .checked_sub(position.reward_index_paid)
        .ok_or(ContractError::ArithmeticOverflow)?;
    // The index is monotone; a checkpoint ahead of the index means corrupted state.
    if index_gain < 0 || position.principal < 0 {
        return Err(ContractError::InvariantViolation);
    }

    scaled_product(position.principal, index_gain, position.reward_remainder)
}

/// `(floor((a × b + carry) / SCALE), (a × b + carry) mod SCALE)` without
/// forming `a × b`.
///
/// Both factors are split at `SCALE`:
///
/// ```text
/// a × b + carry = SCALE × (a × b_hi + a_hi × b_lo) + (a_lo × b_lo + carry)
/// ```
///
/// `a_lo`, `b_lo` and `carry` are all below `SCALE = 10^18`, so the low term
/// stays under `10^36 + 10^18` and always fits. The high terms are bounded
/// by the quotient itself, so the call only fails when the result does not
/// fit in an `i128`.
///
/// Requires `a >= 0`, `b >= 0` and `0 <= carry < SCALE`.
pub fn scaled_product(a: i128, b: i128, carry: i128) -> Result<(i128, i128), ContractError> {
    if !(0..SCALE).contains(&carry) {
        return Err(ContractError::InvariantViolation);
    }
    let (a_hi, a_lo) = (a / SCALE, a % SCALE);
    let (b_hi, b_lo) = (b / SCALE, b % SCALE);

    let low = a_lo * b_lo + carry;
    let quotient = a
        .checked_mul(b_hi)
        .and_then(|v| a_hi.checked_mul(b_lo).and_then(|w| v.checked_add(w)))
        .and_then(|v| v.checked_add(low / SCALE))
        .ok_or(ContractError::ArithmeticOverflow)?;

    Ok((quotient, low % SCALE))
}

// ── APR conversion (display only) ───────────────────────────────────────────

/// Annualised rate in basis points for a per-second scaled `reward_rate`.
pub fn apr_bps(reward_rate: i128) -> Result<i128, ContractError> {
    reward_rate
        .checked_mul(i128::from(SECONDS_PER_YEAR))
        .and_then(|v| v.checked_mul(BPS_DENOMINATOR))
        .map(|v| v / SCALE)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Per-second scaled rate that approximates `apr_bps` from below.
pub fn rate_for_apr_bps(apr_bps: u32) -> i128 {
    SCALE * i128::from(apr_bps) / (BPS_DENOMINATOR * i128::from(SECONDS_PER_YEAR))
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure math, no Soroban environment involved beyond address generation.
