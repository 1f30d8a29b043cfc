//! Stake-weighted validator selection (spec §4.3).
//!
//! All sampling here is weighted-without-replacement over a candidate's
//! `stake`, driven by a caller-supplied seed so that identical
//! `(candidates ordered by address, seed, k)` always produces identical
//! output.

use accord_types::{AccountId, Validator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

/// Draws up to `k` candidates from `pool` without replacement, with
/// selection probability proportional to stake. Candidates are first
/// sorted by address so that draw order never depends on caller-supplied
/// ordering, only on `seed`.
///
/// Returns fewer than `k` items if `pool` has fewer than `k` eligible
/// (positive-stake) candidates.
pub fn weighted_sample(pool: &[Validator], k: usize, seed: u64) -> Vec<Validator> {
    let mut candidates: Vec<Validator> = pool.iter().filter(|v| v.stake > 0).cloned().collect();
    candidates.sort_by(|a, b| a.address.cmp(&b.address));

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut drawn = Vec::with_capacity(k.min(candidates.len()));

    for _ in 0..k {
        if candidates.is_empty() {
            break;
        }
        let total: u128 = candidates.iter().map(|v| v.stake).sum();
        if total == 0 {
            break;
        }
        let mut roll = (rand::Rng::gen_range(&mut rng, 0u128..total)) as u128;
        let mut pick = 0;
        for (idx, v) in candidates.iter().enumerate() {
            if roll < v.stake {
                pick = idx;
                break;
            }
            roll -= v.stake;
        }
        drawn.push(candidates.remove(pick));
    }
    drawn
}

/// Draws up to `k` candidates from `pool`, excluding any address in
/// `exclude`.
pub fn weighted_sample_excluding(
    pool: &[Validator],
    exclude: &BTreeSet<AccountId>,
    k: usize,
    seed: u64,
) -> Vec<Validator> {
    let filtered: Vec<Validator> = pool
        .iter()
        .filter(|v| !exclude.contains(&v.address))
        .cloned()
        .collect();
    weighted_sample(&filtered, k, seed)
}

/// Draws one validator not currently in `current` and not a previously-used
/// leader, and prepends it to `current` (spec §4.3 "Add-one-for-rotation").
///
/// Returns `None` (leaving `current` untouched) if no eligible candidate
/// remains.
pub fn add_one_for_rotation(
    current: &mut Vec<Validator>,
    pool: &[Validator],
    used_leaders: &BTreeSet<AccountId>,
    seed: u64,
) -> Option<AccountId> {
    let mut exclude: BTreeSet<AccountId> = current.iter().map(|v| v.address).collect();
    exclude.extend(used_leaders.iter().copied());
    let drawn = weighted_sample_excluding(pool, &exclude, 1, seed);
    let picked = drawn.into_iter().next()?;
    let address = picked.address;
    current.insert(0, picked);
    Some(address)
}

/// Outcome of an extra-validator draw for an appeal (spec §4.3 "Extra
/// validators for appeal").
pub struct ExtraValidators {
    pub validators: Vec<Validator>,
    /// `true` if the mathematically implied `m` was clamped to 1 to avoid
    /// an empty slice (SPEC_FULL.md §9, `m` clamp resolution).
    pub clamped: bool,
}

/// Implements the F=0/F=1/F≥2 formulas from spec §4.3.
///
/// `current_validators` excludes the leader; `n = current_validators.len() +
/// 1` per the spec's "including leader" wording. `pool` is the full
/// candidate set; `used` is the union of used-leader addresses and current
/// validator addresses the draw must avoid when picking *new* validators.
pub fn get_extra_validators(
    current_validators: &[Validator],
    pool: &[Validator],
    used: &BTreeSet<AccountId>,
    appeal_failed: u32,
    seed: u64,
) -> Option<ExtraValidators> {
    let n = current_validators.len() as i64 + 1;

    if appeal_failed == 0 {
        let k = (n + 2).max(0) as usize;
        let drawn = weighted_sample_excluding(pool, used, k, seed);
        if drawn.is_empty() && k > 0 {
            return None;
        }
        return Some(ExtraValidators {
            validators: drawn,
            clamped: false,
        });
    }

    let (raw_m, draw_count) = if appeal_failed == 1 {
        let m = (n - 2) / 2;
        (m, m + 1)
    } else {
        let divisor = 2 * appeal_failed as i64 - 1;
        let m = (n - 3) / divisor;
        (m, 2 * m)
    };
    let clamped = raw_m < 1;
    let m = raw_m.max(1);
    let draw_count = if clamped {
        if appeal_failed == 1 {
            m + 1
        } else {
            2 * m
        }
    } else {
        draw_count
    };

    let take_from = ((m - 1).max(0)) as usize;
    let retained: Vec<Validator> = current_validators
        .get(take_from..)
        .map(|s| s.to_vec())
        .unwrap_or_default();

    let drawn = weighted_sample_excluding(pool, used, draw_count.max(0) as usize, seed);
    if drawn.is_empty() && draw_count > 0 {
        return None;
    }

    let mut validators = retained;
    validators.extend(drawn);
    Some(ExtraValidators { validators, clamped })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(label: &str, stake: u128) -> Validator {
        Validator {
            address: AccountId::from_label(label),
            stake,
            llm_config: String::new(),
        }
    }

    #[test]
    fn weighted_sample_is_deterministic_for_same_seed() {
        let pool: Vec<Validator> = (0..10).map(|i| validator(&format!("v{i}"), 10)).collect();
        let a = weighted_sample(&pool, 5, 42);
        let b = weighted_sample(&pool, 5, 42);
        assert_eq!(
            a.iter().map(|v| v.address).collect::<Vec<_>>(),
            b.iter().map(|v| v.address).collect::<Vec<_>>()
        );
    }

    #[test]
    fn weighted_sample_caps_at_pool_size() {
        let pool: Vec<Validator> = (0..3).map(|i| validator(&format!("v{i}"), 1)).collect();
        let drawn = weighted_sample(&pool, 10, 1);
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn extra_validators_f0_draws_n_plus_2() {
        let current: Vec<Validator> = (0..4).map(|i| validator(&format!("c{i}"), 1)).collect();
        let pool: Vec<Validator> = (0..20).map(|i| validator(&format!("p{i}"), 1)).collect();
        let used = BTreeSet::new();
        let extra = get_extra_validators(&current, &pool, &used, 0, 7).unwrap();
        // n = 4 + 1 = 5, draw n+2 = 7
        assert_eq!(extra.validators.len(), 7);
        assert!(!extra.clamped);
    }

    #[test]
    fn extra_validators_clamps_m_to_one() {
        // n small enough that raw m would be <= 0.
        let current: Vec<Validator> = Vec::new();
        let pool: Vec<Validator> = (0..20).map(|i| validator(&format!("p{i}"), 1)).collect();
        let used = BTreeSet::new();
        let extra = get_extra_validators(&current, &pool, &used, 1, 3).unwrap();
        assert!(extra.clamped);
    }

    #[test]
    fn extra_validators_fails_when_pool_exhausted() {
        let current: Vec<Validator> = (0..4).map(|i| validator(&format!("c{i}"), 1)).collect();
        let used: BTreeSet<AccountId> = current.iter().map(|v| v.address).collect();
        let extra = get_extra_validators(&current, &[], &used, 0, 7);
        assert!(extra.is_none());
    }
}
