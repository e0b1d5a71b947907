//! Payoff Engine
//!
//! Pure settlement of a group's declared actions against the day's shared
//! pool: a pairwise dilemma table is summed per participant, then the raw
//! scores are normalized against the best achievable aggregate and scaled
//! to the actual pool.

use sim_events::Action;

/// Constants of the pairwise payoff tables.
pub mod payoff_constants {
    /// Best pairwise score in the positive-pool regime (COOP vs COOP)
    pub const MAX_POSITIVE: i64 = 10;
    /// Worst pairwise score in the catastrophe regime
    pub const MAX_NEGATIVE: i64 = -15;
    /// Positive-pool ratio applied to a group of one (10 : 8)
    pub const SOLO_POSITIVE_RATIO: f64 = 10.0 / 8.0;
    /// Negative-pool ratio applied to a group of one (15 : 7)
    pub const SOLO_NEGATIVE_RATIO: f64 = 15.0 / 7.0;
}

/// Pairwise payoff from `own`'s perspective when the pool is positive.
fn pairwise_positive(own: Action, other: Action) -> i64 {
    match (own, other) {
        (Action::Coop, Action::Coop) => 10,
        (Action::Coop, Action::Exploit) => 0,
        (Action::Exploit, Action::Coop) => 15,
        (Action::Exploit, Action::Exploit) => 0,
        // Any pairing touching INACT resolves to the margin payoff
        _ => 8,
    }
}

/// Pairwise payoff from `own`'s perspective when the pool is negative.
fn pairwise_negative(own: Action, other: Action) -> i64 {
    match (own, other) {
        (Action::Coop, Action::Coop) => -5,
        (Action::Coop, Action::Exploit) => -15,
        (Action::Exploit, Action::Coop) => 0,
        (Action::Exploit, Action::Exploit) => -15,
        _ => -7,
    }
}

/// Integer division flooring toward negative infinity, regardless of the
/// divisor's sign.
pub(crate) fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Settles one group's event: returns each participant's resource delta,
/// in the same order as `actions`.
///
/// Panics on an empty action slice; that is a caller contract violation,
/// not a recoverable condition.
pub fn settle(actions: &[Action], pool: i64) -> Vec<i64> {
    assert!(!actions.is_empty(), "settle called with no participants");

    if actions.len() == 1 {
        let ratio = if pool > 0 {
            payoff_constants::SOLO_POSITIVE_RATIO
        } else {
            payoff_constants::SOLO_NEGATIVE_RATIO
        };
        return vec![(pool as f64 / ratio).floor() as i64];
    }

    let positive = pool > 0;
    let raw: Vec<i64> = actions
        .iter()
        .enumerate()
        .map(|(i, &own)| {
            actions
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &other)| {
                    if positive {
                        pairwise_positive(own, other)
                    } else {
                        pairwise_negative(own, other)
                    }
                })
                .sum()
        })
        .collect();

    let n = actions.len() as i64;
    let max_constant = if positive {
        payoff_constants::MAX_POSITIVE
    } else {
        payoff_constants::MAX_NEGATIVE
    };
    let denominator = n * max_constant * (n - 1);

    raw.into_iter()
        .map(|score| floor_div(pool * score, denominator))
        .collect()
}
