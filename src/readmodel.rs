//! Read-Model Builder
//!
//! Pure derivations from raw contract fields to display-ready values:
//! funding percentage, whole days left with its label, owner check and
//! deadline date. Nothing here performs I/O; callers pass `now` explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chain::Address;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Funding progress in percent, clamped to `[0, 100]`.
///
/// A zero goal yields 0 rather than dividing by zero. The value is not
/// rounded; renderers round to whole percent.
pub fn funding_percentage(goal: u128, balance: u128) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (balance as f64 / goal as f64 * 100.0).clamp(0.0, 100.0)
}

/// Whole days until `deadline`, never negative
pub fn days_left(deadline: u64, now: u64) -> u64 {
    deadline.saturating_sub(now) / SECONDS_PER_DAY
}

pub fn days_left_label(days: u64) -> String {
    match days {
        0 => "Ended".to_string(),
        1 => "1 day left".to_string(),
        n => format!("{} days left", n),
    }
}

/// Advisory owner check for showing edit controls.
///
/// Addresses compare by bytes, so checksum casing never matters. The contract
/// enforces ownership on every owner-only call regardless of this answer.
pub fn is_owner(connected: Option<&Address>, owner: &Address) -> bool {
    connected.map(|account| account == owner).unwrap_or(false)
}

/// Calendar date of a unix-seconds deadline, e.g. "Mon Jan 06 2025"
pub fn deadline_date(deadline: u64) -> Option<String> {
    let seconds = i64::try_from(deadline).ok()?;
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.format("%a %b %d %Y").to_string())
}

/// Derived values for one campaign.
///
/// Inputs may be missing when their query failed; each output is present
/// only when everything it depends on is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadModel {
    pub percentage: Option<f64>,
    pub days_left: Option<u64>,
    pub days_left_label: Option<String>,
}

impl ReadModel {
    pub fn build(goal: Option<u128>, balance: Option<u128>, deadline: Option<u64>, now: u64) -> Self {
        let percentage = match (goal, balance) {
            (Some(goal), Some(balance)) => Some(funding_percentage(goal, balance)),
            _ => None,
        };
        let days_left = deadline.map(|d| days_left(d, now));

        Self {
            percentage,
            days_left,
            days_left_label: days_left.map(days_left_label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000;

    #[test]
    fn test_percentage_examples() {
        assert_eq!(funding_percentage(1000, 250), 25.0);
        assert_eq!(funding_percentage(1000, 5000), 100.0);
        assert_eq!(funding_percentage(1000, 0), 0.0);
        assert_eq!(funding_percentage(3, 1), 100.0 / 3.0);
    }

    #[test]
    fn test_percentage_zero_goal() {
        assert_eq!(funding_percentage(0, 0), 0.0);
        assert_eq!(funding_percentage(0, 12345), 0.0);
    }

    #[test]
    fn test_percentage_always_in_range() {
        let goals = [1u128, 7, 1000, u128::MAX];
        let balances = [0u128, 1, 999, 1000, 1001, u128::MAX];
        for goal in goals {
            for balance in balances {
                let p = funding_percentage(goal, balance);
                assert!((0.0..=100.0).contains(&p), "goal={goal} balance={balance} -> {p}");
            }
        }
    }

    #[test]
    fn test_days_left_examples() {
        assert_eq!(days_left(T + 90_000, T), 1);
        assert_eq!(days_left_label(days_left(T + 90_000, T)), "1 day left");

        assert_eq!(days_left(T + 200_000, T), 2);
        assert_eq!(days_left_label(days_left(T + 200_000, T)), "2 days left");
    }

    #[test]
    fn test_days_left_past_deadline() {
        assert_eq!(days_left(T - 1, T), 0);
        assert_eq!(days_left(0, T), 0);
        assert_eq!(days_left_label(days_left(T - 500_000, T)), "Ended");
    }

    #[test]
    fn test_days_left_under_one_day_is_ended() {
        assert_eq!(days_left(T + SECONDS_PER_DAY - 1, T), 0);
        assert_eq!(days_left(T + SECONDS_PER_DAY, T), 1);
    }

    #[test]
    fn test_is_owner() {
        let owner: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let same_lower: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        let other = Address::new([7; 20]);

        assert!(is_owner(Some(&same_lower), &owner));
        assert!(!is_owner(Some(&other), &owner));
        assert!(!is_owner(None, &owner));
    }

    #[test]
    fn test_deadline_date() {
        assert_eq!(deadline_date(1_736_121_600).as_deref(), Some("Mon Jan 06 2025"));
        assert!(deadline_date(u64::MAX).is_none());
    }

    #[test]
    fn test_build_with_missing_inputs() {
        let model = ReadModel::build(Some(1000), None, Some(T + 200_000), T);
        assert_eq!(model.percentage, None);
        assert_eq!(model.days_left, Some(2));
        assert_eq!(model.days_left_label.as_deref(), Some("2 days left"));

        let model = ReadModel::build(Some(1000), Some(250), None, T);
        assert_eq!(model.percentage, Some(25.0));
        assert_eq!(model.days_left_label, None);
    }
}
