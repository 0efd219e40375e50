//! Day-boundary streak state machine.
//!
//! A day is either credited (`last_streak_date == today`) or not yet credited.
//! A streak credited yesterday stays valid through today, and only expires once
//! neither today nor yesterday is credited.

use chrono::NaiveDate;

use crate::db::StreakState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// Nothing to write: already credited today, still inside the grace window,
    /// or already zero.
    Unchanged(u32),
    /// Goal met and not yet credited today. Persist with `last_streak_date = today`.
    Credited(u32),
    /// Grace window expired on a non-zero streak. Persist `current_streak = 0`.
    Broken,
}

impl StreakUpdate {
    pub fn streak(&self) -> u32 {
        match self {
            StreakUpdate::Unchanged(streak) | StreakUpdate::Credited(streak) => *streak,
            StreakUpdate::Broken => 0,
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self, StreakUpdate::Unchanged(_))
    }

    /// State to write back, if any.
    pub fn next_state(&self, previous: StreakState, today: NaiveDate) -> Option<StreakState> {
        match *self {
            StreakUpdate::Unchanged(_) => None,
            StreakUpdate::Credited(streak) => Some(StreakState {
                last_streak_date: Some(today),
                current_streak: streak,
            }),
            StreakUpdate::Broken => Some(StreakState {
                last_streak_date: previous.last_streak_date,
                current_streak: 0,
            }),
        }
    }
}

pub fn evaluate(
    today: NaiveDate,
    yesterday: NaiveDate,
    last_streak_date: Option<NaiveDate>,
    current_streak: u32,
    today_unique_count: u64,
    goal: u32,
) -> StreakUpdate {
    let credited_today = last_streak_date == Some(today);
    let credited_yesterday = last_streak_date == Some(yesterday);

    if today_unique_count >= u64::from(goal) {
        if credited_today {
            StreakUpdate::Unchanged(current_streak)
        } else if credited_yesterday {
            StreakUpdate::Credited(current_streak.saturating_add(1))
        } else {
            StreakUpdate::Credited(1)
        }
    } else if credited_today || credited_yesterday {
        StreakUpdate::Unchanged(current_streak)
    } else if current_streak != 0 {
        StreakUpdate::Broken
    } else {
        StreakUpdate::Unchanged(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    /// Runs one evaluation and applies the write-back the caller would perform.
    fn step(state: StreakState, today: NaiveDate, unique: u64, goal: u32) -> (StreakState, StreakUpdate) {
        let yesterday = today.pred_opt().expect("has yesterday");
        let update = evaluate(
            today,
            yesterday,
            state.last_streak_date,
            state.current_streak,
            unique,
            goal,
        );
        let next = update.next_state(state, today).unwrap_or(state);
        (next, update)
    }

    #[test]
    fn consecutive_days_extend_and_a_gap_restarts() {
        let start = StreakState::default();

        let (s1, u1) = step(start, day(1), 100, 100);
        assert_eq!(u1, StreakUpdate::Credited(1));
        assert_eq!(s1.last_streak_date, Some(day(1)));

        let (s2, u2) = step(s1, day(2), 100, 100);
        assert_eq!(u2, StreakUpdate::Credited(2));
        assert_eq!(s2.current_streak, 2);

        let (s4, u4) = step(s2, day(4), 100, 100);
        assert_eq!(u4, StreakUpdate::Credited(1));
        assert_eq!(s4.last_streak_date, Some(day(4)));
    }

    #[test]
    fn same_day_is_credited_once() {
        let (s1, _) = step(StreakState::default(), day(1), 120, 100);
        let (s1b, again) = step(s1, day(1), 180, 100);
        assert_eq!(again, StreakUpdate::Unchanged(1));
        assert!(!again.changed());
        assert_eq!(s1b, s1);
    }

    #[test]
    fn grace_day_keeps_the_streak() {
        let state = StreakState {
            last_streak_date: Some(day(1)),
            current_streak: 5,
        };
        let (after, update) = step(state, day(2), 3, 100);
        assert_eq!(update, StreakUpdate::Unchanged(5));
        assert_eq!(after, state);
    }

    #[test]
    fn expired_streak_breaks_once() {
        let state = StreakState {
            last_streak_date: Some(day(1)),
            current_streak: 5,
        };
        let (broken, update) = step(state, day(3), 3, 100);
        assert_eq!(update, StreakUpdate::Broken);
        assert!(update.changed());
        assert_eq!(broken.current_streak, 0);
        assert_eq!(broken.last_streak_date, Some(day(1)));

        let (_, again) = step(broken, day(3), 3, 100);
        assert_eq!(again, StreakUpdate::Unchanged(0));
        assert!(!again.changed());
    }

    #[test]
    fn never_credited_and_below_goal_stays_zero() {
        let (_, update) = step(StreakState::default(), day(9), 0, 100);
        assert_eq!(update, StreakUpdate::Unchanged(0));
    }
}
