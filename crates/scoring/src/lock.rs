use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{Category, RaceCategory};

/// Driver of the day voting stays open this long after the race start.
pub const DRIVER_OF_THE_DAY_WINDOW_MINUTES: i64 = 50;

/// Shown instead of another user's pick while the category is still open.
pub const LOCKED_PLACEHOLDER: &str = "LOCKED";

/// Session start times of a race weekend, all UTC. `None` means "to be confirmed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSchedule {
    pub qualifying: Option<DateTime<Utc>>,
    pub sprint: Option<DateTime<Utc>>,
    pub race: Option<DateTime<Utc>>,
}

impl RaceSchedule {
    /// Instant from which bets of `category` are closed.
    pub fn gate(&self, category: RaceCategory) -> Option<DateTime<Utc>> {
        match category {
            RaceCategory::Quali => self.qualifying,
            RaceCategory::Sprint => self.sprint,
            RaceCategory::Race | RaceCategory::Sc | RaceCategory::Fastest | RaceCategory::Bonus => {
                self.race
            }
            RaceCategory::DriverDay => self
                .race
                .map(|start| start + TimeDelta::minutes(DRIVER_OF_THE_DAY_WINDOW_MINUTES)),
        }
    }

    pub fn is_locked(&self, category: RaceCategory, now: DateTime<Utc>) -> bool {
        self.gate(category).is_some_and(|gate| now >= gate)
    }
}

/// Global switch closing the full-season predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonLock(bool);

impl SeasonLock {
    pub fn new(locked: bool) -> Self {
        Self(locked)
    }

    pub fn is_locked(&self) -> bool {
        self.0
    }
}

/// What a lock check is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum LockScope<'a> {
    Race(&'a RaceSchedule),
    Season(SeasonLock),
}

/// Whether bets of `category` are closed for edits and visible to everyone.
///
/// A race schedule never gates season lists and the season flag never gates
/// race weekend categories; such combinations report unlocked.
pub fn check_lock(scope: LockScope<'_>, category: Category, now: DateTime<Utc>) -> bool {
    match (scope, category) {
        (LockScope::Race(schedule), Category::Race(category)) => schedule.is_locked(category, now),
        (LockScope::Season(lock), Category::Season(_)) => lock.is_locked(),
        _ => false,
    }
}

pub fn can_reveal(locked: bool, viewer_is_owner: bool, viewer_is_admin: bool) -> bool {
    viewer_is_admin || viewer_is_owner || locked
}

/// Masks a pick with [`LOCKED_PLACEHOLDER`] unless the viewer may see it.
pub fn reveal(value: Option<&str>, locked: bool, viewer_is_owner: bool, viewer_is_admin: bool) -> Option<&str> {
    if can_reveal(locked, viewer_is_owner, viewer_is_admin) {
        value
    } else {
        Some(LOCKED_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CompetitorKind;
    use chrono::TimeZone;

    fn schedule() -> RaceSchedule {
        RaceSchedule {
            qualifying: Some(Utc.with_ymd_and_hms(2025, 3, 15, 5, 0, 0).unwrap()),
            sprint: None,
            race: Some(Utc.with_ymd_and_hms(2025, 3, 16, 4, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_lock_boundary() {
        let schedule = schedule();
        let gate = schedule.race.unwrap();
        let scope = LockScope::Race(&schedule);
        let category = Category::Race(RaceCategory::Race);

        assert!(!check_lock(scope, category, gate - TimeDelta::seconds(1)));
        assert!(check_lock(scope, category, gate));
        assert!(check_lock(scope, category, gate + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_quali_lock_boundary() {
        let schedule = schedule();
        let gate = schedule.qualifying.unwrap();
        let scope = LockScope::Race(&schedule);
        let category = Category::Race(RaceCategory::Quali);

        assert!(!check_lock(scope, category, gate - TimeDelta::seconds(1)));
        assert!(check_lock(scope, category, gate));
        assert!(check_lock(scope, category, gate + TimeDelta::seconds(1)));
        assert!(!check_lock(scope, Category::Race(RaceCategory::Race), gate));
    }

    #[test]
    fn test_sprint_lock_boundary() {
        let sprint = Utc.with_ymd_and_hms(2025, 3, 15, 9, 0, 0).unwrap();
        let schedule = RaceSchedule {
            sprint: Some(sprint),
            ..schedule()
        };
        let scope = LockScope::Race(&schedule);
        let category = Category::Race(RaceCategory::Sprint);

        assert_eq!(schedule.gate(RaceCategory::Sprint), Some(sprint));
        assert!(!check_lock(scope, category, sprint - TimeDelta::seconds(1)));
        assert!(check_lock(scope, category, sprint));
        assert!(check_lock(scope, category, sprint + TimeDelta::seconds(1)));
        assert!(!check_lock(scope, Category::Race(RaceCategory::Race), sprint));
    }

    #[test]
    fn test_categories_follow_their_gate() {
        let schedule = schedule();
        let between = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

        assert!(schedule.is_locked(RaceCategory::Quali, between));
        for category in [
            RaceCategory::Race,
            RaceCategory::Sc,
            RaceCategory::Fastest,
            RaceCategory::Bonus,
            RaceCategory::DriverDay,
        ] {
            assert!(!schedule.is_locked(category, between), "{category} should be open");
        }
    }

    #[test]
    fn test_driver_of_the_day_window() {
        let schedule = schedule();
        let race = schedule.race.unwrap();

        assert!(!schedule.is_locked(RaceCategory::DriverDay, race + TimeDelta::minutes(49)));
        assert!(schedule.is_locked(RaceCategory::DriverDay, race + TimeDelta::minutes(50)));
    }

    #[test]
    fn test_missing_gate_never_locks() {
        let schedule = schedule();
        let far_future = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        assert!(!schedule.is_locked(RaceCategory::Sprint, far_future));
        assert!(!RaceSchedule::default().is_locked(RaceCategory::Race, far_future));
    }

    #[test]
    fn test_season_lock_is_a_flag() {
        let now = Utc::now();
        let category = Category::Season(CompetitorKind::Driver);

        assert!(check_lock(LockScope::Season(SeasonLock::new(true)), category, now));
        assert!(!check_lock(LockScope::Season(SeasonLock::new(false)), category, now));
        assert!(!check_lock(LockScope::Race(&schedule()), category, now));
    }

    #[test]
    fn test_reveal() {
        assert_eq!(reveal(Some("VER"), false, false, false), Some(LOCKED_PLACEHOLDER));
        assert_eq!(reveal(Some("VER"), false, true, false), Some("VER"));
        assert_eq!(reveal(Some("VER"), false, false, true), Some("VER"));
        assert_eq!(reveal(None, true, false, false), None);
    }
}
