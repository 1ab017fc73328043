use chrono::{DateTime, Utc};
use scoring::{AcceptedRaceBets, LockScope, RaceBet, RaceCategory, RaceSchedule, ScoringError, check_lock, lock};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Race, User, UserBet};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceResponse {
    pub ext_id: String,
    pub round: i32,
    pub name: String,
    pub country: String,
    pub circuit_name: String,
    pub quali_date: Option<DateTime<Utc>>,
    pub sprint_date: Option<DateTime<Utc>>,
    pub race_date: Option<DateTime<Utc>>,
    pub has_sprint: bool,
    pub bonus_question: Option<String>,
}

impl From<Race> for RaceResponse {
    fn from(race: Race) -> Self {
        let has_sprint = race.has_sprint();
        Self {
            ext_id: race.ext_id,
            round: race.round,
            name: race.name,
            country: race.country,
            circuit_name: race.circuit_name,
            quali_date: race.quali_date,
            sprint_date: race.sprint_date,
            race_date: race.race_date,
            has_sprint,
            bonus_question: race.bonus_question,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryLockResponse {
    pub category: String,
    pub gate: Option<DateTime<Utc>>,
    pub locked: bool,
}

/// Lock state of every category of a race weekend at a given instant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceLocksResponse {
    pub race: String,
    pub checked_at: DateTime<Utc>,
    pub locks: Vec<CategoryLockResponse>,
}

impl RaceLocksResponse {
    /// SPRINT is only listed on sprint weekends.
    pub fn new(race: &Race, now: DateTime<Utc>) -> Self {
        let schedule = race.schedule();
        let locks = RaceCategory::ALL
            .into_iter()
            .filter(|category| *category != RaceCategory::Sprint || race.has_sprint())
            .map(|category| CategoryLockResponse {
                category: category.to_string(),
                gate: schedule.gate(category),
                locked: schedule.is_locked(category, now),
            })
            .collect();

        Self {
            race: race.ext_id.clone(),
            checked_at: now,
            locks,
        }
    }
}

/// One bet as another user is allowed to see it. Owners are named by
/// username only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RaceBetView {
    pub username: String,
    pub category: String,
    pub rank: Option<i32>,
    pub value: Option<String>,
    pub joker: bool,
    pub points: f64,
}

impl RaceBetView {
    /// Replaces the value with `LOCKED` until the category locks, unless the
    /// viewer owns the bet or is an admin.
    pub fn masked(bet: &UserBet, schedule: &RaceSchedule, now: DateTime<Utc>, viewer: Option<&User>) -> Self {
        let locked = bet
            .bet
            .category()
            .is_some_and(|category| check_lock(LockScope::Race(schedule), category, now));
        let owner = viewer.is_some_and(|viewer| viewer.user_id == bet.bet.user_id);
        let admin = viewer.is_some_and(User::is_admin);
        let visible = lock::can_reveal(locked, owner, admin);

        let value = lock::reveal(bet.bet.value.as_deref(), locked, owner, admin).map(str::to_string);
        let joker = visible && bet.bet.to_race_bet().is_some_and(|race_bet| race_bet.is_joker());

        Self {
            username: bet.username.clone(),
            category: bet.bet.category.clone(),
            rank: bet.bet.rank,
            value,
            joker,
            points: bet.bet.result,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RaceBetInput {
    #[validate(length(min = 1, max = 32, message = "Category is required"))]
    pub category: String,

    #[validate(range(min = 1, max = 3))]
    pub rank: Option<u8>,

    #[validate(length(max = 255))]
    pub value: Option<String>,

    /// Only honoured on the RACE rank 1 slot.
    #[serde(default)]
    pub joker: bool,
}

impl RaceBetInput {
    pub fn to_race_bet(&self) -> Result<RaceBet, ScoringError> {
        let category: RaceCategory = self.category.parse()?;
        let bet = RaceBet {
            category,
            rank: self.rank,
            value: self.value.clone(),
            marker: None,
        };
        Ok(if self.joker { bet.with_joker() } else { bet })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitRaceBetsRequest {
    #[validate(length(min = 1, message = "At least one bet is required"), nested)]
    pub bets: Vec<RaceBetInput>,
}

impl SubmitRaceBetsRequest {
    pub fn to_race_bets(&self) -> Result<Vec<RaceBet>, ScoringError> {
        self.bets.iter().map(RaceBetInput::to_race_bet).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitRaceBetsResponse {
    pub accepted: usize,
    /// Categories left unchanged because they are already locked.
    pub skipped: Vec<String>,
    pub joker: bool,
}

impl From<&AcceptedRaceBets> for SubmitRaceBetsResponse {
    fn from(accepted: &AcceptedRaceBets) -> Self {
        Self {
            accepted: accepted.bets.len(),
            skipped: accepted.skipped.iter().map(ToString::to_string).collect(),
            joker: accepted.joker(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bet;
    use chrono::{TimeDelta, TimeZone};
    use uuid::Uuid;

    fn race() -> Race {
        let start = Utc.with_ymd_and_hms(2025, 7, 6, 14, 0, 0).unwrap();
        Race {
            race_id: Uuid::new_v4(),
            ext_id: "silverstone".to_string(),
            round: 12,
            name: "British Grand Prix".to_string(),
            country: "UK".to_string(),
            circuit_name: "Silverstone Circuit".to_string(),
            quali_date: Some(start - TimeDelta::days(1)),
            sprint_date: None,
            race_date: Some(start),
            kind: "NORMAL".to_string(),
            bonus_question: None,
        }
    }

    fn user(role: Option<&str>) -> User {
        User {
            user_id: Uuid::new_v4(),
            username: "viewer".to_string(),
            role: role.map(str::to_string),
            email: None,
            created_at: Utc::now(),
        }
    }

    fn user_bet(owner: Uuid, category: &str, rank: Option<i32>, value: &str, extra: Option<&str>) -> UserBet {
        UserBet {
            username: "owner".to_string(),
            bet: Bet {
                bet_id: Uuid::new_v4(),
                user_id: owner,
                race_id: None,
                category: category.to_string(),
                rank,
                value: Some(value.to_string()),
                result: 0.0,
                extra: extra.map(str::to_string),
                is_correct: None,
                updated_at: Utc::now(),
            },
        }
    }

    #[test]
    fn test_locks_skip_sprint_on_normal_weekend() {
        let race = race();
        let before = Utc.with_ymd_and_hms(2025, 7, 5, 9, 0, 0).unwrap();
        let locks = RaceLocksResponse::new(&race, before);

        assert_eq!(locks.locks.len(), 6);
        assert!(locks.locks.iter().all(|lock| !lock.locked));
        assert!(locks.locks.iter().all(|lock| lock.category != "SPRINT"));
    }

    #[test]
    fn test_masking() {
        let race = race();
        let schedule = race.schedule();
        let before_quali = Utc.with_ymd_and_hms(2025, 7, 5, 9, 0, 0).unwrap();
        let stranger = user(None);
        let admin = user(Some("ADMIN"));
        let bet = user_bet(Uuid::new_v4(), "RACE", Some(1), "NOR", Some("JOKER"));

        let hidden = RaceBetView::masked(&bet, &schedule, before_quali, Some(&stranger));
        assert_eq!(hidden.value.as_deref(), Some("LOCKED"));
        assert!(!hidden.joker);

        let anonymous = RaceBetView::masked(&bet, &schedule, before_quali, None);
        assert_eq!(anonymous.value.as_deref(), Some("LOCKED"));

        let for_admin = RaceBetView::masked(&bet, &schedule, before_quali, Some(&admin));
        assert_eq!(for_admin.value.as_deref(), Some("NOR"));
        assert!(for_admin.joker);

        let mut owner = user(None);
        owner.user_id = bet.bet.user_id;
        let for_owner = RaceBetView::masked(&bet, &schedule, before_quali, Some(&owner));
        assert_eq!(for_owner.value.as_deref(), Some("NOR"));

        let after_race = Utc.with_ymd_and_hms(2025, 7, 6, 16, 0, 0).unwrap();
        let revealed = RaceBetView::masked(&bet, &schedule, after_race, Some(&stranger));
        assert_eq!(revealed.value.as_deref(), Some("NOR"));
    }

    #[test]
    fn test_bet_input_conversion() {
        let input = RaceBetInput {
            category: "race".to_string(),
            rank: Some(1),
            value: Some("VER".to_string()),
            joker: true,
        };
        assert!(input.to_race_bet().unwrap().is_joker());

        let unknown = RaceBetInput {
            category: "PODIUM".to_string(),
            rank: None,
            value: None,
            joker: false,
        };
        assert!(unknown.to_race_bet().is_err());
    }

    #[test]
    fn test_submit_request_validation() {
        let empty = SubmitRaceBetsRequest { bets: vec![] };
        assert!(empty.validate().is_err());

        let bad_rank = SubmitRaceBetsRequest {
            bets: vec![RaceBetInput {
                category: "RACE".to_string(),
                rank: Some(4),
                value: Some("VER".to_string()),
                joker: false,
            }],
        };
        assert!(bad_rank.validate().is_err());
    }
}
