use chrono::{DateTime, Utc};
use scoring::RaceSchedule;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const SPRINT_WEEKEND: &str = "SPRINT";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Race {
    pub race_id: Uuid,
    pub ext_id: String,
    pub round: i32,
    pub name: String,
    pub country: String,
    pub circuit_name: String,
    pub quali_date: Option<DateTime<Utc>>,
    pub sprint_date: Option<DateTime<Utc>>,
    pub race_date: Option<DateTime<Utc>>,
    pub kind: String,
    pub bonus_question: Option<String>,
}

impl Race {
    pub fn schedule(&self) -> RaceSchedule {
        RaceSchedule {
            qualifying: self.quali_date,
            sprint: self.sprint_date,
            race: self.race_date,
        }
    }

    pub fn has_sprint(&self) -> bool {
        self.kind.eq_ignore_ascii_case(SPRINT_WEEKEND)
    }
}
