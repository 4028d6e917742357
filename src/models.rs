use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day's step goal and achieved count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    pub goal: u32,
    pub achieved: u32,
}

impl Entry {
    pub fn new(date: NaiveDate, goal: u32, achieved: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            goal,
            achieved,
        }
    }

    pub fn goal_met(&self) -> bool {
        self.achieved >= self.goal
    }

    /// Achieved steps as a rounded percentage of the goal, capped at 100.
    pub fn completion_percent(&self) -> u32 {
        self.percent_of_goal().min(100)
    }

    /// Uncapped variant, used where overshooting the goal is worth showing.
    pub fn percent_of_goal(&self) -> u32 {
        if self.goal == 0 {
            return 0;
        }
        let percent = round_div(u64::from(self.achieved) * 100, u64::from(self.goal));
        u32::try_from(percent).unwrap_or(u32::MAX)
    }

    pub fn steps_remaining(&self) -> u32 {
        self.goal.saturating_sub(self.achieved)
    }
}

/// Half-up integer division. `den` must be non-zero.
pub(crate) fn round_div(num: u64, den: u64) -> u64 {
    num / den + u64::from((num % den) * 2 >= den)
}

#[derive(Debug, Deserialize)]
pub struct StepSubmission {
    pub goal: i64,
    pub achieved: i64,
}

#[derive(Debug, Deserialize)]
pub struct EntryUpdate {
    pub date: NaiveDate,
    pub goal: i64,
    pub achieved: i64,
}

/// Raw form fields; parsed and clamped in `input`.
#[derive(Debug, Deserialize)]
pub struct StepForm {
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub achieved: String,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub today: NaiveDate,
    pub entry_count: usize,
    pub total_steps: u64,
    pub average_steps: u64,
    pub best_day: Option<Entry>,
    pub goal_achievement_rate: u32,
    pub current_streak: u32,
}
