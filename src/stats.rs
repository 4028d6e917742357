use crate::models::{round_div, Entry, StatsResponse};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepStats {
    pub total_steps: u64,
    pub average_steps: u64,
    pub best_day: Option<Entry>,
    pub goal_achievement_rate: u32,
    pub current_streak: u32,
}

pub fn build_stats(entries: &[Entry]) -> StepStats {
    build_stats_at(Local::now().date_naive(), entries)
}

pub fn build_stats_at(today: NaiveDate, entries: &[Entry]) -> StepStats {
    let count = entries.len() as u64;
    let total_steps: u64 = entries.iter().map(|entry| u64::from(entry.achieved)).sum();

    // Strict comparison so the first of several equal days wins.
    let best_day = entries
        .iter()
        .fold(None::<&Entry>, |best, entry| match best {
            Some(best) if entry.achieved <= best.achieved => Some(best),
            _ => Some(entry),
        })
        .cloned();

    let (average_steps, goal_achievement_rate) = if count == 0 {
        (0, 0)
    } else {
        let met = entries.iter().filter(|entry| entry.goal_met()).count() as u64;
        (
            round_div(total_steps, count),
            round_div(met * 100, count) as u32,
        )
    };

    StepStats {
        total_steps,
        average_steps,
        best_day,
        goal_achievement_rate,
        current_streak: current_streak(today, entries),
    }
}

/// Consecutive days with an entry, counting back from `today`. Zero when
/// today has none; goal completion does not matter.
pub fn current_streak(today: NaiveDate, entries: &[Entry]) -> u32 {
    let dates: HashSet<NaiveDate> = entries.iter().map(|entry| entry.date).collect();

    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(date) = cursor {
        if !dates.contains(&date) {
            break;
        }
        streak += 1;
        cursor = date.pred_opt();
    }
    streak
}

pub fn stats_response(today: NaiveDate, entries: &[Entry]) -> StatsResponse {
    let stats = build_stats_at(today, entries);
    StatsResponse {
        today,
        entry_count: entries.len(),
        total_steps: stats.total_steps,
        average_steps: stats.average_steps,
        best_day: stats.best_day,
        goal_achievement_rate: stats.goal_achievement_rate,
        current_streak: stats.current_streak,
    }
}
