use crate::models::Entry;
use chrono::{Datelike, Month, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
            .ok()
            .map(Self::containing)
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 31,
        }
    }

    pub fn label(self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .map(|month| month.name())
            .unwrap_or("Unknown");
        format!("{name} {}", self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    pub entry: Option<Entry>,
    pub completion_percent: Option<u32>,
    pub goal_met: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Empty cells before the 1st in a Sunday-first week.
    pub leading_blanks: u32,
    pub weekday_names: [&'static str; 7],
    pub days: Vec<CalendarDay>,
    pub prev: String,
    pub next: String,
}

/// Resolves the `month` query value, falling back to the month of `today`.
pub fn resolve_month(raw: Option<&str>, today: NaiveDate) -> YearMonth {
    raw.and_then(YearMonth::parse)
        .unwrap_or_else(|| YearMonth::containing(today))
}

pub fn build_month(month: YearMonth, today: NaiveDate, entries: &[Entry]) -> CalendarMonth {
    let mut by_date: HashMap<NaiveDate, &Entry> = HashMap::new();
    for entry in entries
        .iter()
        .filter(|entry| YearMonth::containing(entry.date) == month)
    {
        by_date.entry(entry.date).or_insert(entry);
    }

    let leading_blanks = month
        .first_day()
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0);

    let days = (1..=month.days_in_month())
        .filter_map(|day| NaiveDate::from_ymd_opt(month.year, month.month, day))
        .map(|date| {
            let entry = by_date.get(&date).map(|entry| (*entry).clone());
            CalendarDay {
                day: date.day(),
                date,
                is_today: date == today,
                completion_percent: entry.as_ref().map(Entry::completion_percent),
                goal_met: entry.as_ref().is_some_and(Entry::goal_met),
                entry,
            }
        })
        .collect();

    CalendarMonth {
        year: month.year,
        month: month.month,
        label: month.label(),
        leading_blanks,
        weekday_names: WEEKDAY_NAMES,
        days,
        prev: month.prev().to_string(),
        next: month.next().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn navigation_wraps_years() {
        let jan = YearMonth { year: 2024, month: 1 };
        assert_eq!(jan.prev(), YearMonth { year: 2023, month: 12 });
        assert_eq!(jan.prev().next(), jan);
        assert_eq!(YearMonth { year: 2024, month: 12 }.next().to_string(), "2025-01");
    }

    #[test]
    fn month_lengths() {
        assert_eq!(YearMonth { year: 2024, month: 2 }.days_in_month(), 29);
        assert_eq!(YearMonth { year: 2023, month: 2 }.days_in_month(), 28);
        assert_eq!(YearMonth { year: 2024, month: 4 }.days_in_month(), 30);
        assert_eq!(YearMonth { year: 2024, month: 12 }.days_in_month(), 31);
    }

    #[test]
    fn parses_query_values() {
        assert_eq!(YearMonth::parse("2024-03"), Some(YearMonth { year: 2024, month: 3 }));
        assert_eq!(YearMonth::parse("2024-13"), None);
        assert_eq!(YearMonth::parse("march"), None);

        let today = date(2024, 5, 20);
        assert_eq!(resolve_month(Some("bogus"), today), YearMonth { year: 2024, month: 5 });
        assert_eq!(resolve_month(None, today), YearMonth { year: 2024, month: 5 });
    }

    #[test]
    fn grid_layout_for_january_2024() {
        let month = build_month(YearMonth { year: 2024, month: 1 }, date(2024, 1, 15), &[]);
        // 2024-01-01 was a Monday.
        assert_eq!(month.leading_blanks, 1);
        assert_eq!(month.days.len(), 31);
        assert_eq!(month.label, "January 2024");
        assert_eq!(month.prev, "2023-12");
        assert_eq!(month.next, "2024-02");
        assert!(month.days[14].is_today);
        assert_eq!(month.days.iter().filter(|day| day.is_today).count(), 1);
    }

    #[test]
    fn repeated_date_shows_first_entry() {
        let first = Entry::new(date(2024, 1, 3), 100, 10);
        let entries = vec![first.clone(), Entry::new(date(2024, 1, 3), 100, 90)];
        let month = build_month(YearMonth { year: 2024, month: 1 }, date(2024, 1, 3), &entries);
        assert_eq!(month.days[2].entry.as_ref(), Some(&first));
    }

    #[test]
    fn only_entries_in_month_are_placed() {
        let entries = vec![
            Entry::new(date(2024, 1, 2), 8000, 4000),
            Entry::new(date(2024, 1, 1), 10000, 12000),
            Entry::new(date(2023, 12, 31), 10000, 12000),
            Entry::new(date(2025, 1, 1), 10000, 12000),
        ];
        let month = build_month(YearMonth { year: 2024, month: 1 }, date(2024, 1, 2), &entries);

        let placed: Vec<_> = month.days.iter().filter(|day| day.entry.is_some()).collect();
        assert_eq!(placed.len(), 2);
        assert_eq!(month.days[0].completion_percent, Some(100));
        assert!(month.days[0].goal_met);
        assert_eq!(month.days[1].completion_percent, Some(50));
        assert!(!month.days[1].goal_met);
        assert_eq!(month.days[2].completion_percent, None);
    }
}
