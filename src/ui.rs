use crate::calendar::CalendarMonth;
use crate::editing::EditState;
use crate::input::DEFAULT_GOAL;
use crate::models::Entry;
use crate::stats::StepStats;
use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but `[A-Za-z0-9_-]` is encoded, so ids are safe in both URL paths
/// and HTML attributes.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

const EMPTY_STATE: &str = r#"<div class="empty">
      <p>No step tracking data available yet.</p>
      <p>Start tracking your steps today!</p>
    </div>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Input,
    History,
    Calendar,
    Progress,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Input, Tab::History, Tab::Calendar, Tab::Progress];

    fn href(self) -> &'static str {
        match self {
            Tab::Input => "/",
            Tab::History => "/history",
            Tab::Calendar => "/calendar",
            Tab::Progress => "/progress",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Input => "Today's Steps",
            Tab::History => "History",
            Tab::Calendar => "Calendar",
            Tab::Progress => "Progress",
        }
    }
}

pub fn render_input(today: NaiveDate, today_entry: Option<&Entry>) -> String {
    let (goal, achieved) = today_entry
        .map(|entry| (entry.goal, entry.achieved))
        .unwrap_or((DEFAULT_GOAL, 0));
    let draft = Entry {
        id: String::new(),
        date: today,
        goal,
        achieved,
    };
    let completion = draft.completion_percent();
    let status = if draft.goal_met() {
        r#"<span class="ok">Goal achieved! 🎉</span>"#.to_string()
    } else {
        format!("{} steps remaining", format_thousands(draft.steps_remaining().into()))
    };
    let button = if today_entry.is_some() { "Update Steps" } else { "Save Steps" };

    let body = INPUT_HTML
        .replace("{{DATE}}", &format_day(today))
        .replace("{{GOAL}}", &goal.to_string())
        .replace("{{ACHIEVED}}", &achieved.to_string())
        .replace("{{COMPLETION}}", &completion.to_string())
        .replace("{{BAR}}", &progress_bar(completion, draft.goal_met()))
        .replace("{{STATUS}}", &status)
        .replace("{{BUTTON}}", button);
    layout(Tab::Input, &body)
}

pub fn render_history(entries: &[Entry], editing: &EditState) -> String {
    if entries.is_empty() {
        return layout(Tab::History, &format!("<h2>Step History</h2>\n    {EMPTY_STATE}"));
    }

    let rows: String = entries
        .iter()
        .map(|entry| match editing.draft() {
            Some(draft) if draft.id == entry.id => editing_row(draft),
            _ => history_row(entry),
        })
        .collect();

    layout(Tab::History, &HISTORY_HTML.replace("{{ROWS}}", &rows))
}

fn history_row(entry: &Entry) -> String {
    format!(
        r#"
        <tr>
          <td class="date">{date}</td>
          <td>{goal} steps</td>
          <td>{achieved} steps</td>
          <td class="completion">{bar}<span class="{class}">{percent}%</span></td>
          <td class="row-actions">
            <form method="post" action="/history/{id}/edit"><button class="link" type="submit">Edit</button></form>
            <form method="post" action="/history/{id}/delete"><button class="link danger" type="submit">Delete</button></form>
          </td>
        </tr>"#,
        date = format_day(entry.date),
        goal = format_thousands(entry.goal.into()),
        achieved = format_thousands(entry.achieved.into()),
        bar = progress_bar(entry.completion_percent(), entry.goal_met()),
        class = if entry.goal_met() { "ok" } else { "muted" },
        percent = entry.completion_percent(),
        id = id_segment(&entry.id),
    )
}

fn editing_row(draft: &Entry) -> String {
    format!(
        r#"
        <tr class="editing">
          <td class="date">{date}</td>
          <td><input form="edit-form" type="number" name="goal" min="1" value="{goal}" /></td>
          <td><input form="edit-form" type="number" name="achieved" min="0" value="{achieved}" /></td>
          <td class="completion">{bar}<span>{percent}%</span></td>
          <td class="row-actions">
            <form id="edit-form" method="post" action="/edit/save"><button class="link ok" type="submit">Save</button></form>
            <form method="post" action="/edit/cancel"><button class="link" type="submit">Cancel</button></form>
          </td>
        </tr>"#,
        date = format_day(draft.date),
        goal = draft.goal,
        achieved = draft.achieved,
        bar = progress_bar(draft.completion_percent(), draft.goal_met()),
        percent = draft.completion_percent(),
    )
}

pub fn render_calendar(month: &CalendarMonth) -> String {
    let mut cells = String::new();
    for name in month.weekday_names {
        cells.push_str(&format!(r#"<div class="weekday">{name}</div>"#));
    }
    for _ in 0..month.leading_blanks {
        cells.push_str(r#"<div class="day blank"></div>"#);
    }
    for day in &month.days {
        let class = if day.is_today { "day today" } else { "day" };
        let details = match &day.entry {
            Some(entry) => format!(
                r#"<span class="dot {dot}"></span>
          <div class="day-detail">Goal: {goal}</div>
          <div class="day-detail">Achieved: {achieved}</div>
          {bar}"#,
                dot = if day.goal_met { "met" } else { "open" },
                goal = format_thousands(entry.goal.into()),
                achieved = format_thousands(entry.achieved.into()),
                bar = progress_bar(entry.completion_percent(), day.goal_met),
            ),
            None => String::new(),
        };
        cells.push_str(&format!(
            r#"
        <div class="{class}">
          <span class="day-number">{number}</span>
          {details}
        </div>"#,
            number = day.day,
        ));
    }

    let body = CALENDAR_HTML
        .replace("{{LABEL}}", &month.label)
        .replace("{{PREV}}", &month.prev)
        .replace("{{NEXT}}", &month.next)
        .replace("{{CELLS}}", &cells);
    layout(Tab::Calendar, &body)
}

pub fn render_progress(stats: &StepStats, recent: &[Entry]) -> String {
    let Some(best) = stats.best_day.as_ref() else {
        return layout(Tab::Progress, &format!("<h2>Your Progress</h2>\n    {EMPTY_STATE}"));
    };

    let activity: String = recent
        .iter()
        .map(|entry| {
            format!(
                r#"
        <div class="activity">
          <div class="activity-head">
            <span>{date}</span>
            <span class="{class}">{percent}% of goal</span>
          </div>
          <div class="activity-head muted">
            <span>{achieved} steps</span>
            <span>Goal: {goal}</span>
          </div>
          {bar}
        </div>"#,
                date = format_day(entry.date),
                class = if entry.goal_met() { "ok" } else { "muted" },
                percent = entry.percent_of_goal(),
                achieved = format_thousands(entry.achieved.into()),
                goal = format_thousands(entry.goal.into()),
                bar = progress_bar(entry.completion_percent(), entry.goal_met()),
            )
        })
        .collect();

    let streak_unit = if stats.current_streak == 1 { "day" } else { "days" };
    let body = PROGRESS_HTML
        .replace("{{TOTAL}}", &format_thousands(stats.total_steps))
        .replace("{{AVERAGE}}", &format_thousands(stats.average_steps))
        .replace("{{BEST}}", &format_thousands(best.achieved.into()))
        .replace("{{BEST_DATE}}", &format_day(best.date))
        .replace("{{RATE}}", &stats.goal_achievement_rate.to_string())
        .replace("{{RATE_BAR}}", &progress_bar(stats.goal_achievement_rate, true))
        .replace("{{STREAK}}", &format!("{} {streak_unit}", stats.current_streak))
        .replace("{{ACTIVITY}}", &activity);
    layout(Tab::Progress, &body)
}

fn layout(active: Tab, body: &str) -> String {
    let tabs: String = Tab::ALL
        .iter()
        .map(|tab| {
            let class = if *tab == active { "tab active" } else { "tab" };
            format!(r#"<a class="{class}" href="{}">{}</a>"#, tab.href(), tab.title())
        })
        .collect();

    LAYOUT_HTML
        .replace("{{TABS}}", &tabs)
        .replace("{{BODY}}", body)
}

fn progress_bar(percent: u32, met: bool) -> String {
    let class = if met { "bar-fill met" } else { "bar-fill" };
    format!(
        r#"<div class="bar"><div class="{class}" style="width: {}%"></div></div>"#,
        percent.min(100)
    )
}

fn id_segment(id: &str) -> String {
    utf8_percent_encode(id, ID_ENCODE_SET).to_string()
}

/// Formats like "Mon, Jan 1".
pub fn format_day(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const INPUT_HTML: &str = r#"<h2>Today's Step Tracking</h2>
    <p class="subtitle">{{DATE}}</p>
    <form class="step-form" method="post" action="/steps">
      <label for="goal">Step Goal</label>
      <input type="number" id="goal" name="goal" min="1" value="{{GOAL}}" required />
      <label for="achieved">Steps Achieved</label>
      <input type="number" id="achieved" name="achieved" min="0" value="{{ACHIEVED}}" required />
      <div class="progress-head">
        <span>Progress</span>
        <span>{{COMPLETION}}%</span>
      </div>
      {{BAR}}
      <div class="form-foot">
        <span class="hint">{{STATUS}}</span>
        <button class="btn-primary" type="submit">{{BUTTON}}</button>
      </div>
    </form>"#;

const HISTORY_HTML: &str = r#"<h2>Step History</h2>
    <div class="table-wrap">
      <table>
        <thead>
          <tr>
            <th>Date</th>
            <th>Goal</th>
            <th>Achieved</th>
            <th>Completion</th>
            <th class="right">Actions</th>
          </tr>
        </thead>
        <tbody>{{ROWS}}
        </tbody>
      </table>
    </div>"#;

const CALENDAR_HTML: &str = r#"<div class="calendar-head">
      <h2>{{LABEL}}</h2>
      <nav class="month-nav">
        <a class="tab" href="/calendar?month={{PREV}}" aria-label="Previous month">&lsaquo;</a>
        <a class="tab" href="/calendar?month={{NEXT}}" aria-label="Next month">&rsaquo;</a>
      </nav>
    </div>
    <div class="calendar">{{CELLS}}
    </div>"#;

const PROGRESS_HTML: &str = r#"<h2>Your Progress</h2>
    <section class="panel">
      <div class="stat">
        <span class="label">Total Steps</span>
        <span class="value">{{TOTAL}}</span>
      </div>
      <div class="stat">
        <span class="label">Average Steps</span>
        <span class="value">{{AVERAGE}}</span>
        <span class="hint">per day</span>
      </div>
      <div class="stat">
        <span class="label">Best Day</span>
        <span class="value">{{BEST}}</span>
        <span class="hint">on {{BEST_DATE}}</span>
      </div>
      <div class="stat">
        <span class="label">Goal Achievement</span>
        <span class="value">{{RATE}}%</span>
        {{RATE_BAR}}
      </div>
      <div class="stat wide">
        <span class="label">Current Streak</span>
        <span class="value accent">{{STREAK}}</span>
        <span class="hint">Keep it going!</span>
      </div>
    </section>
    <h3>Recent Activity</h3>
    <section class="activity-list">{{ACTIVITY}}
    </section>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Step Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef2ff;
      --bg-2: #c7d2fe;
      --ink: #2b2a28;
      --accent: #4f46e5;
      --accent-2: #2f4858;
      --ok: #2d7a4b;
      --danger: #c63b2b;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e0e7ff 60%, #f5f7ff 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.4rem;
    }

    .subtitle,
    .hint,
    .muted {
      color: #6f6a65;
    }

    .ok {
      color: var(--ok);
      font-weight: 600;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #6b645d;
      text-decoration: none;
    }

    .tab.active {
      background: white;
      color: var(--accent);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .step-form {
      display: grid;
      gap: 10px;
    }

    input[type="number"] {
      width: 100%;
      padding: 10px 14px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 12px;
      font: inherit;
    }

    .progress-head,
    .form-foot,
    .activity-head,
    .calendar-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    .bar {
      width: 100%;
      height: 10px;
      background: rgba(47, 72, 88, 0.12);
      border-radius: 999px;
      overflow: hidden;
    }

    .bar-fill {
      height: 100%;
      background: var(--accent);
    }

    .bar-fill.met {
      background: var(--ok);
    }

    .btn-primary {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font: inherit;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
      box-shadow: 0 10px 24px rgba(79, 70, 229, 0.3);
    }

    button.link {
      appearance: none;
      background: none;
      border: none;
      font: inherit;
      font-weight: 600;
      color: var(--accent);
      cursor: pointer;
    }

    button.link.danger {
      color: var(--danger);
    }

    button.link.ok {
      color: var(--ok);
    }

    .table-wrap {
      overflow-x: auto;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th {
      text-align: left;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
      padding: 10px;
    }

    td {
      padding: 12px 10px;
      border-top: 1px solid rgba(47, 72, 88, 0.08);
      white-space: nowrap;
    }

    td.completion {
      display: flex;
      align-items: center;
      gap: 8px;
      min-width: 160px;
    }

    .right,
    .row-actions {
      text-align: right;
    }

    .row-actions form {
      display: inline;
    }

    .calendar {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .weekday {
      text-align: center;
      font-size: 0.85rem;
      color: #8b857d;
      padding: 6px 0;
    }

    .day {
      min-height: 96px;
      padding: 8px;
      border: 1px solid rgba(47, 72, 88, 0.12);
      border-radius: 12px;
      background: white;
      position: relative;
      font-size: 0.75rem;
    }

    .day.blank {
      background: rgba(47, 72, 88, 0.04);
      border-color: transparent;
    }

    .day.today {
      border-color: var(--accent);
      background: #eef2ff;
    }

    .day-number {
      font-weight: 600;
      font-size: 0.95rem;
    }

    .dot {
      position: absolute;
      top: 10px;
      right: 10px;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      background: var(--accent);
    }

    .dot.met {
      background: var(--ok);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat.wide {
      grid-column: 1 / -1;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.accent {
      color: #b45309;
    }

    .activity-list {
      display: grid;
      gap: 12px;
    }

    .activity {
      background: white;
      border-radius: 16px;
      padding: 14px;
      display: grid;
      gap: 8px;
    }

    .empty {
      text-align: center;
      color: #6f6a65;
      padding: 32px 0;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 18px;
      }
      .day {
        min-height: 64px;
      }
      .day-detail {
        display: none;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Step Tracker</h1>
      <p class="subtitle">Record a daily goal and the steps you took.</p>
    </header>
    <nav class="tabs">{{TABS}}</nav>
    <section class="view">
    {{BODY}}
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{build_month, YearMonth};
    use crate::stats::build_stats_at;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(16000), "16,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn day_format() {
        assert_eq!(format_day(date(2024, 1, 1)), "Mon, Jan 1");
    }

    #[test]
    fn input_defaults_without_entry() {
        let html = render_input(date(2024, 1, 1), None);
        assert!(html.contains(r#"value="10000""#));
        assert!(html.contains("Save Steps"));
        assert!(html.contains("10,000 steps remaining"));
    }

    #[test]
    fn input_prefills_todays_entry() {
        let entry = Entry::new(date(2024, 1, 1), 8000, 9000);
        let html = render_input(entry.date, Some(&entry));
        assert!(html.contains(r#"value="8000""#));
        assert!(html.contains("Update Steps"));
        assert!(html.contains("Goal achieved!"));
        assert!(html.contains("100%"));
    }

    #[test]
    fn nearly_met_goal_still_shows_remaining_steps() {
        let entry = Entry::new(date(2024, 1, 1), 10000, 9996);
        let html = render_input(entry.date, Some(&entry));
        assert!(html.contains("100%"));
        assert!(html.contains("4 steps remaining"));
        assert!(!html.contains("Goal achieved!"));
    }

    #[test]
    fn hostile_ids_are_encoded_in_row_actions() {
        let mut entry = Entry::new(date(2024, 1, 1), 10000, 500);
        entry.id = r#"x"><script>/../y"#.to_string();
        let html = render_history(&[entry], &EditState::Idle);
        assert!(!html.contains("<script>"));
        assert!(html.contains("/history/x%22%3E%3Cscript%3E%2F%2E%2E%2Fy/delete"));
    }

    #[test]
    fn uuid_ids_are_left_readable() {
        let entry = Entry::new(date(2024, 1, 1), 10000, 500);
        let html = render_history(&[entry.clone()], &EditState::Idle);
        assert!(html.contains(&format!("/history/{}/edit", entry.id)));
    }

    #[test]
    fn history_marks_edited_row() {
        let first = Entry::new(date(2024, 1, 2), 8000, 4000);
        let second = Entry::new(date(2024, 1, 1), 10000, 12000);
        let mut editing = EditState::Idle;
        editing.start(&first);

        let html = render_history(&[first.clone(), second.clone()], &editing);
        assert!(html.contains(r#"action="/edit/save""#));
        assert!(html.contains(&format!("/history/{}/delete", second.id)));
        assert!(!html.contains(&format!("/history/{}/delete", first.id)));
        assert!(html.contains("12,000 steps"));
    }

    #[test]
    fn empty_views_show_placeholder() {
        assert!(render_history(&[], &EditState::Idle).contains("No step tracking data"));
        let stats = build_stats_at(date(2024, 1, 1), &[]);
        assert!(render_progress(&stats, &[]).contains("Start tracking your steps today!"));
    }

    #[test]
    fn progress_shows_stats() {
        let today = date(2024, 1, 2);
        let entries = vec![
            Entry::new(today, 8000, 4000),
            Entry::new(date(2024, 1, 1), 10000, 12000),
        ];
        let stats = build_stats_at(today, &entries);
        let html = render_progress(&stats, &entries);
        assert!(html.contains("16,000"));
        assert!(html.contains("8,000"));
        assert!(html.contains("on Mon, Jan 1"));
        assert!(html.contains("50%"));
        assert!(html.contains("2 days"));
        assert!(html.contains("120% of goal"));
    }

    #[test]
    fn calendar_has_navigation_and_cells() {
        let entries = vec![Entry::new(date(2024, 2, 29), 100, 100)];
        let month = build_month(YearMonth { year: 2024, month: 2 }, date(2024, 2, 10), &entries);
        let html = render_calendar(&month);
        assert!(html.contains("February 2024"));
        assert!(html.contains("/calendar?month=2024-01"));
        assert!(html.contains("/calendar?month=2024-03"));
        assert!(html.contains("day today"));
        assert!(html.contains("dot met"));
        assert_eq!(html.matches(r#"class="day blank""#).count(), 4);
    }

    #[test]
    fn active_tab_is_highlighted() {
        let html = render_input(date(2024, 1, 1), None);
        assert!(html.contains(r#"<a class="tab active" href="/">Today's Steps</a>"#));
    }
}
