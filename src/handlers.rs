use crate::calendar::{build_month, resolve_month, CalendarMonth};
use crate::errors::AppError;
use crate::input::{clamp_achieved, clamp_goal, parse_step_count};
use crate::models::{Entry, EntryUpdate, MonthQuery, StatsResponse, StepForm, StepSubmission};
use crate::state::AppState;
use crate::stats::{build_stats, stats_response};
use crate::tracker::today;
use crate::ui::{render_calendar, render_history, render_input, render_progress};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};

const RECENT_ACTIVITY: usize = 5;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    Html(render_input(today(), tracker.today_entry()))
}

pub async fn submit_steps(
    State(state): State<AppState>,
    Form(form): Form<StepForm>,
) -> Result<Redirect, AppError> {
    let goal = clamp_goal(parse_step_count(&form.goal));
    let achieved = clamp_achieved(parse_step_count(&form.achieved));
    state.tracker.lock().await.upsert_today(goal, achieved).await?;
    Ok(Redirect::to("/"))
}

pub async fn history(State(state): State<AppState>) -> Html<String> {
    let editing = state.editing.lock().await;
    let tracker = state.tracker.lock().await;
    Html(render_history(tracker.entries(), &editing))
}

pub async fn start_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let mut editing = state.editing.lock().await;
    let tracker = state.tracker.lock().await;
    let entry = tracker
        .entries()
        .iter()
        .find(|entry| entry.id == id)
        .ok_or_else(|| AppError::not_found(format!("no entry with id {id}")))?;
    editing.start(entry);
    Ok(Redirect::to("/history"))
}

pub async fn save_edit(
    State(state): State<AppState>,
    Form(form): Form<StepForm>,
) -> Result<Redirect, AppError> {
    let mut editing = state.editing.lock().await;
    editing.set_goal(&form.goal);
    editing.set_achieved(&form.achieved);
    if let Some(draft) = editing.commit() {
        state.tracker.lock().await.update(draft).await?;
    }
    Ok(Redirect::to("/history"))
}

pub async fn cancel_edit(State(state): State<AppState>) -> Redirect {
    state.editing.lock().await.cancel();
    Redirect::to("/history")
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let mut editing = state.editing.lock().await;
    if editing.is_editing(&id) {
        editing.cancel();
    }
    state.tracker.lock().await.delete(&id).await?;
    Ok(Redirect::to("/history"))
}

pub async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Html<String> {
    Html(render_calendar(&month_view(&state, query).await))
}

pub async fn progress(State(state): State<AppState>) -> Html<String> {
    let tracker = state.tracker.lock().await;
    let stats = build_stats(tracker.entries());
    Html(render_progress(&stats, tracker.recent(RECENT_ACTIVITY)))
}

pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<Entry>> {
    Json(state.tracker.lock().await.entries().to_vec())
}

pub async fn upsert_today(
    State(state): State<AppState>,
    Json(payload): Json<StepSubmission>,
) -> Result<Json<Entry>, AppError> {
    let goal = clamp_goal(payload.goal);
    let achieved = clamp_achieved(payload.achieved);
    let entry = state.tracker.lock().await.upsert_today(goal, achieved).await?;
    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EntryUpdate>,
) -> Result<Json<Entry>, AppError> {
    let entry = Entry {
        id,
        date: payload.date,
        goal: clamp_goal(payload.goal),
        achieved: clamp_achieved(payload.achieved),
    };

    let mut tracker = state.tracker.lock().await;
    if let Some(clash) = tracker.entry_for(entry.date).filter(|other| other.id != entry.id) {
        return Err(AppError::bad_request(format!(
            "entry {} already covers {}",
            clash.id, entry.date
        )));
    }

    if tracker.update(entry.clone()).await? {
        Ok(Json(entry))
    } else {
        Err(AppError::not_found(format!("no entry with id {}", entry.id)))
    }
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.tracker.lock().await.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let tracker = state.tracker.lock().await;
    Json(stats_response(today(), tracker.entries()))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Json<CalendarMonth> {
    Json(month_view(&state, query).await)
}

async fn month_view(state: &AppState, query: MonthQuery) -> CalendarMonth {
    let today = today();
    let month = resolve_month(query.month.as_deref(), today);
    let tracker = state.tracker.lock().await;
    build_month(month, today, tracker.entries())
}
