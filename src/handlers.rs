use crate::errors::{AppError, StoreError};
use crate::feedback::{Feedback, weekly_feedback};
use crate::models::{
    CompletionsResponse, DayView, MainSetView, MobilityView, Outcome, OutcomeRequest,
    OutcomeResponse, TimerKind, TimerRequest, exercise_key, format_speed, timer_key,
};
use crate::plan::{self, DayPlan};
use crate::state::AppState;
use crate::timer::{TimerView, format_clock};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub day: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let plan = match query.day.as_deref() {
        Some(name) => find_day(name)?,
        None => plan::for_weekday(Local::now().weekday()),
    };
    let feedback = current_feedback(&state).await;
    Ok(Html(render_index(plan, &feedback)))
}

pub async fn get_plan() -> Json<Vec<&'static str>> {
    Json(plan::day_names())
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<DayView>, AppError> {
    let plan = find_day(&day)?;
    let feedback = current_feedback(&state).await;
    let progress = state.progress.lock().await;

    let main = plan
        .main
        .iter()
        .enumerate()
        .map(|(index, set)| {
            let speed = progress
                .targets()
                .speed(&exercise_key(plan.day, index), set.speed);
            MainSetView {
                index,
                name: set.name.to_string(),
                reps: set.reps,
                rest: set.rest,
                rest_display: format_clock(set.rest),
                speed,
                speed_display: format_speed(speed),
            }
        })
        .collect();

    let mobility = plan
        .mobility
        .iter()
        .enumerate()
        .map(|(index, item)| MobilityView {
            index,
            name: item.name.to_string(),
            duration: item.duration,
            duration_display: format_clock(item.duration),
        })
        .collect();

    Ok(Json(DayView {
        day: plan.day.to_string(),
        kind: plan.kind.to_string(),
        explain: plan.explain.to_string(),
        warmup: plan.warmup.iter().map(|line| line.to_string()).collect(),
        main,
        mobility,
        feedback,
    }))
}

pub async fn record_outcome(
    State(state): State<AppState>,
    Json(payload): Json<OutcomeRequest>,
) -> Result<Json<OutcomeResponse>, AppError> {
    let plan = find_day(&payload.day).map_err(|err| AppError::bad_request(err.message))?;
    let set = plan
        .main
        .get(payload.index)
        .ok_or_else(|| AppError::bad_request(format!("{} has no set {}", plan.day, payload.index)))?;

    let outcome = Outcome {
        key: exercise_key(plan.day, payload.index),
        hit: payload.hit,
        baseline: set.speed,
    };

    let key = outcome.key.clone();
    let window = state.config.feedback_window;

    // File writes block; run them off the async workers while holding the lock.
    let mut progress = Arc::clone(&state.progress).lock_owned().await;
    let (speed, feedback) = tokio::task::spawn_blocking(move || -> Result<_, StoreError> {
        progress.record_outcome(&outcome)?;
        let speed = progress.targets().speed(&outcome.key, outcome.baseline);
        let feedback = weekly_feedback(&progress.history().history, window);
        Ok((speed, feedback))
    })
    .await
    .map_err(AppError::internal)??;

    info!(key = %key, hit = payload.hit, speed, "recorded outcome");

    Ok(Json(OutcomeResponse {
        key,
        speed,
        speed_display: format_speed(speed),
        feedback,
    }))
}

pub async fn get_feedback(State(state): State<AppState>) -> Json<Feedback> {
    Json(current_feedback(&state).await)
}

pub async fn list_timers(State(state): State<AppState>) -> Json<Vec<TimerView>> {
    Json(state.timers.lock().await.views())
}

pub async fn toggle_timer(
    State(state): State<AppState>,
    Json(payload): Json<TimerRequest>,
) -> Result<Json<TimerView>, AppError> {
    let (key, duration) = resolve_timer(&payload)?;
    let view = state.timers.lock().await.toggle(&key, duration);
    Ok(Json(view))
}

pub async fn reset_timer(
    State(state): State<AppState>,
    Json(payload): Json<TimerRequest>,
) -> Result<Json<TimerView>, AppError> {
    let (key, duration) = resolve_timer(&payload)?;
    let view = state.timers.lock().await.reset(&key, duration);
    Ok(Json(view))
}

pub async fn take_completions(State(state): State<AppState>) -> Json<CompletionsResponse> {
    let completed = state.timers.lock().await.take_completions();
    Json(CompletionsResponse { completed })
}

async fn current_feedback(state: &AppState) -> Feedback {
    let progress = state.progress.lock().await;
    weekly_feedback(&progress.history().history, state.config.feedback_window)
}

fn find_day(name: &str) -> Result<&'static DayPlan, AppError> {
    plan::find_day(name).ok_or_else(|| AppError::not_found(format!("no plan for day '{name}'")))
}

fn resolve_timer(request: &TimerRequest) -> Result<(String, u32), AppError> {
    let plan = find_day(&request.day).map_err(|err| AppError::bad_request(err.message))?;
    let duration = match request.kind {
        TimerKind::Rest => plan
            .main
            .get(request.index)
            .map(|set| set.rest)
            .filter(|rest| *rest > 0),
        TimerKind::Mobility => plan.mobility.get(request.index).map(|item| item.duration),
    };
    let duration = duration.ok_or_else(|| {
        AppError::bad_request(format!(
            "{} has no {:?} timer at {}",
            plan.day, request.kind, request.index
        ))
    })?;
    Ok((timer_key(plan.day, request.kind, request.index), duration))
}
