use crate::catalog::EditAction;
use crate::errors::AppError;
use crate::export::group_csv;
use crate::models::{
    CreateGroupRequest, DEFAULT_SETS, DecisionRequest, DraftRequest, Entry, Exercise, FinishSessionRequest, GroupSeries,
    GroupView, RecordWorkoutRequest, SelectGroupRequest, SessionForm,
};
use crate::session::{ExerciseDraft, SessionContext};
use crate::state::AppState;
use crate::trend::{build_all_series, build_series};
use crate::vaccines::{DecisionSummary, Schedule};
use crate::workout::{check_inputs, record_workout, session_form};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};
use uuid::Uuid;

// Handlers that need more than one lock take them in the order
// sessions, catalog, entries.

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<GroupView>> {
    let catalog = state.catalog.lock().await;
    Json(catalog.list())
}

pub async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupView>), AppError> {
    let sets = payload.sets.unwrap_or(DEFAULT_SETS);
    let exercises = payload
        .exercises
        .into_iter()
        .map(|name| Exercise::with_sets(name, sets))
        .collect();

    let mut catalog = state.catalog.lock().await;
    let exercises = catalog.create(&payload.name, exercises).await?;
    Ok((
        StatusCode::CREATED,
        Json(GroupView {
            name: payload.name.trim().to_string(),
            exercises,
        }),
    ))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GroupView>, AppError> {
    let catalog = state.catalog.lock().await;
    let exercises = catalog.get(&name)?.to_vec();
    Ok(Json(GroupView { name, exercises }))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut catalog = state.catalog.lock().await;
    catalog.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn edit_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(action): Json<EditAction>,
) -> Result<Json<GroupView>, AppError> {
    let mut catalog = state.catalog.lock().await;
    let exercises = catalog.apply(&name, action).await?;
    Ok(Json(GroupView { name, exercises }))
}

pub async fn get_session_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SessionForm>, AppError> {
    let catalog = state.catalog.lock().await;
    let exercises = catalog.get(&name)?;
    let entries = state.entries.lock().await;
    Ok(Json(session_form(&name, exercises, &entries)))
}

pub async fn record_session(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<RecordWorkoutRequest>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let catalog = state.catalog.lock().await;
    check_inputs(&name, catalog.get(&name)?, &payload.exercises)?;
    let mut entries = state.entries.lock().await;
    let date = payload.date.unwrap_or_else(today);
    let recorded = record_workout(
        &mut entries,
        &state.latest_workout_path,
        &name,
        date,
        payload.exercises,
    )
    .await?;
    Ok(Json(recorded))
}

pub async fn group_trend(State(state): State<AppState>, Path(name): Path<String>) -> Json<GroupSeries> {
    let entries = state.entries.lock().await;
    Json(build_series(&name, entries.for_group(&name)))
}

pub async fn all_trends(State(state): State<AppState>) -> Json<Vec<GroupSeries>> {
    let entries = state.entries.lock().await;
    Json(build_all_series(entries.all()))
}

pub async fn export_group(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.entries.lock().await;
    let body = group_csv(entries.for_group(&name))?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body))
}

pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<Entry>> {
    let entries = state.entries.lock().await;
    Json(entries.newest_first())
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry>, AppError> {
    let mut entries = state.entries.lock().await;
    Ok(Json(entries.delete(id).await?))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionContext>) {
    let mut sessions = state.sessions.lock().await;
    (StatusCode::CREATED, Json(sessions.open()))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionContext>, AppError> {
    let sessions = state.sessions.lock().await;
    Ok(Json(sessions.get(id)?.clone()))
}

pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut sessions = state.sessions.lock().await;
    sessions.close(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectGroupRequest>,
) -> Result<Json<SessionContext>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(id)?;
    let catalog = state.catalog.lock().await;
    session.select(&payload.group, &catalog)?;
    Ok(Json(session.clone()))
}

pub async fn edit_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(action): Json<EditAction>,
) -> Result<Json<SessionContext>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(id)?;
    let mut catalog = state.catalog.lock().await;
    session.edit(&mut catalog, action).await?;
    Ok(Json(session.clone()))
}

pub async fn put_draft(
    State(state): State<AppState>,
    Path((id, exercise)): Path<(Uuid, String)>,
    Json(payload): Json<DraftRequest>,
) -> Result<Json<SessionContext>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(id)?;
    let catalog = state.catalog.lock().await;
    session.record_draft(
        &catalog,
        &exercise,
        ExerciseDraft {
            weight: payload.weight,
            reps: payload.reps,
        },
    )?;
    Ok(Json(session.clone()))
}

pub async fn finish_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FinishSessionRequest>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions.get_mut(id)?;
    let group = session.selected_group()?.to_string();

    let catalog = state.catalog.lock().await;
    let inputs = session.workout_inputs(catalog.get(&group)?);

    let mut entries = state.entries.lock().await;
    let date = payload.date.unwrap_or_else(today);
    let recorded = record_workout(&mut entries, &state.latest_workout_path, &group, date, inputs).await?;
    session.clear_drafts();
    Ok(Json(recorded))
}

pub async fn get_vaccines(State(state): State<AppState>) -> Json<Schedule> {
    let vaccines = state.vaccines.lock().await;
    Json(vaccines.schedule().clone())
}

pub async fn vaccine_summary(State(state): State<AppState>) -> Json<DecisionSummary> {
    let vaccines = state.vaccines.lock().await;
    Json(vaccines.summary())
}

pub async fn set_vaccine_status(
    State(state): State<AppState>,
    Path((visit, vaccine)): Path<(String, String)>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<DecisionSummary>, AppError> {
    let mut vaccines = state.vaccines.lock().await;
    vaccines.set_status(&visit, &vaccine, payload.status).await?;
    Ok(Json(vaccines.summary()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
