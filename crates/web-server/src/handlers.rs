use crate::{AppState, error::AppError, extract::Payload};
use axum::{
    Json,
    extract::{Path, State},
};
use core_types::{Event, EventPayload, ReservationPayload, ReservationView};
use services::{Confirmation, EVENT_NOT_FOUND, RESERVATION_NOT_FOUND, ServiceError};
use std::sync::Arc;

/// Non-numeric ids can never match a row, so they are reported as missing.
fn parse_id(raw: &str, not_found: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| ServiceError::NotFound(not_found.to_string()).into())
}

/// # GET /eventos
pub async fn list_events(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.events.list().await?))
}

/// # GET /eventos/:event_id
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let id = parse_id(&event_id, EVENT_NOT_FOUND)?;
    Ok(Json(state.events.detail(id).await?))
}

/// # POST /eventos
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Payload(payload): Payload<EventPayload>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.events.create(&payload).await?))
}

/// # PUT /eventos/:event_id
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Payload(payload): Payload<EventPayload>,
) -> Result<Json<Event>, AppError> {
    let id = parse_id(&event_id, EVENT_NOT_FOUND)?;
    Ok(Json(state.events.update(id, &payload).await?))
}

/// # DELETE /eventos/:event_id
/// Answers 409 while any reservation still points at the event.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Confirmation>, AppError> {
    let id = parse_id(&event_id, EVENT_NOT_FOUND)?;
    Ok(Json(state.events.delete(id).await?))
}

/// # GET /reservas
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReservationView>>, AppError> {
    Ok(Json(state.reservations.list().await?))
}

/// # GET /reservas/:reservation_id
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<Json<ReservationView>, AppError> {
    let id = parse_id(&reservation_id, RESERVATION_NOT_FOUND)?;
    Ok(Json(state.reservations.detail(id).await?))
}

/// # POST /reservas
/// Only upcoming events can be booked.
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Payload(payload): Payload<ReservationPayload>,
) -> Result<Json<ReservationView>, AppError> {
    Ok(Json(state.reservations.create(&payload).await?))
}

/// # PUT /reservas/:reservation_id
pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
    Payload(payload): Payload<ReservationPayload>,
) -> Result<Json<ReservationView>, AppError> {
    let id = parse_id(&reservation_id, RESERVATION_NOT_FOUND)?;
    Ok(Json(state.reservations.update(id, &payload).await?))
}

/// # DELETE /reservas/:reservation_id
pub async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<Json<Confirmation>, AppError> {
    let id = parse_id(&reservation_id, RESERVATION_NOT_FOUND)?;
    Ok(Json(state.reservations.delete(id).await?))
}
