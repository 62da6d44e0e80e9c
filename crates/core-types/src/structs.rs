use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a row from the `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
    #[serde(rename = "ubicacion")]
    pub location: String,
}

/// A reservation joined with the name of the event it points at.
///
/// `event_name` is a read-time denormalization; it is `None` only if the
/// referenced event row is missing from the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReservationView {
    pub id: i64,
    #[serde(rename = "nombre_usuario")]
    pub holder_name: String,
    #[serde(rename = "cantidad_boletos")]
    pub ticket_count: i32,
    #[serde(rename = "fecha_reserva")]
    pub reserved_at: NaiveDateTime,
    #[serde(rename = "evento")]
    pub event_name: Option<String>,
}

/// Validated column values for an event insert or full-row update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    pub name: String,
    pub date: NaiveDateTime,
    pub location: String,
}

/// Validated column values for a reservation write. `reserved_at` is not
/// part of it: the service stamps it on insert and never rewrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationFields {
    pub event_id: i64,
    pub holder_name: String,
    pub ticket_count: i32,
}
