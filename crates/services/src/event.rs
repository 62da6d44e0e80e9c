use crate::error::{Confirmation, FieldError, ServiceError, ServiceResult, storage_failure};
use crate::lookup::EventLookup;
use crate::validation::{
    BAD_DATE_FORMAT, Errors, MAX_100_CHARS, MAX_250_CHARS, Mode, REQUIRED, bounded_text,
};
use async_trait::async_trait;
use core_types::{Event, EventFields, EventPayload, parse_event_date};
use database::{DbError, EventStore};
use std::sync::Arc;

pub const EVENT_NOT_FOUND: &str = "Evento no encontrado";
pub const EVENT_HAS_RESERVATIONS: &str = "Este evento tiene reservaciones.";
pub const EVENT_DELETED: &str = "Evento eliminado";

/// Checks an event payload and returns the column values to write.
///
/// Rules run in field order (`nombre`, `fecha`, `ubicacion`, then `id` in
/// update mode) and every violation is reported.
pub fn validate_event(payload: &EventPayload, mode: Mode) -> Result<EventFields, Vec<FieldError>> {
    let mut errors = Errors::default();

    let name = bounded_text(&mut errors, "nombre", payload.name.as_deref(), 100, MAX_100_CHARS);

    // Malformed dates reject the payload.
    let date = match payload.date.as_deref().filter(|d| !d.trim().is_empty()) {
        None => {
            errors.push("fecha", REQUIRED);
            None
        }
        Some(raw) => {
            let parsed = parse_event_date(raw);
            if parsed.is_none() {
                errors.push("fecha", BAD_DATE_FORMAT);
            }
            parsed
        }
    };

    let location = bounded_text(
        &mut errors,
        "ubicacion",
        payload.location.as_deref(),
        250,
        MAX_250_CHARS,
    );

    errors.check_mode(mode);

    let fields = match (name, date, location) {
        (Some(name), Some(date), Some(location)) => Some(EventFields {
            name: name.to_string(),
            date,
            location: location.to_string(),
        }),
        _ => None,
    };
    errors.finish(fields)
}

/// CRUD operations over events.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Event>> {
        tracing::debug!("Listing events.");
        self.store
            .list_events()
            .await
            .map_err(storage_failure("Error al obtener los eventos."))
    }

    pub async fn detail(&self, id: i64) -> ServiceResult<Event> {
        tracing::debug!(event_id = id, "Fetching event.");
        self.store
            .find_event(id)
            .await
            .map_err(storage_failure("Error al obtener el evento."))?
            .ok_or_else(|| ServiceError::NotFound(EVENT_NOT_FOUND.to_string()))
    }

    /// Validates and inserts a new event, then returns it as stored.
    pub async fn create(&self, payload: &EventPayload) -> ServiceResult<Event> {
        let fields = validate_event(payload, Mode::Create).map_err(ServiceError::Validation)?;
        let id = self
            .store
            .insert_event(&fields)
            .await
            .map_err(storage_failure("Error al agregar el evento."))?;
        tracing::info!(event_id = id, "Event created.");
        self.detail(id).await
    }

    /// Replaces every column of an existing event. Existence is checked
    /// before the payload, so an unknown id is a 404 even for bad input.
    pub async fn update(&self, id: i64, payload: &EventPayload) -> ServiceResult<Event> {
        self.detail(id).await?;
        let fields = validate_event(payload, Mode::Update { id: Some(id) })
            .map_err(ServiceError::Validation)?;
        let affected = self
            .store
            .update_event(id, &fields)
            .await
            .map_err(storage_failure("Error al actualizar el evento."))?;
        if affected == 0 {
            return Err(ServiceError::Internal("Error actualizando evento".to_string()));
        }
        tracing::info!(event_id = id, "Event updated.");
        self.detail(id).await
    }

    /// Deletes an event that no reservation references.
    pub async fn delete(&self, id: i64) -> ServiceResult<Confirmation> {
        self.detail(id).await?;
        match self.store.delete_event(id).await {
            Ok(0) => Err(ServiceError::Internal("Error eliminando evento".to_string())),
            Ok(_) => {
                tracing::info!(event_id = id, "Event deleted.");
                Ok(Confirmation::new(EVENT_DELETED))
            }
            Err(DbError::ForeignKeyViolation(detail)) => {
                tracing::warn!(event_id = id, %detail, "Event still has reservations.");
                Err(ServiceError::Conflict(EVENT_HAS_RESERVATIONS.to_string()))
            }
            Err(err) => Err(storage_failure("Error al eliminar el evento.")(err)),
        }
    }
}

#[async_trait]
impl EventLookup for EventService {
    async fn get_event_by_id(&self, id: i64) -> ServiceResult<Event> {
        self.detail(id).await
    }
}
