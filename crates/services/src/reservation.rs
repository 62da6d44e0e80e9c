use crate::clock::Clock;
use crate::error::{Confirmation, FieldError, ServiceError, ServiceResult, storage_failure};
use crate::lookup::EventLookup;
use crate::validation::{Errors, MAX_100_CHARS, Mode, bounded_text, positive_integer};
use chrono::NaiveDateTime;
use core_types::{ReservationFields, ReservationPayload, ReservationView, truncate_to_minute};
use database::ReservationStore;
use std::sync::Arc;

pub const RESERVATION_NOT_FOUND: &str = "Reservación no encontrada";
pub const EVENT_ALREADY_PASSED: &str = "El evento ya ha pasado.";
pub const RESERVATION_DELETED: &str = "Reservación eliminada";

/// Checks a reservation payload and returns the column values to write.
/// Field order: `evento_id`, `nombre_usuario`, `cantidad_boletos`, then `id`
/// in update mode.
pub fn validate_reservation(
    payload: &ReservationPayload,
    mode: Mode,
) -> Result<ReservationFields, Vec<FieldError>> {
    let mut errors = Errors::default();

    let event_id = positive_integer(&mut errors, "evento_id", payload.event_id.as_ref(), i64::MAX);
    let holder_name = bounded_text(
        &mut errors,
        "nombre_usuario",
        payload.holder_name.as_deref(),
        100,
        MAX_100_CHARS,
    );
    let ticket_count = positive_integer(
        &mut errors,
        "cantidad_boletos",
        payload.ticket_count.as_ref(),
        i64::from(i32::MAX),
    )
    .and_then(|n| i32::try_from(n).ok());

    errors.check_mode(mode);

    let fields = match (event_id, holder_name, ticket_count) {
        (Some(event_id), Some(holder_name), Some(ticket_count)) => Some(ReservationFields {
            event_id,
            holder_name: holder_name.to_string(),
            ticket_count,
        }),
        _ => None,
    };
    errors.finish(fields)
}

/// An event is bookable while its minute is strictly after the current one.
fn is_upcoming(event_date: NaiveDateTime, now: NaiveDateTime) -> bool {
    truncate_to_minute(event_date) > truncate_to_minute(now)
}

/// CRUD operations over reservations. Event existence and the booking window
/// are checked through [`EventLookup`]; timestamps come from the [`Clock`].
#[derive(Clone)]
pub struct ReservationService {
    store: Arc<dyn ReservationStore>,
    events: Arc<dyn EventLookup>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        events: Arc<dyn EventLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            events,
            clock,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<ReservationView>> {
        tracing::debug!("Listing reservations.");
        self.store
            .list_reservations()
            .await
            .map_err(storage_failure("Error al obtener las reservaciones."))
    }

    pub async fn detail(&self, id: i64) -> ServiceResult<ReservationView> {
        tracing::debug!(reservation_id = id, "Fetching reservation.");
        self.store
            .find_reservation(id)
            .await
            .map_err(storage_failure("Error al obtener la reservación."))?
            .ok_or_else(|| ServiceError::NotFound(RESERVATION_NOT_FOUND.to_string()))
    }

    /// Books tickets for an upcoming event and stamps the reservation with
    /// the current time.
    pub async fn create(&self, payload: &ReservationPayload) -> ServiceResult<ReservationView> {
        let fields =
            validate_reservation(payload, Mode::Create).map_err(ServiceError::Validation)?;
        let event = self.events.get_event_by_id(fields.event_id).await?;

        let now = self.clock.now();
        if !is_upcoming(event.date, now) {
            tracing::warn!(event_id = event.id, event_date = %event.date, "Rejected booking for a past event.");
            return Err(ServiceError::BusinessRule(EVENT_ALREADY_PASSED.to_string()));
        }

        let id = self
            .store
            .insert_reservation(&fields, now)
            .await
            .map_err(storage_failure("Error al agregar la reservación."))?;
        tracing::info!(reservation_id = id, event_id = event.id, "Reservation created.");
        self.detail(id).await
    }

    /// Rewrites event, holder and ticket count. The booking window is not
    /// re-checked and the original reservation time is kept.
    pub async fn update(
        &self,
        id: i64,
        payload: &ReservationPayload,
    ) -> ServiceResult<ReservationView> {
        self.detail(id).await?;
        let fields = validate_reservation(payload, Mode::Update { id: Some(id) })
            .map_err(ServiceError::Validation)?;
        self.events.get_event_by_id(fields.event_id).await?;

        let affected = self
            .store
            .update_reservation(id, &fields)
            .await
            .map_err(storage_failure("Error al actualizar la reservación."))?;
        if affected == 0 {
            return Err(ServiceError::Internal(
                "Error actualizando la reservación".to_string(),
            ));
        }
        tracing::info!(reservation_id = id, "Reservation updated.");
        self.detail(id).await
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<Confirmation> {
        self.detail(id).await?;
        let affected = self
            .store
            .delete_reservation(id)
            .await
            .map_err(storage_failure("Error al eliminar la reservación."))?;
        if affected == 0 {
            return Err(ServiceError::Internal(
                "Error eliminando la reservación".to_string(),
            ));
        }
        tracing::info!(reservation_id = id, "Reservation deleted.");
        Ok(Confirmation::new(RESERVATION_DELETED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EVENT_NOT_FOUND, EventService};
    use crate::validation::{NOT_A_NUMBER, NOT_AN_INTEGER, NOT_POSITIVE, REQUIRED, TOO_LARGE};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use core_types::{Event, EventPayload};
    use database::{DbError, MemoryStore};
    use serde_json::json;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 30)
            .unwrap()
    }

    struct Fixture {
        events: Arc<EventService>,
        reservations: ReservationService,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let events = Arc::new(EventService::new(Arc::new(store.clone())));
        let reservations = ReservationService::new(
            Arc::new(store),
            events.clone(),
            Arc::new(FixedClock(now())),
        );
        Fixture {
            events,
            reservations,
        }
    }

    async fn event_at(fixture: &Fixture, date: &str) -> Event {
        fixture
            .events
            .create(&EventPayload {
                name: Some("Concierto".into()),
                date: Some(date.into()),
                location: Some("Auditorio".into()),
            })
            .await
            .unwrap()
    }

    fn booking(event_id: serde_json::Value, tickets: serde_json::Value) -> ReservationPayload {
        ReservationPayload {
            event_id: Some(event_id),
            holder_name: Some("Ana".into()),
            ticket_count: Some(tickets),
        }
    }

    #[tokio::test]
    async fn create_stamps_the_clock_and_joins_the_event() {
        let fx = fixture();
        let event = event_at(&fx, "2999-01-01 20:00").await;

        let view = fx
            .reservations
            .create(&booking(json!(event.id), json!(2)))
            .await
            .unwrap();

        assert_eq!(view.holder_name, "Ana");
        assert_eq!(view.ticket_count, 2);
        assert_eq!(view.reserved_at, now());
        assert_eq!(view.event_name.as_deref(), Some("Concierto"));
        assert_eq!(fx.reservations.list().await.unwrap(), vec![view]);
    }

    #[tokio::test]
    async fn numeric_strings_are_accepted() {
        let fx = fixture();
        let event = event_at(&fx, "2999-01-01 20:00").await;

        let view = fx
            .reservations
            .create(&booking(json!(event.id.to_string()), json!("3")))
            .await
            .unwrap();
        assert_eq!(view.ticket_count, 3);
    }

    #[tokio::test]
    async fn past_event_cannot_be_booked() {
        let fx = fixture();
        let event = event_at(&fx, "2000-01-01 00:00").await;

        let err = fx
            .reservations
            .create(&booking(json!(event.id), json!(1)))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::BusinessRule(EVENT_ALREADY_PASSED.into()));
        assert!(fx.reservations.list().await.unwrap().is_empty());
    }

    #[test]
    fn booking_window_compares_whole_minutes() {
        let event = NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        // Same minute as `now()` even though the seconds differ.
        assert!(!is_upcoming(event, now()));
        assert!(is_upcoming(event + chrono::Duration::minutes(1), now()));
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let fx = fixture();
        let err = fx
            .reservations
            .create(&booking(json!(404), json!(1)))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound(EVENT_NOT_FOUND.into()));
    }

    #[tokio::test]
    async fn validation_reports_every_field() {
        let fx = fixture();
        let err = fx
            .reservations
            .create(&ReservationPayload::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation(vec![
                FieldError::new("evento_id", REQUIRED),
                FieldError::new("nombre_usuario", REQUIRED),
                FieldError::new("cantidad_boletos", REQUIRED),
            ])
        );
    }

    #[test]
    fn ticket_count_rules() {
        let cases = [
            (json!(0), NOT_POSITIVE),
            (json!("dos"), NOT_A_NUMBER),
            (json!(2.5), NOT_AN_INTEGER),
            (json!(3_000_000_000_i64), TOO_LARGE),
        ];
        for (tickets, message) in cases {
            assert_eq!(
                validate_reservation(&booking(json!(1), tickets), Mode::Create).unwrap_err(),
                vec![FieldError::new("cantidad_boletos", message)]
            );
        }
    }

    #[test]
    fn large_event_ids_are_read_exactly() {
        let id = 9_007_199_254_740_993_i64;
        for event_id in [json!(id), json!("9007199254740993")] {
            let fields = validate_reservation(&booking(event_id, json!(1)), Mode::Create).unwrap();
            assert_eq!(fields.event_id, id);
        }
        assert_eq!(
            validate_reservation(&booking(json!("9223372036854775808"), json!(1)), Mode::Create)
                .unwrap_err(),
            vec![FieldError::new("evento_id", TOO_LARGE)]
        );
    }

    struct FailingLookup;

    #[async_trait]
    impl EventLookup for FailingLookup {
        async fn get_event_by_id(&self, _id: i64) -> ServiceResult<Event> {
            Err(ServiceError::Internal("lookup offline".into()))
        }
    }

    #[tokio::test]
    async fn lookup_errors_are_forwarded_unchanged() {
        let service = ReservationService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(FailingLookup),
            Arc::new(FixedClock(now())),
        );
        let err = service
            .create(&booking(json!(1), json!(1)))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Internal("lookup offline".into()));
    }

    #[tokio::test]
    async fn update_keeps_the_reservation_time() {
        let fx = fixture();
        let upcoming = event_at(&fx, "2999-01-01 20:00").await;
        let past = event_at(&fx, "2000-01-01 00:00").await;
        let created = fx
            .reservations
            .create(&booking(json!(upcoming.id), json!(2)))
            .await
            .unwrap();

        // Moving a reservation onto a past event is allowed.
        let updated = fx
            .reservations
            .update(
                created.id,
                &ReservationPayload {
                    event_id: Some(json!(past.id)),
                    holder_name: Some("Luis".into()),
                    ticket_count: Some(json!(5)),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.holder_name, "Luis");
        assert_eq!(updated.ticket_count, 5);
        assert_eq!(updated.reserved_at, created.reserved_at);
    }

    #[tokio::test]
    async fn update_of_unknown_reservation_is_not_found() {
        let fx = fixture();
        let err = fx
            .reservations
            .update(3, &booking(json!(1), json!(1)))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound(RESERVATION_NOT_FOUND.into()));
    }

    #[tokio::test]
    async fn update_onto_unknown_event_is_not_found() {
        let fx = fixture();
        let event = event_at(&fx, "2999-01-01 20:00").await;
        let created = fx
            .reservations
            .create(&booking(json!(event.id), json!(2)))
            .await
            .unwrap();

        let err = fx
            .reservations
            .update(created.id, &booking(json!(999), json!(2)))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound(EVENT_NOT_FOUND.into()));
    }

    #[tokio::test]
    async fn delete_then_detail_is_not_found() {
        let fx = fixture();
        let event = event_at(&fx, "2999-01-01 20:00").await;
        let created = fx
            .reservations
            .create(&booking(json!(event.id), json!(1)))
            .await
            .unwrap();

        assert_eq!(
            fx.reservations.delete(created.id).await.unwrap(),
            Confirmation::new(RESERVATION_DELETED)
        );
        assert_eq!(
            fx.reservations.detail(created.id).await.unwrap_err(),
            ServiceError::NotFound(RESERVATION_NOT_FOUND.into())
        );
        assert_eq!(
            fx.reservations.delete(created.id).await.unwrap_err(),
            ServiceError::NotFound(RESERVATION_NOT_FOUND.into())
        );
    }

    /// Lookup that resolves every id to the same upcoming event.
    struct KnownEvent;

    #[async_trait]
    impl EventLookup for KnownEvent {
        async fn get_event_by_id(&self, id: i64) -> ServiceResult<Event> {
            Ok(Event {
                id,
                name: "Concierto".into(),
                date: now() + chrono::Duration::days(30),
                location: "Auditorio".into(),
            })
        }
    }

    /// Finds every reservation but answers writes with a fixed outcome:
    /// `Some(rows)` or a storage failure for `None`.
    struct FixedWrites(Option<u64>);

    impl FixedWrites {
        fn outcome(&self) -> Result<u64, DbError> {
            self.0
                .ok_or_else(|| DbError::ConnectionConfigError("offline".into()))
        }
    }

    #[async_trait]
    impl ReservationStore for FixedWrites {
        async fn list_reservations(&self) -> Result<Vec<ReservationView>, DbError> {
            Ok(Vec::new())
        }
        async fn find_reservation(&self, id: i64) -> Result<Option<ReservationView>, DbError> {
            Ok(Some(ReservationView {
                id,
                holder_name: "Ana".into(),
                ticket_count: 1,
                reserved_at: now(),
                event_name: Some("Concierto".into()),
            }))
        }
        async fn insert_reservation(
            &self,
            _fields: &ReservationFields,
            _reserved_at: NaiveDateTime,
        ) -> Result<i64, DbError> {
            Ok(1)
        }
        async fn update_reservation(
            &self,
            _id: i64,
            _fields: &ReservationFields,
        ) -> Result<u64, DbError> {
            self.outcome()
        }
        async fn delete_reservation(&self, _id: i64) -> Result<u64, DbError> {
            self.outcome()
        }
    }

    fn with_writes(rows: Option<u64>) -> ReservationService {
        ReservationService::new(
            Arc::new(FixedWrites(rows)),
            Arc::new(KnownEvent),
            Arc::new(FixedClock(now())),
        )
    }

    #[tokio::test]
    async fn writes_that_touch_no_rows_are_internal_errors() {
        let service = with_writes(Some(0));
        assert_eq!(
            service.update(4, &booking(json!(1), json!(2))).await.unwrap_err(),
            ServiceError::Internal("Error actualizando la reservación".into())
        );
        assert_eq!(
            service.delete(4).await.unwrap_err(),
            ServiceError::Internal("Error eliminando la reservación".into())
        );
    }

    #[tokio::test]
    async fn failed_writes_use_the_operation_message() {
        let service = with_writes(None);
        assert_eq!(
            service.update(4, &booking(json!(1), json!(2))).await.unwrap_err(),
            ServiceError::Internal("Error al actualizar la reservación.".into())
        );
        assert_eq!(
            service.delete(4).await.unwrap_err(),
            ServiceError::Internal("Error al eliminar la reservación.".into())
        );
    }
}
