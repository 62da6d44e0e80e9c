use crate::DbError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use core_types::{Event, EventFields, ReservationFields, ReservationView};

/// Persistence for event rows.
///
/// Write methods report the number of affected rows rather than failing on
/// zero, leaving the interpretation to the caller.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, in storage order.
    async fn list_events(&self) -> Result<Vec<Event>, DbError>;

    async fn find_event(&self, id: i64) -> Result<Option<Event>, DbError>;

    /// Inserts a row and returns its generated id.
    async fn insert_event(&self, fields: &EventFields) -> Result<i64, DbError>;

    /// Replaces name, date and location of one row.
    async fn update_event(&self, id: i64, fields: &EventFields) -> Result<u64, DbError>;

    /// Fails with [`DbError::ForeignKeyViolation`] while reservations still
    /// reference the event.
    async fn delete_event(&self, id: i64) -> Result<u64, DbError>;
}

/// Persistence for reservation rows. Reads join the event name in.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn list_reservations(&self) -> Result<Vec<ReservationView>, DbError>;

    async fn find_reservation(&self, id: i64) -> Result<Option<ReservationView>, DbError>;

    async fn insert_reservation(
        &self,
        fields: &ReservationFields,
        reserved_at: NaiveDateTime,
    ) -> Result<i64, DbError>;

    /// Rewrites event reference, holder name and ticket count. The
    /// reservation timestamp is left as it was.
    async fn update_reservation(&self, id: i64, fields: &ReservationFields)
    -> Result<u64, DbError>;

    async fn delete_reservation(&self, id: i64) -> Result<u64, DbError>;
}
