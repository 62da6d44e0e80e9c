use crate::DbError;
use crate::store::{EventStore, ReservationStore};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use core_types::{Event, EventFields, ReservationFields, ReservationView};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-local storage with the same contract as [`crate::DbRepository`]:
/// generated ids, joined reads and the reservation -> event foreign key.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<i64, Event>,
    reservations: BTreeMap<i64, ReservationRow>,
    last_event_id: i64,
    last_reservation_id: i64,
}

#[derive(Debug, Clone)]
struct ReservationRow {
    event_id: i64,
    holder_name: String,
    ticket_count: i32,
    reserved_at: NaiveDateTime,
}

impl Tables {
    fn view(&self, id: i64, row: &ReservationRow) -> ReservationView {
        ReservationView {
            id,
            holder_name: row.holder_name.clone(),
            ticket_count: row.ticket_count,
            reserved_at: row.reserved_at,
            event_name: self.events.get(&row.event_id).map(|e| e.name.clone()),
        }
    }

    fn ensure_event_exists(&self, event_id: i64) -> Result<(), DbError> {
        if self.events.contains_key(&event_id) {
            Ok(())
        } else {
            Err(DbError::ForeignKeyViolation(format!(
                "event {event_id} does not exist"
            )))
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // No method panics while holding the lock, so a poisoned guard still
        // holds consistent tables.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Event>, DbError> {
        Ok(self.lock().events.values().cloned().collect())
    }

    async fn find_event(&self, id: i64) -> Result<Option<Event>, DbError> {
        Ok(self.lock().events.get(&id).cloned())
    }

    async fn insert_event(&self, fields: &EventFields) -> Result<i64, DbError> {
        let mut tables = self.lock();
        tables.last_event_id += 1;
        let id = tables.last_event_id;
        tables.events.insert(
            id,
            Event {
                id,
                name: fields.name.clone(),
                date: fields.date,
                location: fields.location.clone(),
            },
        );
        Ok(id)
    }

    async fn update_event(&self, id: i64, fields: &EventFields) -> Result<u64, DbError> {
        let mut tables = self.lock();
        let Some(event) = tables.events.get_mut(&id) else {
            return Ok(0);
        };
        event.name = fields.name.clone();
        event.date = fields.date;
        event.location = fields.location.clone();
        Ok(1)
    }

    async fn delete_event(&self, id: i64) -> Result<u64, DbError> {
        let mut tables = self.lock();
        if tables.reservations.values().any(|r| r.event_id == id) {
            return Err(DbError::ForeignKeyViolation(format!(
                "event {id} is still referenced by reservations"
            )));
        }
        Ok(tables.events.remove(&id).map_or(0, |_| 1))
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn list_reservations(&self) -> Result<Vec<ReservationView>, DbError> {
        let tables = self.lock();
        Ok(tables
            .reservations
            .iter()
            .map(|(id, row)| tables.view(*id, row))
            .collect())
    }

    async fn find_reservation(&self, id: i64) -> Result<Option<ReservationView>, DbError> {
        let tables = self.lock();
        Ok(tables.reservations.get(&id).map(|row| tables.view(id, row)))
    }

    async fn insert_reservation(
        &self,
        fields: &ReservationFields,
        reserved_at: NaiveDateTime,
    ) -> Result<i64, DbError> {
        let mut tables = self.lock();
        tables.ensure_event_exists(fields.event_id)?;
        tables.last_reservation_id += 1;
        let id = tables.last_reservation_id;
        tables.reservations.insert(
            id,
            ReservationRow {
                event_id: fields.event_id,
                holder_name: fields.holder_name.clone(),
                ticket_count: fields.ticket_count,
                reserved_at,
            },
        );
        Ok(id)
    }

    async fn update_reservation(
        &self,
        id: i64,
        fields: &ReservationFields,
    ) -> Result<u64, DbError> {
        let mut tables = self.lock();
        if !tables.reservations.contains_key(&id) {
            return Ok(0);
        }
        tables.ensure_event_exists(fields.event_id)?;
        let Some(row) = tables.reservations.get_mut(&id) else {
            return Ok(0);
        };
        row.event_id = fields.event_id;
        row.holder_name = fields.holder_name.clone();
        row.ticket_count = fields.ticket_count;
        Ok(1)
    }

    async fn delete_reservation(&self, id: i64) -> Result<u64, DbError> {
        Ok(self.lock().reservations.remove(&id).map_or(0, |_| 1))
    }
}
