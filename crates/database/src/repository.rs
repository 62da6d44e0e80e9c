use crate::DbError;
use crate::store::{EventStore, ReservationStore};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use core_types::{Event, EventFields, ReservationFields, ReservationView};
use sqlx::postgres::PgPool;

const SELECT_EVENTS: &str = "SELECT id, nombre AS name, fecha AS date, ubicacion AS location FROM events";

const SELECT_RESERVATIONS: &str = r#"
    SELECT
        r.id,
        r.nombre_usuario AS holder_name,
        r.cantidad_boletos AS ticket_count,
        r.fecha_reserva AS reserved_at,
        e.nombre AS event_name
    FROM reservations AS r
    LEFT JOIN events AS e ON e.id = r.evento_id
"#;

/// The `DbRepository` is the Postgres implementation of the store traits.
/// Each method runs exactly one statement with an explicit, positional
/// parameter list matching the statement's column order.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn log_failure(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |err| {
        let err = DbError::classify(err);
        tracing::error!(error = %err, operation, "Database statement failed.");
        err
    }
}

#[async_trait]
impl EventStore for DbRepository {
    async fn list_events(&self) -> Result<Vec<Event>, DbError> {
        sqlx::query_as::<_, Event>(SELECT_EVENTS)
            .fetch_all(&self.pool)
            .await
            .map_err(log_failure("list_events"))
    }

    async fn find_event(&self, id: i64) -> Result<Option<Event>, DbError> {
        let sql = format!("{SELECT_EVENTS} WHERE id = $1");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_failure("find_event"))
    }

    async fn insert_event(&self, fields: &EventFields) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (nombre, fecha, ubicacion) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&fields.name)
        .bind(fields.date)
        .bind(&fields.location)
        .fetch_one(&self.pool)
        .await
        .map_err(log_failure("insert_event"))
    }

    async fn update_event(&self, id: i64, fields: &EventFields) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET nombre = $1,
                fecha = $2,
                ubicacion = $3
            WHERE id = $4
            "#,
        )
        .bind(&fields.name)
        .bind(fields.date)
        .bind(&fields.location)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(log_failure("update_event"))?;
        Ok(result.rows_affected())
    }

    async fn delete_event(&self, id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_failure("delete_event"))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ReservationStore for DbRepository {
    async fn list_reservations(&self) -> Result<Vec<ReservationView>, DbError> {
        sqlx::query_as::<_, ReservationView>(SELECT_RESERVATIONS)
            .fetch_all(&self.pool)
            .await
            .map_err(log_failure("list_reservations"))
    }

    async fn find_reservation(&self, id: i64) -> Result<Option<ReservationView>, DbError> {
        let sql = format!("{SELECT_RESERVATIONS} WHERE r.id = $1");
        sqlx::query_as::<_, ReservationView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_failure("find_reservation"))
    }

    async fn insert_reservation(
        &self,
        fields: &ReservationFields,
        reserved_at: NaiveDateTime,
    ) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reservations (evento_id, nombre_usuario, cantidad_boletos, fecha_reserva)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(fields.event_id)
        .bind(&fields.holder_name)
        .bind(fields.ticket_count)
        .bind(reserved_at)
        .fetch_one(&self.pool)
        .await
        .map_err(log_failure("insert_reservation"))
    }

    async fn update_reservation(
        &self,
        id: i64,
        fields: &ReservationFields,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET evento_id = $1,
                nombre_usuario = $2,
                cantidad_boletos = $3
            WHERE id = $4
            "#,
        )
        .bind(fields.event_id)
        .bind(&fields.holder_name)
        .bind(fields.ticket_count)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(log_failure("update_reservation"))?;
        Ok(result.rows_affected())
    }

    async fn delete_reservation(&self, id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_failure("delete_reservation"))?;
        Ok(result.rows_affected())
    }
}
