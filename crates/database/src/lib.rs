//! # Boxoffice Database Crate
//!
//! The SQL execution facility for the services layer. It is the only crate
//! that knows table and column names.
//!
//! ## Architectural Principles
//!
//! - **Adapter behind traits:** `EventStore` and `ReservationStore` are the
//!   whole surface the services see, so a service can run against Postgres or
//!   against the in-memory tables without changing.
//! - **One statement, one connection:** every store method runs a single
//!   parameterized statement on a pooled connection. Multi-step operations are
//!   sequenced by the services, not wrapped in transactions here.
//! - **Constraint errors are typed:** a foreign-key violation surfaces as
//!   `DbError::ForeignKeyViolation` so callers can tell "still referenced" apart
//!   from an ordinary failure.
//!
//! ## Public API
//!
//! - `connect`: builds the Postgres pool from `DatabaseConfig`.
//! - `DbRepository`: the Postgres store.
//! - `MemoryStore`: the in-memory store.
//! - `DbError`: the error type returned by every store method.
//!
//! The Postgres schema lives in `schema.sql` next to this crate's manifest.

pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

pub use connection::connect;
pub use error::DbError;
pub use memory::MemoryStore;
pub use repository::DbRepository;
pub use store::{EventStore, ReservationStore};
