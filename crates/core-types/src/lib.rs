//! # Boxoffice Core Types
//!
//! Layer 0 crate: the records, request payloads and validated write commands
//! shared by the storage, service and HTTP crates. No I/O lives here.
//!
//! Wire names are Spanish (`nombre`, `fecha`, `evento_id`, ...) to keep the
//! public API compatible with existing clients; Rust field names are English.

pub mod datetime;
pub mod payloads;
pub mod structs;

pub use datetime::{EVENT_DATE_FORMAT, parse_event_date, truncate_to_minute};
pub use payloads::{EventPayload, ReservationPayload};
pub use structs::{Event, EventFields, ReservationFields, ReservationView};
