//! # Boxoffice Services Crate
//!
//! Validation and business rules for events and reservations. Each service
//! owns its store behind a trait object; the reservation service reaches
//! events only through [`EventLookup`] and reads time through [`Clock`].
//!
//! Every operation returns [`ServiceResult`]. The [`ServiceError`] variant
//! alone decides the HTTP status in the web layer.

pub mod clock;
pub mod error;
pub mod event;
pub mod lookup;
pub mod reservation;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use error::{Confirmation, FieldError, ServiceError, ServiceResult};
pub use event::{EVENT_NOT_FOUND, EventService, validate_event};
pub use lookup::EventLookup;
pub use reservation::{RESERVATION_NOT_FOUND, ReservationService, validate_reservation};
pub use validation::Mode;
