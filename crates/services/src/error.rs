use database::DbError;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use thiserror::Error;

/// One violated field rule. Serializes as a single-key object,
/// `{"nombre": "Es un campo obligatorio."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field, self.message)?;
        map.end()
    }
}

/// Every way an entity operation can fail. Each variant corresponds to
/// exactly one HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Input rejected before touching storage; carries every violated rule.
    #[error("Validation failed ({} field errors)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    /// Deletion blocked by dependent rows.
    #[error("{0}")]
    Conflict(String),

    /// A well-formed request that the booking rules refuse.
    #[error("{0}")]
    BusinessRule(String),

    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Maps a failed store call to `Internal` with the operation's fallback
/// message. The storage error itself only goes to the log.
pub(crate) fn storage_failure(message: &'static str) -> impl FnOnce(DbError) -> ServiceError {
    move |err| {
        tracing::error!(error = %err, "{message}");
        ServiceError::Internal(message.to_string())
    }
}

/// Acknowledgement returned by successful deletes, `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub detail: String,
}

impl Confirmation {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_errors_serialize_as_single_key_objects() {
        let errors = vec![
            FieldError::new("nombre", "Es un campo obligatorio."),
            FieldError::new("fecha", "Es un campo obligatorio."),
        ];
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([
                { "nombre": "Es un campo obligatorio." },
                { "fecha": "Es un campo obligatorio." },
            ])
        );
    }
}
