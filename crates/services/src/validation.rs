//! Field rules shared by the event and reservation validators.
//!
//! Validators never stop at the first problem: each check appends its
//! [`FieldError`] and the caller gets the complete list.

use crate::error::FieldError;
use serde_json::Value;

pub const REQUIRED: &str = "Es un campo obligatorio.";
pub const MAX_100_CHARS: &str = "No puede tener más de 100 caracteres.";
pub const MAX_250_CHARS: &str = "No puede tener más de 250 caracteres.";
pub const BAD_DATE_FORMAT: &str = "Formato de fecha incorrecto [YYYY-MM-DD HH:mm].";
pub const NOT_A_NUMBER: &str = "Debe ser un número.";
pub const NOT_POSITIVE: &str = "Debe ser mayor a 0.";
pub const NOT_AN_INTEGER: &str = "Debe ser un número entero.";
pub const TOO_LARGE: &str = "Excede el valor máximo permitido.";

/// Whether a payload is being validated for an insert or for an update of
/// an existing row. Updates additionally require the row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update { id: Option<i64> },
}

/// Collects field errors in check order.
#[derive(Debug, Default)]
pub(crate) struct Errors(Vec<FieldError>);

impl Errors {
    pub(crate) fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError::new(field, message));
    }

    /// Appends the `id` rule for update mode.
    pub(crate) fn check_mode(&mut self, mode: Mode) {
        if let Mode::Update { id: None } = mode {
            self.push("id", REQUIRED);
        }
    }

    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, Vec<FieldError>> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(self.0),
        }
    }
}

/// A required string with a maximum length in characters. Blank strings
/// count as missing.
pub(crate) fn bounded_text<'a>(
    errors: &mut Errors,
    field: &'static str,
    value: Option<&'a str>,
    max_chars: usize,
    too_long: &'static str,
) -> Option<&'a str> {
    match value.filter(|v| !v.trim().is_empty()) {
        None => {
            errors.push(field, REQUIRED);
            None
        }
        Some(v) if v.chars().count() > max_chars => {
            errors.push(field, too_long);
            None
        }
        Some(v) => Some(v),
    }
}

/// A required, strictly positive whole number given as a JSON number or a
/// numeric string.
pub(crate) fn positive_integer(
    errors: &mut Errors,
    field: &'static str,
    value: Option<&Value>,
    max: i64,
) -> Option<i64> {
    match classify_number(value, max) {
        Ok(n) => Some(n),
        Err(message) => {
            errors.push(field, message);
            None
        }
    }
}

fn classify_number(value: Option<&Value>, max: i64) -> Result<i64, &'static str> {
    let (exact, approx) = match value {
        None | Some(Value::Null) => return Err(REQUIRED),
        Some(Value::String(s)) if s.trim().is_empty() => return Err(REQUIRED),
        Some(Value::String(s)) => {
            let s = s.trim();
            (s.parse::<i64>().ok(), s.parse::<f64>().ok())
        }
        Some(Value::Number(n)) => (n.as_i64(), n.as_f64()),
        Some(_) => (None, None),
    };

    // Integers are read exactly; the float reading only classifies the rest.
    let number = match exact {
        Some(n) => n,
        None => {
            let approx = approx.filter(|n| n.is_finite()).ok_or(NOT_A_NUMBER)?;
            if approx <= 0.0 {
                return Err(NOT_POSITIVE);
            }
            if approx.fract() != 0.0 {
                return Err(NOT_AN_INTEGER);
            }
            // 2^63 and above cannot be an i64.
            if approx >= 9_223_372_036_854_775_808.0 {
                return Err(TOO_LARGE);
            }
            approx as i64
        }
    };

    if number <= 0 {
        Err(NOT_POSITIVE)
    } else if number > max {
        Err(TOO_LARGE)
    } else {
        Ok(number)
    }
}
