use serde::Deserialize;
use serde_json::Value;

/// Raw event body as sent by clients. Every field is optional so that
/// validation, not deserialization, reports what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default, rename = "nombre")]
    pub name: Option<String>,
    #[serde(default, rename = "fecha")]
    pub date: Option<String>,
    #[serde(default, rename = "ubicacion")]
    pub location: Option<String>,
}

/// Raw reservation body. Numeric fields stay untyped (`2`, `"2"`, `"dos"`)
/// until validation classifies them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPayload {
    #[serde(default, rename = "evento_id")]
    pub event_id: Option<Value>,
    #[serde(default, rename = "nombre_usuario")]
    pub holder_name: Option<String>,
    #[serde(default, rename = "cantidad_boletos")]
    pub ticket_count: Option<Value>,
}
