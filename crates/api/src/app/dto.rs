//! Request DTOs and the response envelope.

use serde_json::{json, Value};

use bookstack_core::status;

// The wire shapes for create/update are exactly the domain input shapes.
pub use bookstack_core::{BookPatch as UpdateBookRequest, NewBook as CreateBookRequest};

/// Uniform `{status_code, status, data}` envelope.
pub fn envelope(status_code: u16, data: Value) -> Value {
    json!({
        "status_code": status_code,
        "status": status::label(status_code),
        "data": data,
    })
}

/// Envelope variant carrying a human-readable `message`.
pub fn envelope_with_message(status_code: u16, message: String, data: Value) -> Value {
    json!({
        "status_code": status_code,
        "status": status::label(status_code),
        "message": message,
        "data": data,
    })
}
