//! Shared status-label table.
//!
//! Every response envelope carries a human-readable `status` label alongside
//! the numeric `status_code`. The table is process-wide constant
//! configuration; codes outside it fall back to `"unknown"` rather than
//! failing the lookup.

/// Human-readable label for an HTTP status code.
pub fn label(code: u16) -> &'static str {
    match code {
        200 | 201 => "success",
        404 => "not found",
        500 => "internal server error",
        _ => "unknown",
    }
}
