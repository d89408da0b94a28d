//! External-catalog payload reshaping.
//!
//! The upstream catalog returns book records carrying fields we do not
//! expose. Each record is reshaped in place: the excluded fields are
//! dropped and `released` is renamed to `release_date`, truncated to the
//! date portion (everything after the literal `T` is discarded).

use serde_json::{Map, Value};

/// Upstream fields stripped from every record.
pub const FIELDS_TO_EXCLUDE: [&str; 4] = ["url", "mediaType", "characters", "povCharacters"];

/// Reshape a list of upstream records in place.
pub fn reshape_records(records: &mut [Value]) {
    for record in records {
        if let Some(object) = record.as_object_mut() {
            reshape_record(object);
        }
    }
}

fn reshape_record(record: &mut Map<String, Value>) {
    for field in FIELDS_TO_EXCLUDE {
        record.remove(field);
    }
    if let Some(released) = record.remove("released") {
        let date = match &released {
            Value::String(timestamp) => {
                let date_part = timestamp.split('T').next().unwrap_or(timestamp.as_str());
                Value::String(date_part.to_string())
            }
            other => other.clone(),
        };
        record.insert("release_date".to_string(), date);
    }
}
