use chrono::{DateTime, Local, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// ISO-8601 local timestamp used in exported metadata.
pub fn export_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Compact stamp used in download file names, e.g. `20240131_154500`.
pub fn file_stamp(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y%m%d_%H%M%S").to_string()
}
