//! Shared identifier types.

use uuid::Uuid;

pub type UserId = Uuid;
pub type SeriesId = Uuid;

/// Abbreviate a UUID for log output (first 8 chars)
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
