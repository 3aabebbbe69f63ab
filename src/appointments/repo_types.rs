use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::appointments::workflow::Status;

#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRow {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub preferred_time: String,
    pub concern_type: String,
    pub status: String,
    pub attended: bool,
    pub created_at: OffsetDateTime,
}

/// Appointment record. `user_id` is the owning-user reference, stored as
/// the caller supplied it (either identifier form) and never rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub preferred_time: String,
    pub concern_type: String,
    pub status: Status,
    pub attended: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<AppointmentRow> for Appointment {
    fn from(r: AppointmentRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            preferred_time: r.preferred_time,
            concern_type: r.concern_type,
            status: Status::parse(&r.status).unwrap_or_default(),
            attended: r.attended,
            created_at: r.created_at,
        }
    }
}

/// Owner identity attached to the staff listing; the placeholder values
/// keep unresolvable rows in the result instead of dropping them.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub username: String,
    pub id_number: String,
}

impl OwnerSummary {
    pub fn unknown() -> Self {
        Self {
            username: "Unknown".into(),
            id_number: "N/A".into(),
        }
    }
}

/// Result of a status update: the value now in the store and whether the
/// write actually changed anything.
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub status: Status,
    pub changed: bool,
}
