use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::appointments::repo_types::{Appointment, OwnerSummary};
use crate::appointments::workflow::Status;

/// Request body for scheduling. `status` is accepted so old clients do not
/// break, but it is ignored: a new appointment always starts `Pending`.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub concern_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.user_id.as_deref().unwrap_or("").is_empty() {
            missing.push("user_id");
        }
        if self.date.as_deref().unwrap_or("").is_empty() {
            missing.push("date");
        }
        if self.preferred_time.as_deref().unwrap_or("").is_empty() {
            missing.push("preferred_time");
        }
        if self.concern_type.as_deref().unwrap_or("").is_empty() {
            missing.push("concern_type");
        }
        missing
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAttendedRequest {
    #[serde(default)]
    pub attended: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CreateAppointmentResponse {
    pub message: String,
    pub appointment_id: String,
    pub appointment: Appointment,
}

#[derive(Debug, Serialize)]
pub struct AppointmentListResponse {
    pub message: String,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct AttendedUpdateResponse {
    pub message: String,
    pub attended: bool,
}

/// One row of the staff view: the appointment plus its owner's identity.
#[derive(Debug, Serialize)]
pub struct AppointmentWithOwner {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub preferred_time: String,
    pub concern_type: String,
    pub status: Status,
    pub attended: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_info: OwnerSummary,
}

impl From<(Appointment, OwnerSummary)> for AppointmentWithOwner {
    fn from((a, user_info): (Appointment, OwnerSummary)) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            date: a.date,
            preferred_time: a.preferred_time,
            concern_type: a.concern_type,
            status: a.status,
            attended: a.attended,
            created_at: a.created_at,
            user_info,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllAppointmentsResponse {
    pub message: String,
    pub appointments: Vec<AppointmentWithOwner>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn missing_fields_ignores_caller_supplied_status() {
        let req: CreateAppointmentRequest =
            serde_json::from_str(r#"{"user_id": "u-1", "status": "Approved"}"#).unwrap();
        assert_eq!(
            req.missing_fields(),
            vec!["date", "preferred_time", "concern_type"]
        );
        assert_eq!(req.status.as_deref(), Some("Approved"));
    }

    #[test]
    fn joined_row_serializes_owner_under_user_info() {
        let row = AppointmentWithOwner::from((
            Appointment {
                id: "a-1".into(),
                user_id: "legacy-7".into(),
                date: "2025-01-10".into(),
                preferred_time: "09:00".into(),
                concern_type: "Anxiety".into(),
                status: Status::Pending,
                attended: false,
                created_at: datetime!(2025-01-02 08:30 UTC),
            },
            OwnerSummary::unknown(),
        ));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["user_info"]["username"], "Unknown");
        assert_eq!(json["user_info"]["id_number"], "N/A");
        assert_eq!(json["status"], "Pending");
        assert_eq!(json["created_at"], "2025-01-02T08:30:00Z");
    }
}
