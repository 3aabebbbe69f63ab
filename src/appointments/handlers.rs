use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    appointments::{
        dto::{
            AllAppointmentsResponse, AppointmentListResponse, AppointmentWithOwner,
            AttendedUpdateResponse, CreateAppointmentRequest, CreateAppointmentResponse,
            StatusUpdateResponse, UpdateAttendedRequest, UpdateStatusRequest,
        },
        repo_types::Appointment,
    },
    error::ApiError,
    state::AppState,
};

pub fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", post(create_appointment))
        .route("/appointments/:id", get(list_user_appointments))
        .route("/appointments/:id/status", put(update_status))
        .route("/appointments/:id/attended", put(update_attended))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/all-appointments", get(list_all_with_owners))
}

#[instrument(skip(state, payload))]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreateAppointmentResponse>), ApiError> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        warn!(?missing, "appointment request with missing fields");
        return Err(ApiError::missing(missing));
    }
    if let Some(requested) = payload.status.as_deref() {
        // Clients may not pick their own initial status.
        warn!(status = requested, "ignoring caller-supplied status on creation");
    }

    let user_id = payload.user_id.unwrap_or_default();
    let date = payload.date.unwrap_or_default();
    let preferred_time = payload.preferred_time.unwrap_or_default();
    let concern_type = payload.concern_type.unwrap_or_default();

    let appointment =
        Appointment::create(&state.db, &user_id, &date, &preferred_time, &concern_type)
            .await
            .map_err(|e| ApiError::from_repo("Appointment scheduling failed", e))?;

    info!(
        appointment_id = %appointment.id,
        user_id = %appointment.user_id,
        date = %appointment.date,
        "appointment created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            message: "Appointment scheduled successfully! Waiting for approval.".into(),
            appointment_id: appointment.id.clone(),
            appointment,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_user_appointments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AppointmentListResponse>, ApiError> {
    let appointments = Appointment::find_by_owner(&state.db, &user_id)
        .await
        .map_err(|e| ApiError::from_repo("Error retrieving appointments", e))?;

    info!(user_id = %user_id, count = appointments.len(), "appointments retrieved");
    Ok(Json(AppointmentListResponse {
        message: "Appointments retrieved successfully".into(),
        appointments,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    let Some(requested) = payload.status.filter(|s| !s.is_empty()) else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Status is required"));
    };

    let update = Appointment::update_status(&state.db, &appointment_id, &requested)
        .await
        .map_err(|e| ApiError::from_repo("Failed to update appointment status", e))?;

    let message = if update.changed {
        info!(appointment_id = %appointment_id, status = %update.status, "status updated");
        format!("Appointment status updated to {}", update.status)
    } else {
        "Status was already set to the requested value".into()
    };
    Ok(Json(StatusUpdateResponse {
        message,
        status: update.status,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_attended(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
    Json(payload): Json<UpdateAttendedRequest>,
) -> Result<Json<AttendedUpdateResponse>, ApiError> {
    let Some(attended) = payload.attended else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Attended flag is required",
        ));
    };

    Appointment::update_attended(&state.db, &appointment_id, attended)
        .await
        .map_err(|e| ApiError::from_repo("Failed to update attendance status", e))?;

    info!(appointment_id = %appointment_id, attended, "attendance updated");
    Ok(Json(AttendedUpdateResponse {
        message: "Attendance status updated successfully".into(),
        attended,
    }))
}

#[instrument(skip(state))]
pub async fn list_all_with_owners(
    State(state): State<AppState>,
) -> Result<Json<AllAppointmentsResponse>, ApiError> {
    let rows = Appointment::list_all_with_owner_details(&state.db)
        .await
        .map_err(|e| ApiError::from_repo("Error retrieving appointments", e))?;

    info!(count = rows.len(), "staff appointment listing retrieved");
    Ok(Json(AllAppointmentsResponse {
        message: "All appointments retrieved successfully".into(),
        appointments: rows.into_iter().map(AppointmentWithOwner::from).collect(),
    }))
}
