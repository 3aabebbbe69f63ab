use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{
            LoginRequest, LoginResponse, ProfileResponse, PublicUser, RegisterRequest,
            RegisterResponse,
        },
        password::hash_password,
        repo_types::{Role, User},
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user/:id", get(get_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        warn!(?missing, "registration with missing fields");
        return Err(ApiError::missing(missing));
    }

    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    let id_number = payload.id_number.unwrap_or_default();
    let birthdate = payload.birthdate.unwrap_or_default();

    if password.len() < 6 {
        warn!(username = %username, "registration password too short");
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Registration failed")
            .with_detail("Password must be at least 6 characters long"));
    }

    let role = match payload.role.as_deref() {
        None | Some("") => Role::User,
        Some(r) => Role::parse(r).ok_or_else(|| {
            ApiError::new(StatusCode::BAD_REQUEST, "Registration failed")
                .with_detail("Role must be 'user' or 'admin'")
        })?,
    };

    let hash = hash_password(&password).map_err(|e| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed")
            .with_detail(e.to_string())
    })?;

    let user = User::create(&state.db, &username, &hash, &id_number, &birthdate, role)
        .await
        .map_err(|e| ApiError::from_repo("Registration failed", e))?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful! Please login.".into(),
            user_id: user.id,
            user: PublicUser {
                username: user.username,
                id_number: user.id_number,
                birthdate: user.birthdate,
                role: user.role,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Login failed")
            .with_detail("Username and password are required"));
    };
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Login failed")
            .with_detail("Username and password are required"));
    }

    let user = User::authenticate(&state.db, &username, &password)
        .await
        .map_err(|e| ApiError::from_repo("Login failed", e))?;

    info!(user_id = %user.id, username = %user.username, role = user.role.as_str(), "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, &user_id)
        .await
        .map_err(|e| ApiError::from_repo("Error retrieving user profile", e))?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "profile lookup for unknown user");
            ApiError::new(StatusCode::NOT_FOUND, "User not found").with_detail("Invalid user ID")
        })?;

    Ok(Json(ProfileResponse {
        message: "User profile retrieved successfully".into(),
        user: user.into(),
    }))
}
