use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::ValidatedJson;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{
    CreateUser, LoginRequest, LoginResponse, SetPasswordRequest, UpdateGenderRequest,
    UpdateInterestsRequest, UpdateProfileRequest, UserResponse, VerifyOtpRequest,
};
use crate::repository::UserRepository;
use crate::service::SignupService;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: SignupService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/by-phone/{phone}", get(find_by_phone))
        .route("/{id}/password", post(set_password))
        .route("/{id}/otp/send", post(send_otp))
        .route("/{id}/otp/verify", post(verify_otp))
        .route("/{id}/profile", put(update_profile))
        .route("/{id}/gender", put(update_gender))
        .route("/{id}/interests", put(update_interests))
        .route("/login", post(login))
        .with_state(shared_service)
}

/// List response
#[derive(Debug, Serialize)]
struct ListUsersResponse {
    data: Vec<UserResponse>,
    total: usize,
}

/// Generic confirmation body
#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// List users in creation order
///
/// GET /users
async fn list_users<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
) -> UserResult<Json<ListUsersResponse>> {
    let users = service.list_users().await?;
    let total = users.len();

    Ok(Json(ListUsersResponse { data: users, total }))
}

/// Register a phone number
///
/// POST /users
async fn create_user<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input.phone_number).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Look up a user by phone number
///
/// GET /users/by-phone/:phone
async fn find_by_phone<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(phone): Path<String>,
) -> UserResult<Json<UserResponse>> {
    let user = service.find_by_phone(&phone).await?;
    Ok(Json(user))
}

/// Set the signup password
///
/// POST /users/:id/password
async fn set_password<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<SetPasswordRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.set_password(id, &input.password).await?;
    Ok(Json(user))
}

/// Send an OTP to the user's phone number
///
/// POST /users/:id/otp/send
async fn send_otp<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(id): Path<Uuid>,
) -> UserResult<Json<MessageResponse>> {
    service.send_otp(id).await?;

    Ok(Json(MessageResponse {
        message: "OTP sent".to_string(),
    }))
}

/// Verify a previously sent OTP
///
/// POST /users/:id/otp/verify
async fn verify_otp<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(id): Path<Uuid>,
    Json(input): Json<VerifyOtpRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.verify_otp(id, input.code).await?;
    Ok(Json(user))
}

/// Store profile details
///
/// PUT /users/:id/profile
async fn update_profile<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_profile(id, input.into()).await?;
    Ok(Json(user))
}

/// Store gender
///
/// PUT /users/:id/gender
async fn update_gender<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateGenderRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_gender(id, input.gender).await?;
    Ok(Json(user))
}

/// Store interests
///
/// PUT /users/:id/interests
async fn update_interests<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateInterestsRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_interests(id, input.interests).await?;
    Ok(Json(user))
}

/// Password login
///
/// POST /users/login
async fn login<R: UserRepository>(
    State(service): State<Arc<SignupService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let response = service.login(&input.phone_number, &input.password).await?;
    Ok(Json(response))
}
