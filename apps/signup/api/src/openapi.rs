use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        axum_helpers::ErrorResponse,
        domain_users::models::CreateUser,
        domain_users::models::Gender,
        domain_users::models::LoginRequest,
        domain_users::models::LoginResponse,
        domain_users::models::Profile,
        domain_users::models::SetPasswordRequest,
        domain_users::models::SignupStage,
        domain_users::models::UpdateGenderRequest,
        domain_users::models::UpdateInterestsRequest,
        domain_users::models::UpdateProfileRequest,
        domain_users::models::UserResponse,
        domain_users::models::VerifyOtpRequest,
    )),
    info(
        title = "Signup API",
        version = "0.1.0",
        description = "Phone-first signup pipeline with OTP verification and password login"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    tags(
        (name = "users", description = "Signup, OTP verification and login")
    )
)]
pub struct ApiDoc;
