use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Onboarding steps, in pipeline order.
///
/// The stage records the most recently completed step, not an enforced
/// prerequisite chain: every update operation stamps its own stage
/// unconditionally, mirroring the reference behavior. There is no guard
/// against skipping steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SignupStage {
    #[default]
    #[serde(rename = "mobile_number")]
    MobileNumber,
    #[serde(rename = "add-password")]
    AddPassword,
    #[serde(rename = "otp_verified")]
    OtpVerified,
    #[serde(rename = "profile_details")]
    ProfileDetails,
    #[serde(rename = "gender")]
    Gender,
    #[serde(rename = "interests")]
    Interests,
}

impl std::fmt::Display for SignupStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupStage::MobileNumber => write!(f, "mobile_number"),
            SignupStage::AddPassword => write!(f, "add-password"),
            SignupStage::OtpVerified => write!(f, "otp_verified"),
            SignupStage::ProfileDetails => write!(f, "profile_details"),
            SignupStage::Gender => write!(f, "gender"),
            SignupStage::Interests => write!(f, "interests"),
        }
    }
}

impl std::str::FromStr for SignupStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile_number" => Ok(SignupStage::MobileNumber),
            "add-password" => Ok(SignupStage::AddPassword),
            "otp_verified" => Ok(SignupStage::OtpVerified),
            "profile_details" => Ok(SignupStage::ProfileDetails),
            "gender" => Ok(SignupStage::Gender),
            "interests" => Ok(SignupStage::Interests),
            _ => Err(format!("Unknown signup stage: {}", s)),
        }
    }
}

/// User gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Profile details captured during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, generated at creation
    pub user_id: Uuid,
    /// Phone number (unique across all users, set once at creation)
    pub phone_number: String,
    /// Whether the phone number has been verified by OTP
    pub otp_verified: bool,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    /// Profile details, present after the profile step
    pub profile: Option<Profile>,
    /// Gender, present after the gender step
    pub gender: Option<Gender>,
    /// Interests, present after the interests step
    pub interests: Option<Vec<String>>,
    /// Most recently completed onboarding step
    pub signup_stage: SignupStage,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp, refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user at the start of the signup pipeline.
    pub fn new(phone_number: String) -> Self {
        let now = Utc::now();
        Self {
            user_id: Uuid::now_v7(),
            phone_number,
            otp_verified: false,
            password_hash: None,
            profile: None,
            gender: None,
            interests: None,
            signup_stage: SignupStage::MobileNumber,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp a completed step and refresh the update timestamp.
    pub fn advance_to(&mut self, stage: SignupStage) {
        self.signup_stage = stage;
        self.updated_at = Utc::now();
    }
}

/// User projection returned to callers (without password_hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub phone_number: String,
    pub otp_verified: bool,
    pub profile: Option<Profile>,
    pub gender: Option<Gender>,
    pub interests: Option<Vec<String>>,
    pub signup_stage: SignupStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            phone_number: user.phone_number,
            otp_verified: user.otp_verified,
            profile: user.profile,
            gender: user.gender,
            interests: user.interests,
            signup_stage: user.signup_stage,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 7, max = 15))]
    pub phone_number: String,
}

/// DTO for setting the signup password
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetPasswordRequest {
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// DTO for verifying a previously sent OTP
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    pub code: u32,
}

/// DTO for the profile step
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub profile_image: Option<String>,
}

impl From<UpdateProfileRequest> for Profile {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            profile_image: request.profile_image,
        }
    }
}

/// DTO for the gender step
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateGenderRequest {
    pub gender: Gender,
}

/// DTO for the interests step
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateInterestsRequest {
    #[validate(length(min = 1))]
    pub interests: Vec<String>,
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 7, max = 15))]
    pub phone_number: String,
    pub password: String,
}

/// Response after a successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}
