//! Users Domain
//!
//! Phone-first signup pipeline gated by one-time-password verification,
//! plus password login.
//!
//! # Features
//!
//! - User creation keyed by a unique phone number
//! - OTP issuance over SMS and single-use verification (60s expiry)
//! - Password hashing with Argon2
//! - Signup stage tracking across onboarding steps
//! - Login/authentication with a deliberately generic failure message
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Signup steps, OTP store, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_notifications::InMemorySmsProvider;
//! use domain_users::{handlers, repository::InMemoryUserRepository, service::SignupService};
//!
//! let repository = InMemoryUserRepository::new();
//! let sms = Arc::new(InMemorySmsProvider::new());
//! let service = SignupService::new(repository, sms);
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod locks;
pub mod models;
pub mod otp;
pub mod password;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{
    CreateUser, Gender, LoginRequest, LoginResponse, Profile, SignupStage, User, UserResponse,
};
pub use otp::OtpStore;
pub use password::CredentialHasher;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::SignupService;
