use std::sync::Arc;
use uuid::Uuid;

use domain_notifications::{SmsContent, SmsProvider};

use crate::error::{UserError, UserResult};
use crate::locks::UserLocks;
use crate::models::{Gender, LoginResponse, Profile, SignupStage, User, UserResponse};
use crate::otp::OtpStore;
use crate::password::CredentialHasher;
use crate::repository::UserRepository;

/// Facade over the signup pipeline: user creation, OTP issuance and
/// verification, credential handling and login.
///
/// Each mutation is a load-mutate-save against the repository,
/// serialized per user by [`UserLocks`]. The signup stage stamped by
/// each step is a last-write marker, not an enforced gate (reference
/// behavior; see the module docs on [`SignupStage`]).
#[derive(Clone)]
pub struct SignupService<R: UserRepository> {
    repository: Arc<R>,
    otp_store: OtpStore,
    hasher: CredentialHasher,
    sms: Arc<dyn SmsProvider>,
    locks: UserLocks,
}

impl<R: UserRepository> SignupService<R> {
    pub fn new(repository: R, sms: Arc<dyn SmsProvider>) -> Self {
        Self {
            repository: Arc::new(repository),
            otp_store: OtpStore::new(),
            hasher: CredentialHasher::new(),
            sms,
            locks: UserLocks::new(),
        }
    }

    /// Construct with a custom OTP validity window.
    pub fn with_otp_ttl(repository: R, sms: Arc<dyn SmsProvider>, ttl: std::time::Duration) -> Self {
        Self {
            repository: Arc::new(repository),
            otp_store: OtpStore::with_ttl(ttl),
            hasher: CredentialHasher::new(),
            sms,
            locks: UserLocks::new(),
        }
    }

    /// Register a phone number, starting the signup pipeline.
    ///
    /// The existence pre-check is the fast path; the repository's own
    /// uniqueness guard is authoritative against the create race.
    pub async fn create_user(&self, phone_number: String) -> UserResult<UserResponse> {
        if self.repository.phone_exists(&phone_number).await? {
            return Err(UserError::AlreadyExists(phone_number));
        }

        let user = User::new(phone_number);
        let created = self.repository.create(user).await?;

        Ok(created.into())
    }

    /// Hash and store the signup password.
    pub async fn set_password(&self, user_id: Uuid, password: &str) -> UserResult<UserResponse> {
        self.validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;

        let _guard = self.locks.acquire(user_id).await;

        let mut user = self.load(user_id).await?;
        user.password_hash = Some(password_hash);
        user.advance_to(SignupStage::AddPassword);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Issue a fresh OTP for the user and deliver it by SMS.
    ///
    /// The latest code supersedes any prior one. Delivery is a single
    /// attempt; a provider failure is surfaced verbatim. The generated
    /// code never appears in any response payload.
    pub async fn send_otp(&self, user_id: Uuid) -> UserResult<()> {
        let user = self.load(user_id).await?;

        let code = self.otp_store.issue(user_id).await;
        let body = format!(
            "Your verification code is {}. It expires in {} seconds.",
            code,
            self.otp_store.ttl().as_secs()
        );

        self.sms
            .send(&SmsContent {
                to_number: user.phone_number.clone(),
                body,
            })
            .await?;

        tracing::info!(user_id = %user_id, "OTP sent");
        Ok(())
    }

    /// Verify a previously sent OTP and mark the phone number verified.
    ///
    /// The OTP check is atomic (single use); only a matching, unexpired
    /// code reaches the user mutation.
    pub async fn verify_otp(&self, user_id: Uuid, code: u32) -> UserResult<UserResponse> {
        self.otp_store.verify_and_consume(user_id, code).await?;

        let _guard = self.locks.acquire(user_id).await;

        let mut user = self.load(user_id).await?;
        user.otp_verified = true;
        user.advance_to(SignupStage::OtpVerified);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Store profile details.
    pub async fn update_profile(&self, user_id: Uuid, profile: Profile) -> UserResult<UserResponse> {
        let _guard = self.locks.acquire(user_id).await;

        let mut user = self.load(user_id).await?;
        user.profile = Some(profile);
        user.advance_to(SignupStage::ProfileDetails);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Store the user's gender.
    pub async fn update_gender(&self, user_id: Uuid, gender: Gender) -> UserResult<UserResponse> {
        let _guard = self.locks.acquire(user_id).await;

        let mut user = self.load(user_id).await?;
        user.gender = Some(gender);
        user.advance_to(SignupStage::Gender);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Store the user's interests.
    pub async fn update_interests(
        &self,
        user_id: Uuid,
        interests: Vec<String>,
    ) -> UserResult<UserResponse> {
        if interests.iter().any(|i| i.trim().is_empty()) {
            return Err(UserError::Validation(
                "Interests cannot contain empty entries".to_string(),
            ));
        }

        let _guard = self.locks.acquire(user_id).await;

        let mut user = self.load(user_id).await?;
        user.interests = Some(interests);
        user.advance_to(SignupStage::Interests);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Password login by phone number.
    ///
    /// Read-only: no user field is mutated on success or failure. Every
    /// credential failure collapses into the same generic error so the
    /// caller cannot distinguish "no such phone" from "wrong password".
    pub async fn login(&self, phone_number: &str, password: &str) -> UserResult<LoginResponse> {
        let user = self
            .repository
            .get_by_phone(phone_number)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(UserError::InvalidCredentials)?;

        if !self.hasher.verify(password, password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
        })
    }

    /// All users in creation order, as projections.
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    /// Look up a user projection by phone number.
    pub async fn find_by_phone(&self, phone_number: &str) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_phone(phone_number)
            .await?
            .ok_or_else(|| UserError::PhoneNotFound(phone_number.to_string()))?;

        Ok(user.into())
    }

    async fn load(&self, user_id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    fn validate_password(&self, password: &str) -> UserResult<()> {
        if password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if password.len() > 128 {
            return Err(UserError::Validation(
                "Password cannot exceed 128 characters".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(UserError::Validation(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(UserError::Validation(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }

        if !password.chars().any(|c| c.is_numeric()) {
            return Err(UserError::Validation(
                "Password must contain at least one digit".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryUserRepository;
    use chrono::NaiveDate;
    use domain_notifications::InMemorySmsProvider;

    fn service() -> (SignupService<InMemoryUserRepository>, Arc<InMemorySmsProvider>) {
        let provider = Arc::new(InMemorySmsProvider::new());
        let service = SignupService::new(InMemoryUserRepository::new(), provider.clone());
        (service, provider)
    }

    /// Pull the OTP code out of the captured SMS body.
    fn code_from(body: &str) -> u32 {
        body.split_whitespace()
            .find_map(|word| word.trim_end_matches('.').parse().ok())
            .expect("SMS body should contain the OTP code")
    }

    #[tokio::test]
    async fn test_create_user_succeeds_exactly_once_per_phone() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        assert_eq!(user.phone_number, "5551234");
        assert_eq!(user.signup_stage, SignupStage::MobileNumber);
        assert!(!user.otp_verified);

        let result = service.create_user("5551234".to_string()).await;
        assert!(matches!(result, Err(UserError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_otp_happy_path_is_single_use() {
        let (service, provider) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();

        service.send_otp(user.user_id).await.unwrap();

        let sent = provider.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_number, "5551234");
        let code = code_from(&sent[0].body);
        assert!((1000..=9999).contains(&code));

        let verified = service.verify_otp(user.user_id, code).await.unwrap();
        assert!(verified.otp_verified);
        assert_eq!(verified.signup_stage, SignupStage::OtpVerified);

        // Same code again: the record was deleted on success
        let result = service.verify_otp(user.user_id, code).await;
        assert!(matches!(result, Err(UserError::OtpNotFound)));
    }

    #[tokio::test]
    async fn test_wrong_otp_keeps_the_code_valid_for_retry() {
        let (service, provider) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        service.send_otp(user.user_id).await.unwrap();

        let code = code_from(&provider.sent().await[0].body);
        let wrong = if code == 9999 { 1000 } else { code + 1 };

        let result = service.verify_otp(user.user_id, wrong).await;
        assert!(matches!(result, Err(UserError::OtpInvalid)));

        // Original code still works
        service.verify_otp(user.user_id, code).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_otp_is_rejected_and_removed() {
        let provider = Arc::new(InMemorySmsProvider::new());
        let service = SignupService::with_otp_ttl(
            InMemoryUserRepository::new(),
            provider.clone(),
            std::time::Duration::ZERO,
        );

        let user = service.create_user("5551234".to_string()).await.unwrap();
        service.send_otp(user.user_id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let code = code_from(&provider.sent().await[0].body);
        let result = service.verify_otp(user.user_id, code).await;
        assert!(matches!(result, Err(UserError::OtpExpired)));

        // Removed as a side effect of the expiry check
        let result = service.verify_otp(user.user_id, code).await;
        assert!(matches!(result, Err(UserError::OtpNotFound)));
    }

    #[tokio::test]
    async fn test_send_otp_for_unknown_user_is_not_found() {
        let (service, provider) = service();

        let result = service.send_otp(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
        assert!(provider.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_otp_surfaces_delivery_failure() {
        let (service, provider) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        provider.fail_next();

        let result = service.send_otp(user.user_id).await;
        assert!(matches!(result, Err(UserError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_reissued_otp_supersedes_the_first() {
        let (service, provider) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        service.send_otp(user.user_id).await.unwrap();
        service.send_otp(user.user_id).await.unwrap();

        let sent = provider.sent().await;
        assert_eq!(sent.len(), 2);

        let latest = code_from(&sent[1].body);
        service.verify_otp(user.user_id, latest).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_password_then_login() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        let updated = service
            .set_password(user.user_id, "P@ssw0rd123")
            .await
            .unwrap();
        assert_eq!(updated.signup_stage, SignupStage::AddPassword);

        let login = service.login("5551234", "P@ssw0rd123").await.unwrap();
        assert!(login.success);
        assert_eq!(login.message, "Login successful");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        service
            .set_password(user.user_id, "P@ssw0rd123")
            .await
            .unwrap();

        let wrong_password = service.login("5551234", "wrong").await.unwrap_err();
        let unknown_phone = service.login("5550000", "P@ssw0rd123").await.unwrap_err();

        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_phone, UserError::InvalidCredentials));
        // Identical message text for both failure paths
        assert_eq!(wrong_password.to_string(), unknown_phone.to_string());
    }

    #[tokio::test]
    async fn test_login_before_password_set_is_generic_failure() {
        let (service, _) = service();

        service.create_user("5551234".to_string()).await.unwrap();

        let result = service.login("5551234", "anything").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_weak_passwords_are_rejected() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();

        for weak in ["short1A", "alllowercase1", "ALLUPPERCASE1", "NoDigitsHere"] {
            let result = service.set_password(user.user_id, weak).await;
            assert!(
                matches!(result, Err(UserError::Validation(_))),
                "expected '{}' to be rejected",
                weak
            );
        }
    }

    #[tokio::test]
    async fn test_set_password_for_unknown_user_is_not_found() {
        let (service, _) = service();

        let result = service.set_password(Uuid::now_v7(), "P@ssw0rd123").await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_round_trips_through_find_by_phone() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();

        let profile = Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 12, 10).unwrap(),
            profile_image: Some("https://example.com/ada.png".to_string()),
        };

        let updated = service
            .update_profile(user.user_id, profile.clone())
            .await
            .unwrap();
        assert_eq!(updated.signup_stage, SignupStage::ProfileDetails);

        let fetched = service.find_by_phone("5551234").await.unwrap();
        assert_eq!(fetched.profile, Some(profile));
    }

    #[tokio::test]
    async fn test_update_gender_is_idempotent() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();

        let first = service.update_gender(user.user_id, Gender::Male).await.unwrap();
        let second = service.update_gender(user.user_id, Gender::Male).await.unwrap();

        assert_eq!(first.gender, second.gender);
        assert_eq!(first.signup_stage, second.signup_stage);
        assert_eq!(second.gender, Some(Gender::Male));
        assert_eq!(second.signup_stage, SignupStage::Gender);
    }

    #[tokio::test]
    async fn test_update_interests_rejects_empty_entries() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();

        let result = service
            .update_interests(user.user_id, vec!["hiking".to_string(), "  ".to_string()])
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));

        let updated = service
            .update_interests(user.user_id, vec!["hiking".to_string(), "jazz".to_string()])
            .await
            .unwrap();
        assert_eq!(updated.signup_stage, SignupStage::Interests);
        assert_eq!(
            updated.interests,
            Some(vec!["hiking".to_string(), "jazz".to_string()])
        );
    }

    #[tokio::test]
    async fn test_stage_is_a_last_write_marker() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();

        // Steps can be performed out of order; the stage just follows
        let updated = service
            .update_gender(user.user_id, Gender::Other)
            .await
            .unwrap();
        assert_eq!(updated.signup_stage, SignupStage::Gender);

        let updated = service
            .set_password(user.user_id, "P@ssw0rd123")
            .await
            .unwrap();
        assert_eq!(updated.signup_stage, SignupStage::AddPassword);
    }

    #[tokio::test]
    async fn test_list_users_in_creation_order_without_secrets() {
        let (service, _) = service();

        let first = service.create_user("5550001".to_string()).await.unwrap();
        service
            .set_password(first.user_id, "P@ssw0rd123")
            .await
            .unwrap();
        service.create_user("5550002".to_string()).await.unwrap();

        let users = service.list_users().await.unwrap();
        let phones: Vec<&str> = users.iter().map(|u| u.phone_number.as_str()).collect();
        assert_eq!(phones, vec!["5550001", "5550002"]);

        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[tokio::test]
    async fn test_find_by_phone_unknown_is_not_found() {
        let (service, _) = service();

        let result = service.find_by_phone("5550000").await;
        assert!(matches!(result, Err(UserError::PhoneNotFound(_))));
    }

    #[tokio::test]
    async fn test_login_does_not_mutate_the_user() {
        let (service, _) = service();

        let user = service.create_user("5551234".to_string()).await.unwrap();
        let before = service
            .set_password(user.user_id, "P@ssw0rd123")
            .await
            .unwrap();

        service.login("5551234", "P@ssw0rd123").await.unwrap();
        let _ = service.login("5551234", "wrong").await;

        let after = service.find_by_phone("5551234").await.unwrap();
        assert_eq!(after.updated_at, before.updated_at);
        assert_eq!(after.signup_stage, before.signup_stage);
    }
}
