//! Authentication service
//!
//! Passwords are stored as salted argon2 hashes and verified in constant
//! time; sessions are stateless HS256 bearer tokens.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::member::{
        CreateMember, Member, MemberClaims, MembershipStatus, RegisterMember,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new member with a hashed password
    pub async fn register(&self, request: RegisterMember) -> AppResult<Member> {
        if self
            .repository
            .members
            .email_exists(&request.email, None)
            .await?
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let hash = self.hash_password(&request.password)?;

        let member = CreateMember {
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            membership_type: request.membership_type,
        };

        self.repository.members.create(&member, Some(hash)).await
    }

    /// Authenticate a member by email and password, returning a JWT token
    /// and the member record.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, Member)> {
        let credentials = self
            .repository
            .members
            .get_credentials_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        let hash = credentials
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(password, hash)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        if credentials.membership_status != MembershipStatus::Active.as_str() {
            return Err(AppError::Authentication(
                "Account is not active. Please contact the library.".to_string(),
            ));
        }

        let member = self.repository.members.get_by_id(credentials.id).await?;

        let now = Utc::now().timestamp();
        let claims = MemberClaims {
            sub: member.email.clone(),
            member_id: member.id,
            iat: now,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, member))
    }

    /// Resolve the member behind a set of verified claims
    pub async fn current_member(&self, claims: &MemberClaims) -> AppResult<Member> {
        self.repository.members.get_by_id(claims.member_id).await
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
