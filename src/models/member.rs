//! Member model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Membership tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MembershipType {
    Standard,
    Premium,
    Scholar,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Standard => "Standard",
            MembershipType::Premium => "Premium",
            MembershipType::Scholar => "Scholar",
        }
    }
}

impl std::fmt::Display for MembershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MembershipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Standard" => Ok(MembershipType::Standard),
            "Premium" => Ok(MembershipType::Premium),
            "Scholar" => Ok(MembershipType::Scholar),
            _ => Err(format!("Invalid membership type: {}", s)),
        }
    }
}

/// Membership account status. Transitions are free-form via the status
/// endpoint; only Active members may borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MembershipStatus {
    Active,
    Expired,
    Suspended,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Active",
            MembershipStatus::Expired => "Expired",
            MembershipStatus::Suspended => "Suspended",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(MembershipStatus::Active),
            "Expired" => Ok(MembershipStatus::Expired),
            "Suspended" => Ok(MembershipStatus::Suspended),
            _ => Err(format!("Invalid membership status: {}", s)),
        }
    }
}

/// Member model from database. The password hash is never part of this
/// struct; credential lookups go through [`MemberCredentials`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_type: String,
    pub membership_date: NaiveDate,
    pub membership_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.membership_status == MembershipStatus::Active.as_str()
    }
}

/// Credential row used only by the authentication flow
#[derive(Debug, Clone, FromRow)]
pub struct MemberCredentials {
    pub id: i32,
    pub email: String,
    pub password_hash: Option<String>,
    pub membership_status: String,
}

/// Create member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMember {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Defaults to Standard when omitted
    pub membership_type: Option<MembershipType>,
}

/// Update member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMember {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_status: Option<MembershipStatus>,
}

/// JWT claims for an authenticated member session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberClaims {
    /// Member email
    pub sub: String,
    pub member_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl MemberClaims {
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            self,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<MemberClaims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            &jsonwebtoken::Validation::default(),
        )?;
        Ok(data.claims)
    }
}

/// Registration request (self-service account creation)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterMember {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub membership_type: Option<MembershipType>,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            MembershipStatus::Active,
            MembershipStatus::Expired,
            MembershipStatus::Suspended,
        ] {
            assert_eq!(status.as_str().parse::<MembershipStatus>(), Ok(status));
        }
        assert!("Cancelled".parse::<MembershipStatus>().is_err());
    }

    #[test]
    fn membership_type_rejects_unknown_values() {
        assert_eq!(
            "Scholar".parse::<MembershipType>(),
            Ok(MembershipType::Scholar)
        );
        assert!("Platinum".parse::<MembershipType>().is_err());
    }
}
