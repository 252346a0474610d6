//! Member model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Member roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Staff and administrators run the loan desk.
    pub fn can_manage_loans(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Staff and administrators approve or reject course bookings.
    pub fn can_manage_bookings(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Staff and administrators maintain the catalog and course list.
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Only administrators manage member accounts.
    pub fn can_manage_members(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Member record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub gender: Option<String>,
}

/// Member list entry with loan count
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MemberSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub nb_loans: i64,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMember {
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub phone: Option<String>,
    pub role: Role,
    pub gender: Option<String>,
}

/// Administrative member update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMember {
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// JWT claims for an authenticated member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberClaims {
    pub sub: String,
    pub member_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl MemberClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    // Authorization checks

    pub fn require_manage_loans(&self) -> Result<(), AppError> {
        if self.role.can_manage_loans() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient rights to manage loans".to_string(),
            ))
        }
    }

    pub fn require_manage_bookings(&self) -> Result<(), AppError> {
        if self.role.can_manage_bookings() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient rights to manage bookings".to_string(),
            ))
        }
    }

    pub fn require_manage_catalog(&self) -> Result<(), AppError> {
        if self.role.can_manage_catalog() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient rights to manage the catalog".to_string(),
            ))
        }
    }

    pub fn require_manage_members(&self) -> Result<(), AppError> {
        if self.role.can_manage_members() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient rights to manage members".to_string(),
            ))
        }
    }

    /// A member may act on their own record, staff and admins on anyone's.
    pub fn require_self_or_staff(&self, member_id: i32) -> Result<(), AppError> {
        if self.member_id == member_id || self.role.can_manage_loans() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Insufficient rights to access this member".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("librarian".parse::<Role>().is_err());
    }

    #[test]
    fn test_capabilities() {
        assert!(!Role::Member.can_manage_loans());
        assert!(Role::Staff.can_manage_loans());
        assert!(Role::Admin.can_manage_loans());

        assert!(!Role::Member.can_manage_bookings());
        assert!(Role::Staff.can_manage_bookings());

        assert!(!Role::Staff.can_manage_members());
        assert!(Role::Admin.can_manage_members());
    }

    #[test]
    fn test_self_or_staff_access() {
        let claims = |member_id, role| MemberClaims {
            sub: "someone@example.org".to_string(),
            member_id,
            role,
            exp: 0,
            iat: 0,
        };

        // A plain member only reaches their own record
        assert!(claims(7, Role::Member).require_self_or_staff(7).is_ok());
        assert!(claims(7, Role::Member).require_self_or_staff(8).is_err());

        // Staff and admins reach anyone's
        assert!(claims(7, Role::Staff).require_self_or_staff(8).is_ok());
        assert!(claims(7, Role::Admin).require_self_or_staff(8).is_ok());
    }

    #[test]
    fn test_token_round_trip() {
        let claims = MemberClaims {
            sub: "mario@example.org".to_string(),
            member_id: 7,
            role: Role::Staff,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token("secret").unwrap();
        let parsed = MemberClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.member_id, 7);
        assert_eq!(parsed.role, Role::Staff);
        assert!(MemberClaims::from_token(&token, "other-secret").is_err());
    }
}
