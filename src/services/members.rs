//! Membership and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, MemberClaims, MemberSummary, Role, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
    config: AuthConfig,
}

impl MembersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a member by email and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, Member)> {
        let member = self
            .repository
            .members
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&member, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.create_token(&member)?;
        Ok((token, member))
    }

    fn create_token(&self, member: &Member) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = MemberClaims {
            sub: member.email.clone(),
            member_id: member.id,
            role: member.role,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, member: &Member, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&member.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Register a new member
    pub async fn register(&self, member: CreateMember) -> AppResult<Member> {
        let password_hash = self.hash_password(&member.password)?;

        self.repository
            .members
            .create(
                &member.name,
                &member.email,
                &password_hash,
                member.phone.as_deref(),
                member.role,
                member.gender.as_deref(),
            )
            .await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    pub async fn list(&self) -> AppResult<Vec<MemberSummary>> {
        self.repository.members.list_with_loan_counts().await
    }

    pub async fn count_by_role(&self, role: Role) -> AppResult<i64> {
        self.repository.members.count_by_role(role).await
    }

    /// Administrative update of contact fields and role
    pub async fn update(&self, id: i32, update: UpdateMember) -> AppResult<Member> {
        self.repository
            .members
            .update(id, &update.email, update.phone.as_deref(), update.role)
            .await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.members.delete(id).await
    }

    /// Change password after checking the old one
    pub async fn change_password(&self, member_id: i32, old: &str, new: &str) -> AppResult<()> {
        let member = self.repository.members.get_by_id(member_id).await?;

        if !self.verify_password(&member, old)? {
            return Err(AppError::Forbidden("Current password is wrong".to_string()));
        }

        let hash = self.hash_password(new)?;
        self.repository.members.set_password_hash(member_id, &hash).await
    }

    /// Change email after checking the old one matches
    pub async fn change_email(&self, member_id: i32, old: &str, new: &str) -> AppResult<()> {
        let member = self.repository.members.get_by_id(member_id).await?;

        if member.email != old {
            return Err(AppError::Forbidden(
                "Current email does not match".to_string(),
            ));
        }

        self.repository.members.set_email(member_id, new).await
    }

    pub async fn change_phone(&self, member_id: i32, phone: Option<&str>) -> AppResult<()> {
        self.repository.members.set_phone(member_id, phone).await
    }
}
