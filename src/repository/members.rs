//! Members repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::member::{Member, MemberSummary, Role},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Get member by email, if registered
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(member)
    }

    /// List members with their lifetime loan counts
    pub async fn list_with_loan_counts(&self) -> AppResult<Vec<MemberSummary>> {
        let members = sqlx::query_as::<_, MemberSummary>(
            r#"
            SELECT m.id, m.name, m.email, m.phone, m.role,
                   COUNT(l.id) as nb_loans
            FROM members m
            LEFT JOIN loans l ON l.member_id = m.id
            GROUP BY m.id
            ORDER BY m.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Count members holding a given role
    pub async fn count_by_role(&self, role: Role) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a member. The email is unique.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        phone: Option<&str>,
        role: Role,
        gender: Option<&str>,
    ) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, password_hash, phone, role, gender)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(phone)
        .bind(role)
        .bind(gender)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, &format!("Member '{}' already exists", email))
        })
    }

    /// Administrative update: contact fields and role
    pub async fn update(
        &self,
        id: i32,
        email: &str,
        phone: Option<&str>,
        role: Role,
    ) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(
            "UPDATE members SET email = $1, phone = $2, role = $3 WHERE id = $4 RETURNING *",
        )
        .bind(email)
        .bind(phone)
        .bind(role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, &format!("Member '{}' already exists", email))
        })?
        .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Replace the stored credential hash
    pub async fn set_password_hash(&self, id: i32, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE members SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Replace the contact email
    pub async fn set_email(&self, id: i32, email: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE members SET email = $1 WHERE id = $2")
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(e, &format!("Member '{}' already exists", email))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Replace the contact phone
    pub async fn set_phone(&self, id: i32, phone: Option<&str>) -> AppResult<()> {
        let result = sqlx::query("UPDATE members SET phone = $1 WHERE id = $2")
            .bind(phone)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Delete a member
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                id
            )));
        }
        Ok(())
    }
}
