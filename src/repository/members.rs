//! Members repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::member::{
        CreateMember, Member, MemberCredentials, MembershipStatus, MembershipType, UpdateMember,
    },
};

const MEMBER_COLUMNS: &str = "id, name, email, phone, address, membership_type, \
                              membership_date, membership_status, created_at, updated_at";

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all members
    pub async fn find_all(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(&format!(
            "SELECT {} FROM members ORDER BY name",
            MEMBER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>(&format!(
            "SELECT {} FROM members WHERE id = $1",
            MEMBER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Get member by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(&format!(
            "SELECT {} FROM members WHERE LOWER(email) = LOWER($1)",
            MEMBER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    /// Credential lookup for the authentication flow
    pub async fn get_credentials_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<MemberCredentials>> {
        let credentials = sqlx::query_as::<_, MemberCredentials>(
            "SELECT id, email, password_hash, membership_status \
             FROM members WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(credentials)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new member, optionally with an argon2 password hash
    pub async fn create(
        &self,
        member: &CreateMember,
        password_hash: Option<String>,
    ) -> AppResult<Member> {
        let membership_type = member.membership_type.unwrap_or(MembershipType::Standard);

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO members (
                name, email, phone, address, membership_type,
                membership_date, membership_status, password_hash
            ) VALUES ($1, $2, $3, $4, $5, CURRENT_DATE, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.address)
        .bind(membership_type.as_str())
        .bind(MembershipStatus::Active.as_str())
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Email already registered"))?;

        self.get_by_id(id).await
    }

    /// Update an existing member
    pub async fn update(&self, id: i32, member: &UpdateMember) -> AppResult<Member> {
        let result = sqlx::query(
            r#"
            UPDATE members SET
                name = $1, email = $2, phone = $3, address = $4,
                membership_status = COALESCE($5, membership_status),
                updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(&member.address)
        .bind(member.membership_status.map(|s| s.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, "Email already registered to another member"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                id
            )));
        }

        self.get_by_id(id).await
    }

    /// Update membership status only
    pub async fn update_status(&self, id: i32, status: MembershipStatus) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE members SET membership_status = $1, updated_at = NOW() WHERE id = $2")
                .bind(status.as_str())
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

    /// Count loans the member has not yet returned
    pub async fn count_active_loans(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_loans WHERE member_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Delete a member. Refused while any loan is still open; loan history
    /// of deletable members is removed by the cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        // Existence check first so a missing member is a 404, not a 400
        self.get_by_id(id).await?;

        let active_loans = self.count_active_loans(id).await?;
        if active_loans > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete member: {} active loan(s) must be returned first",
                active_loans
            )));
        }

        sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Simple substring search over name, email and phone
    pub async fn search(&self, query: &str) -> AppResult<Vec<Member>> {
        let pattern = format!("%{}%", query);
        let members = sqlx::query_as::<_, Member>(&format!(
            "SELECT {} FROM members \
             WHERE name ILIKE $1 OR email ILIKE $1 OR phone ILIKE $1 \
             ORDER BY name",
            MEMBER_COLUMNS
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}
