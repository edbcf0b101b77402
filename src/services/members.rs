//! Member management service

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, MembershipStatus, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.repository.members.find_all().await
    }

    pub async fn get_member(&self, id: i32) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    /// Create a member, rejecting duplicate emails up front
    pub async fn create_member(&self, member: CreateMember) -> AppResult<Member> {
        if self
            .repository
            .members
            .email_exists(&member.email, None)
            .await?
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        self.repository.members.create(&member, None).await
    }

    pub async fn update_member(&self, id: i32, member: UpdateMember) -> AppResult<Member> {
        if self
            .repository
            .members
            .email_exists(&member.email, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "Email already registered to another member".to_string(),
            ));
        }
        self.repository.members.update(id, &member).await
    }

    pub async fn update_status(&self, id: i32, status: MembershipStatus) -> AppResult<()> {
        self.repository.members.update_status(id, status).await
    }

    /// Delete a member; refused while the member has open loans
    pub async fn delete_member(&self, id: i32) -> AppResult<()> {
        self.repository.members.delete(id).await
    }

    pub async fn search_members(&self, query: &str) -> AppResult<Vec<Member>> {
        self.repository.members.search(query).await
    }
}
