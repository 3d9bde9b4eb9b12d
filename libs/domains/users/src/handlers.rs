//! Terminal handlers for user commands and queries.
//!
//! Handlers own the business rules the declarative validation layer cannot
//! express: email uniqueness, existence checks and entity mutation. Every
//! handler checks the cancellation signal before touching the store; writes
//! inside the repository are atomic, so a cancelled request never leaves a
//! partial mutation behind.

use async_trait::async_trait;
use mediator::{CancellationToken, RequestHandler};
use std::sync::Arc;

use crate::commands::{CreateUser, DeleteUser, UpdateUser};
use crate::error::{UserError, UserResult};
use crate::models::{User, UserDto};
use crate::queries::{GetUserById, ListUsers};
use crate::repository::UserRepository;

pub struct CreateUserHandler {
    repository: Arc<dyn UserRepository>,
}

impl CreateUserHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<CreateUser> for CreateUserHandler {
    async fn handle(
        &self,
        request: &CreateUser,
        cancel: &CancellationToken,
    ) -> UserResult<UserDto> {
        if cancel.is_cancelled() {
            return Err(UserError::Cancelled);
        }

        if self.repository.exists_by_email(&request.email).await? {
            return Err(UserError::DuplicateEmail(request.email.clone()));
        }

        let user = User::new(
            request.name.clone(),
            request.email.clone(),
            request.user_type,
        )?;
        let user = self.repository.insert(user).await?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(UserDto::from(user))
    }
}

pub struct UpdateUserHandler {
    repository: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<UpdateUser> for UpdateUserHandler {
    async fn handle(
        &self,
        request: &UpdateUser,
        cancel: &CancellationToken,
    ) -> UserResult<UserDto> {
        if cancel.is_cancelled() {
            return Err(UserError::Cancelled);
        }

        let mut user = self
            .repository
            .get_by_id(request.id)
            .await?
            .ok_or(UserError::NotFound(request.id))?;

        // No fields to change: return the current state without a store write
        if request.is_noop() {
            return Ok(UserDto::from(user));
        }

        if let Some(email) = &request.email {
            // Changing only the letter case of your own email is not a conflict
            if email.to_lowercase() != user.email.to_lowercase() {
                if let Some(existing) = self.repository.get_by_email(email).await? {
                    if existing.id != user.id {
                        return Err(UserError::DuplicateEmail(email.clone()));
                    }
                }
            }
        }

        if let Some(name) = &request.name {
            user.rename(name.clone())?;
        }
        if let Some(email) = &request.email {
            user.change_email(email.clone())?;
        }
        if let Some(user_type) = request.user_type {
            user.change_type(user_type);
        }

        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(UserDto::from(user))
    }
}

pub struct DeleteUserHandler {
    repository: Arc<dyn UserRepository>,
}

impl DeleteUserHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<DeleteUser> for DeleteUserHandler {
    async fn handle(&self, request: &DeleteUser, cancel: &CancellationToken) -> UserResult<()> {
        if cancel.is_cancelled() {
            return Err(UserError::Cancelled);
        }

        if !self.repository.delete(request.id).await? {
            return Err(UserError::NotFound(request.id));
        }

        tracing::info!(user_id = %request.id, "Deleted user");
        Ok(())
    }
}

pub struct GetUserByIdHandler {
    repository: Arc<dyn UserRepository>,
}

impl GetUserByIdHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetUserById> for GetUserByIdHandler {
    async fn handle(
        &self,
        request: &GetUserById,
        cancel: &CancellationToken,
    ) -> UserResult<Option<UserDto>> {
        if cancel.is_cancelled() {
            return Err(UserError::Cancelled);
        }

        let user = self.repository.get_by_id(request.id).await?;
        Ok(user.map(UserDto::from))
    }
}

pub struct ListUsersHandler {
    repository: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<ListUsers> for ListUsersHandler {
    async fn handle(
        &self,
        _request: &ListUsers,
        cancel: &CancellationToken,
    ) -> UserResult<Vec<UserDto>> {
        if cancel.is_cancelled() {
            return Err(UserError::Cancelled);
        }

        let users = self.repository.list().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }
}
