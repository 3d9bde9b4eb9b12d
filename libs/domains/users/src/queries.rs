use mediator::{Query, Request};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::UserError;
use crate::models::UserDto;

/// Fetch a single user by ID.
///
/// Resolves to `None` for an unknown ID; absence is not an error for reads.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GetUserById {
    pub id: Uuid,
}

impl Request for GetUserById {
    type Response = Option<UserDto>;
    type Error = UserError;

    const NAME: &'static str = "users.get";
}

impl Query for GetUserById {}

/// List all users, ordered by creation time ascending
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ListUsers {}

impl Request for ListUsers {
    type Response = Vec<UserDto>;
    type Error = UserError;

    const NAME: &'static str = "users.list";
}

impl Query for ListUsers {}
