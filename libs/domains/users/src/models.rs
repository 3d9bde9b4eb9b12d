use chrono::{DateTime, Utc};
use mediator::FieldError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::{UserError, UserResult};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Role of a user within the organization
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserType {
    Admin,
    Manager,
    #[default]
    Employee,
    Guest,
}

/// User entity.
///
/// Constructed through [`User::new`], which enforces the entity invariants;
/// mutations go through the `rename`/`change_email`/`change_type` methods so
/// `updated_at` always reflects the last change. `updated_at` is `None` until
/// the first mutation and never moves backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(name: String, email: String, user_type: UserType) -> UserResult<Self> {
        check_name(&name)?;
        check_email(&email)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            user_type,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn rename(&mut self, name: String) -> UserResult<()> {
        check_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn change_email(&mut self, email: String) -> UserResult<()> {
        check_email(&email)?;
        self.email = email;
        self.touch();
        Ok(())
    }

    pub fn change_type(&mut self, user_type: UserType) {
        self.user_type = user_type;
        self.touch();
    }

    /// Stamp `updated_at`, keeping it monotonically non-decreasing even if
    /// the wall clock steps backwards
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = Some(match self.updated_at {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}

fn check_name(name: &str) -> UserResult<()> {
    if name.trim().is_empty() {
        return Err(UserError::Validation(vec![FieldError::new(
            "name",
            "must not be blank",
        )]));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserError::Validation(vec![FieldError::new(
            "name",
            format!("must be at most {MAX_NAME_LENGTH} characters"),
        )]));
    }
    Ok(())
}

fn check_email(email: &str) -> UserResult<()> {
    if email.trim().is_empty() {
        return Err(UserError::Validation(vec![FieldError::new(
            "email",
            "must not be blank",
        )]));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserError::Validation(vec![FieldError::new(
            "email",
            format!("must be at most {MAX_EMAIL_LENGTH} characters"),
        )]));
    }
    Ok(())
}

/// API representation of a user, decoupled from the entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            user_type: user.user_type,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}
