use mediator::Request;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::UserError;
use crate::models::{UserDto, UserType};

/// Custom validator rejecting whitespace-only values that pass length rules
fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("not_blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Create a new user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(
        length(min = 1, max = 100, message = "must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: String,

    pub user_type: UserType,
}

impl Request for CreateUser {
    type Response = UserDto;
    type Error = UserError;

    const NAME: &'static str = "users.create";
}

/// Update an existing user; `None` fields are left unchanged
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    pub id: Uuid,

    #[validate(
        length(min = 1, max = 100, message = "must be between 1 and 100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: Option<String>,

    pub user_type: Option<UserType>,
}

impl UpdateUser {
    pub fn is_noop(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.user_type.is_none()
    }
}

impl Request for UpdateUser {
    type Response = UserDto;
    type Error = UserError;

    const NAME: &'static str = "users.update";
}

/// Delete a user by ID
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteUser {
    pub id: Uuid,
}

impl Request for DeleteUser {
    type Response = ();
    type Error = UserError;

    const NAME: &'static str = "users.delete";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_valid() {
        let command = CreateUser {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            user_type: UserType::Employee,
        };
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_create_user_blank_name_rejected() {
        let command = CreateUser {
            name: "   ".to_string(),
            email: "john@example.com".to_string(),
            user_type: UserType::Employee,
        };
        let errors = command.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_create_user_invalid_email_rejected() {
        let command = CreateUser {
            name: "John Doe".to_string(),
            email: "not-an-email".to_string(),
            user_type: UserType::Employee,
        };
        let errors = command.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_user_optional_fields_skip_validation() {
        let command = UpdateUser {
            id: Uuid::new_v4(),
            name: None,
            email: None,
            user_type: None,
        };
        assert!(command.validate().is_ok());
        assert!(command.is_noop());
    }

    #[test]
    fn test_update_user_present_fields_are_validated() {
        let command = UpdateUser {
            id: Uuid::new_v4(),
            name: Some("".to_string()),
            email: Some("valid@example.com".to_string()),
            user_type: None,
        };
        let errors = command.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
