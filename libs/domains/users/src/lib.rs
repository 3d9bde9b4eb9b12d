//! Users Domain
//!
//! Complete domain implementation for managing users, dispatched through the
//! mediator pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ Commands/Queries │  ← Request types with declarative validation rules
//! └────────┬─────────┘
//!          │ (mediator pipeline)
//! ┌────────▼─────────┐
//! │    Handlers      │  ← Business rules (uniqueness, existence)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │   Repository     │  ← Data access (trait + in-memory implementation)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐
//! │     Models       │  ← Entity, DTO, enums
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_users::{
//!     commands::CreateUser,
//!     handlers::CreateUserHandler,
//!     repository::InMemoryUserRepository,
//! };
//! use mediator::Mediator;
//!
//! let repository = Arc::new(InMemoryUserRepository::new());
//! let mediator = Mediator::builder()
//!     .command::<CreateUser, _>(CreateUserHandler::new(repository))
//!     .build();
//! ```

pub mod commands;
pub mod error;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod repository;

pub use commands::{CreateUser, DeleteUser, UpdateUser};
pub use error::{UserError, UserResult};
pub use handlers::{
    CreateUserHandler, DeleteUserHandler, GetUserByIdHandler, ListUsersHandler, UpdateUserHandler,
};
pub use models::{User, UserDto, UserType};
pub use queries::{GetUserById, ListUsers};
pub use repository::{InMemoryUserRepository, UserRepository};
