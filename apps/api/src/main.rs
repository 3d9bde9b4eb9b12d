use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod events;
mod state;

use config::Config;
use domain_users::{
    CreateUser, CreateUserHandler, DeleteUser, DeleteUserHandler, GetUserById, GetUserByIdHandler,
    InMemoryUserRepository, ListUsers, ListUsersHandler, UpdateUser, UpdateUserHandler, UserError,
    UserType,
};
use events::EventPublisher;
use mediator::Mediator;
use services::{
    ChainSecretProvider, EnvSecretProvider, InMemoryCache, InMemoryMessageBus,
    InMemorySecretProvider, SecretProvider,
};
use state::AppState;

/// Secret naming the email of the administrator account seeded at startup
const ADMIN_EMAIL_SECRET: &str = "users.admin-email";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let repository = Arc::new(InMemoryUserRepository::new());
    let cache = Arc::new(InMemoryCache::new());
    let message_bus = Arc::new(InMemoryMessageBus::new());

    // Environment first, with a development fallback so the app boots without
    // any secret infrastructure
    let secrets = ChainSecretProvider::new(vec![
        Arc::new(EnvSecretProvider::new()),
        Arc::new(
            InMemorySecretProvider::new().with_secret(ADMIN_EMAIL_SECRET, "admin@example.com"),
        ),
    ]);

    let mediator = Arc::new(build_mediator(&repository, &cache, &config));

    seed_admin_user(&mediator, &secrets).await;

    let events = EventPublisher::new(message_bus.clone());
    let state = AppState {
        config: config.clone(),
        mediator,
        repository,
        cache,
        message_bus,
        events,
    };

    let app = create_router(api::routes(&state), &config.server)
        .merge(health_router(config.app))
        .merge(api::ready_router(state));

    create_app(app, &config.server).await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Wires every command and query to its handler, sharing one repository
fn build_mediator(
    repository: &Arc<InMemoryUserRepository>,
    cache: &Arc<InMemoryCache>,
    config: &Config,
) -> Mediator {
    Mediator::builder()
        .cache(cache.clone(), config.cache.default_ttl)
        .command::<CreateUser, _>(CreateUserHandler::new(repository.clone()))
        .command::<UpdateUser, _>(UpdateUserHandler::new(repository.clone()))
        .command::<DeleteUser, _>(DeleteUserHandler::new(repository.clone()))
        .query::<GetUserById, _>(GetUserByIdHandler::new(repository.clone()))
        .query::<ListUsers, _>(ListUsersHandler::new(repository.clone()))
        .build()
}

/// Seed the administrator account named by the `users.admin-email` secret.
///
/// Runs through the regular create command so the usual rules apply; on
/// restart against a shared store the duplicate is logged and ignored.
async fn seed_admin_user(mediator: &Mediator, secrets: &ChainSecretProvider) {
    let email = match secrets.get_secret(ADMIN_EMAIL_SECRET).await {
        Ok(email) => email,
        Err(e) => {
            warn!(error = %e, "Admin user not seeded");
            return;
        }
    };

    let command = CreateUser {
        name: "Administrator".to_string(),
        email,
        user_type: UserType::Admin,
    };

    match mediator.send(command).await {
        Ok(user) => info!(user_id = %user.id, "Seeded admin user"),
        Err(UserError::DuplicateEmail(_)) => info!("Admin user already present"),
        Err(e) => warn!(error = %e, "Failed to seed admin user"),
    }
}
