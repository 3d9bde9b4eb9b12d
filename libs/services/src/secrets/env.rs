use async_trait::async_trait;

use super::{SecretError, SecretProvider, SecretResult};

const ENV_PREFIX: &str = "SECRET_";

/// Secret source backed by process environment variables.
///
/// The secret name is mangled to an env var: uppercased, with every
/// non-alphanumeric character replaced by `_`, under the `SECRET_` prefix.
/// `users.admin-email` resolves from `SECRET_USERS_ADMIN_EMAIL`.
#[derive(Debug, Default, Clone)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }

    fn env_key(name: &str) -> String {
        let mangled: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{ENV_PREFIX}{mangled}")
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_secret(&self, name: &str) -> SecretResult<String> {
        std::env::var(Self::env_key(name)).map_err(|_| SecretError::NotFound(name.to_string()))
    }

    fn source_name(&self) -> &'static str {
        "environment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_mangling() {
        assert_eq!(
            EnvSecretProvider::env_key("users.admin-email"),
            "SECRET_USERS_ADMIN_EMAIL"
        );
        assert_eq!(EnvSecretProvider::env_key("plain"), "SECRET_PLAIN");
    }

    #[tokio::test]
    async fn test_resolves_from_environment() {
        temp_env::async_with_vars(
            [("SECRET_USERS_ADMIN_EMAIL", Some("admin@example.com"))],
            async {
                let provider = EnvSecretProvider::new();
                let value = provider.get_secret("users.admin-email").await.unwrap();
                assert_eq!(value, "admin@example.com");
            },
        )
        .await;
    }

    #[tokio::test]
    async fn test_missing_env_var_is_not_found() {
        temp_env::async_with_vars([("SECRET_GHOST", None::<&str>)], async {
            let provider = EnvSecretProvider::new();
            assert!(matches!(
                provider.get_secret("ghost").await,
                Err(SecretError::NotFound(_))
            ));
        })
        .await;
    }
}
