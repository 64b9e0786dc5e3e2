//! Auth Service - email/password sign-in

use std::sync::Arc;

use crate::store::{Authenticator, Session, StoreError};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct AuthService {
    authenticator: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Check credentials and open a session
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::required("email"));
        }
        if password.is_empty() {
            return Err(AppError::required("password"));
        }

        match self.authenticator.sign_in_with_password(email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Signed in");
                Ok(session)
            }
            Err(StoreError::Api { status: 400 | 401, message }) => {
                tracing::warn!("Sign-in rejected: {}", message);
                Err(AppError::invalid_credentials().with_detail("reason", message))
            }
            Err(e) => {
                tracing::error!(error = %e, "Sign-in failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SessionUser, StoreResult};
    use crate::utils::ErrorCode;
    use async_trait::async_trait;

    struct FixedAuthenticator;

    #[async_trait]
    impl Authenticator for FixedAuthenticator {
        async fn sign_in_with_password(&self, email: &str, password: &str) -> StoreResult<Session> {
            if email == "admin@example.com" && password == "secret" {
                return Ok(Session {
                    access_token: "token".into(),
                    refresh_token: None,
                    expires_in: Some(3600),
                    user: SessionUser {
                        id: "u-1".into(),
                        email: Some(email.into()),
                    },
                });
            }
            Err(StoreError::Api {
                status: 400,
                message: "Invalid login credentials".into(),
            })
        }
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(FixedAuthenticator))
    }

    #[tokio::test]
    async fn test_sign_in() {
        let session = service()
            .sign_in(" admin@example.com ", "secret")
            .await
            .unwrap();
        assert_eq!(session.user.id, "u-1");

        let err = service()
            .sign_in("admin@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        assert_eq!(
            err.details.unwrap().get("reason").unwrap(),
            "Invalid login credentials"
        );
    }

    #[tokio::test]
    async fn test_sign_in_requires_both_fields() {
        let err = service().sign_in("", "secret").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        let err = service().sign_in("a@b.c", "").await.unwrap_err();
        assert_eq!(err.message, "password is required");
    }
}
