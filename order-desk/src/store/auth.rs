//! Password sign-in against the backend auth API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{BackendClient, StoreResult};

/// Signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session returned by a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until `access_token` expires
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: SessionUser,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> StoreResult<Session>;
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

/// [`Authenticator`] over `POST /auth/v1/token?grant_type=password`
///
/// A successful sign-in switches the shared client to the session token.
#[derive(Debug, Clone)]
pub struct RestAuthenticator {
    client: BackendClient,
}

impl RestAuthenticator {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Authenticator for RestAuthenticator {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> StoreResult<Session> {
        let response = self
            .client
            .request(reqwest::Method::POST, "auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;
        let session: Session = BackendClient::json(response).await?;
        self.client.set_token(Some(session.access_token.clone()));
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserialize() {
        let session: Session = serde_json::from_str(
            r#"{
                "access_token": "eyJhbGciOi",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "r1",
                "user": { "id": "0f8fad5b-d9cb", "email": "admin@example.com", "role": "authenticated" }
            }"#,
        )
        .unwrap();
        assert_eq!(session.expires_in, Some(3600));
        assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
    }
}
