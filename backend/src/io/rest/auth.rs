//! Caller identity.
//!
//! Tokens are verified upstream; the verified identity arrives in the
//! `x-user-id` and `x-user-roles` headers and is trusted as given.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::errors::PointsError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLES_HEADER: &str = "x-user-roles";
pub const PARENT_ROLE: &str = "parent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub roles: Vec<String>,
}

impl AuthContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_parent(&self) -> bool {
        self.has_role(PARENT_ROLE)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = PointsError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| PointsError::Unauthenticated("missing user id".to_string()))?
            .to_string();

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|role| !role.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { user_id, roles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(builder: axum::http::request::Builder) -> Result<AuthContext, PointsError> {
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_user_and_roles() {
        let auth = extract(
            Request::builder()
                .header(USER_ID_HEADER, "p1")
                .header(USER_ROLES_HEADER, "Parent, admin"),
        )
        .await
        .unwrap();

        assert_eq!(auth.user_id, "p1");
        assert_eq!(auth.roles, vec!["Parent".to_string(), "admin".to_string()]);
        assert!(auth.is_parent());
    }

    #[tokio::test]
    async fn test_roles_are_optional() {
        let auth = extract(Request::builder().header(USER_ID_HEADER, "u1")).await.unwrap();
        assert!(auth.roles.is_empty());
        assert!(!auth.is_parent());
    }

    #[tokio::test]
    async fn test_missing_or_blank_user_is_unauthenticated() {
        for builder in [Request::builder(), Request::builder().header(USER_ID_HEADER, "  ")] {
            let err = extract(builder).await.unwrap_err();
            assert!(matches!(err, PointsError::Unauthenticated(_)));
        }
    }
}
