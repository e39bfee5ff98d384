use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Verifies a bearer token when one is sent and stores the user in request
/// extensions. A missing or invalid token is not an error here; routes that
/// need a user say so with an extractor.
pub async fn authenticate_jwt(mut request: Request, next: Next) -> Response {
    if let Some(token) = extract_jwt_from_headers(request.headers()) {
        match validate_jwt(token) {
            Ok(claims) => {
                let auth_user = AuthUser::from(claims);
                tracing::debug!("Authenticated {} (admin={})", auth_user.username, auth_user.is_admin);
                request.extensions_mut().insert(auth_user);
            }
            Err(e) => tracing::warn!("Ignoring bearer token: {}", e),
        }
    }

    next.run(request).await
}

/// Extract JWT token from Authorization header ("Bearer" or "bearer")
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor for routes restricted to admins. Rejects with 401 unless the
/// request carries a valid token whose `isAdmin` claim is true.
#[derive(Clone, Debug)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthUser>() {
            Some(user) if user.is_admin && !user.username.is_empty() => Ok(AdminUser(user.clone())),
            Some(user) => {
                tracing::warn!("Admin access denied for {}", user.username);
                Err(ApiError::unauthorized("Unauthorized"))
            }
            None => Err(ApiError::unauthorized("Unauthorized")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request as HttpRequest};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token_either_case() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers("bearer abc.def ")), Some("abc.def"));
    }

    #[test]
    fn ignores_other_schemes_and_empty_tokens() {
        assert_eq!(extract_jwt_from_headers(&headers("Basic dXNlcg==")), None);
        assert_eq!(extract_jwt_from_headers(&headers("Bearer   ")), None);
        assert_eq!(extract_jwt_from_headers(&HeaderMap::new()), None);
    }

    async fn admin_from(user: Option<AuthUser>) -> Result<AdminUser, ApiError> {
        let mut request = HttpRequest::builder().body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        let (mut parts, _) = request.into_parts();
        AdminUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn admin_extractor_accepts_admin() {
        let user = AuthUser { username: "test".to_string(), is_admin: true };
        let AdminUser(found) = admin_from(Some(user.clone())).await.unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn admin_extractor_rejects_non_admin_and_anonymous() {
        let user = AuthUser { username: "test".to_string(), is_admin: false };
        assert!(matches!(admin_from(Some(user)).await, Err(ApiError::Unauthorized(_))));
        assert!(matches!(admin_from(None).await, Err(ApiError::Unauthorized(_))));
    }
}
